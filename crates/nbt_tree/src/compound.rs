use std::borrow::Borrow;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::FusedIterator;
use std::ops::Index;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::tag::Tag;
use crate::{ByteArray, Error, IntArray, List, LongArray, Result, Value};

type Map = IndexMap<String, Value>;

/// An insertion-ordered map with unique [`String`] keys and [`Value`] values.
///
/// Compounds are immutable. [`Compound::with`] and [`Compound::without`]
/// return a new compound; only the top level map is copied, nested values are
/// shared with the original.
///
/// Inserting a key that already exists replaces its value in place: the entry
/// keeps its original position in iteration order.
#[derive(Clone, Default)]
pub struct Compound {
    map: Arc<Map>,
}

impl Compound {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_map(map: Map) -> Self {
        Self { map: Arc::new(map) }
    }

    pub fn get<Q>(&self, k: &Q) -> Option<&Value>
    where
        String: Borrow<Q>,
        Q: ?Sized + Eq + Hash,
    {
        self.map.get(k)
    }

    pub fn get_key_value<Q>(&self, k: &Q) -> Option<(&String, &Value)>
    where
        String: Borrow<Q>,
        Q: ?Sized + Eq + Hash,
    {
        self.map.get_key_value(k)
    }

    pub fn contains_key<Q>(&self, k: &Q) -> bool
    where
        String: Borrow<Q>,
        Q: ?Sized + Eq + Hash,
    {
        self.map.contains_key(k)
    }

    /// Returns the type of the value under `k`, or [`Tag::End`] if there is
    /// none.
    pub fn tag_of<Q>(&self, k: &Q) -> Tag
    where
        String: Borrow<Q>,
        Q: ?Sized + Eq + Hash,
    {
        self.get(k).map_or(Tag::End, Value::tag)
    }

    /// Whether there is a value of type `tag` under `k`.
    pub fn contains<Q>(&self, k: &Q, tag: Tag) -> bool
    where
        String: Borrow<Q>,
        Q: ?Sized + Eq + Hash,
    {
        self.get(k).is_some_and(|v| v.tag() == tag)
    }

    /// Whether there is a value of any numeric type under `k`.
    pub fn contains_numeric<Q>(&self, k: &Q) -> bool
    where
        String: Borrow<Q>,
        Q: ?Sized + Eq + Hash,
    {
        self.tag_of(k).is_numeric()
    }

    /// Returns a copy of this compound with `v` stored under `k`.
    #[must_use]
    pub fn with<K, V>(&self, k: K, v: V) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let mut next = self.clone();
        Arc::make_mut(&mut next.map).insert(k.into(), v.into());
        next
    }

    /// Returns a copy of this compound without the entry under `k`. The
    /// remaining entries keep their relative order.
    #[must_use]
    pub fn without<Q>(&self, k: &Q) -> Self
    where
        String: Borrow<Q>,
        Q: ?Sized + Eq + Hash,
    {
        if !self.contains_key(k) {
            return self.clone();
        }

        let mut next = self.clone();
        Arc::make_mut(&mut next.map).shift_remove(k);
        next
    }

    /// Returns a copy of this compound with the compound under `k` replaced
    /// by `f` applied to it. A missing key or a value of another type is
    /// handed to `f` as an empty compound.
    ///
    /// ```
    /// use nbt_tree::compound;
    ///
    /// let root = compound! { "pos" => compound! { "x" => 1_i32, "y" => 2_i32 } };
    /// let moved = root.updated("pos", |pos| pos.with("y", 64_i32));
    ///
    /// assert_eq!(moved.get_compound("pos").unwrap().get_int("y"), Some(64));
    /// assert_eq!(root.get_compound("pos").unwrap().get_int("y"), Some(2));
    /// ```
    #[must_use]
    pub fn updated<K, F>(&self, k: K, f: F) -> Self
    where
        K: Into<String>,
        F: FnOnce(Compound) -> Compound,
    {
        let k = k.into();
        let current = self.get_compound(k.as_str()).unwrap_or_default();
        self.with(k, f(current))
    }

    /// Like [`Compound::updated`] for the list under `k`. A missing key or a
    /// value of another type is handed to `f` as an empty list. Errors from
    /// `f` are returned unchanged and `self` is left as it was.
    pub fn updated_list<K, F>(&self, k: K, f: F) -> Result<Self>
    where
        K: Into<String>,
        F: FnOnce(List) -> Result<List>,
    {
        let k = k.into();
        let current = self
            .get(k.as_str())
            .and_then(Value::as_list)
            .cloned()
            .unwrap_or_default();
        Ok(self.with(k, f(current)?))
    }

    /// Returns the list under `k` if it holds elements of `element_type`.
    /// Empty lists are returned whatever their declared element type.
    pub fn get_list<Q>(&self, k: &Q, element_type: Tag) -> Option<&List>
    where
        String: Borrow<Q>,
        Q: ?Sized + Eq + Hash,
    {
        self.get(k)
            .and_then(Value::as_list)
            .filter(|l| l.is_empty() || l.element_type() == element_type)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> Iter {
        Iter {
            iter: self.map.iter(),
        }
    }

    pub fn keys(&self) -> Keys {
        Keys {
            iter: self.map.keys(),
        }
    }

    pub fn values(&self) -> Values {
        Values {
            iter: self.map.values(),
        }
    }

    /// Whether `self` and `other` share the same backing map.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.map, &other.map)
    }
}

macro_rules! typed_getters {
    ($($get:ident, $try_get:ident: $as:ident => $ty:ty, $tag:ident, $take:ident;)*) => {
        impl Compound {
            $(
                #[doc = concat!(
                    "Returns the value under `k` if it is a `", stringify!($tag),
                    "`.\n\nMissing keys and values of other types both give `None`."
                )]
                pub fn $get<Q>(&self, k: &Q) -> Option<$ty>
                where
                    String: Borrow<Q>,
                    Q: ?Sized + Eq + Hash,
                {
                    self.get(k).and_then(Value::$as).$take()
                }

                #[doc = concat!(
                    "Returns the value under `k`, which must be a `", stringify!($tag),
                    "` if present.\n\nA missing key gives `Ok(None)` while a value of \
                     another type gives [`Error::TypeMismatch`]."
                )]
                pub fn $try_get<Q>(&self, k: &Q) -> Result<Option<$ty>>
                where
                    String: Borrow<Q>,
                    Q: ?Sized + Eq + Hash,
                {
                    match self.get(k) {
                        None => Ok(None),
                        Some(v) => v
                            .$as()
                            .$take()
                            .map(Some)
                            .ok_or_else(|| Error::mismatch(Tag::$tag, v.tag())),
                    }
                }
            )*
        }
    };
}

typed_getters! {
    get_byte, try_get_byte: as_byte => i8, Byte, copied;
    get_short, try_get_short: as_short => i16, Short, copied;
    get_int, try_get_int: as_int => i32, Int, copied;
    get_long, try_get_long: as_long => i64, Long, copied;
    get_float, try_get_float: as_float => f32, Float, copied;
    get_double, try_get_double: as_double => f64, Double, copied;
    get_byte_array, try_get_byte_array: as_byte_array => ByteArray, ByteArray, cloned;
    get_string, try_get_string: as_string => String, String, cloned;
    get_compound, try_get_compound: as_compound => Compound, Compound, cloned;
    get_int_array, try_get_int_array: as_int_array => IntArray, IntArray, cloned;
    get_long_array, try_get_long_array: as_long_array => LongArray, LongArray, cloned;
}

impl Compound {
    /// Reads a byte under `k` as a boolean. Anything other than a nonzero
    /// byte is `false`.
    pub fn get_bool<Q>(&self, k: &Q) -> bool
    where
        String: Borrow<Q>,
        Q: ?Sized + Eq + Hash,
    {
        self.get_byte(k).is_some_and(|b| b != 0)
    }
}

/// Equality ignores entry order.
impl PartialEq for Compound {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.map, &other.map) || self.map == other.map
    }
}

impl Eq for Compound {}

impl Hash for Compound {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Entry hashes are combined commutatively to agree with `PartialEq`.
        let mut sum = 0_u64;
        for (k, v) in &*self.map {
            let mut h = DefaultHasher::new();
            k.hash(&mut h);
            v.hash(&mut h);
            sum = sum.wrapping_add(h.finish());
        }

        self.map.len().hash(state);
        sum.hash(state);
    }
}

impl fmt::Debug for Compound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.map, f)
    }
}

impl FromIterator<(String, Value)> for Compound {
    fn from_iter<T>(iter: T) -> Self
    where
        T: IntoIterator<Item = (String, Value)>,
    {
        Self::from_map(iter.into_iter().collect())
    }
}

impl<Q> Index<&'_ Q> for Compound
where
    String: Borrow<Q>,
    Q: ?Sized + Eq + Hash,
{
    type Output = Value;

    fn index(&self, index: &Q) -> &Self::Output {
        self.map.index(index)
    }
}

macro_rules! impl_iterator_traits {
    (($name:ident $($generics:tt)*) => $item:ty) => {
        impl $($generics)* Iterator for $name $($generics)* {
            type Item = $item;
            #[inline]
            fn next(&mut self) -> Option<Self::Item> {
                self.iter.next()
            }
            #[inline]
            fn size_hint(&self) -> (usize, Option<usize>) {
                self.iter.size_hint()
            }
        }

        impl $($generics)* DoubleEndedIterator for $name $($generics)* {
            #[inline]
            fn next_back(&mut self) -> Option<Self::Item> {
                self.iter.next_back()
            }
        }

        impl $($generics)* ExactSizeIterator for $name $($generics)* {
            #[inline]
            fn len(&self) -> usize {
                self.iter.len()
            }
        }

        impl $($generics)* FusedIterator for $name $($generics)* {}
    }
}

impl<'a> IntoIterator for &'a Compound {
    type Item = (&'a String, &'a Value);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Clone)]
pub struct Iter<'a> {
    iter: indexmap::map::Iter<'a, String, Value>,
}

impl_iterator_traits!((Iter<'a>) => (&'a String, &'a Value));

impl IntoIterator for Compound {
    type Item = (String, Value);
    type IntoIter = IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            iter: Arc::unwrap_or_clone(self.map).into_iter(),
        }
    }
}

pub struct IntoIter {
    iter: indexmap::map::IntoIter<String, Value>,
}

impl_iterator_traits!((IntoIter) => (String, Value));

#[derive(Clone)]
pub struct Keys<'a> {
    iter: indexmap::map::Keys<'a, String, Value>,
}

impl_iterator_traits!((Keys<'a>) => &'a String);

#[derive(Clone)]
pub struct Values<'a> {
    iter: indexmap::map::Values<'a, String, Value>,
}

impl_iterator_traits!((Values<'a>) => &'a Value);

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::compound;

    #[test]
    fn nested_updates_copy_the_path() {
        let leaf = compound! { "id" => "stone" };
        let root = compound! {
            "inventory" => compound! { "slot" => leaf.clone() },
            "name" => "chest",
        };

        let next = root.updated("inventory", |inv| {
            inv.updated("slot", |slot| slot.with("count", 3_i8))
        });

        let slot = next
            .get_compound("inventory")
            .and_then(|inv| inv.get_compound("slot"))
            .unwrap();
        assert_eq!(slot.get_byte("count"), Some(3));
        assert_eq!(slot.get_string("id").as_deref(), Some("stone"));
        assert_eq!(
            root.get_compound("inventory").unwrap().get_compound("slot"),
            Some(leaf)
        );
        assert_eq!(next.keys().collect::<Vec<_>>(), ["inventory", "name"]);

        let fresh = Compound::new().updated("new", |c| c.with("k", 1_i32));
        assert_eq!(fresh.get_compound("new").unwrap().get_int("k"), Some(1));
    }

    #[test]
    fn list_updates() {
        let c = compound! { "xs" => List::from(vec![1_i32]) };

        let pushed = c.updated_list("xs", |l| l.pushed(2_i32)).unwrap();
        assert_eq!(pushed.get_list("xs", Tag::Int).unwrap().len(), 2);
        assert_eq!(c.get_list("xs", Tag::Int).unwrap().len(), 1);

        let err = c.updated_list("xs", |l| l.pushed("two")).unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { .. }));

        let created = c.updated_list("ys", |l| l.pushed(1.5_f64)).unwrap();
        assert_eq!(created.get_list("ys", Tag::Double).unwrap().len(), 1);
    }

    #[test]
    fn reinsert_replaces_in_place() {
        let c = compound! { "a" => 1, "k" => 2, "z" => 3 };
        let updated = c.with("k", "second");

        assert_eq!(updated.len(), c.len());
        assert_eq!(updated.get_string("k").as_deref(), Some("second"));
        assert_eq!(
            updated.keys().map(String::as_str).collect::<Vec<_>>(),
            ["a", "k", "z"]
        );
        assert_eq!(c.get_int("k"), Some(2));
    }

    #[test]
    fn insertion_order_is_preserved() {
        let letters = ["g", "b", "d", "e", "h", "z", "m", "a", "q"];

        let mut c = Compound::new();
        for l in letters {
            c = c.with(l, 0_i8);
        }

        for (k, l) in c.keys().zip(letters) {
            assert_eq!(k, l);
        }
    }

    #[test]
    fn without_keeps_order_and_original() {
        let c = compound! { "a" => 1, "b" => 2, "c" => 3 };
        let removed = c.without("b");

        assert_eq!(
            removed.keys().map(String::as_str).collect::<Vec<_>>(),
            ["a", "c"]
        );
        assert_eq!(c.len(), 3);
        assert!(c.without("missing").ptr_eq(&c));
    }

    #[test]
    fn nested_values_are_shared() {
        let inner = compound! { "deep" => vec![1_i64, 2, 3] };
        let outer = compound! { "inner" => inner.clone(), "n" => 0 };
        let updated = outer.with("n", 1);

        assert!(updated.get_compound("inner").unwrap().ptr_eq(&inner));
        assert!(!updated.ptr_eq(&outer));
    }

    #[test]
    fn lenient_getters() {
        let c = compound! { "int" => 5, "flag" => true };

        assert_eq!(c.get_int("int"), Some(5));
        assert_eq!(c.get_int("missing"), None);
        assert_eq!(c.get_long("int"), None);
        assert!(c.get_bool("flag"));
        assert!(!c.get_bool("int"));
    }

    #[test]
    fn strict_getters() {
        let c = compound! { "int" => 5 };

        assert_eq!(c.try_get_int("int").unwrap(), Some(5));
        assert_eq!(c.try_get_int("missing").unwrap(), None);
        assert!(matches!(
            c.try_get_string("int"),
            Err(Error::TypeMismatch {
                expected: Tag::String,
                found: Tag::Int
            })
        ));
    }

    #[test]
    fn contains_checks_type() {
        let c = compound! { "x" => 1.5_f32, "s" => "str" };

        assert!(c.contains("x", Tag::Float));
        assert!(!c.contains("x", Tag::Double));
        assert!(!c.contains("y", Tag::Float));
        assert!(c.contains_numeric("x"));
        assert!(!c.contains_numeric("s"));
        assert_eq!(c.tag_of("s"), Tag::String);
        assert_eq!(c.tag_of("nope"), Tag::End);
    }

    #[test]
    fn get_list_filters_element_type() {
        let c = compound! {
            "ints" => List::from(vec![1_i32, 2]),
            "empty" => List::of_type(Tag::String),
        };

        assert!(c.get_list("ints", Tag::Int).is_some());
        assert!(c.get_list("ints", Tag::Long).is_none());
        assert!(c.get_list("empty", Tag::Compound).is_some());
    }

    #[test]
    fn equality_ignores_order() {
        let a = compound! { "x" => 1, "y" => 2 };
        let b = compound! { "y" => 2, "x" => 1 };
        let c = compound! { "y" => 2, "x" => 3 };

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn owned_iteration() {
        let c = compound! { "a" => 1, "b" => 2 };
        let alias = c.clone();
        let entries: Vec<_> = c.into_iter().collect();

        assert_eq!(
            entries,
            [("a".to_owned(), Value::Int(1)), ("b".to_owned(), Value::Int(2))]
        );
        assert_eq!(alias.len(), 2);
    }
}
