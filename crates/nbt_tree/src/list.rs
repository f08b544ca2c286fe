//! Homogeneous lists of NBT values.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::tag::Tag;
use crate::{ByteArray, Compound, Error, IntArray, LongArray, Result, Value};

/// An ordered sequence of values which all have the same [`Tag`].
///
/// Every list carries a declared element type. An empty list may declare
/// [`Tag::End`], meaning "not yet decided"; the first pushed value then fixes
/// the element type. Values of any other type are rejected with
/// [`Error::TypeMismatch`].
///
/// Lists are immutable. Updating methods return a new list that shares
/// unchanged elements with the original.
#[derive(Clone, Default)]
pub struct List {
    element_type: Tag,
    elements: Arc<Vec<Value>>,
}

impl List {
    /// Creates an empty list whose element type is not yet fixed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty list that only accepts values of type `element_type`.
    pub fn of_type(element_type: Tag) -> Self {
        Self {
            element_type,
            elements: Arc::default(),
        }
    }

    /// Builds a list from `values`, failing if they don't all share one type.
    pub fn try_from_values<I>(values: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let mut element_type = Tag::End;
        let mut elements = vec![];

        for value in values {
            let value = value.into();
            element_type = check_element(element_type, &value)?;
            elements.push(value);
        }

        Ok(Self {
            element_type,
            elements: Arc::new(elements),
        })
    }

    /// Builds a list from parts already known to be homogeneous.
    pub(crate) fn from_parts(element_type: Tag, elements: Vec<Value>) -> Self {
        debug_assert!(elements.iter().all(|v| v.tag() == element_type));

        Self {
            element_type,
            elements: Arc::new(elements),
        }
    }

    /// The declared type of the elements in this list.
    pub fn element_type(&self) -> Tag {
        self.element_type
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.elements.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.elements.iter()
    }

    pub fn as_slice(&self) -> &[Value] {
        &self.elements
    }

    /// Returns a new list with `value` appended.
    pub fn pushed<V: Into<Value>>(&self, value: V) -> Result<Self> {
        self.inserted(self.len(), value)
    }

    /// Returns a new list with `value` inserted at `index`.
    ///
    /// Fails if `index > len` or if the value has the wrong type.
    pub fn inserted<V: Into<Value>>(&self, index: usize, value: V) -> Result<Self> {
        let value = value.into();
        let element_type = check_element(self.element_type, &value)?;

        if index > self.len() {
            return Err(Error::IndexOutOfBounds {
                index,
                len: self.len(),
            });
        }

        let mut elements = Vec::with_capacity(self.len() + 1);
        elements.extend_from_slice(&self.elements[..index]);
        elements.push(value);
        elements.extend_from_slice(&self.elements[index..]);

        Ok(Self {
            element_type,
            elements: Arc::new(elements),
        })
    }

    /// Returns a new list with the element at `index` replaced by `value`.
    pub fn replaced<V: Into<Value>>(&self, index: usize, value: V) -> Result<Self> {
        let value = value.into();
        let element_type = check_element(self.element_type, &value)?;

        if index >= self.len() {
            return Err(Error::IndexOutOfBounds {
                index,
                len: self.len(),
            });
        }

        let mut next = self.clone();
        next.element_type = element_type;
        Arc::make_mut(&mut next.elements)[index] = value;

        Ok(next)
    }

    /// Returns a new list with the element at `index` removed. The declared
    /// element type is kept even if the list becomes empty.
    pub fn removed(&self, index: usize) -> Result<Self> {
        if index >= self.len() {
            return Err(Error::IndexOutOfBounds {
                index,
                len: self.len(),
            });
        }

        let mut next = self.clone();
        Arc::make_mut(&mut next.elements).remove(index);

        Ok(next)
    }
}

/// Checks that `value` may be stored in a list of `element_type` and returns
/// the (possibly newly fixed) element type.
fn check_element(element_type: Tag, value: &Value) -> Result<Tag> {
    let tag = value.tag();

    if tag == Tag::End {
        return Err(Error::mismatch(element_type, Tag::End));
    }

    if element_type == Tag::End || element_type == tag {
        Ok(tag)
    } else {
        Err(Error::mismatch(element_type, tag))
    }
}

macro_rules! typed_getters {
    ($($name:ident: $as:ident => $ty:ty, $take:ident;)*) => {
        impl List {
            $(
                /// Returns the element at `index` if it exists and has the
                /// matching type.
                pub fn $name(&self, index: usize) -> Option<$ty> {
                    self.get(index).and_then(Value::$as).$take()
                }
            )*
        }
    };
}

typed_getters! {
    get_byte: as_byte => i8, copied;
    get_short: as_short => i16, copied;
    get_int: as_int => i32, copied;
    get_long: as_long => i64, copied;
    get_float: as_float => f32, copied;
    get_double: as_double => f64, copied;
    get_byte_array: as_byte_array => ByteArray, cloned;
    get_string: as_string => String, cloned;
    get_list: as_list => List, cloned;
    get_compound: as_compound => Compound, cloned;
    get_int_array: as_int_array => IntArray, cloned;
    get_long_array: as_long_array => LongArray, cloned;
}

/// Two lists are equal when they have equal elements. Empty lists are equal
/// only if they also declare the same element type.
impl PartialEq for List {
    fn eq(&self, other: &Self) -> bool {
        self.element_type == other.element_type && self.elements == other.elements
    }
}

impl Eq for List {}

impl Hash for List {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.element_type.hash(state);
        self.elements.hash(state);
    }
}

impl fmt::Debug for List {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "List<{}>", self.element_type)?;
        f.debug_list().entries(self.elements.iter()).finish()
    }
}

impl<'a> IntoIterator for &'a List {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

macro_rules! impl_from_vec {
    ($($ty:ty => $tag:ident),* $(,)?) => {
        $(
            impl From<Vec<$ty>> for List {
                fn from(v: Vec<$ty>) -> Self {
                    Self::from_parts(Tag::$tag, v.into_iter().map(Value::from).collect())
                }
            }
        )*
    };
}

// Homogeneous by construction.
impl_from_vec! {
    i8 => Byte,
    i16 => Short,
    i32 => Int,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    ByteArray => ByteArray,
    String => String,
    List => List,
    Compound => Compound,
    IntArray => IntArray,
    LongArray => LongArray,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_push_fixes_type() {
        let empty = List::new();
        assert_eq!(empty.element_type(), Tag::End);

        let ints = empty.pushed(1_i32).unwrap();
        assert_eq!(ints.element_type(), Tag::Int);
        assert_eq!(empty.element_type(), Tag::End);
        assert!(empty.is_empty());
    }

    #[test]
    fn mismatched_push_fails_without_change() {
        let list = List::new().pushed(5_i32).unwrap();
        let err = list.pushed("five").unwrap_err();

        assert!(matches!(
            err,
            Error::TypeMismatch {
                expected: Tag::Int,
                found: Tag::String
            }
        ));
        assert_eq!(list.len(), 1);
        assert_eq!(list.get_int(0), Some(5));
    }

    #[test]
    fn typed_empty_list_rejects_other_types() {
        let list = List::of_type(Tag::String);
        assert!(list.pushed(1_i8).is_err());
        assert_eq!(list.pushed("ok").unwrap().get_string(0).as_deref(), Some("ok"));
    }

    #[test]
    fn end_values_are_rejected() {
        assert!(List::new().pushed(Value::End).is_err());
    }

    #[test]
    fn updates_share_unmodified_elements() {
        let list = List::from(vec![1_i64, 2, 3]);

        let inserted = list.inserted(0, 0_i64).unwrap();
        assert_eq!(inserted.get_long(0), Some(0));
        assert_eq!(inserted.len(), 4);

        let replaced = list.replaced(2, 30_i64).unwrap();
        assert_eq!(replaced.get_long(2), Some(30));

        let removed = list.removed(1).unwrap();
        assert_eq!(removed.as_slice(), &[Value::Long(1), Value::Long(3)]);

        assert_eq!(list.as_slice(), &[Value::Long(1), Value::Long(2), Value::Long(3)]);
        assert!(list.replaced(0, 1_i32).is_err());
        assert!(matches!(
            list.removed(3),
            Err(Error::IndexOutOfBounds { index: 3, len: 3 })
        ));
    }

    #[test]
    fn removing_last_keeps_type() {
        let list = List::from(vec![1_i8]).removed(0).unwrap();
        assert!(list.is_empty());
        assert_eq!(list.element_type(), Tag::Byte);
    }

    #[test]
    fn try_from_values() {
        let list = List::try_from_values(["a", "b"]).unwrap();
        assert_eq!(list.element_type(), Tag::String);

        let err = List::try_from_values([Value::Int(1), Value::Short(2)]).unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { .. }));
    }

    #[test]
    fn typed_getters_are_lenient() {
        let list = List::from(vec![1_i32]);
        assert_eq!(list.get_int(0), Some(1));
        assert_eq!(list.get_long(0), None);
        assert_eq!(list.get_int(1), None);
    }
}
