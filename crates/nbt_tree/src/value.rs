use std::borrow::Cow;
use std::hash::{Hash, Hasher};

use crate::tag::Tag;
use crate::{ByteArray, Compound, IntArray, List, LongArray};

/// Represents an arbitrary NBT value.
///
/// Equality is structural. Floats are compared by their bit patterns so that
/// `Eq` and [`Hash`] agree (a `NaN` equals itself, `0.0` and `-0.0` differ).
#[derive(Clone, Debug, Default)]
pub enum Value {
    /// Marks the end of a compound. Only ever produced as the root of a
    /// document that starts with an end byte.
    #[default]
    End,
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    ByteArray(ByteArray),
    String(String),
    List(List),
    Compound(Compound),
    IntArray(IntArray),
    LongArray(LongArray),
}

impl Value {
    /// Returns the type of this value.
    pub fn tag(&self) -> Tag {
        match self {
            Self::End => Tag::End,
            Self::Byte(_) => Tag::Byte,
            Self::Short(_) => Tag::Short,
            Self::Int(_) => Tag::Int,
            Self::Long(_) => Tag::Long,
            Self::Float(_) => Tag::Float,
            Self::Double(_) => Tag::Double,
            Self::ByteArray(_) => Tag::ByteArray,
            Self::String(_) => Tag::String,
            Self::List(_) => Tag::List,
            Self::Compound(_) => Tag::Compound,
            Self::IntArray(_) => Tag::IntArray,
            Self::LongArray(_) => Tag::LongArray,
        }
    }

    /// Whether this is [`Value::End`].
    pub fn is_end(&self) -> bool {
        matches!(self, Self::End)
    }
}

macro_rules! accessors {
    ($($variant:ident: $ty:ty => $as:ident, $into:ident;)*) => {
        impl Value {
            $(
                #[doc = concat!("Returns the payload if this is a `", stringify!($variant), "`.")]
                pub fn $as(&self) -> Option<&$ty> {
                    match self {
                        Self::$variant(v) => Some(v),
                        _ => None,
                    }
                }

                #[doc = concat!("Consumes the value, returning the payload if this is a `", stringify!($variant), "`.")]
                pub fn $into(self) -> Option<$ty> {
                    match self {
                        Self::$variant(v) => Some(v),
                        _ => None,
                    }
                }
            )*
        }
    };
}

accessors! {
    Byte: i8 => as_byte, into_byte;
    Short: i16 => as_short, into_short;
    Int: i32 => as_int, into_int;
    Long: i64 => as_long, into_long;
    Float: f32 => as_float, into_float;
    Double: f64 => as_double, into_double;
    ByteArray: ByteArray => as_byte_array, into_byte_array;
    String: String => as_string, into_string;
    List: List => as_list, into_list;
    Compound: Compound => as_compound, into_compound;
    IntArray: IntArray => as_int_array, into_int_array;
    LongArray: LongArray => as_long_array, into_long_array;
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::End, Self::End) => true,
            (Self::Byte(a), Self::Byte(b)) => a == b,
            (Self::Short(a), Self::Short(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Long(a), Self::Long(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits(),
            (Self::Double(a), Self::Double(b)) => a.to_bits() == b.to_bits(),
            (Self::ByteArray(a), Self::ByteArray(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Compound(a), Self::Compound(b)) => a == b,
            (Self::IntArray(a), Self::IntArray(b)) => a == b,
            (Self::LongArray(a), Self::LongArray(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.tag().hash(state);

        match self {
            Self::End => {}
            Self::Byte(v) => v.hash(state),
            Self::Short(v) => v.hash(state),
            Self::Int(v) => v.hash(state),
            Self::Long(v) => v.hash(state),
            Self::Float(v) => v.to_bits().hash(state),
            Self::Double(v) => v.to_bits().hash(state),
            Self::ByteArray(v) => v.hash(state),
            Self::String(v) => v.hash(state),
            Self::List(v) => v.hash(state),
            Self::Compound(v) => v.hash(state),
            Self::IntArray(v) => v.hash(state),
            Self::LongArray(v) => v.hash(state),
        }
    }
}

macro_rules! impl_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Self::$variant(v.into())
                }
            }
        )*
    };
}

impl_from! {
    i8 => Byte,
    i16 => Short,
    i32 => Int,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    ByteArray => ByteArray,
    Vec<i8> => ByteArray,
    String => String,
    List => List,
    Compound => Compound,
    IntArray => IntArray,
    Vec<i32> => IntArray,
    LongArray => LongArray,
    Vec<i64> => LongArray,
}

/// Bools are usually represented as `0` or `1` bytes in NBT.
impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Byte(i8::from(b))
    }
}

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Self::String(value.clone())
    }
}

impl<'a> From<&'a str> for Value {
    fn from(v: &'a str) -> Self {
        Self::String(v.to_owned())
    }
}

impl<'a> From<Cow<'a, str>> for Value {
    fn from(v: Cow<'a, str>) -> Self {
        Self::String(v.into_owned())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::hash_map::DefaultHasher;

    use super::*;
    use crate::compound;

    fn hash_of(v: &Value) -> u64 {
        let mut h = DefaultHasher::new();
        v.hash(&mut h);
        h.finish()
    }

    #[test]
    fn tags_match_variants() {
        assert_eq!(Value::End.tag(), Tag::End);
        assert_eq!(Value::from(1_i8).tag(), Tag::Byte);
        assert_eq!(Value::from(true), Value::Byte(1));
        assert_eq!(Value::from(vec![1_i64]).tag(), Tag::LongArray);
        assert_eq!(Value::from("hi").tag(), Tag::String);
        assert_eq!(Value::from(List::new()).tag(), Tag::List);
    }

    #[test]
    fn float_equality_is_bitwise() {
        assert_eq!(Value::Float(f32::NAN), Value::Float(f32::NAN));
        assert_ne!(Value::Double(0.0), Value::Double(-0.0));
        assert_eq!(
            hash_of(&Value::Double(f64::NAN)),
            hash_of(&Value::Double(f64::NAN))
        );
    }

    #[test]
    fn different_types_are_unequal() {
        assert_ne!(Value::Int(1), Value::Long(1));
        assert_ne!(Value::Byte(0), Value::End);
    }

    #[test]
    fn hash_agrees_with_eq_for_compounds() {
        let a = Value::from(compound! { "x" => 1_i32, "y" => "two" });
        let b = Value::from(compound! { "y" => "two", "x" => 1_i32 });

        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn accessors() {
        let v = Value::from(7_i16);
        assert_eq!(v.as_short(), Some(&7));
        assert_eq!(v.as_int(), None);
        assert_eq!(v.into_short(), Some(7));
        assert_eq!(
            Value::from("abc").into_string().as_deref(),
            Some("abc")
        );
    }
}
