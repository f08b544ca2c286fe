use std::fmt;

/// One of the possible NBT data types.
///
/// The discriminant of each variant is the type identifier used on the wire.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[repr(u8)]
pub enum Tag {
    // Variant order is significant!
    #[default]
    End,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    ByteArray,
    String,
    List,
    Compound,
    IntArray,
    LongArray,
}

impl Tag {
    /// Converts a type identifier into a [`Tag`], returning `None` for bytes
    /// outside `0..=12`.
    pub const fn from_u8(id: u8) -> Option<Self> {
        Some(match id {
            0 => Tag::End,
            1 => Tag::Byte,
            2 => Tag::Short,
            3 => Tag::Int,
            4 => Tag::Long,
            5 => Tag::Float,
            6 => Tag::Double,
            7 => Tag::ByteArray,
            8 => Tag::String,
            9 => Tag::List,
            10 => Tag::Compound,
            11 => Tag::IntArray,
            12 => Tag::LongArray,
            _ => return None,
        })
    }

    /// The type identifier of this tag.
    pub const fn id(self) -> u8 {
        self as u8
    }

    /// Returns the name of this tag for error reporting purposes.
    pub const fn name(self) -> &'static str {
        match self {
            Tag::End => "end",
            Tag::Byte => "byte",
            Tag::Short => "short",
            Tag::Int => "int",
            Tag::Long => "long",
            Tag::Float => "float",
            Tag::Double => "double",
            Tag::ByteArray => "byte array",
            Tag::String => "string",
            Tag::List => "list",
            Tag::Compound => "compound",
            Tag::IntArray => "int array",
            Tag::LongArray => "long array",
        }
    }

    /// Whether this is one of the six numeric scalar types.
    pub const fn is_numeric(self) -> bool {
        matches!(
            self,
            Tag::Byte | Tag::Short | Tag::Int | Tag::Long | Tag::Float | Tag::Double
        )
    }

    /// Whether values of this type may contain other values.
    pub const fn is_container(self) -> bool {
        matches!(self, Tag::List | Tag::Compound)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip() {
        for id in 0..=12 {
            let tag = Tag::from_u8(id).unwrap();
            assert_eq!(tag.id(), id);
        }

        assert_eq!(Tag::from_u8(13), None);
        assert_eq!(Tag::from_u8(0xff), None);
    }

    #[test]
    fn wire_ids() {
        assert_eq!(Tag::End.id(), 0);
        assert_eq!(Tag::String.id(), 8);
        assert_eq!(Tag::Compound.id(), 10);
        assert_eq!(Tag::LongArray.id(), 12);
    }

    #[test]
    fn numeric_types() {
        assert!(Tag::Double.is_numeric());
        assert!(!Tag::String.is_numeric());
        assert!(!Tag::ByteArray.is_numeric());
        assert!(Tag::List.is_container());
    }
}
