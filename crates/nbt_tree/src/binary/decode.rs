use std::borrow::Cow;
use std::io::Read;

use byteorder::{BigEndian, ReadBytesExt};
use indexmap::IndexMap;
use tracing::debug;

use crate::tag::Tag;
use crate::{Compound, Error, List, Result, Value};

/// The nesting limit used when no [`ReadOptions`] are given.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Upper bound on how many elements are reserved up front for a list or
/// array. Declared lengths come from untrusted input.
const MAX_PREALLOC: usize = 4096;

/// Settings for decoding binary NBT.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ReadOptions {
    /// Maximum number of lists and compounds nested inside the root, which
    /// itself sits at depth 0. Deeper documents fail with
    /// [`Error::DepthLimitExceeded`].
    pub max_depth: usize,
}

impl ReadOptions {
    pub const fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Decodes an uncompressed binary NBT document from `reader`, returning the
/// name of the root and the root value.
///
/// A document consisting of a single end byte decodes to `("", Value::End)`.
pub fn from_binary<R: Read>(reader: R) -> Result<(String, Value)> {
    from_binary_with_options(reader, ReadOptions::default())
}

/// Like [`from_binary`], with explicit [`ReadOptions`].
pub fn from_binary_with_options<R: Read>(
    reader: R,
    options: ReadOptions,
) -> Result<(String, Value)> {
    let mut state = DecodeState {
        reader,
        depth: 0,
        max_depth: options.max_depth,
    };

    let tag = state.read_tag()?;

    if tag == Tag::End {
        return Ok((String::new(), Value::End));
    }

    let name = state.read_string()?;
    let value = state.read_value(tag)?;

    Ok((name, value))
}

struct DecodeState<R> {
    reader: R,
    /// Current recursion depth.
    depth: usize,
    max_depth: usize,
}

impl<R: Read> DecodeState<R> {
    /// Runs `f` one container level deeper, failing once the limit is
    /// exceeded. The root container is entered at depth 0.
    fn check_depth<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Self) -> Result<T>,
    {
        if self.depth > self.max_depth {
            debug!(max_depth = self.max_depth, "NBT nesting limit reached");
            return Err(Error::DepthLimitExceeded(self.max_depth));
        }

        self.depth += 1;
        let res = f(self);
        self.depth -= 1;
        res
    }

    fn read_tag(&mut self) -> Result<Tag> {
        let byte = self.reader.read_u8()?;
        Tag::from_u8(byte).ok_or(Error::InvalidTag(byte))
    }

    fn read_value(&mut self, tag: Tag) -> Result<Value> {
        Ok(match tag {
            // Only compounds contain tag bytes and they stop at `End`.
            Tag::End => return Err(Error::InvalidTag(Tag::End.id())),
            Tag::Byte => self.reader.read_i8()?.into(),
            Tag::Short => self.reader.read_i16::<BigEndian>()?.into(),
            Tag::Int => self.reader.read_i32::<BigEndian>()?.into(),
            Tag::Long => self.reader.read_i64::<BigEndian>()?.into(),
            Tag::Float => self.reader.read_f32::<BigEndian>()?.into(),
            Tag::Double => self.reader.read_f64::<BigEndian>()?.into(),
            Tag::ByteArray => self.read_byte_array()?.into(),
            Tag::String => self.read_string()?.into(),
            Tag::List => self.check_depth(Self::read_any_list)?.into(),
            Tag::Compound => self.check_depth(Self::read_compound)?.into(),
            Tag::IntArray => self.read_int_array()?.into(),
            Tag::LongArray => self.read_long_array()?.into(),
        })
    }

    fn read_len(&mut self, what: &'static str) -> Result<usize> {
        let len = self.reader.read_i32::<BigEndian>()?;

        usize::try_from(len).map_err(|_| Error::NegativeLength { what, len })
    }

    /// Reads exactly `len` bytes without trusting `len` for the allocation.
    fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(len.min(MAX_PREALLOC));
        self.reader.by_ref().take(len as u64).read_to_end(&mut buf)?;

        if buf.len() == len {
            Ok(buf)
        } else {
            Err(Error::UnexpectedEof)
        }
    }

    fn read_byte_array(&mut self) -> Result<Vec<i8>> {
        let len = self.read_len("byte array")?;
        let bytes = self.read_bytes(len)?;

        Ok(bytes.into_iter().map(|b| b as i8).collect())
    }

    fn read_string(&mut self) -> Result<String> {
        let len = self.reader.read_u16::<BigEndian>()?;
        let bytes = self.read_bytes(usize::from(len))?;

        match cesu8::from_java_cesu8(&bytes).map_err(|_| Error::InvalidString)? {
            Cow::Borrowed(s) => Ok(s.to_owned()),
            Cow::Owned(s) => Ok(s),
        }
    }

    fn read_any_list(&mut self) -> Result<List> {
        let element_type = self.read_tag()?;
        let len = self.read_len("list")?;

        if element_type == Tag::End && len != 0 {
            return Err(Error::InvalidListType {
                len: i32::try_from(len).unwrap_or(i32::MAX),
            });
        }

        let mut elements = Vec::with_capacity(len.min(MAX_PREALLOC));
        for _ in 0..len {
            elements.push(self.read_value(element_type)?);
        }

        Ok(List::from_parts(element_type, elements))
    }

    fn read_compound(&mut self) -> Result<Compound> {
        let mut map = IndexMap::new();

        loop {
            let tag = self.read_tag()?;

            if tag == Tag::End {
                return Ok(Compound::from_map(map));
            }

            let name = self.read_string()?;
            let value = self.read_value(tag)?;

            map.insert(name, value);
        }
    }

    fn read_int_array(&mut self) -> Result<Vec<i32>> {
        let len = self.read_len("int array")?;

        let mut array = Vec::with_capacity(len.min(MAX_PREALLOC));
        for _ in 0..len {
            array.push(self.reader.read_i32::<BigEndian>()?);
        }

        Ok(array)
    }

    fn read_long_array(&mut self) -> Result<Vec<i64>> {
        let len = self.read_len("long array")?;

        let mut array = Vec::with_capacity(len.min(MAX_PREALLOC));
        for _ in 0..len {
            array.push(self.reader.read_i64::<BigEndian>()?);
        }

        Ok(array)
    }
}
