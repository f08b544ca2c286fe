use std::io::Write;

use byteorder::{BigEndian, WriteBytesExt};
use tracing::debug;

use super::{modified_utf8, DEFAULT_MAX_DEPTH};
use crate::tag::Tag;
use crate::{Compound, Error, List, Result, Value};

/// Encodes `root` as an uncompressed binary NBT document named `root_name`.
///
/// Any value may be the root, although readers usually expect a compound
/// with an empty name. A [`Value::End`] root is written as a single end byte
/// and no name.
///
/// Trees with more than [`DEFAULT_MAX_DEPTH`] containers nested inside the
/// root are rejected with [`Error::DepthLimitExceeded`]. End values inside a
/// list or compound are rejected with [`Error::InvalidTag`].
pub fn to_binary<W: Write>(writer: W, root_name: &str, root: &Value) -> Result<()> {
    let mut state = EncodeState { writer, depth: 0 };

    state.write_tag(root.tag())?;

    if root.is_end() {
        return Ok(());
    }

    state.write_string(root_name)?;
    state.write_value(root)?;

    Ok(())
}

/// Returns the number of bytes that will be written when [`to_binary`] is
/// called with this root name and value.
///
/// If `to_binary` results in `Ok`, the exact number of bytes reported by this
/// function will have been written. If the result is `Err`, then the reported
/// count will be greater than or equal to the number of bytes that have
/// actually been written.
pub fn written_size(root_name: &str, root: &Value) -> usize {
    fn value_size(val: &Value) -> usize {
        match val {
            Value::End => 0,
            Value::Byte(_) => 1,
            Value::Short(_) => 2,
            Value::Int(_) => 4,
            Value::Long(_) => 8,
            Value::Float(_) => 4,
            Value::Double(_) => 8,
            Value::ByteArray(v) => 4 + v.len(),
            Value::String(v) => string_size(v),
            Value::List(v) => list_size(v),
            Value::Compound(v) => compound_size(v),
            Value::IntArray(v) => 4 + v.len() * 4,
            Value::LongArray(v) => 4 + v.len() * 8,
        }
    }

    fn list_size(l: &List) -> usize {
        1 + 4 + l.iter().map(value_size).sum::<usize>()
    }

    fn string_size(s: &str) -> usize {
        2 + modified_utf8::encoded_len(s)
    }

    fn compound_size(c: &Compound) -> usize {
        c.iter()
            .map(|(k, v)| 1 + string_size(k) + value_size(v))
            .sum::<usize>()
            + 1
    }

    if root.is_end() {
        1
    } else {
        1 + string_size(root_name) + value_size(root)
    }
}

struct EncodeState<W> {
    writer: W,
    /// Current recursion depth.
    depth: usize,
}

impl<W: Write> EncodeState<W> {
    fn check_depth<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        if self.depth > DEFAULT_MAX_DEPTH {
            debug!(max_depth = DEFAULT_MAX_DEPTH, "NBT nesting limit reached");
            return Err(Error::DepthLimitExceeded(DEFAULT_MAX_DEPTH));
        }

        self.depth += 1;
        let res = f(self);
        self.depth -= 1;
        res
    }

    fn write_tag(&mut self, tag: Tag) -> Result<()> {
        Ok(self.writer.write_u8(tag.id())?)
    }

    fn write_value(&mut self, v: &Value) -> Result<()> {
        match v {
            Value::End => Err(Error::InvalidTag(Tag::End.id())),
            Value::Byte(v) => self.write_byte(*v),
            Value::Short(v) => self.write_short(*v),
            Value::Int(v) => self.write_int(*v),
            Value::Long(v) => self.write_long(*v),
            Value::Float(v) => self.write_float(*v),
            Value::Double(v) => self.write_double(*v),
            Value::ByteArray(v) => self.write_byte_array(v),
            Value::String(v) => self.write_string(v),
            Value::List(v) => self.check_depth(|st| st.write_any_list(v)),
            Value::Compound(v) => self.check_depth(|st| st.write_compound(v)),
            Value::IntArray(v) => self.write_int_array(v),
            Value::LongArray(v) => self.write_long_array(v),
        }
    }

    fn write_byte(&mut self, byte: i8) -> Result<()> {
        Ok(self.writer.write_i8(byte)?)
    }

    fn write_short(&mut self, short: i16) -> Result<()> {
        Ok(self.writer.write_i16::<BigEndian>(short)?)
    }

    fn write_int(&mut self, int: i32) -> Result<()> {
        Ok(self.writer.write_i32::<BigEndian>(int)?)
    }

    fn write_long(&mut self, long: i64) -> Result<()> {
        Ok(self.writer.write_i64::<BigEndian>(long)?)
    }

    fn write_float(&mut self, float: f32) -> Result<()> {
        Ok(self.writer.write_f32::<BigEndian>(float)?)
    }

    fn write_double(&mut self, double: f64) -> Result<()> {
        Ok(self.writer.write_f64::<BigEndian>(double)?)
    }

    /// Writes the `i32` length prefix of an array or list.
    fn write_len(&mut self, what: &'static str, len: usize) -> Result<()> {
        match i32::try_from(len) {
            Ok(len) => self.write_int(len),
            Err(_) => Err(Error::TooLong {
                what,
                len,
                max: i32::MAX as usize,
            }),
        }
    }

    fn write_byte_array(&mut self, bytes: &[i8]) -> Result<()> {
        self.write_len("byte array", bytes.len())?;

        let buf: Vec<u8> = bytes.iter().map(|&b| b as u8).collect();
        Ok(self.writer.write_all(&buf)?)
    }

    fn write_string(&mut self, s: &str) -> Result<()> {
        let len = modified_utf8::encoded_len(s);

        match u16::try_from(len) {
            Ok(n) => self.writer.write_u16::<BigEndian>(n)?,
            Err(_) => {
                return Err(Error::TooLong {
                    what: "string",
                    len,
                    max: u16::MAX.into(),
                })
            }
        }

        // Conversion to modified UTF-8 always increases the size of the string.
        // If the new len is equal to the original len, we know it doesn't need
        // to be re-encoded.
        if len == s.len() {
            self.writer.write_all(s.as_bytes())?;
        } else {
            modified_utf8::write_modified_utf8(&mut self.writer, s)?;
        }

        Ok(())
    }

    fn write_any_list(&mut self, list: &List) -> Result<()> {
        self.write_tag(list.element_type())?;
        self.write_len("list", list.len())?;

        for elem in list {
            self.write_value(elem)?;
        }

        Ok(())
    }

    fn write_compound(&mut self, c: &Compound) -> Result<()> {
        for (k, v) in c {
            if v.is_end() {
                return Err(Error::InvalidTag(Tag::End.id()));
            }

            self.write_tag(v.tag())?;
            self.write_string(k)?;
            self.write_value(v)?;
        }
        self.write_tag(Tag::End)?;

        Ok(())
    }

    fn write_int_array(&mut self, ia: &[i32]) -> Result<()> {
        self.write_len("int array", ia.len())?;

        for i in ia {
            self.write_int(*i)?;
        }

        Ok(())
    }

    fn write_long_array(&mut self, la: &[i64]) -> Result<()> {
        self.write_len("long array", la.len())?;

        for l in la {
            self.write_long(*l)?;
        }

        Ok(())
    }
}
