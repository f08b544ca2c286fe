//! The textual SNBT form of NBT values.
//!
//! [`to_snbt_string`] renders any [`Value`] and never fails. [`from_snbt_str`]
//! parses the same syntax back, so that for trees without end values or
//! empty lists of a declared type, and whose strings don't look like numbers,
//! rendering and parsing round-trip.
//!
//! ```
//! use nbt_tree::{compound, from_snbt_str, to_snbt_string, Value};
//!
//! let v = Value::from(compound! { "name" => "he said \"hi\"", "level" => 3_i8 });
//!
//! assert_eq!(to_snbt_string(&v), r#"{name:'he said "hi"',level:3b}"#);
//! assert_eq!(from_snbt_str(&to_snbt_string(&v)).unwrap(), v);
//! ```

use std::fmt;
use std::fmt::{Display, Formatter};
use std::iter::Peekable;
use std::str::Chars;

use indexmap::IndexMap;
use thiserror::Error;

use crate::tag::Tag;
use crate::{Compound, List, Value};

const STRING_MAX_LEN: usize = 32767;
/// Maximum recursion depth to prevent overflowing the call stack.
const MAX_DEPTH: usize = 512;

#[derive(Debug, Clone, PartialEq, Eq, Copy)]
pub enum SnbtErrorKind {
    ReachEndOfStream,
    InvalidEscapeSequence,
    EmptyKeyInCompound,
    ExpectColon,
    ExpectValue,
    ExpectComma,
    WrongTypeInArray,
    DifferentTypesInList,
    LongString,
    TrailingData,
    DepthLimitExceeded,
}

impl Display for SnbtErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        use SnbtErrorKind::*;
        match self {
            ReachEndOfStream => write!(f, "reach end of stream"),
            InvalidEscapeSequence => write!(f, "invalid escape sequence"),
            EmptyKeyInCompound => write!(f, "empty key in compound"),
            ExpectColon => write!(f, "expect colon"),
            ExpectValue => write!(f, "expect value"),
            ExpectComma => write!(f, "expect comma"),
            WrongTypeInArray => write!(f, "wrong type in array"),
            DifferentTypesInList => write!(f, "different types in list"),
            LongString => write!(f, "long string"),
            TrailingData => write!(f, "extra data after end"),
            DepthLimitExceeded => write!(f, "depth limit exceeded"),
        }
    }
}

/// A syntax error and the position (1-based) where it was detected.
#[derive(Debug, Clone, PartialEq, Eq, Copy, Error)]
#[error("@ {line},{column}: {kind}")]
pub struct SnbtError {
    pub kind: SnbtErrorKind,
    pub line: usize,
    pub column: usize,
}

impl SnbtError {
    pub fn new(kind: SnbtErrorKind, line: usize, column: usize) -> Self {
        Self { kind, line, column }
    }
}

type Result<T> = std::result::Result<T, SnbtError>;

pub struct SnbtReader<'a> {
    line: usize,
    column: usize,
    index: usize,
    depth: usize,
    iter: Peekable<Chars<'a>>,
}

impl<'a> SnbtReader<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            line: 1,
            column: 1,
            index: 0,
            depth: 0,
            iter: input.chars().peekable(),
        }
    }

    fn check_depth<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Self) -> Result<T>,
    {
        if self.depth >= MAX_DEPTH {
            Err(self.make_error(SnbtErrorKind::DepthLimitExceeded))
        } else {
            self.depth += 1;
            let res = f(self);
            self.depth -= 1;
            res
        }
    }

    fn make_error(&self, kind: SnbtErrorKind) -> SnbtError {
        SnbtError::new(kind, self.line, self.column)
    }

    fn peek(&mut self) -> Result<char> {
        self.iter
            .peek()
            .copied()
            .ok_or_else(|| self.make_error(SnbtErrorKind::ReachEndOfStream))
    }

    fn next(&mut self) {
        if let Some(c) = self.iter.next() {
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
            self.index += c.len_utf8();
        }
    }

    fn skip_whitespace(&mut self) {
        while let Ok(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.next();
        }
    }

    fn read_string(&mut self) -> Result<String> {
        match self.peek()? {
            '"' | '\'' => self.read_quoted_string(),
            _ => self.read_unquoted_string(),
        }
    }

    fn read_unquoted_string(&mut self) -> Result<String> {
        let mut result = String::new();
        while let Ok(c) = self.peek() {
            if !is_bare_char(c) {
                break;
            }
            result.push(c);
            self.next();
        }
        if result.len() > STRING_MAX_LEN {
            return Err(self.make_error(SnbtErrorKind::LongString));
        }
        Ok(result)
    }

    fn read_quoted_string(&mut self) -> Result<String> {
        let quote = self.peek()?;
        self.next();
        let mut result = String::new();
        loop {
            match self.peek()? {
                c if c == quote => {
                    self.next();
                    break;
                }
                '\\' => {
                    self.next();
                    let escape = self.peek()?;
                    if escape == quote || escape == '\\' {
                        result.push(escape);
                    } else {
                        return Err(self.make_error(SnbtErrorKind::InvalidEscapeSequence));
                    }
                    self.next();
                }
                c => {
                    result.push(c);
                    self.next();
                }
            }
        }
        if result.len() > STRING_MAX_LEN {
            return Err(self.make_error(SnbtErrorKind::LongString));
        }
        Ok(result)
    }

    fn parse_compound(&mut self) -> Result<Compound> {
        self.next();
        self.skip_whitespace();
        let mut map = IndexMap::new();
        while self.peek()? != '}' {
            let quoted = matches!(self.peek()?, '"' | '\'');
            let key = self.read_string()?;
            self.skip_whitespace();
            // `""` is a valid key, but an unquoted key can't be empty.
            if key.is_empty() && !quoted {
                return Err(self.make_error(SnbtErrorKind::EmptyKeyInCompound));
            }
            if self.peek()? != ':' {
                return Err(self.make_error(SnbtErrorKind::ExpectColon));
            }
            self.next();
            self.skip_whitespace();
            let value = self.parse_element()?;
            self.skip_whitespace();
            if self.peek()? == ',' {
                self.next();
                self.skip_whitespace();
            } else if self.peek()? != '}' {
                return Err(self.make_error(SnbtErrorKind::ExpectComma));
            }
            map.insert(key, value);
        }
        self.next();
        Ok(Compound::from_map(map))
    }

    fn continue_parse_list(&mut self) -> Result<List> {
        self.skip_whitespace();
        let mut list = vec![];
        let mut element_type = Tag::End;
        while self.peek()? != ']' {
            let value = self.parse_element()?;
            self.skip_whitespace();
            if element_type == Tag::End {
                element_type = value.tag();
            } else if value.tag() != element_type {
                return Err(self.make_error(SnbtErrorKind::DifferentTypesInList));
            }
            if self.peek()? == ',' {
                self.next();
                self.skip_whitespace();
            } else if self.peek()? != ']' {
                return Err(self.make_error(SnbtErrorKind::ExpectComma));
            }
            list.push(value);
        }
        self.next();

        Ok(List::from_parts(element_type, list))
    }

    fn parse_list_like(&mut self) -> Result<Value> {
        self.next();
        let etype = match self.peek()? {
            'B' => Tag::Byte,
            'I' => Tag::Int,
            'L' => Tag::Long,
            _ => return self.check_depth(|v| Ok(v.continue_parse_list()?.into())),
        };

        // `[B;` starts an array while `[B` may start a bare string element.
        let mut ahead = self.iter.clone();
        ahead.next();
        if ahead.next() != Some(';') {
            return self.check_depth(|v| Ok(v.continue_parse_list()?.into()));
        }
        self.next();
        self.next();
        self.skip_whitespace();

        let mut bytes = vec![];
        let mut ints = vec![];
        let mut longs = vec![];
        while self.peek()? != ']' {
            match (etype, self.parse_element()?) {
                (Tag::Byte, Value::Byte(v)) => bytes.push(v),
                (Tag::Int, Value::Int(v)) => ints.push(v),
                (Tag::Long, Value::Long(v)) => longs.push(v),
                _ => return Err(self.make_error(SnbtErrorKind::WrongTypeInArray)),
            }
            self.skip_whitespace();
            if self.peek()? == ',' {
                self.next();
                self.skip_whitespace();
            } else if self.peek()? != ']' {
                return Err(self.make_error(SnbtErrorKind::ExpectComma));
            }
        }
        self.next();

        Ok(match etype {
            Tag::Byte => bytes.into(),
            Tag::Int => ints.into(),
            _ => longs.into(),
        })
    }

    fn parse_primitive(&mut self) -> Result<Value> {
        macro_rules! try_ret {
            // Try possible solution until one works
            ($v:expr) => {{
                if let Ok(v) = $v {
                    return Ok(v.into());
                }
            }};
        }
        let target = self.read_unquoted_string()?;
        let (body, suffix) = match target.char_indices().last() {
            Some((i, c)) => (&target[..i], c),
            None => return Err(self.make_error(SnbtErrorKind::ExpectValue)),
        };
        match suffix {
            'b' | 'B' => try_ret!(body.parse::<i8>()),
            's' | 'S' => try_ret!(body.parse::<i16>()),
            'l' | 'L' => try_ret!(body.parse::<i64>()),
            'f' | 'F' => try_ret!(body.parse::<f32>()),
            'd' | 'D' => try_ret!(body.parse::<f64>()),
            _ => (),
        }
        match target.as_str() {
            "true" => return Ok(Value::Byte(1)),
            "false" => return Ok(Value::Byte(0)),
            _ => {
                try_ret!(target.parse::<i32>());
                try_ret!(target.parse::<f64>());
            }
        };
        Ok(Value::String(target))
    }

    /// Read the next element in the SNBT string.
    /// [`SnbtErrorKind::TrailingData`] cannot be returned because it is not
    /// considered to be an error.
    pub fn parse_element(&mut self) -> Result<Value> {
        self.skip_whitespace();
        match self.peek()? {
            '{' => self.check_depth(|v| Ok(v.parse_compound()?.into())),
            '[' => self.parse_list_like(),
            '"' | '\'' => self.read_quoted_string().map(Value::from),
            _ => self.parse_primitive(),
        }
    }

    pub fn read(&mut self) -> Result<Value> {
        let value = self.parse_element()?;
        self.skip_whitespace();
        if self.peek().is_ok() {
            return Err(self.make_error(SnbtErrorKind::TrailingData));
        }
        Ok(value)
    }

    /// Get the number of bytes read.
    /// It's useful when you want to read a SNBT string from an command argument
    /// since there may be trailing data.
    pub fn bytes_read(&self) -> usize {
        self.index
    }
}

/// Parse a string in SNBT format into a `Value`.
/// Assert that the string has no trailing data.
/// SNBT is quite similar to JSON, but with some differences.
/// See [the wiki](https://minecraft.wiki/w/NBT_format#SNBT_format) for more information.
/// # Example
/// ```
/// use nbt_tree::{from_snbt_str, Value};
///
/// let value = from_snbt_str("1f").unwrap();
/// assert_eq!(value, Value::Float(1.0));
/// ```
pub fn from_snbt_str(snbt: &str) -> Result<Value> {
    SnbtReader::new(snbt).read()
}

/// Characters that may appear in a string without quotes.
fn is_bare_char(c: char) -> bool {
    matches!(c, 'a'..='z' | 'A'..='Z' | '0'..='9' | '_' | '-' | '+' | '.')
}

pub struct SnbtWriter<'a> {
    output: &'a mut String,
}

impl<'a> SnbtWriter<'a> {
    pub fn new(output: &'a mut String) -> Self {
        Self { output }
    }

    /// Writes `s` bare if possible. Otherwise it is quoted with `"`, unless
    /// the first quote character in `s` is `"`, in which case `'` is used.
    /// Backslashes and the chosen quote are escaped.
    fn write_string(&mut self, s: &str) {
        if !s.is_empty() && s.chars().all(is_bare_char) {
            self.output.push_str(s);
            return;
        }

        let mut quote = None;
        let mut body = String::with_capacity(s.len());
        for c in s.chars() {
            match c {
                '\\' => body.push_str("\\\\"),
                '"' | '\'' => {
                    let q = *quote.get_or_insert(if c == '"' { '\'' } else { '"' });
                    if c == q {
                        body.push('\\');
                    }
                    body.push(c);
                }
                _ => body.push(c),
            }
        }

        let quote = quote.unwrap_or('"');
        self.output.push(quote);
        self.output.push_str(&body);
        self.output.push(quote);
    }

    fn write_primitive_array<T: Display>(&mut self, prefix: &str, postfix: &str, values: &[T]) {
        self.output.push('[');
        self.output.push_str(prefix);
        let mut first = true;
        for v in values {
            if !first {
                self.output.push(',');
            }
            first = false;
            self.write_primitive(postfix, v);
        }
        self.output.push(']');
    }

    fn write_primitive<T: Display>(&mut self, postfix: &str, value: T) {
        self.output.push_str(&value.to_string());
        self.output.push_str(postfix);
    }

    fn write_list(&mut self, list: &List) {
        self.output.push('[');
        let mut first = true;
        for v in list {
            if !first {
                self.output.push(',');
            }
            first = false;
            self.write_element(v);
        }
        self.output.push(']');
    }

    fn write_compound(&mut self, compound: &Compound) {
        self.output.push('{');
        let mut first = true;
        for (k, v) in compound {
            if !first {
                self.output.push(',');
            }
            first = false;
            self.write_string(k);
            self.output.push(':');
            self.write_element(v);
        }
        self.output.push('}');
    }

    /// Write a value to the output.
    pub fn write_element(&mut self, value: &Value) {
        match value {
            Value::End => self.output.push_str("END"),
            Value::Byte(v) => self.write_primitive("b", v),
            Value::Short(v) => self.write_primitive("s", v),
            Value::Int(v) => self.write_primitive("", v),
            Value::Long(v) => self.write_primitive("L", v),
            Value::Float(v) => self.write_primitive("f", v),
            Value::Double(v) => self.write_primitive("d", v),
            Value::ByteArray(v) => self.write_primitive_array("B;", "B", v),
            Value::IntArray(v) => self.write_primitive_array("I;", "", v),
            Value::LongArray(v) => self.write_primitive_array("L;", "L", v),
            Value::String(v) => self.write_string(v),
            Value::List(v) => self.write_list(v),
            Value::Compound(v) => self.write_compound(v),
        }
    }
}

/// Convert a value to a string in SNBT format.
pub fn to_snbt_string(value: &Value) -> String {
    let mut output = String::new();
    let mut writer = SnbtWriter::new(&mut output);
    writer.write_element(value);
    output
}

impl Display for SnbtWriter<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.output)
    }
}

/// Renders the value as SNBT.
impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&to_snbt_string(self))
    }
}
