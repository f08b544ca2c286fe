//! Support for encoding and decoding NBT documents in the uncompressed binary
//! format.
//!
//! A document is a single named root value. Most documents have a compound
//! root and an empty name. Use the functions at the crate root to read and
//! write documents through a [`Compression`](crate::Compression) layer.
//!
//! # Examples
//!
//! ```
//! use nbt_tree::{compound, to_binary, List, Value};
//!
//! let c = compound! {
//!     "byte" => 5_i8,
//!     "string" => "hello",
//!     "list_of_float" => List::from(vec![
//!         std::f32::consts::PI,
//!         std::f32::consts::E,
//!         1.5
//!     ]),
//! };
//!
//! let mut buf = vec![];
//!
//! to_binary(&mut buf, "", &Value::from(c)).unwrap();
//! ```
//!
//! Decode NBT data from its binary form.
//!
//! ```
//! use nbt_tree::{compound, from_binary, Value};
//!
//! let some_bytes = [10, 0, 0, 3, 0, 3, 105, 110, 116, 0, 0, 222, 173, 0];
//!
//! let expected_value = compound! {
//!     "int" => 0xdead
//! };
//!
//! let (root_name, nbt) = from_binary(some_bytes.as_slice()).unwrap();
//!
//! assert_eq!(nbt, Value::from(expected_value));
//! assert_eq!(root_name, "");
//! ```

mod decode;
mod encode;
mod modified_utf8;

pub use decode::*;
pub use encode::*;
