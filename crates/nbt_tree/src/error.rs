use std::io;

use thiserror::Error;

use crate::Tag;

/// Convenience alias for results returned by this crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors that can occur while building, querying, encoding or decoding NBT.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("an I/O error occurred: {0}")]
    Io(#[source] io::Error),
    #[error("unexpected end of stream")]
    UnexpectedEof,
    #[error("invalid tag byte of {0:#04x}")]
    InvalidTag(u8),
    #[error("negative {what} length of {len}")]
    NegativeLength { what: &'static str, len: i32 },
    #[error("list of {len} elements has element type `end`")]
    InvalidListType { len: i32 },
    #[error("string is not valid modified UTF-8")]
    InvalidString,
    #[error("compressed stream is corrupt: {0}")]
    Corrupt(#[source] io::Error),
    #[error("{what} of length {len} exceeds maximum of {max}")]
    TooLong {
        what: &'static str,
        len: usize,
        max: usize,
    },
    #[error("reached maximum recursion depth of {0}")]
    DepthLimitExceeded(usize),
    #[error("expected `{expected}` but found `{found}`")]
    TypeMismatch { expected: Tag, found: Tag },
    #[error("index {index} out of bounds for length {len}")]
    IndexOutOfBounds { index: usize, len: usize },
    #[error("root tag must be an unnamed compound, found `{0}`")]
    RootNotCompound(Tag),
    #[error("UUIDs are encoded as 4 ints, found an int array of length {0}")]
    InvalidUuidLength(usize),
    #[cfg(feature = "snbt")]
    #[error("failed to parse SNBT: {0}")]
    Snbt(#[from] crate::snbt::SnbtError),
}

/// Coarse classification of an [`Error`].
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum ErrorKind {
    /// The underlying reader or writer failed.
    Io,
    /// The input is not well-formed NBT (or not a well-formed compressed
    /// container).
    Malformed,
    /// Decoding nested containers tripped the recursion guard.
    DepthExceeded,
    /// A value had a different type than the one required.
    TypeMismatch,
    /// An element index was outside the valid range.
    IndexOutOfRange,
    /// The document root was not a compound.
    RootShape,
    /// Textual input could not be parsed.
    Syntax,
}

impl Error {
    /// Returns the [`ErrorKind`] this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Io(_) => ErrorKind::Io,
            Error::UnexpectedEof
            | Error::InvalidTag(_)
            | Error::NegativeLength { .. }
            | Error::InvalidListType { .. }
            | Error::InvalidString
            | Error::Corrupt(_)
            | Error::TooLong { .. } => ErrorKind::Malformed,
            Error::DepthLimitExceeded(_) => ErrorKind::DepthExceeded,
            Error::TypeMismatch { .. } | Error::InvalidUuidLength(_) => ErrorKind::TypeMismatch,
            Error::IndexOutOfBounds { .. } => ErrorKind::IndexOutOfRange,
            Error::RootNotCompound(_) => ErrorKind::RootShape,
            #[cfg(feature = "snbt")]
            Error::Snbt(_) => ErrorKind::Syntax,
        }
    }

    pub(crate) fn mismatch(expected: Tag, found: Tag) -> Self {
        Error::TypeMismatch { expected, found }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::UnexpectedEof => Error::UnexpectedEof,
            // flate2 reports bad headers, checksums and deflate data this way.
            io::ErrorKind::InvalidInput | io::ErrorKind::InvalidData => Error::Corrupt(e),
            _ => Error::Io(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_are_classified() {
        let eof: Error = io::Error::from(io::ErrorKind::UnexpectedEof).into();
        assert!(matches!(eof, Error::UnexpectedEof));
        assert_eq!(eof.kind(), ErrorKind::Malformed);

        let corrupt: Error = io::Error::new(io::ErrorKind::InvalidInput, "bad header").into();
        assert_eq!(corrupt.kind(), ErrorKind::Malformed);

        let denied: Error = io::Error::from(io::ErrorKind::PermissionDenied).into();
        assert_eq!(denied.kind(), ErrorKind::Io);
    }

    #[test]
    fn depth_is_distinct_from_malformed() {
        assert_eq!(
            Error::DepthLimitExceeded(512).kind(),
            ErrorKind::DepthExceeded
        );
        assert_eq!(Error::InvalidTag(42).kind(), ErrorKind::Malformed);
        assert_eq!(
            Error::RootNotCompound(Tag::Int).to_string(),
            "root tag must be an unnamed compound, found `int`"
        );
    }
}
