use std::io;
use std::io::{BufReader, Read, Write};

use flate2::bufread::{GzDecoder, ZlibDecoder};
use flate2::write::{GzEncoder, ZlibEncoder};

/// The container wrapped around a binary NBT document.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
pub enum Compression {
    /// Plain, uncompressed NBT.
    #[default]
    None,
    /// A gzip stream (RFC 1952). Most files on disk use this.
    Gzip,
    /// A zlib-wrapped deflate stream (RFC 1950).
    Zlib,
}

impl Compression {
    pub(crate) fn reader<R: Read>(self, reader: R) -> CompressedReader<R> {
        match self {
            Compression::None => CompressedReader::None(reader),
            Compression::Gzip => CompressedReader::Gzip(GzDecoder::new(BufReader::new(reader))),
            Compression::Zlib => CompressedReader::Zlib(ZlibDecoder::new(BufReader::new(reader))),
        }
    }

    pub(crate) fn writer<W: Write>(self, writer: W) -> CompressedWriter<W> {
        let level = flate2::Compression::default();

        match self {
            Compression::None => CompressedWriter::None(writer),
            Compression::Gzip => CompressedWriter::Gzip(GzEncoder::new(writer, level)),
            Compression::Zlib => CompressedWriter::Zlib(ZlibEncoder::new(writer, level)),
        }
    }
}

/// Decompresses bytes pulled from the inner reader on demand.
pub(crate) enum CompressedReader<R> {
    None(R),
    Gzip(GzDecoder<BufReader<R>>),
    Zlib(ZlibDecoder<BufReader<R>>),
}

impl<R: Read> Read for CompressedReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            CompressedReader::None(r) => r.read(buf),
            CompressedReader::Gzip(r) => r.read(buf),
            CompressedReader::Zlib(r) => r.read(buf),
        }
    }
}

/// Compresses bytes as they are written. [`CompressedWriter::finish`] must be
/// called to emit the end of the stream.
pub(crate) enum CompressedWriter<W: Write> {
    None(W),
    Gzip(GzEncoder<W>),
    Zlib(ZlibEncoder<W>),
}

impl<W: Write> CompressedWriter<W> {
    /// Writes any pending compressed data and the stream trailer, then flushes
    /// and returns the inner writer.
    pub(crate) fn finish(self) -> io::Result<W> {
        let mut inner = match self {
            CompressedWriter::None(w) => w,
            CompressedWriter::Gzip(w) => w.finish()?,
            CompressedWriter::Zlib(w) => w.finish()?,
        };

        inner.flush()?;
        Ok(inner)
    }
}

impl<W: Write> Write for CompressedWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            CompressedWriter::None(w) => w.write(buf),
            CompressedWriter::Gzip(w) => w.write(buf),
            CompressedWriter::Zlib(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            CompressedWriter::None(w) => w.flush(),
            CompressedWriter::Gzip(w) => w.flush(),
            CompressedWriter::Zlib(w) => w.flush(),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn compress(compression: Compression, data: &[u8]) -> Vec<u8> {
        let mut w = compression.writer(Vec::new());
        w.write_all(data).unwrap();
        w.finish().unwrap()
    }

    #[test]
    fn streams_round_trip() {
        let data = b"the quick brown fox jumps over the lazy dog".repeat(100);

        for compression in [Compression::None, Compression::Gzip, Compression::Zlib] {
            let compressed = compress(compression, &data);

            let mut out = vec![];
            compression
                .reader(compressed.as_slice())
                .read_to_end(&mut out)
                .unwrap();

            assert_eq!(out, data, "{compression:?}");
        }
    }

    #[test]
    fn containers_have_their_magic() {
        let gzip = compress(Compression::Gzip, b"x");
        assert_eq!(&gzip[..2], &[0x1f, 0x8b]);

        let zlib = compress(Compression::Zlib, b"x");
        assert_eq!(zlib[0] & 0x0f, 8);
        assert_eq!(u16::from_be_bytes([zlib[0], zlib[1]]) % 31, 0);

        assert_eq!(compress(Compression::None, b"x"), b"x");
    }

    #[test]
    fn gzip_read_as_zlib_fails() {
        let gzip = compress(Compression::Gzip, b"some payload");

        let mut out = vec![];
        let res = Compression::Zlib
            .reader(gzip.as_slice())
            .read_to_end(&mut out);

        assert!(res.is_err());
    }
}
