//! Reading and writing whole documents through a [`Compression`] layer.

use std::fs::File;
use std::io;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use tracing::trace;

use crate::binary::{from_binary_with_options, to_binary, ReadOptions};
use crate::{Compound, Compression, Error, Result, Value};

/// Reads a document, returning the name of the root and the root value.
///
/// Compressed input is read to the end of its container so that a damaged
/// checksum is reported as [`Error::Corrupt`]. Uncompressed input is left
/// positioned right after the root.
///
/// A document consisting of a single end byte yields `("", Value::End)`.
pub fn read_document<R: Read>(reader: R, compression: Compression) -> Result<(String, Value)> {
    read_document_with_options(reader, compression, ReadOptions::default())
}

/// Like [`read_document`], with explicit [`ReadOptions`].
pub fn read_document_with_options<R: Read>(
    reader: R,
    compression: Compression,
    options: ReadOptions,
) -> Result<(String, Value)> {
    let mut reader = compression.reader(reader);
    let (name, value) = from_binary_with_options(&mut reader, options)?;

    if compression != Compression::None {
        // The container's checksum is only verified once its trailer is read.
        io::copy(&mut reader, &mut io::sink())?;
    }

    trace!(
        root_name = %name,
        root_tag = %value.tag(),
        ?compression,
        "read NBT document"
    );

    Ok((name, value))
}

/// Reads a document whose root must be a compound. The root name is
/// discarded.
pub fn read_compound<R: Read>(reader: R, compression: Compression) -> Result<Compound> {
    read_compound_with_options(reader, compression, ReadOptions::default())
}

/// Like [`read_compound`], with explicit [`ReadOptions`].
pub fn read_compound_with_options<R: Read>(
    reader: R,
    compression: Compression,
    options: ReadOptions,
) -> Result<Compound> {
    let (_, value) = read_document_with_options(reader, compression, options)?;

    match value {
        Value::Compound(c) => Ok(c),
        other => Err(Error::RootNotCompound(other.tag())),
    }
}

/// Writes `value` as the root of a document named `name`.
///
/// The compressed stream is finished before returning. If encoding fails,
/// that error is returned and the partial stream is abandoned.
pub fn write_document<W: Write>(
    writer: W,
    name: &str,
    value: &Value,
    compression: Compression,
) -> Result<()> {
    let mut w = compression.writer(writer);

    to_binary(&mut w, name, value)?;
    w.finish()?;

    trace!(
        root_name = %name,
        root_tag = %value.tag(),
        ?compression,
        "wrote NBT document"
    );

    Ok(())
}

/// Writes `compound` as the root of a document with an empty name.
pub fn write_compound<W: Write>(
    writer: W,
    compound: &Compound,
    compression: Compression,
) -> Result<()> {
    write_document(writer, "", &Value::Compound(compound.clone()), compression)
}

/// Reads a document from the file at `path`.
pub fn read_document_file<P: AsRef<Path>>(
    path: P,
    compression: Compression,
) -> Result<(String, Value)> {
    let file = File::open(path).map_err(Error::Io)?;
    read_document(BufReader::new(file), compression)
}

/// Reads a document whose root must be a compound from the file at `path`.
pub fn read_compound_file<P: AsRef<Path>>(path: P, compression: Compression) -> Result<Compound> {
    let file = File::open(path).map_err(Error::Io)?;
    read_compound(BufReader::new(file), compression)
}

/// Writes a document to the file at `path`, replacing its contents.
pub fn write_document_file<P: AsRef<Path>>(
    path: P,
    name: &str,
    value: &Value,
    compression: Compression,
) -> Result<()> {
    let file = File::create(path).map_err(Error::Io)?;
    write_document(BufWriter::new(file), name, value, compression)
}

/// Writes `compound` with an empty root name to the file at `path`.
pub fn write_compound_file<P: AsRef<Path>>(
    path: P,
    compound: &Compound,
    compression: Compression,
) -> Result<()> {
    let file = File::create(path).map_err(Error::Io)?;
    write_compound(BufWriter::new(file), compound, compression)
}
