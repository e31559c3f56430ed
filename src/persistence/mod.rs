//! Persistence layer for saving and loading indexes.
//!
//! # File Format
//!
//! ```text
//! [CAPACITY u64][STRIDE u64][COUNT u64]
//! [RECORDS: CAPACITY * STRIDE bytes, each = vector payload + u64 label]
//! ```
//!
//! The label map is not stored; it is rebuilt from the labels trailing the
//! first COUNT records on load.

mod format;

pub use format::IndexHeader;

use crate::error::{KnnError, Result};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Write a header and the full arena to `path`, replacing any existing file.
pub(crate) fn write_index(path: &Path, header: &IndexHeader, arena: &[u8]) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(&header.to_bytes())?;
    writer.write_all(arena)?;
    let file = writer.into_inner().map_err(|err| err.into_error())?;
    file.sync_all()?;
    Ok(())
}

/// A saved index opened for reading.
pub(crate) struct IndexFile {
    pub(crate) reader: BufReader<File>,
    /// Total file length in bytes.
    pub(crate) len: u64,
}

impl IndexFile {
    /// Fail unless the file holds the full arena `header` describes.
    ///
    /// Checked before the arena is allocated, so a header claiming more
    /// records than the file carries costs nothing.
    pub(crate) fn check_body_len(&self, header: &IndexHeader) -> Result<()> {
        let expected = header
            .body_len()
            .and_then(|body| u64::try_from(body).ok())
            .and_then(|body| body.checked_add(IndexHeader::SIZE as u64))
            .ok_or_else(|| KnnError::invalid_format("capacity * stride overflows"))?;
        if self.len < expected {
            return Err(KnnError::invalid_format("record data is truncated"));
        }
        Ok(())
    }
}

/// Open a saved index for reading.
pub(crate) fn open_index(path: &Path) -> Result<IndexFile> {
    let file = File::open(path)?;
    let len = file.metadata()?.len();
    Ok(IndexFile {
        reader: BufReader::new(file),
        len,
    })
}

/// Read and parse the header.
pub(crate) fn read_header(reader: &mut impl Read) -> Result<IndexHeader> {
    let mut bytes = [0u8; IndexHeader::SIZE];
    read_exact_or_format(reader, &mut bytes, "file too small for header")?;
    IndexHeader::from_bytes(&bytes)
}

/// Fill `out` with the arena section.
pub(crate) fn read_arena(reader: &mut impl Read, out: &mut [u8]) -> Result<()> {
    read_exact_or_format(reader, out, "record data is truncated")
}

fn read_exact_or_format(reader: &mut impl Read, out: &mut [u8], msg: &str) -> Result<()> {
    match reader.read_exact(out) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => Err(KnnError::invalid_format(msg)),
        Err(err) => Err(err.into()),
    }
}
