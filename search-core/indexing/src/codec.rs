//! The persisted index file.
//!
//! An index file is an 8-byte magic, a little-endian format version, and the
//! JSON encoding of the whole index value. The environment's interner is
//! persisted as its arena; tags are reassigned identically on load, so a
//! round-tripped index answers every query like the original.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::{IndexError, SearchIndex};

const MAGIC: [u8; 8] = *b"tyseek\0\0";
const VERSION: u32 = 1;

pub(crate) fn save(index: &SearchIndex, path: &Path) -> Result<(), IndexError> {
    let io_error = |source| IndexError::Io { path: path.to_path_buf(), source };

    let file = File::create(path).map_err(io_error)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(&MAGIC).map_err(io_error)?;
    writer.write_all(&VERSION.to_le_bytes()).map_err(io_error)?;
    serde_json::to_writer(&mut writer, index)
        .map_err(|source| IndexError::Codec { path: path.to_path_buf(), source })?;
    writer.flush().map_err(io_error)?;
    Ok(())
}

pub(crate) fn load(path: &Path) -> Result<SearchIndex, IndexError> {
    let io_error = |source| IndexError::Io { path: path.to_path_buf(), source };

    let file = File::open(path).map_err(io_error)?;
    let mut reader = BufReader::new(file);

    let mut magic = [0u8; 8];
    reader.read_exact(&mut magic).map_err(io_error)?;
    if magic != MAGIC {
        return Err(IndexError::Magic { path: path.to_path_buf() });
    }

    let mut version = [0u8; 4];
    reader.read_exact(&mut version).map_err(io_error)?;
    let version = u32::from_le_bytes(version);
    if version != VERSION {
        return Err(IndexError::Version { path: path.to_path_buf(), version });
    }

    serde_json::from_reader(reader)
        .map_err(|source| IndexError::Codec { path: path.to_path_buf(), source })
}
