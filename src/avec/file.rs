//! File-based decoder implementation.
//!
//! _Requires Cargo feature `std`._

use std::{fs::File, io, path::Path};

use memmap2::Mmap;
use thiserror::Error;
use tracing::debug;

use crate::schema::SchemaSource;

use super::{FromFields, Options, slice};

extern crate std;

/// Errors occurring while decoding from a file.
#[derive(Debug, Error)]
pub enum Error {
    /// An error opening or mapping the file.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// The file does not hold a valid record.
    #[error(transparent)]
    Record(#[from] slice::Error),
}

/// Validate the record held in a file, publishing located fields to a
/// receiver.
///
/// This method is also re-exported as `astval::avec::decode_file`.
///
/// _Requires Cargo feature `std`._
pub fn decode(
    path: impl AsRef<Path>,
    s: &impl SchemaSource,
    o: &mut impl FromFields,
) -> Result<usize, Error> {
    decode_with(path, s, o, Options::default())
}

/// Validate the record held in a file, as [`decode`], with explicit options.
pub fn decode_with(
    path: impl AsRef<Path>,
    s: &impl SchemaSource,
    o: &mut impl FromFields,
    options: Options,
) -> Result<usize, Error> {
    let path = path.as_ref();
    let file = File::open(path)?;

    // Empty files cannot be mapped on every platform, and hold no header.
    if file.metadata()?.len() == 0 {
        Err(slice::Error::Truncated(0))?;
    }

    // SAFETY: the mapping is only read, and lives no longer than this call.
    // Concurrent modification of the file by another process is not guarded
    // against.
    let map = unsafe { Mmap::map(&file)? };

    debug!(path = %path.display(), size = map.len(), "mapped record file");

    Ok(slice::decode_with(&map, s, o, options)?)
}
