//! Whole-file duplication through memory mappings
//!
//! Copies a file by mapping source and destination and performing one bulk
//! memory copy, avoiding buffered read/write overhead for large datasets.
//! Files past a configurable size threshold fall back to a chunked
//! buffered copy instead of mapping the whole file.

use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::Path;

use log::debug;

use crate::file::{FileError, FileResult, MappedFile};

/// Tuning knobs for [`copy_with`].
#[derive(Debug, Clone)]
pub struct CopyOptions {
    /// Largest file copied via a whole-file mapping; anything bigger uses
    /// the chunked buffered path.
    pub mmap_limit: u64,
}

impl Default for CopyOptions {
    fn default() -> Self {
        Self {
            mmap_limit: 1 << 30, // 1 GiB
        }
    }
}

/// Duplicate `source` into `destination` with default options.
///
/// The destination is created, or truncated to exactly the source's length;
/// on failure no destination is left claiming success, and a missing source
/// is detected before the destination is touched at all.
pub fn copy(source: impl AsRef<Path>, destination: impl AsRef<Path>) -> FileResult<()> {
    copy_with(source, destination, &CopyOptions::default())
}

/// Duplicate `source` into `destination`.
pub fn copy_with(
    source: impl AsRef<Path>,
    destination: impl AsRef<Path>,
    options: &CopyOptions,
) -> FileResult<()> {
    let source = source.as_ref();
    let destination = destination.as_ref();
    debug!(
        "copying file \"{}\" to \"{}\"...",
        source.display(),
        destination.display()
    );

    // Stat the source before creating anything, so a bad source never
    // leaves a freshly-created destination behind.
    let metadata = std::fs::metadata(source)
        .map_err(|e| FileError::io("failed to stat", source, e))?;
    if !metadata.is_file() {
        return Err(FileError::NotRegular(source.to_path_buf()));
    }
    let len = metadata.len();

    if len == 0 {
        // A zero-byte region cannot be mapped; creating the (empty)
        // destination is the whole copy.
        create_sized(destination, 0)?;
        return Ok(());
    }

    if len > options.mmap_limit {
        return copy_buffered(source, destination, len);
    }

    let input = MappedFile::open(source)?;
    create_sized(destination, len)?;
    let mut output = MappedFile::open_rw(destination)?;
    output.as_mut_slice()?.copy_from_slice(input.as_slice());
    output.flush()
}

/// Create or truncate `path` and size it to exactly `len` bytes.
fn create_sized(path: &Path, len: u64) -> FileResult<File> {
    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .map_err(|e| FileError::io("failed to create", path, e))?;
    file.set_len(len)
        .map_err(|e| FileError::io("failed to resize", path, e))?;
    Ok(file)
}

/// Chunked fallback for files too large to map whole.
fn copy_buffered(source: &Path, destination: &Path, len: u64) -> FileResult<()> {
    const CHUNK: usize = 8 << 20;

    let mut input =
        File::open(source).map_err(|e| FileError::io("failed to open", source, e))?;
    let mut output = create_sized(destination, len)?;

    let mut buffer = vec![0u8; CHUNK.min(len as usize)];
    let mut remaining = len;
    while remaining > 0 {
        let want = buffer.len().min(remaining as usize);
        input
            .read_exact(&mut buffer[..want])
            .map_err(|e| FileError::io("failed to read", source, e))?;
        output
            .write_all(&buffer[..want])
            .map_err(|e| FileError::io("failed to write", destination, e))?;
        remaining -= want as u64;
    }
    output
        .flush()
        .map_err(|e| FileError::io("failed to flush", destination, e))
}
