//! Memory-mapped file access
//!
//! A [`MappedFile`] exposes one file as a contiguous region of the process
//! address space, skipping buffered read/write for large binary volumes and
//! streamline archives. The region is valid exactly as long as the instance
//! lives; dropping it unmaps.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use memmap2::{Mmap, MmapMut};

use crate::file::{FileError, FileResult};

#[derive(Debug)]
enum Mapping {
    ReadOnly(Mmap),
    ReadWrite(MmapMut),
}

/// One open mapping between a file and an address-space region.
#[derive(Debug)]
pub struct MappedFile {
    path: PathBuf,
    mapping: Mapping,
}

impl MappedFile {
    /// Map an existing regular file read-only.
    ///
    /// Fails if the path is missing, not a regular file, empty (a zero-byte
    /// region cannot be mapped), or the mapping itself is refused.
    pub fn open(path: impl AsRef<Path>) -> FileResult<Self> {
        let path = path.as_ref();
        let file = Self::check_regular(path, File::open(path))?;

        // SAFETY: the mapping is read-only and private to this instance;
        // the slice handed out borrows the instance, so it cannot outlive
        // the unmap on drop. Concurrent truncation of the underlying file
        // by another process is outside the single-owner contract.
        let mmap = unsafe { Mmap::map(&file) }
            .map_err(|e| FileError::io("failed to map", path, e))?;

        Ok(Self {
            path: path.to_path_buf(),
            mapping: Mapping::ReadOnly(mmap),
        })
    }

    /// Map an existing regular file read-write.
    ///
    /// The file must already be sized to the full target length; mapping
    /// does not grow it.
    pub fn open_rw(path: impl AsRef<Path>) -> FileResult<Self> {
        let path = path.as_ref();
        let file = Self::check_regular(path, OpenOptions::new().read(true).write(true).open(path))?;

        // SAFETY: as for `open`, plus write access: the caller holds the
        // only mapping of this instance and the `&mut` on `as_mut_slice`
        // upholds exclusive access to the region.
        let mmap = unsafe { MmapMut::map_mut(&file) }
            .map_err(|e| FileError::io("failed to map", path, e))?;

        Ok(Self {
            path: path.to_path_buf(),
            mapping: Mapping::ReadWrite(mmap),
        })
    }

    fn check_regular(path: &Path, opened: std::io::Result<File>) -> FileResult<File> {
        let file = opened.map_err(|e| FileError::io("failed to open", path, e))?;
        let metadata = file
            .metadata()
            .map_err(|e| FileError::io("failed to stat", path, e))?;
        if !metadata.is_file() {
            return Err(FileError::NotRegular(path.to_path_buf()));
        }
        if metadata.len() == 0 {
            return Err(FileError::Empty(path.to_path_buf()));
        }
        Ok(file)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Length of the mapped region in bytes.
    pub fn len(&self) -> usize {
        match &self.mapping {
            Mapping::ReadOnly(m) => m.len(),
            Mapping::ReadWrite(m) => m.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The mapped region. Valid only while `self` is alive.
    pub fn as_slice(&self) -> &[u8] {
        match &self.mapping {
            Mapping::ReadOnly(m) => m,
            Mapping::ReadWrite(m) => m,
        }
    }

    /// Mutable view of the region; errors on a read-only mapping.
    pub fn as_mut_slice(&mut self) -> FileResult<&mut [u8]> {
        match &mut self.mapping {
            Mapping::ReadOnly(_) => Err(FileError::ReadOnly(self.path.clone())),
            Mapping::ReadWrite(m) => Ok(m),
        }
    }

    /// Flush a writable mapping's dirty pages back to the file. No-op for
    /// read-only mappings.
    pub fn flush(&self) -> FileResult<()> {
        if let Mapping::ReadWrite(m) = &self.mapping {
            m.flush()
                .map_err(|e| FileError::io("failed to flush", &self.path, e))?;
        }
        Ok(())
    }
}
