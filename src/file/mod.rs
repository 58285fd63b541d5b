//! File access primitives: memory mapping and whole-file duplication

pub mod copy;
pub mod mapped_file;

pub use copy::{copy, copy_with, CopyOptions};
pub use mapped_file::MappedFile;

use std::path::PathBuf;

/// Result type for file operations
pub type FileResult<T> = Result<T, FileError>;

/// Errors from mapping or copying files. All are synchronous and leave no
/// partial state behind; the caller may retry.
#[derive(Debug, thiserror::Error)]
pub enum FileError {
    #[error("{context} \"{path}\": {source}")]
    Io {
        context: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("\"{0}\" is not a regular file")]
    NotRegular(PathBuf),

    #[error("cannot map empty file \"{0}\"")]
    Empty(PathBuf),

    #[error("mapping of \"{0}\" is read-only")]
    ReadOnly(PathBuf),
}

impl FileError {
    pub(crate) fn io(context: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FileError::Io {
            context,
            path: path.into(),
            source,
        }
    }
}
