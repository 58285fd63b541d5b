//! Core primitives shared by the fiber-tracking toolkit.
//!
//! Three independent pieces live here: the [`Streamline`] container used by
//! the tracking and visualization layers, a memory-mapped whole-file copy
//! for large datasets, and a fatal-signal translator that turns OS-level
//! faults into one readable diagnostic before the process dies.

pub mod file;
#[cfg(unix)]
pub mod signal_handler;
pub mod tractography;

pub use file::{copy, copy_with, CopyOptions, FileError, FileResult, MappedFile};
pub use tractography::Streamline;

/// Arm the process-wide services: logging and fatal-signal translation.
///
/// Intended to be called once at the top of `main` by every tool in the
/// toolkit. Safe to call more than once; later calls are no-ops.
pub fn init() {
    let _ = env_logger::try_init();
    #[cfg(unix)]
    signal_handler::install();
}
