//! Streamline data structures for tractography
//!
//! A streamline is one traced fiber pathway through a diffusion dataset,
//! stored as an ordered sequence of 3-D points. Reconstruction appends
//! points while tracking; the track-file reader fills pre-sized buffers;
//! the visualization layer reads points and lengths back out.

pub mod streamline;

pub use streamline::{Streamline, UNASSIGNED};
