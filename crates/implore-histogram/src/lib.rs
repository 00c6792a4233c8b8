//! implore-histogram - N-dimensional histogram snapshots for implore
//!
//! This crate is the input side of histogram profiling:
//!
//! - **HistogramSource**: read-only view of a dense, strided N-D histogram
//!   exposed as named flat columns (`bin_count`, `bin_center_0`, ...)
//! - **HistogramNd**: an owned, validated snapshot implementing the trait
//! - **Signal**: explicit single-threaded change notification
//! - **SharedHistogram**: a histogram slot that announces replacements
//!
//! # Layout
//!
//! Every column has one entry per flattened bin. Moving one bin along axis
//! `i` advances the flat index by `stride(i)`. Snapshots built here use
//! row-major order, so the last axis is the fastest varying one.

pub mod error;
pub mod histogram;
pub mod shared;
pub mod signal;

pub use error::*;
pub use histogram::*;
pub use shared::*;
pub use signal::*;
