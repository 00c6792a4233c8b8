//! implore-profile - Histogram profiles for interactive exploration
//!
//! Collapses a dense N-dimensional histogram along one "profile axis" and
//! produces, for every combination of the remaining axes, a row of:
//!
//! - **Statistics**: count-weighted mean and standard deviation, entries
//! - **Quantiles**: linear interpolation of the cumulative histogram
//! - **Range integrals**: counts and efficiencies inside value ranges
//!
//! # Reactivity
//!
//! [`ProfileReducer`] is a pure function of histogram and configuration.
//! [`ProfileView`] wraps it, listens to a
//! [`SharedHistogram`](implore_histogram::SharedHistogram) and rebuilds its
//! [`ProfileTable`] wholesale on every change.

pub mod config;
pub mod error;
pub mod reducer;
pub mod slice;
pub mod table;
mod traversal;
pub mod view;

pub use config::*;
pub use error::*;
pub use reducer::*;
pub use slice::*;
pub use table::*;
pub use view::*;
