//! Error types for implore-profile
//!
//! Configuration problems and inconsistent histograms fail fast. Missing
//! backing data or empty bins are not errors; they show up as NaN values
//! and `isOK = false` in the produced table.

use implore_histogram::HistogramError;
use thiserror::Error;

/// Main error type for profile computation
#[derive(Error, Debug)]
pub enum ProfileError {
    /// Profile axis does not exist in the histogram
    #[error("Profile axis {axis} out of range for {dim}-dimensional histogram")]
    AxisOutOfRange { axis: usize, dim: usize },

    /// A sum range is not a finite, ordered interval
    #[error("Invalid sum range #{index}: [{low}, {high}]")]
    InvalidRange { index: usize, low: f64, high: f64 },

    /// A quantile is NaN or infinite
    #[error("Quantile #{index} is not finite")]
    NonFiniteQuantile { index: usize },

    /// Non-sentinel quantiles must be ascending
    #[error("Quantile #{index} is smaller than a preceding quantile")]
    UnsortedQuantiles { index: usize },

    /// Histogram shape and columns disagree
    #[error("Inconsistent histogram: {0}")]
    Histogram(#[from] HistogramError),

    /// A profile slice could not be viewed with the histogram's strides
    #[error("Invalid profile slice layout: {0}")]
    Layout(#[from] ndarray::ShapeError),

    /// Configuration could not be parsed or serialized
    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result type alias for profile operations
pub type ProfileResult<T> = Result<T, ProfileError>;
