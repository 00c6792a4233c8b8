//! Error types for implore-histogram

use thiserror::Error;

/// Errors raised when a histogram's shape metadata and columns disagree
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HistogramError {
    /// A histogram needs at least one axis
    #[error("Histogram must have at least one axis")]
    EmptyShape,

    /// Every axis needs at least one bin
    #[error("Axis {axis} has no bins")]
    ZeroBins { axis: usize },

    /// A column does not have one entry per flattened bin
    #[error("Column '{column}' has {actual} entries, expected {expected}")]
    ColumnLength {
        column: String,
        expected: usize,
        actual: usize,
    },

    /// Stride table does not match the number of axes
    #[error("Expected {expected} strides, got {actual}")]
    StrideCount { expected: usize, actual: usize },

    /// Strides do not address every flattened bin exactly once
    #[error("Invalid stride {stride} for axis {axis} (expected {expected})")]
    InvalidStride {
        axis: usize,
        stride: usize,
        expected: usize,
    },

    /// Bin edges must describe at least one bin in ascending order
    #[error("Axis {axis} edges are invalid: {message}")]
    InvalidEdges { axis: usize, message: String },

    /// Count array does not cover the binned shape
    #[error("Count array has {actual} entries, shape requires {expected}")]
    CountLength { expected: usize, actual: usize },
}

/// Result type alias for histogram operations
pub type HistogramResult<T> = Result<T, HistogramError>;
