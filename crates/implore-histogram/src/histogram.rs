//! Dense N-dimensional histogram snapshots
//!
//! A histogram is exposed as a set of named flat columns that all share
//! one entry per flattened bin:
//!
//! - `bin_count`: number of entries in the bin
//! - `bin_bottom_<i>`, `bin_center_<i>`, `bin_top_<i>`: the bin's lower edge,
//!   center and upper edge along axis `i`
//!
//! Consumers only rely on the [`HistogramSource`] trait, so upstream
//! containers can expose their own storage without copying it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{HistogramError, HistogramResult};

/// Name of the count column
pub const BIN_COUNT: &str = "bin_count";

/// Name of the lower-edge column for an axis
pub fn bin_bottom_column(axis: usize) -> String {
    format!("bin_bottom_{axis}")
}

/// Name of the bin-center column for an axis
pub fn bin_center_column(axis: usize) -> String {
    format!("bin_center_{axis}")
}

/// Name of the upper-edge column for an axis
pub fn bin_top_column(axis: usize) -> String {
    format!("bin_top_{axis}")
}

/// Read-only access to a dense, strided N-dimensional histogram
///
/// Implementations provide the shape, the stride of each axis and named
/// column lookup. A column that is not available returns `None`.
pub trait HistogramSource {
    /// Number of bins along each axis
    fn shape(&self) -> &[usize];

    /// Flat-index step for moving one bin along `axis`
    fn stride(&self, axis: usize) -> usize;

    /// Look up a flat column by name
    fn column(&self, name: &str) -> Option<&[f64]>;

    /// Number of axes
    fn dim(&self) -> usize {
        self.shape().len()
    }

    /// Number of flattened bins
    fn len(&self) -> usize {
        self.shape().iter().product()
    }

    /// Check if the histogram has no bins
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stride of every axis
    fn strides(&self) -> Vec<usize> {
        (0..self.dim()).map(|axis| self.stride(axis)).collect()
    }

    fn bin_count(&self) -> Option<&[f64]> {
        self.column(BIN_COUNT)
    }

    fn bin_bottom(&self, axis: usize) -> Option<&[f64]> {
        self.column(&bin_bottom_column(axis))
    }

    fn bin_center(&self, axis: usize) -> Option<&[f64]> {
        self.column(&bin_center_column(axis))
    }

    fn bin_top(&self, axis: usize) -> Option<&[f64]> {
        self.column(&bin_top_column(axis))
    }

    /// Check that shape, strides and every known column agree
    ///
    /// Absent columns are allowed; present ones must have one entry per
    /// flattened bin.
    fn check_consistency(&self) -> HistogramResult<()> {
        validate_shape(self.shape())?;
        validate_strides(self.shape(), &self.strides())?;

        let expected = self.len();
        let mut names = vec![BIN_COUNT.to_string()];
        for axis in 0..self.dim() {
            names.push(bin_bottom_column(axis));
            names.push(bin_center_column(axis));
            names.push(bin_top_column(axis));
        }

        for name in names {
            if let Some(values) = self.column(&name) {
                if values.len() != expected {
                    return Err(HistogramError::ColumnLength {
                        column: name,
                        expected,
                        actual: values.len(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Row-major strides for a shape (last axis varies fastest)
pub fn row_major_strides(shape: &[usize]) -> Vec<usize> {
    let mut strides = vec![1; shape.len()];
    for axis in (0..shape.len().saturating_sub(1)).rev() {
        strides[axis] = strides[axis + 1] * shape[axis + 1];
    }
    strides
}

/// Validate that a shape has at least one axis and no empty axis
pub fn validate_shape(shape: &[usize]) -> HistogramResult<()> {
    if shape.is_empty() {
        return Err(HistogramError::EmptyShape);
    }
    if let Some(axis) = shape.iter().position(|&bins| bins == 0) {
        return Err(HistogramError::ZeroBins { axis });
    }
    Ok(())
}

/// Validate that strides address every flattened bin exactly once
///
/// Sorted by stride, the axes with more than one bin must form a dense
/// mixed-radix layout: the smallest stride is 1 and each following stride
/// is the previous stride times the previous axis' bin count. Single-bin
/// axes only need a positive stride.
pub fn validate_strides(shape: &[usize], strides: &[usize]) -> HistogramResult<()> {
    if strides.len() != shape.len() {
        return Err(HistogramError::StrideCount {
            expected: shape.len(),
            actual: strides.len(),
        });
    }
    if let Some(axis) = strides.iter().position(|&stride| stride == 0) {
        return Err(HistogramError::InvalidStride {
            axis,
            stride: 0,
            expected: 1,
        });
    }

    let mut axes: Vec<usize> = (0..shape.len()).filter(|&axis| shape[axis] > 1).collect();
    axes.sort_by_key(|&axis| strides[axis]);

    let mut expected = 1;
    for axis in axes {
        if strides[axis] != expected {
            return Err(HistogramError::InvalidStride {
                axis,
                stride: strides[axis],
                expected,
            });
        }
        expected *= shape[axis];
    }
    Ok(())
}

/// Uniform binning of one axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UniformAxis {
    /// Lower edge of the first bin
    pub low: f64,
    /// Upper edge of the last bin
    pub high: f64,
    /// Number of bins
    pub bins: usize,
}

impl UniformAxis {
    pub fn new(low: f64, high: f64, bins: usize) -> Self {
        Self { low, high, bins }
    }

    /// Width of a single bin
    pub fn width(&self) -> f64 {
        (self.high - self.low) / self.bins as f64
    }

    /// The `bins + 1` bin edges
    pub fn edges(&self) -> Vec<f64> {
        (0..=self.bins)
            .map(|i| self.low + (self.high - self.low) * i as f64 / self.bins as f64)
            .collect()
    }
}

/// Owned histogram snapshot with validated layout
#[derive(Debug, Clone, Serialize)]
pub struct HistogramNd {
    shape: Vec<usize>,
    strides: Vec<usize>,
    columns: BTreeMap<String, Vec<f64>>,
}

impl HistogramNd {
    /// Create a row-major histogram with no columns
    pub fn new(shape: Vec<usize>) -> HistogramResult<Self> {
        validate_shape(&shape)?;
        let strides = row_major_strides(&shape);
        Ok(Self {
            shape,
            strides,
            columns: BTreeMap::new(),
        })
    }

    /// Create a histogram with caller-supplied strides and no columns
    pub fn with_layout(shape: Vec<usize>, strides: Vec<usize>) -> HistogramResult<Self> {
        validate_shape(&shape)?;
        validate_strides(&shape, &strides)?;
        Ok(Self {
            shape,
            strides,
            columns: BTreeMap::new(),
        })
    }

    /// Builder-style [`HistogramNd::insert_column`]
    pub fn with_column(mut self, name: impl Into<String>, values: Vec<f64>) -> HistogramResult<Self> {
        self.insert_column(name, values)?;
        Ok(self)
    }

    /// Insert or replace a column, returning the previous values
    pub fn insert_column(
        &mut self,
        name: impl Into<String>,
        values: Vec<f64>,
    ) -> HistogramResult<Option<Vec<f64>>> {
        let name = name.into();
        let expected = self.len();
        if values.len() != expected {
            return Err(HistogramError::ColumnLength {
                column: name,
                expected,
                actual: values.len(),
            });
        }
        Ok(self.columns.insert(name, values))
    }

    pub fn remove_column(&mut self, name: &str) -> Option<Vec<f64>> {
        self.columns.remove(name)
    }

    /// Names of all present columns, sorted
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// Flat index of a per-axis bin index, if it is inside the shape
    pub fn flat_index(&self, index: &[usize]) -> Option<usize> {
        if index.len() != self.shape.len() {
            return None;
        }
        index
            .iter()
            .zip(self.shape.iter().zip(&self.strides))
            .try_fold(0, |flat, (&bin, (&bins, &stride))| {
                (bin < bins).then_some(flat + bin * stride)
            })
    }

    /// Build a row-major histogram from explicit per-axis bin edges
    ///
    /// `edges[i]` holds the `n_i + 1` strictly increasing edges of axis `i`;
    /// `counts` is the row-major count array of length `n_0 * n_1 * ...`.
    /// Edge and center columns are filled for every axis.
    pub fn from_edges(edges: &[Vec<f64>], counts: Vec<f64>) -> HistogramResult<Self> {
        for (axis, axis_edges) in edges.iter().enumerate() {
            if axis_edges.len() < 2 {
                return Err(HistogramError::InvalidEdges {
                    axis,
                    message: "at least two edges are required".to_string(),
                });
            }
            if !axis_edges.windows(2).all(|pair| pair[0] < pair[1]) {
                return Err(HistogramError::InvalidEdges {
                    axis,
                    message: "edges must be strictly increasing".to_string(),
                });
            }
        }

        let shape: Vec<usize> = edges.iter().map(|axis_edges| axis_edges.len() - 1).collect();
        let mut histogram = Self::new(shape)?;
        let len = histogram.len();
        if counts.len() != len {
            return Err(HistogramError::CountLength {
                expected: len,
                actual: counts.len(),
            });
        }
        if counts.iter().any(|&count| count < 0.0) {
            tracing::warn!("Histogram built with negative bin counts");
        }

        for (axis, axis_edges) in edges.iter().enumerate() {
            let stride = histogram.strides[axis];
            let bins = histogram.shape[axis];

            let mut bottom = Vec::with_capacity(len);
            let mut center = Vec::with_capacity(len);
            let mut top = Vec::with_capacity(len);
            for flat in 0..len {
                let bin = (flat / stride) % bins;
                let (lo, hi) = (axis_edges[bin], axis_edges[bin + 1]);
                bottom.push(lo);
                center.push(0.5 * (lo + hi));
                top.push(hi);
            }

            histogram.insert_column(bin_bottom_column(axis), bottom)?;
            histogram.insert_column(bin_center_column(axis), center)?;
            histogram.insert_column(bin_top_column(axis), top)?;
        }
        histogram.insert_column(BIN_COUNT, counts)?;

        Ok(histogram)
    }

    /// Build a row-major histogram with uniform binning on every axis
    pub fn uniform(axes: &[UniformAxis], counts: Vec<f64>) -> HistogramResult<Self> {
        let edges: Vec<Vec<f64>> = axes.iter().map(UniformAxis::edges).collect();
        Self::from_edges(&edges, counts)
    }
}

impl HistogramSource for HistogramNd {
    fn shape(&self) -> &[usize] {
        &self.shape
    }

    fn stride(&self, axis: usize) -> usize {
        self.strides[axis]
    }

    fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns.get(name).map(Vec::as_slice)
    }
}
