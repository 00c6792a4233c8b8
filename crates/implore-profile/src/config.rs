//! Profile configuration
//!
//! A [`ProfileConfig`] names the axis to collapse, the quantiles to extract
//! and the value ranges to integrate. It is immutable once handed to a
//! reducer; reconfiguring means building a new reducer.

use serde::{Deserialize, Serialize};

use crate::error::{ProfileError, ProfileResult};

/// Configuration of a histogram profile
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProfileConfig {
    /// Axis collapsed into per-bin statistics
    pub axis_idx: usize,

    /// Quantile fractions, ascending. A negative entry reserves a column
    /// that is always NaN.
    #[serde(default)]
    pub quantiles: Vec<f64>,

    /// `[low, high]` ranges in the value space of the profile axis
    #[serde(default)]
    pub sum_range: Vec<[f64; 2]>,
}

impl ProfileConfig {
    /// Profile along `axis_idx` with no quantiles or ranges
    pub fn new(axis_idx: usize) -> Self {
        Self {
            axis_idx,
            quantiles: Vec::new(),
            sum_range: Vec::new(),
        }
    }

    /// Set the quantile list
    pub fn with_quantiles(mut self, quantiles: impl Into<Vec<f64>>) -> Self {
        self.quantiles = quantiles.into();
        self
    }

    /// Append one integration range
    pub fn with_sum_range(mut self, low: f64, high: f64) -> Self {
        self.sum_range.push([low, high]);
        self
    }

    /// Set the integration ranges
    pub fn with_sum_ranges(mut self, ranges: impl Into<Vec<[f64; 2]>>) -> Self {
        self.sum_range = ranges.into();
        self
    }

    /// Parse and validate a JSON configuration
    ///
    /// ```
    /// use implore_profile::ProfileConfig;
    ///
    /// let config = ProfileConfig::from_json(
    ///     r#"{"axis_idx": 1, "quantiles": [-1, 0.5], "sum_range": [[0.0, 2.0]]}"#,
    /// )
    /// .unwrap();
    /// assert_eq!(config.axis_idx, 1);
    /// assert_eq!(config.sum_range, vec![[0.0, 2.0]]);
    /// ```
    pub fn from_json(json: &str) -> ProfileResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> ProfileResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Check quantiles and ranges
    ///
    /// The axis can only be checked against a histogram, see
    /// [`ProfileConfig::validate_for_dim`].
    pub fn validate(&self) -> ProfileResult<()> {
        let mut previous = f64::NEG_INFINITY;
        for (index, &q) in self.quantiles.iter().enumerate() {
            if !q.is_finite() {
                return Err(ProfileError::NonFiniteQuantile { index });
            }
            if q < 0.0 {
                continue;
            }
            if q < previous {
                return Err(ProfileError::UnsortedQuantiles { index });
            }
            previous = q;
        }

        for (index, &[low, high]) in self.sum_range.iter().enumerate() {
            if !(low.is_finite() && high.is_finite() && low <= high) {
                return Err(ProfileError::InvalidRange { index, low, high });
            }
        }
        Ok(())
    }

    /// Check the profile axis against a histogram dimension
    pub fn validate_for_dim(&self, dim: usize) -> ProfileResult<()> {
        if self.axis_idx >= dim {
            return Err(ProfileError::AxisOutOfRange {
                axis: self.axis_idx,
                dim,
            });
        }
        Ok(())
    }
}
