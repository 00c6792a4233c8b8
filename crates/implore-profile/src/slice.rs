//! Statistics of one profile slice
//!
//! A [`ProfileSlice`] is the 1D histogram along the profile axis for a
//! single transverse bin: counts, bin centers and (optionally) bin edges,
//! all as strided views into the flat histogram columns, plus the prefix
//! sums of the counts.

use ndarray::{ArrayView1, Ix1, ShapeBuilder, Zip};

use crate::error::ProfileResult;

/// One transverse bin's histogram along the profile axis
#[derive(Debug, Clone)]
pub struct ProfileSlice<'a> {
    counts: ArrayView1<'a, f64>,
    centers: ArrayView1<'a, f64>,
    edges: Option<(ArrayView1<'a, f64>, ArrayView1<'a, f64>)>,
    cumulative: Vec<f64>,
}

/// Strided view of `length` entries starting at `base`
pub(crate) fn strided_view(
    column: &[f64],
    base: usize,
    length: usize,
    stride: usize,
) -> ProfileResult<ArrayView1<'_, f64>> {
    Ok(ArrayView1::from_shape(
        Ix1(length).strides(Ix1(stride)),
        &column[base..],
    )?)
}

impl<'a> ProfileSlice<'a> {
    /// Build a slice from count, center and optional edge views
    ///
    /// All views must have the same length, which must be at least one.
    pub fn new(
        counts: ArrayView1<'a, f64>,
        centers: ArrayView1<'a, f64>,
        edges: Option<(ArrayView1<'a, f64>, ArrayView1<'a, f64>)>,
    ) -> Self {
        debug_assert_eq!(counts.len(), centers.len());
        let cumulative = counts
            .iter()
            .scan(0.0, |total, &count| {
                *total += count;
                Some(*total)
            })
            .collect();
        Self {
            counts,
            centers,
            edges,
            cumulative,
        }
    }

    /// Number of bins along the profile axis
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn counts(&self) -> ArrayView1<'a, f64> {
        self.counts
    }

    /// Prefix sums of the counts
    pub fn cumulative(&self) -> &[f64] {
        &self.cumulative
    }

    /// Total count (last cumulative value)
    pub fn entries(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    /// Count-weighted mean and population standard deviation of the centers
    ///
    /// Returns `None` when the slice has no entries.
    pub fn mean_std(&self) -> Option<(f64, f64)> {
        let entries = self.entries();
        if entries <= 0.0 {
            return None;
        }

        let mean = self.counts.dot(&self.centers) / entries;
        let variance = Zip::from(&self.counts)
            .and(&self.centers)
            .fold(0.0, |acc, &count, &center| {
                acc + (center - mean) * (center - mean) * count
            })
            / entries;
        Some((mean, variance.sqrt()))
    }

    /// Interpolated quantiles for ascending fractions
    ///
    /// Each fraction `q` targets `q * entries` counts. The target is found in
    /// the first bin whose cumulative count exceeds it and linearly
    /// interpolated between that bin's edges. Negative fractions, targets
    /// that are never exceeded (`q >= 1`) and empty slices yield NaN.
    pub fn quantiles(&self, fractions: &[f64]) -> Vec<f64> {
        let mut values = vec![f64::NAN; fractions.len()];
        let entries = self.entries();
        let Some((left, right)) = &self.edges else {
            return values;
        };
        if entries <= 0.0 {
            return values;
        }

        let mut bin = 0;
        let mut low = 0.0;
        for (value, &q) in values.iter_mut().zip(fractions) {
            if q < 0.0 {
                continue;
            }
            let target = q * entries;
            while bin < self.cumulative.len() && self.cumulative[bin] <= target {
                low = self.cumulative[bin];
                bin += 1;
            }
            if bin == self.cumulative.len() {
                continue;
            }

            let high = self.cumulative[bin];
            let m = (target - low) / (high - low);
            *value = left[bin] * (1.0 - m) + right[bin] * m;
        }
        values
    }

    /// Cumulative count at a continuous bin position
    ///
    /// Position `i` is the left edge of bin `i`; between edges the
    /// cumulative histogram is interpolated linearly.
    pub fn cumulative_at(&self, position: f64) -> f64 {
        let length = self.cumulative.len();
        if position < 0.0 {
            0.0
        } else if position < 1.0 {
            position * self.cumulative[0]
        } else if position < length as f64 {
            let bin = position.floor() as usize;
            let m = position.fract();
            self.cumulative[bin - 1] * (1.0 - m) + self.cumulative[bin] * m
        } else {
            self.entries()
        }
    }

    /// Count inside `[low, high]` of the profile axis' value space
    ///
    /// Values are mapped to bin positions assuming uniform binning between
    /// the first bin's lower edge and the last bin's upper edge. Returns NaN
    /// when the slice has no edges.
    pub fn integral(&self, low: f64, high: f64) -> f64 {
        let Some((left, right)) = &self.edges else {
            return f64::NAN;
        };
        let first = left[0];
        let last = right[self.len() - 1];
        let scale = self.len() as f64 / (last - first);
        let origin = -first * scale;

        self.cumulative_at(high * scale + origin) - self.cumulative_at(low * scale + origin)
    }

    /// Fraction of entries inside `[low, high]`; NaN for an empty slice
    pub fn efficiency(&self, low: f64, high: f64) -> f64 {
        let entries = self.entries();
        if entries == 0.0 {
            return f64::NAN;
        }
        self.integral(low, high) / entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr1;

    fn with_slice<R>(counts: &[f64], edges: &[f64], f: impl FnOnce(&ProfileSlice<'_>) -> R) -> R {
        let counts = arr1(counts);
        let left = arr1(&edges[..edges.len() - 1]);
        let right = arr1(&edges[1..]);
        let centers = &left + &right;
        let centers = centers.mapv(|x| x / 2.0);
        let slice = ProfileSlice::new(
            counts.view(),
            centers.view(),
            Some((left.view(), right.view())),
        );
        f(&slice)
    }

    #[test]
    fn test_strided_view() {
        let column = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
        let view = strided_view(&column, 1, 3, 2).unwrap();
        assert_eq!(view.to_vec(), vec![1.0, 3.0, 5.0]);
    }

    #[test]
    fn test_cumulative_and_entries() {
        with_slice(&[1.0, 3.0, 1.0], &[0.0, 1.0, 2.0, 3.0], |slice| {
            assert_eq!(slice.cumulative(), &[1.0, 4.0, 5.0]);
            assert_eq!(slice.entries(), 5.0);
        });
    }

    #[test]
    fn test_mean_std() {
        with_slice(&[1.0, 3.0, 1.0], &[0.0, 1.0, 2.0, 3.0], |slice| {
            let (mean, std) = slice.mean_std().unwrap();
            assert!((mean - 1.5).abs() < 1e-12);
            // (1 + 0 + 1) / 5
            assert!((std - (0.4f64).sqrt()).abs() < 1e-12);
        });
    }

    #[test]
    fn test_empty_slice_has_no_moments() {
        with_slice(&[0.0, 0.0], &[0.0, 1.0, 2.0], |slice| {
            assert!(slice.mean_std().is_none());
            assert!(slice.quantiles(&[0.5]).iter().all(|q| q.is_nan()));
            assert_eq!(slice.integral(0.0, 2.0), 0.0);
            assert!(slice.efficiency(0.0, 2.0).is_nan());
        });
    }

    #[test]
    fn test_median_interpolation() {
        with_slice(&[1.0, 3.0, 1.0], &[0.0, 1.0, 2.0, 3.0], |slice| {
            assert_eq!(slice.quantiles(&[0.5]), vec![1.5]);
        });
    }

    #[test]
    fn test_quantile_edges() {
        with_slice(&[0.0, 2.0, 2.0, 0.0], &[0.0, 1.0, 2.0, 3.0, 4.0], |slice| {
            let q = slice.quantiles(&[-1.0, 0.0, 0.25, 0.5, 1.0]);
            assert!(q[0].is_nan());
            // q = 0 lands on the lower edge of the first populated bin
            assert_eq!(q[1], 1.0);
            assert_eq!(q[2], 1.5);
            assert_eq!(q[3], 2.0);
            assert!(q[4].is_nan());
        });
    }

    #[test]
    fn test_sentinel_between_quantiles() {
        with_slice(&[1.0, 1.0], &[0.0, 1.0, 2.0], |slice| {
            let q = slice.quantiles(&[0.25, -0.5, 0.75]);
            assert_eq!(q[0], 0.5);
            assert!(q[1].is_nan());
            assert_eq!(q[2], 1.5);
        });
    }

    #[test]
    fn test_cumulative_at() {
        with_slice(&[1.0, 3.0, 1.0], &[0.0, 1.0, 2.0, 3.0], |slice| {
            assert_eq!(slice.cumulative_at(-0.5), 0.0);
            assert_eq!(slice.cumulative_at(0.5), 0.5);
            assert_eq!(slice.cumulative_at(1.0), 1.0);
            assert_eq!(slice.cumulative_at(1.5), 2.5);
            assert_eq!(slice.cumulative_at(2.0), 4.0);
            assert_eq!(slice.cumulative_at(3.0), 5.0);
            assert_eq!(slice.cumulative_at(10.0), 5.0);
        });
    }

    #[test]
    fn test_integral_with_offset_axis() {
        // Bins of width 0.5 starting at 10
        with_slice(&[2.0, 2.0, 4.0, 0.0], &[10.0, 10.5, 11.0, 11.5, 12.0], |slice| {
            assert_eq!(slice.integral(10.0, 11.0), 4.0);
            assert_eq!(slice.integral(10.25, 10.75), 2.0);
            assert_eq!(slice.integral(0.0, 100.0), 8.0);
            assert_eq!(slice.efficiency(11.0, 12.0), 0.5);
        });
    }

    #[test]
    fn test_missing_edges() {
        let counts = arr1(&[1.0, 2.0]);
        let centers = arr1(&[0.5, 1.5]);
        let slice = ProfileSlice::new(counts.view(), centers.view(), None);
        assert!(slice.mean_std().is_some());
        assert!(slice.quantiles(&[0.5])[0].is_nan());
        assert!(slice.integral(0.0, 1.0).is_nan());
    }
}
