//! Profile reduction of an N-dimensional histogram
//!
//! [`ProfileReducer::reduce`] walks every transverse bin, takes the strided
//! slice of the histogram along the profile axis and turns it into one
//! table row.

use implore_histogram::{
    bin_bottom_column, bin_center_column, bin_top_column, HistogramSource,
};

use crate::config::ProfileConfig;
use crate::error::ProfileResult;
use crate::slice::{strided_view, ProfileSlice};
use crate::table::{
    quantile_column, sum_column, sum_normed_column, Column, ProfileTable, ENTRIES, IS_OK, MEAN,
    STD,
};
use crate::traversal::transverse_bases;

/// Computes profile tables for a fixed configuration
#[derive(Clone, Debug)]
pub struct ProfileReducer {
    config: ProfileConfig,
}

/// Flat columns of the profile axis
struct AxisColumns<'a> {
    counts: &'a [f64],
    centers: &'a [f64],
    edges: Option<(&'a [f64], &'a [f64])>,
    length: usize,
    stride: usize,
}

impl<'a> AxisColumns<'a> {
    fn slice(&self, base: usize) -> ProfileResult<ProfileSlice<'a>> {
        let view = |column: &'a [f64]| strided_view(column, base, self.length, self.stride);
        let edges = match self.edges {
            Some((left, right)) => Some((view(left)?, view(right)?)),
            None => None,
        };
        Ok(ProfileSlice::new(view(self.counts)?, view(self.centers)?, edges))
    }
}

/// Output columns of one transverse axis
struct PassThrough<'a> {
    names: [String; 3],
    sources: [Option<&'a [f64]>; 3],
    values: [Vec<f64>; 3],
}

impl ProfileReducer {
    /// Create a reducer, rejecting invalid quantiles and ranges
    pub fn new(config: ProfileConfig) -> ProfileResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ProfileConfig {
        &self.config
    }

    /// Compute the profile table of a histogram
    ///
    /// Fails before traversal if the profile axis does not exist or the
    /// histogram's columns disagree with its shape. A histogram without
    /// counts or profile-axis centers yields rows with `isOK = false` and
    /// NaN everywhere else.
    pub fn reduce<H: HistogramSource + ?Sized>(&self, histogram: &H) -> ProfileResult<ProfileTable> {
        let axis = self.config.axis_idx;
        self.config.validate_for_dim(histogram.dim())?;
        histogram.check_consistency()?;

        let shape = histogram.shape();
        let strides = histogram.strides();
        let bases = transverse_bases(shape, &strides, axis);
        let rows = bases.len();

        let mut pass_through: Vec<PassThrough<'_>> = (0..histogram.dim())
            .filter(|&other| other != axis)
            .map(|other| {
                let names = [
                    bin_bottom_column(other),
                    bin_center_column(other),
                    bin_top_column(other),
                ];
                let sources = [
                    histogram.column(&names[0]),
                    histogram.column(&names[1]),
                    histogram.column(&names[2]),
                ];
                PassThrough {
                    names,
                    sources,
                    values: [
                        Vec::with_capacity(rows),
                        Vec::with_capacity(rows),
                        Vec::with_capacity(rows),
                    ],
                }
            })
            .collect();

        let axis_columns = match (histogram.bin_count(), histogram.bin_center(axis)) {
            (Some(counts), Some(centers)) => Some(AxisColumns {
                counts,
                centers,
                edges: histogram.bin_bottom(axis).zip(histogram.bin_top(axis)),
                length: shape[axis],
                stride: strides[axis],
            }),
            _ => {
                tracing::warn!(
                    axis,
                    rows,
                    "Histogram has no counts or bin centers, profile rows are invalid"
                );
                None
            }
        };

        let quantiles = &self.config.quantiles;
        let ranges = &self.config.sum_range;

        let mut mean = Vec::with_capacity(rows);
        let mut std_dev = Vec::with_capacity(rows);
        let mut entries = Vec::with_capacity(rows);
        let mut is_ok = Vec::with_capacity(rows);
        let mut quantile_values = vec![Vec::with_capacity(rows); quantiles.len()];
        let mut sums = vec![Vec::with_capacity(rows); ranges.len()];
        let mut sums_normed = vec![Vec::with_capacity(rows); ranges.len()];

        for &base in &bases {
            for column in &mut pass_through {
                for (values, source) in column.values.iter_mut().zip(&column.sources) {
                    values.push(source.map_or(f64::NAN, |source| source[base]));
                }
            }

            let Some(axis_columns) = &axis_columns else {
                mean.push(f64::NAN);
                std_dev.push(f64::NAN);
                entries.push(f64::NAN);
                is_ok.push(false);
                quantile_values.iter_mut().for_each(|column| column.push(f64::NAN));
                sums.iter_mut().for_each(|column| column.push(f64::NAN));
                sums_normed.iter_mut().for_each(|column| column.push(f64::NAN));
                continue;
            };

            let slice = axis_columns.slice(base)?;
            entries.push(slice.entries());
            match slice.mean_std() {
                Some((m, s)) => {
                    mean.push(m);
                    std_dev.push(s);
                    is_ok.push(true);
                }
                None => {
                    mean.push(f64::NAN);
                    std_dev.push(f64::NAN);
                    is_ok.push(false);
                }
            }

            for (column, value) in quantile_values.iter_mut().zip(slice.quantiles(quantiles)) {
                column.push(value);
            }
            for (k, &[low, high]) in ranges.iter().enumerate() {
                sums[k].push(slice.integral(low, high));
                sums_normed[k].push(slice.efficiency(low, high));
            }
        }

        let mut columns = Vec::new();
        for column in pass_through {
            for (name, values) in column.names.into_iter().zip(column.values) {
                columns.push((name, Column::Float(values)));
            }
        }
        columns.push((MEAN.to_string(), Column::Float(mean)));
        columns.push((STD.to_string(), Column::Float(std_dev)));
        columns.push((ENTRIES.to_string(), Column::Float(entries)));
        columns.push((IS_OK.to_string(), Column::Bool(is_ok)));
        for (k, values) in quantile_values.into_iter().enumerate() {
            columns.push((quantile_column(k), Column::Float(values)));
        }
        for (k, (values, normed)) in sums.into_iter().zip(sums_normed).enumerate() {
            columns.push((sum_column(k), Column::Float(values)));
            columns.push((sum_normed_column(k), Column::Float(normed)));
        }

        tracing::debug!(axis, rows, columns = columns.len(), "Profile computed");
        Ok(ProfileTable::from_columns(rows, columns))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProfileError;
    use implore_histogram::{HistogramError, HistogramNd, UniformAxis, BIN_COUNT};

    fn example_1d() -> HistogramNd {
        HistogramNd::uniform(&[UniformAxis::new(0.0, 3.0, 3)], vec![1.0, 3.0, 1.0]).unwrap()
    }

    #[test]
    fn test_one_dimensional_example() {
        let reducer = ProfileReducer::new(
            ProfileConfig::new(0)
                .with_quantiles(vec![0.5])
                .with_sum_range(0.0, 2.0),
        )
        .unwrap();
        let table = reducer.reduce(&example_1d()).unwrap();

        assert_eq!(table.num_rows(), 1);
        assert_eq!(
            table.column_names().collect::<Vec<_>>(),
            vec!["mean", "std", "entries", "isOK", "quantile_0", "sum_0", "sum_normed_0"]
        );
        assert_eq!(table.float_column(ENTRIES).unwrap(), &[5.0]);
        assert_eq!(table.bool_column(IS_OK).unwrap(), &[true]);
        assert!((table.float_column(MEAN).unwrap()[0] - 1.5).abs() < 1e-12);
        assert_eq!(table.float_column("quantile_0").unwrap(), &[1.5]);
        assert_eq!(table.float_column("sum_0").unwrap(), &[4.0]);
        assert!((table.float_column("sum_normed_0").unwrap()[0] - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_two_dimensional_profile() {
        // Axis 0: two rows, axis 1: three bins [0, 3)
        let histogram = HistogramNd::uniform(
            &[UniformAxis::new(-1.0, 1.0, 2), UniformAxis::new(0.0, 3.0, 3)],
            vec![
                1.0, 0.0, 1.0, //
                0.0, 0.0, 0.0,
            ],
        )
        .unwrap();

        let table = ProfileReducer::new(ProfileConfig::new(1).with_quantiles(vec![0.5]))
            .unwrap()
            .reduce(&histogram)
            .unwrap();

        assert_eq!(table.num_rows(), 2);
        assert_eq!(table.float_column("bin_bottom_0").unwrap(), &[-1.0, 0.0]);
        assert_eq!(table.float_column("bin_center_0").unwrap(), &[-0.5, 0.5]);
        assert_eq!(table.float_column("bin_top_0").unwrap(), &[0.0, 1.0]);
        assert!(table.column("bin_center_1").is_none());

        let mean = table.float_column(MEAN).unwrap();
        let std = table.float_column(STD).unwrap();
        assert_eq!(mean[0], 1.5);
        assert_eq!(std[0], 1.0);
        assert!(mean[1].is_nan());
        assert!(std[1].is_nan());
        assert_eq!(table.float_column(ENTRIES).unwrap(), &[2.0, 0.0]);
        assert_eq!(table.bool_column(IS_OK).unwrap(), &[true, false]);

        let median = table.float_column("quantile_0").unwrap();
        assert_eq!(median[0], 2.0);
        assert!(median[1].is_nan());
    }

    #[test]
    fn test_profile_along_first_axis() {
        let histogram = HistogramNd::uniform(
            &[UniformAxis::new(0.0, 2.0, 2), UniformAxis::new(0.0, 3.0, 3)],
            vec![
                1.0, 2.0, 3.0, //
                1.0, 0.0, 5.0,
            ],
        )
        .unwrap();

        let table = ProfileReducer::new(ProfileConfig::new(0))
            .unwrap()
            .reduce(&histogram)
            .unwrap();

        assert_eq!(table.num_rows(), 3);
        assert_eq!(table.float_column("bin_center_1").unwrap(), &[0.5, 1.5, 2.5]);
        assert_eq!(table.float_column(ENTRIES).unwrap(), &[2.0, 2.0, 8.0]);
        assert_eq!(table.float_column(MEAN).unwrap(), &[1.0, 0.5, 1.125]);
    }

    #[test]
    fn test_missing_counts_degrade() {
        let mut histogram = example_1d();
        histogram.remove_column(BIN_COUNT);

        let table = ProfileReducer::new(
            ProfileConfig::new(0)
                .with_quantiles(vec![0.5])
                .with_sum_range(0.0, 1.0),
        )
        .unwrap()
        .reduce(&histogram)
        .unwrap();

        assert_eq!(table.num_rows(), 1);
        assert_eq!(table.bool_column(IS_OK).unwrap(), &[false]);
        for name in [MEAN, STD, ENTRIES, "quantile_0", "sum_0", "sum_normed_0"] {
            assert!(table.float_column(name).unwrap()[0].is_nan(), "{name}");
        }
    }

    #[test]
    fn test_zero_entries_ranges() {
        let histogram =
            HistogramNd::uniform(&[UniformAxis::new(0.0, 2.0, 2)], vec![0.0, 0.0]).unwrap();
        let table = ProfileReducer::new(ProfileConfig::new(0).with_sum_range(0.0, 1.0))
            .unwrap()
            .reduce(&histogram)
            .unwrap();

        assert_eq!(table.float_column(ENTRIES).unwrap(), &[0.0]);
        assert_eq!(table.float_column("sum_0").unwrap(), &[0.0]);
        assert!(table.float_column("sum_normed_0").unwrap()[0].is_nan());
    }

    #[test]
    fn test_axis_out_of_range() {
        let reducer = ProfileReducer::new(ProfileConfig::new(1)).unwrap();
        assert!(matches!(
            reducer.reduce(&example_1d()),
            Err(ProfileError::AxisOutOfRange { axis: 1, dim: 1 })
        ));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = ProfileReducer::new(ProfileConfig::new(0).with_sum_range(1.0, 0.0));
        assert!(matches!(result, Err(ProfileError::InvalidRange { .. })));
    }

    struct RaggedHistogram {
        shape: Vec<usize>,
        counts: Vec<f64>,
        centers: Vec<f64>,
    }

    impl HistogramSource for RaggedHistogram {
        fn shape(&self) -> &[usize] {
            &self.shape
        }

        fn stride(&self, _axis: usize) -> usize {
            1
        }

        fn column(&self, name: &str) -> Option<&[f64]> {
            match name {
                BIN_COUNT => Some(self.counts.as_slice()),
                "bin_center_0" => Some(self.centers.as_slice()),
                _ => None,
            }
        }
    }

    #[test]
    fn test_inconsistent_shape_fails_fast() {
        let histogram = RaggedHistogram {
            shape: vec![3],
            counts: vec![1.0, 2.0, 3.0],
            centers: vec![0.5, 1.5],
        };
        let reducer = ProfileReducer::new(ProfileConfig::new(0)).unwrap();
        assert!(matches!(
            reducer.reduce(&histogram),
            Err(ProfileError::Histogram(HistogramError::ColumnLength { .. }))
        ));
    }

    #[test]
    fn test_reduce_through_trait_object() {
        let histogram = example_1d();
        let source: &dyn HistogramSource = &histogram;
        let table = ProfileReducer::new(ProfileConfig::new(0))
            .unwrap()
            .reduce(source)
            .unwrap();
        assert_eq!(table.float_column(ENTRIES).unwrap(), &[5.0]);
    }
}
