//! Transverse-bin enumeration
//!
//! Every transverse bin is identified by the flat index of its first bin
//! along the profile axis. Axes whose stride is smaller than the profile
//! stride form the outer loop, the larger-stride axes the inner loop; both
//! parts enumerate their offsets in ascending order. For a row-major
//! histogram this is `for x in 0..stride { for z in (0..len).step_by(stride * length) }`.

/// Flat offsets of all bin combinations of `axes`, in ascending order
fn offsets(shape: &[usize], strides: &[usize], mut axes: Vec<usize>) -> Vec<usize> {
    axes.sort_by_key(|&axis| std::cmp::Reverse(strides[axis]));

    let mut offsets = vec![0];
    for axis in axes {
        offsets = offsets
            .iter()
            .flat_map(|&base| (0..shape[axis]).map(move |bin| base + bin * strides[axis]))
            .collect();
    }
    offsets
}

/// Base flat index of every transverse bin, in output row order
pub(crate) fn transverse_bases(shape: &[usize], strides: &[usize], axis: usize) -> Vec<usize> {
    let stride = strides[axis];
    let (fast, slow): (Vec<usize>, Vec<usize>) = (0..shape.len())
        .filter(|&other| other != axis)
        .partition(|&other| strides[other] < stride);

    let outer = offsets(shape, strides, fast);
    let inner = offsets(shape, strides, slow);
    outer
        .iter()
        .flat_map(|&x| inner.iter().map(move |&z| x + z))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use implore_histogram::row_major_strides;

    /// Reference loop over a row-major layout
    fn row_major_loop(shape: &[usize], axis: usize) -> Vec<usize> {
        let strides = row_major_strides(shape);
        let len: usize = shape.iter().product();
        let stride = strides[axis];
        let group = stride * shape[axis];

        let mut bases = Vec::new();
        for x in 0..stride {
            for z in (0..len).step_by(group) {
                bases.push(x + z);
            }
        }
        bases
    }

    #[test]
    fn test_one_dimensional() {
        assert_eq!(transverse_bases(&[5], &[1], 0), vec![0]);
    }

    #[test]
    fn test_two_dimensional() {
        // shape (2, 3), row-major strides (3, 1)
        assert_eq!(transverse_bases(&[2, 3], &[3, 1], 0), vec![0, 1, 2]);
        assert_eq!(transverse_bases(&[2, 3], &[3, 1], 1), vec![0, 3]);
    }

    #[test]
    fn test_matches_row_major_loop() {
        let shape = [2, 3, 4];
        let strides = row_major_strides(&shape);
        for axis in 0..shape.len() {
            assert_eq!(
                transverse_bases(&shape, &strides, axis),
                row_major_loop(&shape, axis),
                "axis {axis}"
            );
        }
    }

    #[test]
    fn test_middle_axis_order() {
        // Fast axis 2 varies slowest in the output, slow axis 0 fastest
        let bases = transverse_bases(&[2, 3, 4], &[12, 4, 1], 1);
        assert_eq!(&bases[..4], &[0, 12, 1, 13]);
        assert_eq!(bases.len(), 8);
    }

    #[test]
    fn test_column_major_layout() {
        // shape (2, 3) with axis 0 fastest
        assert_eq!(transverse_bases(&[2, 3], &[1, 2], 1), vec![0, 1]);
        assert_eq!(transverse_bases(&[2, 3], &[1, 2], 0), vec![0, 2, 4]);
    }
}
