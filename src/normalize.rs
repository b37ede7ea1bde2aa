// SPDX-License-Identifier: MPL-2.0

//! Contrast stretch of real valued data into 8 bit gray levels.

use ndarray::Array2;

/// Smallest and largest finite values, `None` if there are none.
pub fn finite_range(data: &Array2<f64>) -> Option<(f64, f64)> {
    data.iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |range, v| match range {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Linearly map the finite range of `data` onto `[0, 255]`.
///
/// The smallest finite value becomes 0 and the largest 255.
/// Non finite values do not take part in the range:
/// `+inf` maps to 255, `-inf` and NaN map to 0.
/// Data without at least two distinct finite values maps to all zeros.
pub fn normalize(data: &Array2<f64>) -> Array2<u8> {
    let Some((min, max)) = finite_range(data).filter(|(lo, hi)| hi > lo) else {
        return Array2::zeros(data.dim());
    };
    let scale = 255.0 / (max - min);
    data.mapv(|v| {
        if v.is_finite() {
            ((v - min) * scale).round().clamp(0.0, 255.0) as u8
        } else if v == f64::INFINITY {
            255
        } else {
            0
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn stretches_to_full_range() {
        let out = normalize(&array![[0.0, 1.0], [2.0, 3.0]]);
        assert_eq!(out, array![[0, 85], [170, 255]]);

        let out = normalize(&array![[-4.5, 100.25, 7.0]]);
        assert_eq!(out.iter().min(), Some(&0));
        assert_eq!(out.iter().max(), Some(&255));
    }

    #[test]
    fn negative_infinity_does_not_collapse_the_range() {
        let out = normalize(&array![[f64::NEG_INFINITY, 0.0], [5.0, 10.0]]);
        assert_eq!(out, array![[0, 0], [128, 255]]);
    }

    #[test]
    fn other_non_finite_values_are_contained() {
        let out = normalize(&array![[f64::NAN, 1.0, f64::INFINITY, 3.0]]);
        assert_eq!(out, array![[0, 0, 255, 255]]);
    }

    #[test]
    fn flat_data_is_black() {
        assert_eq!(normalize(&Array2::from_elem((2, 3), 4.0)), Array2::<u8>::zeros((2, 3)));
        assert_eq!(
            normalize(&Array2::from_elem((1, 2), f64::NEG_INFINITY)),
            Array2::<u8>::zeros((1, 2))
        );
        assert_eq!(finite_range(&Array2::from_elem((1, 2), f64::NAN)), None);
    }
}
