// SPDX-License-Identifier: MPL-2.0

//! Masked inverse transform back to the spatial domain.

use ndarray::{Array2, Zip};
use rustfft::num_complex::Complex;

use crate::error::{FilterError, Result};
use crate::mask::{Mask, PASS};
use crate::slice::{ifft_2d, ifftshift};
use crate::transform::Spectrum;

fn check_shape(expected: (usize, usize), mask: &Mask) -> Result<()> {
    if mask.shape() == expected {
        Ok(())
    } else {
        Err(FilterError::ShapeMismatch {
            expected,
            found: mask.shape(),
        })
    }
}

/// Copy of the centered spectrum with blocked coefficients set to zero.
pub fn apply_mask(spectrum: &Spectrum, mask: &Mask) -> Result<Array2<Complex<f64>>> {
    check_shape(spectrum.shape(), mask)?;
    Ok(Zip::from(spectrum.coefs())
        .and(mask.cells())
        .map_collect(|&z, &m| z * f64::from(m)))
}

/// Filter the image behind `spectrum` by `mask`.
///
/// The masked spectrum is moved back to the uncentered layout,
/// inverse transformed and normalized by 1 / (width * height).
/// Only the real part is kept, the imaginary part being numerical noise.
pub fn reconstruct(spectrum: &Spectrum, mask: &Mask) -> Result<Array2<f64>> {
    let masked = apply_mask(spectrum, mask)?;
    let (height, width) = masked.dim();

    let buffer: Vec<Complex<f64>> = masked.iter().copied().collect();
    let mut img_buffer = ifftshift(width, height, &buffer);
    ifft_2d(width, height, &mut img_buffer);

    let fft_coef = 1.0 / (width * height) as f64;
    let real: Vec<f64> = img_buffer.iter().map(|c| c.re * fft_coef).collect();
    Ok(Array2::from_shape_vec((height, width), real)?)
}

/// Magnitude view of the masked spectrum: blocked coefficients are shown as 0.
pub fn mask_magnitude(magnitude: &Array2<f64>, mask: &Mask) -> Result<Array2<f64>> {
    check_shape(magnitude.dim(), mask)?;
    Ok(Zip::from(magnitude)
        .and(mask.cells())
        .map_collect(|&v, &m| if m == PASS { v } else { 0.0 }))
}
