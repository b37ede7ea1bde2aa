// SPDX-License-Identifier: MPL-2.0

//! Forward transform of a grayscale image into a centered spectrum.

use ndarray::Array2;
use rustfft::num_complex::Complex;

use crate::error::{FilterError, Result};
use crate::slice::{fft_2d, fftshift};

/// Shifted 2D Fourier transform of a grayscale image.
///
/// The zero frequency sits at `(rows / 2, cols / 2)`.
/// A spectrum is never modified once computed,
/// masks are applied to copies (see [`crate::reconstruct`]).
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    coefs: Array2<Complex<f64>>,
}

impl Spectrum {
    /// Shape `(rows, cols)`, identical to the source image.
    pub fn shape(&self) -> (usize, usize) {
        self.coefs.dim()
    }

    /// Centered complex coefficients.
    pub fn coefs(&self) -> &Array2<Complex<f64>> {
        &self.coefs
    }

    /// The zero frequency coefficient, i.e. the sum of all pixels.
    pub fn dc(&self) -> Complex<f64> {
        let (rows, cols) = self.shape();
        self.coefs[[rows / 2, cols / 2]]
    }
}

/// Compute the centered spectrum of `image` and its log magnitude `20 * ln(|z|)`.
///
/// Bins with zero amplitude have a magnitude of `-inf`,
/// it is up to [`crate::normalize`] to keep them out of the display range.
pub fn transform(image: &Array2<f64>) -> Result<(Spectrum, Array2<f64>)> {
    let (height, width) = image.dim();
    if height == 0 || width == 0 {
        return Err(FilterError::EmptyImage);
    }

    // Convert the image buffer to complex numbers to be able to compute the FFT.
    let mut buffer: Vec<Complex<f64>> = image
        .iter()
        .map(|&pix| Complex::new(pix, 0.0))
        .collect();
    fft_2d(width, height, &mut buffer);
    let shifted = fftshift(width, height, &buffer);

    let coefs = Array2::from_shape_vec((height, width), shifted)?;
    let magnitude = log_magnitude(&coefs);
    log::debug!(
        "transformed {width}x{height} image, dc = {}",
        coefs[[height / 2, width / 2]]
    );
    Ok((Spectrum { coefs }, magnitude))
}

/// Log-scaled amplitude of every coefficient.
pub fn log_magnitude(coefs: &Array2<Complex<f64>>) -> Array2<f64> {
    coefs.mapv(|z| 20.0 * z.norm().ln())
}
