// SPDX-License-Identifier: MPL-2.0

//! Fourier transform for 2D buffers stored in row major order.

use rustfft::FftDirection;
use rustfft::{num_complex::Complex, FftPlanner};

/// Compute the 2D Fourier transform of an image buffer.
///
/// The image buffer is considered to be stored in row major order,
/// and the transformed buffer keeps that same layout:
/// coefficient `(u, v)` lives at index `v * width + u`.
///
/// The transformation is not normalized.
/// If the transformed buffer is intended to be processed
/// and then converted back into an image with an inverse Fourier transform,
/// multiply at the end by 1 / (width * height).
///
/// Remark: two allocations the size of the image buffer are performed for the transpositions,
/// as well as scratch buffers while performing the rows and columns FFTs.
///
/// # Panics
///
/// Panics if `img_buffer.len()` is not `width * height`.
pub fn fft_2d(width: usize, height: usize, img_buffer: &mut [Complex<f64>]) {
    fft_2d_with_direction(width, height, img_buffer, FftDirection::Forward)
}

/// Compute the inverse 2D Fourier transform to get back an image buffer.
///
/// Input and output are both in row major order.
/// The transformation is not normalized,
/// the caller has to multiply by 1 / (width * height) to undo [`fft_2d`].
///
/// # Panics
///
/// Panics if `img_buffer.len()` is not `width * height`.
pub fn ifft_2d(width: usize, height: usize, img_buffer: &mut [Complex<f64>]) {
    fft_2d_with_direction(width, height, img_buffer, FftDirection::Inverse)
}

fn fft_2d_with_direction(
    width: usize,
    height: usize,
    img_buffer: &mut [Complex<f64>],
    direction: FftDirection,
) {
    assert_eq!(img_buffer.len(), width * height, "Buffer size mismatch");
    if img_buffer.is_empty() {
        return;
    }

    // Compute the FFT of each row of the image.
    let mut planner = FftPlanner::new();
    let fft_width = planner.plan_fft(width, direction);
    let mut scratch = vec![Complex::default(); fft_width.get_inplace_scratch_len()];
    for row_buffer in img_buffer.chunks_exact_mut(width) {
        fft_width.process_with_scratch(row_buffer, &mut scratch);
    }

    // Transpose the image to be able to compute the FFT on the other dimension.
    let mut transposed = transpose(width, height, img_buffer);
    let fft_height = planner.plan_fft(height, direction);
    scratch.resize(fft_height.get_outofplace_scratch_len(), Complex::default());
    for (tr_buf, col_buf) in transposed
        .chunks_exact_mut(height)
        .zip(img_buffer.chunks_exact_mut(height))
    {
        fft_height.process_outofplace_with_scratch(tr_buf, col_buf, &mut scratch);
    }

    // Columns are now rows, put them back in place.
    let restored = transpose(height, width, img_buffer);
    img_buffer.copy_from_slice(&restored);
}

fn transpose<T: Copy + Default>(width: usize, height: usize, matrix: &[T]) -> Vec<T> {
    let mut ind = 0;
    let mut ind_tr;
    let mut transposed = vec![T::default(); matrix.len()];
    for row in 0..height {
        ind_tr = row;
        for _ in 0..width {
            transposed[ind_tr] = matrix[ind];
            ind += 1;
            ind_tr += height;
        }
    }
    transposed
}

/// Shift the 4 quadrants of a Fourier transform to have all the low frequencies
/// at the center of the image.
///
/// The zero frequency ends up at row `height / 2` and column `width / 2`.
/// For odd lengths this center is biased towards the start of the axis.
///
/// # Panics
///
/// Panics if `matrix.len()` is not `width * height`.
pub fn fftshift<T: Copy + Default>(width: usize, height: usize, matrix: &[T]) -> Vec<T> {
    roll(width, height, matrix, width / 2, height / 2)
}

/// Inverse operation of the quadrants shift performed by [`fftshift`].
///
/// It is different than [`fftshift`] if one dimension has an odd length.
///
/// # Panics
///
/// Panics if `matrix.len()` is not `width * height`.
pub fn ifftshift<T: Copy + Default>(width: usize, height: usize, matrix: &[T]) -> Vec<T> {
    roll(width, height, matrix, width - width / 2, height - height / 2)
}

/// Circularly move every element `shift_x` columns right and `shift_y` rows down.
fn roll<T: Copy + Default>(
    width: usize,
    height: usize,
    matrix: &[T],
    shift_x: usize,
    shift_y: usize,
) -> Vec<T> {
    assert_eq!(matrix.len(), width * height, "Buffer size mismatch");
    let mut shifted = vec![T::default(); matrix.len()];
    if matrix.is_empty() {
        return shifted;
    }
    let shift_x = shift_x % width;
    for (row, m_row) in matrix.chunks_exact(width).enumerate() {
        let srow_start = ((row + shift_y) % height) * width;
        let s_row = &mut shifted[srow_start..srow_start + width];
        // swap left and right
        s_row[shift_x..width].copy_from_slice(&m_row[0..width - shift_x]);
        s_row[0..shift_x].copy_from_slice(&m_row[width - shift_x..width]);
    }
    shifted
}
