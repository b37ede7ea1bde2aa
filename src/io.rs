// SPDX-License-Identifier: MPL-2.0

//! Conversions between image files and the pipeline arrays.

use std::path::Path;

use image::imageops::{self, FilterType};
use image::{GrayImage, Luma};
use ndarray::Array2;

use crate::error::Result;

/// Open an image file of any supported format and convert it to gray levels.
pub fn load_grayscale<P: AsRef<Path>>(path: P) -> Result<Array2<f64>> {
    let img = image::open(path)?.into_luma8();
    from_gray_image(&img)
}

/// Intensity samples of a gray image, indexed by `(row, col)`.
pub fn from_gray_image(img: &GrayImage) -> Result<Array2<f64>> {
    let (width, height) = img.dimensions();
    let samples = img.as_raw().iter().map(|&pix| f64::from(pix)).collect();
    Ok(Array2::from_shape_vec((height as usize, width as usize), samples)?)
}

/// Gray image holding the given 8 bit levels.
pub fn to_gray_image(pixels: &Array2<u8>) -> GrayImage {
    let (height, width) = pixels.dim();
    GrayImage::from_fn(width as u32, height as u32, |x, y| {
        Luma([pixels[[y as usize, x as usize]]])
    })
}

/// Write 8 bit levels to `path`, the format being deduced from the extension.
pub fn save_gray<P: AsRef<Path>>(path: P, pixels: &Array2<u8>) -> Result<()> {
    to_gray_image(pixels).save(path.as_ref())?;
    log::info!("saved {}", path.as_ref().display());
    Ok(())
}

/// Resize `img` to fit in `max_width` x `max_height` while keeping its aspect ratio.
pub fn fit_to_display(img: &GrayImage, max_width: u32, max_height: u32) -> GrayImage {
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return img.clone();
    }
    let scale = f64::min(
        f64::from(max_width) / f64::from(width),
        f64::from(max_height) / f64::from(height),
    );
    let new_width = ((f64::from(width) * scale).round() as u32).max(1);
    let new_height = ((f64::from(height) * scale).round() as u32).max(1);
    imageops::resize(img, new_width, new_height, FilterType::Triangle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn gray_image_conversions_keep_row_major_layout() {
        let pixels = array![[0u8, 10, 20], [30, 40, 50]];
        let img = to_gray_image(&pixels);
        assert_eq!(img.dimensions(), (3, 2));
        assert_eq!(img.get_pixel(2, 1)[0], 50);
        let back = from_gray_image(&img).unwrap();
        assert_eq!(back[[1, 0]], 30.0);
        assert_eq!(back.dim(), (2, 3));
    }

    #[test]
    fn fitting_keeps_aspect_ratio() {
        let img = GrayImage::new(100, 50);
        assert_eq!(fit_to_display(&img, 375, 225).dimensions(), (375, 188));
        let img = GrayImage::new(40, 80);
        assert_eq!(fit_to_display(&img, 375, 225).dimensions(), (113, 225));
    }

    #[test]
    fn save_then_load_png() {
        let path = std::env::temp_dir().join("fft2d-filter-io-roundtrip.png");
        let pixels = array![[0u8, 255], [128, 64]];
        save_gray(&path, &pixels).unwrap();
        let loaded = load_grayscale(&path).unwrap();
        assert_eq!(loaded, array![[0.0, 255.0], [128.0, 64.0]]);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn unreadable_file_is_an_error() {
        let path = std::env::temp_dir().join("fft2d-filter-does-not-exist.png");
        assert!(load_grayscale(path).is_err());
    }
}
