// SPDX-License-Identifier: MPL-2.0

//! Frequency domain filtering of grayscale images.
//!
//! An image is transformed with a 2D Fourier transform, its centered spectrum
//! is multiplied by a binary mask and the inverse transform gives back the
//! filtered image:
//!
//! ```no_run
//! use fft2d_filter::{FilterSession, MaskKind, Selection};
//!
//! # fn main() -> Result<(), fft2d_filter::FilterError> {
//! let mut session = FilterSession::default();
//! session.on_image_loaded("photo.png")?;
//! session.on_size_changed(0.1)?;
//! session.on_shape_selected(Selection::Parametric(MaskKind::CircleOutside))?;
//! session.on_save_requested("low_pass.png")?;
//! # Ok(())
//! # }
//! ```
//!
//! The building blocks are usable without a session:
//! [`transform()`], [`build_parametric_mask`], [`paint_point`], [`reconstruct()`]
//! and [`normalize()`].

#![warn(missing_docs)]

// default implementation on mutable slices
pub mod slice;

pub mod config;
pub mod error;
pub mod io;
pub mod mask;
pub mod normalize;
pub mod reconstruct;
pub mod session;
pub mod transform;

pub use config::FilterConfig;
pub use error::{FilterError, Result};
pub use mask::{
    build_parametric_mask, init_custom_mask, paint_point, DisplayPoint, DisplaySize, Mask,
    MaskKind,
};
pub use normalize::normalize;
pub use reconstruct::reconstruct;
pub use session::{FilterSession, MaskMode, Selection, View};
pub use transform::{transform, Spectrum};
