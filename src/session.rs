// SPDX-License-Identifier: MPL-2.0

//! Interactive filtering session.
//!
//! A [`FilterSession`] owns the loaded image with everything derived from it,
//! and the mask selection state:
//!
//! ```text
//!            select shape             select custom (mask reset)
//!   None <----------------> Shape <------------------------> Custom
//!     ^                                                      |  ^
//!     +------------------------ select none -----------------+  | clear / paint
//!                                                               +--
//! ```
//!
//! Every event recomputes the mask, the inverse transform and the views
//! before returning. Failed events leave the session untouched.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use image::GrayImage;
use ndarray::Array2;

use crate::config::FilterConfig;
use crate::error::{FilterError, Result};
use crate::io;
use crate::mask::{self, DisplayPoint, Mask, MaskKind};
use crate::normalize::normalize;
use crate::reconstruct::{mask_magnitude, reconstruct};
use crate::transform::{transform, Spectrum};

/// What the user picked in the mask list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// A predefined shape, or no mask at all with [`MaskKind::None`].
    Parametric(MaskKind),
    /// A mask painted by hand.
    Custom,
}

impl FromStr for Selection {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self> {
        if s.trim().eq_ignore_ascii_case("custom") {
            Ok(Selection::Custom)
        } else {
            s.parse().map(Selection::Parametric)
        }
    }
}

/// Which mask lifecycle is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MaskMode {
    /// The spectrum is used as is.
    #[default]
    None,
    /// A shape rebuilt from scratch on every change.
    Parametric(MaskKind),
    /// A painted mask kept between events.
    Custom,
}

impl From<Selection> for MaskMode {
    fn from(selection: Selection) -> Self {
        match selection {
            Selection::Parametric(MaskKind::None) => MaskMode::None,
            Selection::Parametric(kind) => MaskMode::Parametric(kind),
            Selection::Custom => MaskMode::Custom,
        }
    }
}

impl fmt::Display for MaskMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaskMode::None => f.write_str("none"),
            MaskMode::Parametric(kind) => write!(f, "{kind}"),
            MaskMode::Custom => f.write_str("custom"),
        }
    }
}

/// Images that can be rendered on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// The loaded grayscale image.
    Original,
    /// Log magnitude of the masked spectrum.
    Spectrum,
    /// The reconstructed image.
    Filtered,
}

/// Everything derived from one loaded image.
#[derive(Debug, Clone)]
struct Loaded {
    image: Array2<f64>,
    spectrum: Spectrum,
    magnitude: Array2<f64>,
}

/// Result of the last reconstruction.
#[derive(Debug, Clone)]
struct Output {
    filtered: Array2<f64>,
    masked_magnitude: Array2<f64>,
}

/// The filtering pipeline driven by user events.
#[derive(Debug, Clone)]
pub struct FilterSession {
    config: FilterConfig,
    loaded: Option<Loaded>,
    output: Option<Output>,
    mode: MaskMode,
    size_fraction: f64,
    brush_radius: u32,
    custom_mask: Option<Mask>,
}

impl Default for FilterSession {
    fn default() -> Self {
        FilterSession::new(FilterConfig::default())
    }
}

impl FilterSession {
    /// Empty session, nothing loaded.
    pub fn new(config: FilterConfig) -> Self {
        FilterSession {
            size_fraction: config.default_size_fraction,
            brush_radius: config.default_brush_radius,
            config,
            loaded: None,
            output: None,
            mode: MaskMode::None,
            custom_mask: None,
        }
    }

    /// Decode the image at `path` and make it the filtered image.
    ///
    /// On failure the previously loaded image and its results are kept.
    pub fn on_image_loaded<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        let image = io::load_grayscale(path).map_err(|err| {
            log::warn!("could not load {}: {err}", path.display());
            err
        })?;
        log::info!("loaded {}", path.display());
        self.load_image(image)
    }

    /// Replace the loaded image and every derived array.
    ///
    /// The mode goes back to [`MaskMode::None`] and any custom mask is dropped.
    pub fn load_image(&mut self, image: Array2<f64>) -> Result<()> {
        let (spectrum, magnitude) = transform(&image)?;
        let filtered = reconstruct(&spectrum, &Mask::all_pass(spectrum.shape()))?;
        let output = Output {
            filtered,
            masked_magnitude: magnitude.clone(),
        };
        let (rows, cols) = image.dim();
        log::info!("new image of {cols}x{rows} pixels");

        self.loaded = Some(Loaded {
            image,
            spectrum,
            magnitude,
        });
        self.output = Some(output);
        self.mode = MaskMode::None;
        self.custom_mask = None;
        Ok(())
    }

    /// Switch to another mask and filter again.
    ///
    /// The custom mask is reset only when entering the custom mode,
    /// selecting it again keeps the painted mask.
    pub fn on_shape_selected(&mut self, selection: Selection) -> Result<()> {
        let shape = self.loaded()?.spectrum.shape();
        let previous = (self.mode, self.custom_mask.take(), self.brush_radius);
        let next = MaskMode::from(selection);

        if next == MaskMode::Custom {
            self.custom_mask = match previous.1.clone() {
                Some(painted) if self.mode == MaskMode::Custom => Some(painted),
                _ => {
                    self.brush_radius = self.config.default_brush_radius;
                    Some(mask::init_custom_mask(shape))
                }
            };
        }
        self.mode = next;

        if let Err(err) = self.refresh() {
            (self.mode, self.custom_mask, self.brush_radius) = previous;
            return Err(err);
        }
        if previous.0 != next {
            log::info!("mask mode {} -> {next}", previous.0);
        }
        Ok(())
    }

    /// Change the size fraction of the parametric shapes.
    ///
    /// The value is stored in every mode, the image is only filtered again
    /// when a sized shape is active.
    pub fn on_size_changed(&mut self, fraction: f64) -> Result<()> {
        if !(0.0..=1.0).contains(&fraction) {
            log::warn!("rejected mask size {fraction}");
            return Err(FilterError::SizeOutOfRange(fraction));
        }
        self.size_fraction = fraction;
        match self.mode {
            MaskMode::Parametric(kind) if kind.is_sized() && self.loaded.is_some() => {
                self.refresh()
            }
            _ => Ok(()),
        }
    }

    /// Move the size fraction by `steps` increments of `1 / size_steps`, clamped to `[0, 1]`.
    ///
    /// Returns the new size fraction.
    pub fn step_size(&mut self, steps: i32) -> Result<f64> {
        let total = f64::from(self.config.size_steps);
        let position = (self.size_fraction * total).round() + f64::from(steps);
        let fraction = position.clamp(0.0, total) / total;
        self.on_size_changed(fraction)?;
        Ok(fraction)
    }

    /// Change the brush used by subsequent paint gestures.
    pub fn set_brush_radius(&mut self, radius: u32) -> Result<()> {
        let (min, max) = (self.config.min_brush_radius, self.config.max_brush_radius);
        if !(min..=max).contains(&radius) {
            return Err(FilterError::BrushOutOfRange { radius, min, max });
        }
        self.brush_radius = radius;
        Ok(())
    }

    /// Paint every point of a drag gesture onto the custom mask.
    ///
    /// Each point is applied and followed by a full reconstruction,
    /// in the order they were received.
    /// Points must lie on the display surface, otherwise nothing is painted.
    pub fn on_paint_gesture(&mut self, points: &[DisplayPoint], brush_radius: u32) -> Result<()> {
        self.loaded()?;
        if self.mode != MaskMode::Custom {
            return Err(FilterError::NotInCustomMode(self.mode));
        }
        let display = self.config.display_size();
        if let Some(outside) = points.iter().find(|&&point| !display.contains(point)) {
            log::warn!("rejected paint point ({}, {})", outside.x, outside.y);
            return Err(FilterError::InvalidPoint(format!(
                "{},{}",
                outside.x, outside.y
            )));
        }
        self.set_brush_radius(brush_radius)?;

        for &point in points {
            if let Some(custom) = self.custom_mask.as_mut() {
                mask::paint_point(custom, point, brush_radius, display);
            }
            self.refresh()?;
        }
        log::debug!("painted {} points with radius {brush_radius}", points.len());
        Ok(())
    }

    /// Reset the custom mask so that every frequency passes again.
    pub fn on_clear_custom_mask(&mut self) -> Result<()> {
        let shape = self.loaded()?.spectrum.shape();
        if self.mode != MaskMode::Custom {
            return Err(FilterError::NotInCustomMode(self.mode));
        }
        self.custom_mask = Some(mask::init_custom_mask(shape));
        log::info!("custom mask cleared");
        self.refresh()
    }

    /// Write the contrast stretched filtered image to `path`, without resizing.
    pub fn on_save_requested<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.loaded()?;
        let output = self.output.as_ref().ok_or(FilterError::NoReconstruction)?;
        io::save_gray(path, &normalize(&output.filtered))
    }

    /// Write the contrast stretched masked spectrum magnitude to `path`.
    pub fn save_spectrum_view<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.loaded()?;
        let output = self.output.as_ref().ok_or(FilterError::NoReconstruction)?;
        io::save_gray(path, &normalize(&output.masked_magnitude))
    }

    /// A view normalized to gray levels and fitted to the display surface.
    pub fn render(&self, view: View) -> Result<GrayImage> {
        let data = match view {
            View::Original => &self.loaded()?.image,
            View::Spectrum => &self.output()?.masked_magnitude,
            View::Filtered => &self.output()?.filtered,
        };
        let img = io::to_gray_image(&normalize(data));
        Ok(io::fit_to_display(
            &img,
            self.config.display_width,
            self.config.display_height,
        ))
    }

    /// The mask currently applied to the spectrum.
    pub fn active_mask(&self) -> Result<Mask> {
        let shape = self.loaded()?.spectrum.shape();
        match self.mode {
            MaskMode::None => Ok(Mask::all_pass(shape)),
            MaskMode::Parametric(kind) => {
                mask::build_parametric_mask(kind, self.size_fraction, shape)
            }
            MaskMode::Custom => self
                .custom_mask
                .clone()
                .ok_or(FilterError::NotInCustomMode(self.mode)),
        }
    }

    /// Rebuild the mask and filter the loaded image again.
    fn refresh(&mut self) -> Result<()> {
        let loaded = self.loaded()?;
        let output = match self.mode {
            MaskMode::None => {
                let all_pass = Mask::all_pass(loaded.spectrum.shape());
                Output {
                    filtered: reconstruct(&loaded.spectrum, &all_pass)?,
                    masked_magnitude: loaded.magnitude.clone(),
                }
            }
            _ => {
                let mask = self.active_mask()?;
                Output {
                    filtered: reconstruct(&loaded.spectrum, &mask)?,
                    masked_magnitude: mask_magnitude(&loaded.magnitude, &mask)?,
                }
            }
        };
        self.output = Some(output);
        Ok(())
    }

    fn loaded(&self) -> Result<&Loaded> {
        self.loaded.as_ref().ok_or(FilterError::NoImageLoaded)
    }

    fn output(&self) -> Result<&Output> {
        self.loaded()?;
        self.output.as_ref().ok_or(FilterError::NoReconstruction)
    }

    /// Settings of this session.
    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Active mask lifecycle.
    pub fn mode(&self) -> MaskMode {
        self.mode
    }

    /// Size fraction used by parametric shapes.
    pub fn size_fraction(&self) -> f64 {
        self.size_fraction
    }

    /// Radius of the last used, or default, brush.
    pub fn brush_radius(&self) -> u32 {
        self.brush_radius
    }

    /// The painted mask, while in the custom mode.
    pub fn custom_mask(&self) -> Option<&Mask> {
        self.custom_mask.as_ref()
    }

    /// The loaded grayscale image.
    pub fn image(&self) -> Option<&Array2<f64>> {
        self.loaded.as_ref().map(|l| &l.image)
    }

    /// Centered spectrum of the loaded image.
    pub fn spectrum(&self) -> Option<&Spectrum> {
        self.loaded.as_ref().map(|l| &l.spectrum)
    }

    /// Unmasked log magnitude of the spectrum.
    pub fn magnitude(&self) -> Option<&Array2<f64>> {
        self.loaded.as_ref().map(|l| &l.magnitude)
    }

    /// Log magnitude with blocked frequencies set to 0.
    pub fn masked_magnitude(&self) -> Option<&Array2<f64>> {
        self.output.as_ref().map(|o| &o.masked_magnitude)
    }

    /// The last reconstructed image.
    pub fn filtered(&self) -> Option<&Array2<f64>> {
        self.output.as_ref().map(|o| &o.filtered)
    }
}
