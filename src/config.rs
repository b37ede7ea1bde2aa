// SPDX-License-Identifier: MPL-2.0

//! Filter session configuration, loaded from TOML.
//!
//! Every field is optional in the file, missing ones take the default value:
//!
//! ```toml
//! display_width = 375
//! display_height = 225
//! default_size_fraction = 0.5
//! default_brush_radius = 5
//! min_brush_radius = 1
//! max_brush_radius = 100
//! size_steps = 100
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{FilterError, Result};
use crate::mask::DisplaySize;

/// Settings of a [`crate::FilterSession`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterConfig {
    /// Width of the surface showing the spectrum, in which paint points are given.
    pub display_width: u32,
    /// Height of that surface.
    pub display_height: u32,
    /// Mask size fraction before any size change.
    pub default_size_fraction: f64,
    /// Brush radius, in spectrum cells, set when entering the custom mode.
    pub default_brush_radius: u32,
    /// Smallest accepted brush radius.
    pub min_brush_radius: u32,
    /// Largest accepted brush radius.
    pub max_brush_radius: u32,
    /// Number of increments between a size fraction of 0 and 1.
    pub size_steps: u32,
}

impl Default for FilterConfig {
    fn default() -> Self {
        FilterConfig {
            display_width: 375,
            display_height: 225,
            default_size_fraction: 0.5,
            default_brush_radius: 5,
            min_brush_radius: 1,
            max_brush_radius: 100,
            size_steps: 100,
        }
    }
}

impl FilterConfig {
    /// Read and validate a TOML configuration file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(&path)?;
        let config = Self::from_toml_str(&contents)?;
        log::info!("loaded configuration from {}", path.as_ref().display());
        Ok(config)
    }

    /// Parse and validate a TOML configuration.
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        let config: FilterConfig = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the values can drive a session.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: &str| Err(FilterError::InvalidConfig(msg.to_string()));
        if self.display_width == 0 || self.display_height == 0 {
            return invalid("display dimensions must be positive");
        }
        if !(0.0..=1.0).contains(&self.default_size_fraction) {
            return invalid("default_size_fraction must be within [0, 1]");
        }
        if self.min_brush_radius > self.max_brush_radius {
            return invalid("min_brush_radius is larger than max_brush_radius");
        }
        let brush_range = self.min_brush_radius..=self.max_brush_radius;
        if !brush_range.contains(&self.default_brush_radius) {
            return invalid("default_brush_radius is outside the brush range");
        }
        if self.size_steps == 0 {
            return invalid("size_steps must be positive");
        }
        Ok(())
    }

    /// The display surface paint points refer to.
    pub fn display_size(&self) -> DisplaySize {
        DisplaySize {
            width: self.display_width,
            height: self.display_height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = FilterConfig::default();
        config.validate().unwrap();
        assert_eq!(
            config.display_size(),
            DisplaySize {
                width: 375,
                height: 225
            }
        );
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config =
            FilterConfig::from_toml_str("display_width = 640\nmax_brush_radius = 20\n").unwrap();
        assert_eq!(config.display_width, 640);
        assert_eq!(config.max_brush_radius, 20);
        assert_eq!(config.display_height, 225);
        assert_eq!(config.default_brush_radius, 5);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            FilterConfig::from_toml_str("display_height = 0"),
            Err(FilterError::InvalidConfig(_))
        ));
        assert!(matches!(
            FilterConfig::from_toml_str("default_brush_radius = 200"),
            Err(FilterError::InvalidConfig(_))
        ));
        assert!(matches!(
            FilterConfig::from_toml_str("default_size_fraction = 2.0"),
            Err(FilterError::InvalidConfig(_))
        ));
        assert!(matches!(
            FilterConfig::from_toml_str("brush = 3"),
            Err(FilterError::ConfigParse(_))
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let path = std::env::temp_dir().join("fft2d-filter-missing-config.toml");
        assert!(matches!(FilterConfig::load_from_file(path), Err(FilterError::Io(_))));
    }
}
