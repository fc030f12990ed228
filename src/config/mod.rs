//! Configuration types for quality thresholds and analysis options.
//!
//! Every default reproduces the reference scoring policy. Deviations from it
//! (centered sampling, brightness-based sharpness) are opt-in.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DocQualityError, Result};

/// Default side length of the square analysis window.
pub const DEFAULT_SAMPLE_DIM: u32 = 500;

/// Bytes per mebibyte, used by every file-size rule.
pub const BYTES_PER_MIB: f64 = 1024.0 * 1024.0;

/// Where the analysis window is placed inside the decoded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SampleAnchor {
    /// Anchor the window at the top-left corner.
    #[default]
    TopLeft,
    /// Center the window. Produces different numbers than `TopLeft` on
    /// non-uniform images.
    Center,
}

/// Which per-pixel value the Laplacian operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SharpnessSource {
    /// Read the red channel for the center and all four neighbours.
    #[default]
    RedChannel,
    /// Read the unweighted RGB mean, the same value brightness statistics use.
    Brightness,
}

/// Caps applied before decoding so an oversized image cannot cause
/// unbounded decode work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeLimits {
    /// Maximum width or height in pixels (`None` = unbounded).
    pub max_dimension: Option<u32>,
    /// Maximum decoder allocation in bytes (`None` = unbounded).
    pub max_alloc_bytes: Option<u64>,
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self {
            max_dimension: Some(16_384),
            max_alloc_bytes: Some(512 * 1024 * 1024),
        }
    }
}

impl DecodeLimits {
    /// No limits at all.
    pub fn unbounded() -> Self {
        Self {
            max_dimension: None,
            max_alloc_bytes: None,
        }
    }
}

/// Thresholds and penalties used by the scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityThresholds {
    /// Minimum width and height in pixels.
    pub min_resolution: u32,
    /// Penalty when either dimension is below `min_resolution`.
    pub resolution_penalty: u32,

    /// Mean brightness below this is "too dark".
    pub dark_below: f64,
    /// Mean brightness above this is "overexposed".
    pub overexposed_above: f64,
    /// Lower bound of the ideal brightness band.
    pub ideal_brightness_min: f64,
    /// Upper bound of the ideal brightness band.
    pub ideal_brightness_max: f64,
    /// Penalty for too dark or overexposed.
    pub brightness_extreme_penalty: u32,
    /// Penalty for brightness outside the ideal band.
    pub brightness_suboptimal_penalty: u32,

    /// Contrast below this is "low".
    pub low_contrast_below: f64,
    /// Contrast below this (but not low) is "moderate".
    pub moderate_contrast_below: f64,
    /// Penalty for low contrast.
    pub low_contrast_penalty: u32,
    /// Penalty for moderate contrast.
    pub moderate_contrast_penalty: u32,

    /// Sharpness below this is "blurry".
    pub blurry_below: f64,
    /// Sharpness below this (but not blurry) "could be sharper".
    pub soft_below: f64,
    /// Penalty for a blurry image.
    pub blurry_penalty: u32,
    /// Penalty for a soft image.
    pub soft_penalty: u32,

    /// Raster files smaller than this (MiB) look over-compressed.
    pub min_image_size_mib: f64,
    /// Penalty for a suspiciously small raster file.
    pub small_image_penalty: u32,

    /// Non-raster files smaller than this (MiB) may be incomplete.
    pub generic_min_size_mib: f64,
    /// Penalty for a suspiciously small non-raster file.
    pub generic_small_penalty: u32,
    /// Non-raster files larger than this (MiB) should be compressed.
    pub generic_max_size_mib: f64,
    /// Penalty for a large non-raster file.
    pub generic_large_penalty: u32,

    /// Minimum score that passes.
    pub pass_threshold: u8,
}

impl Default for QualityThresholds {
    fn default() -> Self {
        Self {
            min_resolution: 800,
            resolution_penalty: 20,
            dark_below: 80.0,
            overexposed_above: 200.0,
            ideal_brightness_min: 100.0,
            ideal_brightness_max: 180.0,
            brightness_extreme_penalty: 15,
            brightness_suboptimal_penalty: 10,
            low_contrast_below: 20.0,
            moderate_contrast_below: 30.0,
            low_contrast_penalty: 15,
            moderate_contrast_penalty: 5,
            blurry_below: 5.0,
            soft_below: 10.0,
            blurry_penalty: 20,
            soft_penalty: 10,
            min_image_size_mib: 0.05,
            small_image_penalty: 10,
            generic_min_size_mib: 0.02,
            generic_small_penalty: 20,
            generic_max_size_mib: 8.0,
            generic_large_penalty: 10,
            pass_threshold: 60,
        }
    }
}

impl QualityThresholds {
    /// Check that every band is ordered.
    pub fn validate(&self) -> Result<()> {
        let ordered = |lo: f64, hi: f64, what: &str| -> Result<()> {
            if lo.is_nan() || hi.is_nan() || lo > hi {
                return Err(DocQualityError::Config(format!(
                    "{} band is inverted: {} > {}",
                    what, lo, hi
                )));
            }
            Ok(())
        };

        ordered(self.dark_below, self.ideal_brightness_min, "dark/ideal brightness")?;
        ordered(
            self.ideal_brightness_min,
            self.ideal_brightness_max,
            "ideal brightness",
        )?;
        ordered(
            self.ideal_brightness_max,
            self.overexposed_above,
            "ideal/overexposed brightness",
        )?;
        ordered(self.low_contrast_below, self.moderate_contrast_below, "contrast")?;
        ordered(self.blurry_below, self.soft_below, "sharpness")?;
        ordered(
            self.generic_min_size_mib,
            self.generic_max_size_mib,
            "generic file size",
        )?;

        if self.pass_threshold > 100 {
            return Err(DocQualityError::Config(format!(
                "pass_threshold must be at most 100, got {}",
                self.pass_threshold
            )));
        }
        Ok(())
    }
}

/// Top-level configuration for an assessor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssessmentConfig {
    /// Scoring thresholds and penalties.
    pub thresholds: QualityThresholds,
    /// Upper bound on the analysis window side.
    pub max_sample_dim: u32,
    /// Placement of the analysis window.
    pub anchor: SampleAnchor,
    /// Input to the Laplacian.
    pub sharpness_source: SharpnessSource,
    /// Decoder resource caps.
    pub decode_limits: DecodeLimits,
}

impl Default for AssessmentConfig {
    fn default() -> Self {
        Self {
            thresholds: QualityThresholds::default(),
            max_sample_dim: DEFAULT_SAMPLE_DIM,
            anchor: SampleAnchor::TopLeft,
            sharpness_source: SharpnessSource::RedChannel,
            decode_limits: DecodeLimits::default(),
        }
    }
}

impl AssessmentConfig {
    /// Validate the whole configuration.
    pub fn validate(&self) -> Result<()> {
        if self.max_sample_dim == 0 {
            return Err(DocQualityError::Config(
                "max_sample_dim must be greater than zero".into(),
            ));
        }
        if self.decode_limits.max_dimension == Some(0) {
            return Err(DocQualityError::Config(
                "decode_limits.max_dimension must be greater than zero".into(),
            ));
        }
        self.thresholds.validate()
    }

    /// Parse a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a JSON document.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(s)
            .map_err(|e| DocQualityError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file; `.json` files are parsed as JSON, anything else as TOML.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;

        let is_json = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        log::debug!("Loading configuration from {}", path.display());
        if is_json {
            Self::from_json_str(&contents)
        } else {
            Self::from_toml_str(&contents)
        }
    }

    /// Render as TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_are_valid() {
        let config = AssessmentConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_sample_dim, 500);
        assert_eq!(config.anchor, SampleAnchor::TopLeft);
        assert_eq!(config.sharpness_source, SharpnessSource::RedChannel);
        assert_eq!(config.thresholds.pass_threshold, 60);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AssessmentConfig::from_toml_str(
            r#"
            anchor = "center"

            [thresholds]
            min_resolution = 1024
            "#,
        )
        .unwrap();

        assert_eq!(config.anchor, SampleAnchor::Center);
        assert_eq!(config.thresholds.min_resolution, 1024);
        assert_eq!(config.thresholds.resolution_penalty, 20);
        assert_eq!(config.max_sample_dim, 500);
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = AssessmentConfig::default();
        let text = config.to_toml_string().unwrap();
        assert_eq!(AssessmentConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_inverted_band_rejected() {
        let mut config = AssessmentConfig::default();
        config.thresholds.low_contrast_below = 40.0;
        assert!(matches!(config.validate(), Err(DocQualityError::Config(_))));
    }

    #[test]
    fn test_zero_sample_dim_rejected() {
        let result = AssessmentConfig::from_json_str(r#"{"max_sample_dim": 0}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_from_file_by_extension() {
        let dir = TempDir::new().unwrap();

        let json_path = dir.path().join("quality.json");
        fs::write(&json_path, r#"{"sharpness_source": "brightness"}"#).unwrap();
        let config = AssessmentConfig::from_file(&json_path).unwrap();
        assert_eq!(config.sharpness_source, SharpnessSource::Brightness);

        let toml_path = dir.path().join("quality.toml");
        fs::write(&toml_path, "max_sample_dim = 256\n").unwrap();
        let config = AssessmentConfig::from_file(&toml_path).unwrap();
        assert_eq!(config.max_sample_dim, 256);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = AssessmentConfig::from_file("/nonexistent/quality.toml");
        assert!(matches!(result, Err(DocQualityError::Io(_))));
    }
}
