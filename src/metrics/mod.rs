//! Raw quality measurements for a document.
//!
//! - **Brightness / contrast**: first and second moment of per-pixel brightness
//! - **Sharpness**: mean absolute discrete Laplacian
//!
//! # Example
//!
//! ```rust,ignore
//! use doc_quality::codec::PixelSample;
//! use doc_quality::config::SharpnessSource;
//! use doc_quality::metrics::RasterMetrics;
//!
//! let sample = PixelSample::uniform(500, [140, 140, 140]);
//! let metrics = RasterMetrics::from_sample(1000, 1000, &sample, SharpnessSource::RedChannel);
//! assert_eq!(metrics.mean_brightness, 140.0);
//! ```

mod sharpness;
mod stats;

pub use sharpness::sharpness;
pub use stats::{brightness_stats, BrightnessStats};

use serde::Serialize;

use crate::codec::PixelSample;
use crate::config::{SharpnessSource, BYTES_PER_MIB};

/// Pixel-level measurements of a decoded raster image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RasterMetrics {
    /// Width of the original image (not the sample window).
    pub native_width: u32,
    /// Height of the original image (not the sample window).
    pub native_height: u32,
    /// Mean brightness in `[0, 255]`.
    pub mean_brightness: f64,
    /// Population standard deviation of brightness in `[0, 255]`.
    pub contrast: f64,
    /// Mean absolute Laplacian, `>= 0`.
    pub sharpness: f64,
}

impl RasterMetrics {
    /// Measure a sample taken from an image of the given native size.
    pub fn from_sample(
        native_width: u32,
        native_height: u32,
        sample: &PixelSample,
        source: SharpnessSource,
    ) -> Self {
        let stats = brightness_stats(sample);
        Self {
            native_width,
            native_height,
            mean_brightness: stats.mean,
            contrast: stats.contrast,
            sharpness: sharpness(sample, source),
        }
    }

    /// Values rounded for display: brightness and contrast to integers,
    /// sharpness to one decimal.
    pub fn rounded(&self) -> RoundedMetrics {
        RoundedMetrics {
            brightness: self.mean_brightness.round() as u32,
            contrast: self.contrast.round() as u32,
            sharpness: (self.sharpness * 10.0).round() / 10.0,
        }
    }
}

/// Display-friendly rounding of [`RasterMetrics`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RoundedMetrics {
    /// Rounded mean brightness.
    pub brightness: u32,
    /// Rounded contrast.
    pub contrast: u32,
    /// Sharpness rounded to one decimal.
    pub sharpness: f64,
}

/// Everything measured about one document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QualityMetrics {
    /// Declared file size in bytes.
    pub file_size_bytes: u64,
    /// Pixel measurements; absent for non-raster documents and decode failures.
    pub raster: Option<RasterMetrics>,
}

impl QualityMetrics {
    /// Metrics for a document that was not (or could not be) decoded.
    pub fn size_only(file_size_bytes: u64) -> Self {
        Self {
            file_size_bytes,
            raster: None,
        }
    }

    /// Metrics for a decoded raster image.
    pub fn with_raster(file_size_bytes: u64, raster: RasterMetrics) -> Self {
        Self {
            file_size_bytes,
            raster: Some(raster),
        }
    }

    /// File size in MiB.
    pub fn file_size_mib(&self) -> f64 {
        self.file_size_bytes as f64 / BYTES_PER_MIB
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_dimensions_not_sample_dimensions() {
        let sample = PixelSample::uniform(500, [0, 0, 0]);
        let metrics = RasterMetrics::from_sample(4000, 3000, &sample, SharpnessSource::RedChannel);
        assert_eq!(metrics.native_width, 4000);
        assert_eq!(metrics.native_height, 3000);
    }

    #[test]
    fn test_from_sample_uniform_gray() {
        let sample = PixelSample::uniform(20, [140, 140, 140]);
        let metrics = RasterMetrics::from_sample(1000, 1000, &sample, SharpnessSource::RedChannel);
        assert_eq!(metrics.mean_brightness, 140.0);
        assert_eq!(metrics.contrast, 0.0);
        assert_eq!(metrics.sharpness, 0.0);
    }

    #[test]
    fn test_rounding() {
        let metrics = RasterMetrics {
            native_width: 10,
            native_height: 10,
            mean_brightness: 139.5,
            contrast: 29.49,
            sharpness: 7.25,
        };
        let rounded = metrics.rounded();
        assert_eq!(rounded.brightness, 140);
        assert_eq!(rounded.contrast, 29);
        assert!((rounded.sharpness - 7.3).abs() < 1e-9);
    }

    #[test]
    fn test_file_size_mib() {
        let metrics = QualityMetrics::size_only(1024 * 1024 * 3);
        assert_eq!(metrics.file_size_mib(), 3.0);
        assert!(metrics.raster.is_none());
    }
}
