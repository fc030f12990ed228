//! Brightness and contrast statistics.
//!
//! - Brightness: unweighted RGB mean per pixel, averaged over the window
//! - Contrast: population standard deviation of per-pixel brightness
//!   (divides by N, not N - 1)

use crate::codec::{pixel_brightness, PixelSample};

/// First and second moment of per-pixel brightness.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrightnessStats {
    /// Mean brightness in `[0, 255]`.
    pub mean: f64,
    /// Population standard deviation in `[0, 255]`.
    pub contrast: f64,
}

/// Compute mean brightness and contrast over a sample.
///
/// An empty sample yields zeros.
pub fn brightness_stats(sample: &PixelSample) -> BrightnessStats {
    let n = sample.pixel_count();
    if n == 0 {
        return BrightnessStats {
            mean: 0.0,
            contrast: 0.0,
        };
    }

    let total: f64 = sample.pixels().map(pixel_brightness).sum();
    let mean = total / n as f64;

    let variance: f64 = sample
        .pixels()
        .map(|p| {
            let diff = pixel_brightness(p) - mean;
            diff * diff
        })
        .sum::<f64>()
        / n as f64;

    BrightnessStats {
        mean,
        contrast: variance.sqrt(),
    }
}
