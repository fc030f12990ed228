//! Edge-strength estimate from a discrete Laplacian.
//!
//! For each interior pixel the magnitude `|4c - t - b - l - r|` is taken and
//! the result is averaged over `(dim - 2)^2` pixels. Low values mean blur.

use crate::codec::PixelSample;
use crate::config::SharpnessSource;

/// Red channel offset, used when reading a single channel.
const RED: usize = 0;

/// Mean absolute Laplacian over the interior of the sample.
///
/// Returns `0.0` when the sample is too small to have an interior
/// (`dim <= 2`).
pub fn sharpness(sample: &PixelSample, source: SharpnessSource) -> f64 {
    let dim = sample.dim();
    if dim <= 2 {
        return 0.0;
    }

    let value = |x: u32, y: u32| -> f64 {
        match source {
            SharpnessSource::RedChannel => sample.channel(x, y, RED) as f64,
            SharpnessSource::Brightness => sample.brightness(x, y),
        }
    };

    let mut total = 0.0;
    for y in 1..dim - 1 {
        for x in 1..dim - 1 {
            let laplacian = 4.0 * value(x, y)
                - value(x, y - 1)
                - value(x, y + 1)
                - value(x - 1, y)
                - value(x + 1, y);
            total += laplacian.abs();
        }
    }

    let interior = (dim - 2) as f64;
    total / (interior * interior)
}
