//! Bounded analysis window extracted from a decoded image.

use crate::config::SampleAnchor;
use crate::error::{DocQualityError, Result};

use super::traits::DecodedImage;

/// Square RGB8 grid that the statistics and sharpness passes read.
///
/// Its side is `min(max_dim, width, height)`, so analysis cost does not grow
/// with the input resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelSample {
    dim: u32,
    rgb: Vec<u8>,
}

impl PixelSample {
    /// Build a sample directly from an RGB8 buffer of `dim * dim` pixels.
    pub fn from_rgb(dim: u32, rgb: Vec<u8>) -> Result<Self> {
        let expected = dim as usize * dim as usize * 3;
        if rgb.len() != expected {
            return Err(DocQualityError::Internal(format!(
                "Sample buffer size mismatch: expected {} bytes, got {}",
                expected,
                rgb.len()
            )));
        }
        Ok(Self { dim, rgb })
    }

    /// Build a sample where every pixel has the same color.
    pub fn uniform(dim: u32, color: [u8; 3]) -> Self {
        let rgb = color
            .iter()
            .copied()
            .cycle()
            .take(dim as usize * dim as usize * 3)
            .collect();
        Self { dim, rgb }
    }

    /// Cut the analysis window out of a decoded image.
    ///
    /// # Errors
    ///
    /// [`DocQualityError::DegenerateInput`] if either image dimension is zero.
    pub fn from_decoded(image: &DecodedImage, max_dim: u32, anchor: SampleAnchor) -> Result<Self> {
        let (width, height) = (image.width(), image.height());
        if width == 0 || height == 0 {
            return Err(DocQualityError::DegenerateInput { width, height });
        }

        let dim = max_dim.min(width).min(height);
        let (x0, y0) = match anchor {
            SampleAnchor::TopLeft => (0, 0),
            SampleAnchor::Center => ((width - dim) / 2, (height - dim) / 2),
        };

        let mut rgb = Vec::with_capacity(dim as usize * dim as usize * 3);
        for y in y0..y0 + dim {
            rgb.extend_from_slice(image.row(x0, y, dim));
        }

        Ok(Self { dim, rgb })
    }

    /// Side length of the window.
    pub fn dim(&self) -> u32 {
        self.dim
    }

    /// Number of pixels in the window.
    pub fn pixel_count(&self) -> usize {
        self.dim as usize * self.dim as usize
    }

    /// Iterate over pixels in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = [u8; 3]> + '_ {
        self.rgb.chunks_exact(3).map(|p| [p[0], p[1], p[2]])
    }

    /// Single channel value at `(x, y)`.
    #[inline]
    pub fn channel(&self, x: u32, y: u32, channel: usize) -> u8 {
        self.rgb[(y as usize * self.dim as usize + x as usize) * 3 + channel]
    }

    /// Unweighted RGB mean at `(x, y)`.
    #[inline]
    pub fn brightness(&self, x: u32, y: u32) -> f64 {
        let idx = (y as usize * self.dim as usize + x as usize) * 3;
        pixel_brightness([self.rgb[idx], self.rgb[idx + 1], self.rgb[idx + 2]])
    }
}

/// Unweighted mean of R, G and B. Not perceptual luma.
#[inline]
pub fn pixel_brightness(rgb: [u8; 3]) -> f64 {
    (rgb[0] as f64 + rgb[1] as f64 + rgb[2] as f64) / 3.0
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Image whose red channel encodes x and green channel encodes y.
    fn coordinate_image(width: u32, height: u32) -> DecodedImage {
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.extend_from_slice(&[x as u8, y as u8, 0]);
            }
        }
        DecodedImage::new(width, height, pixels).unwrap()
    }

    #[test]
    fn test_sample_dim_is_bounded() {
        let image = coordinate_image(40, 30);
        let sample = PixelSample::from_decoded(&image, 500, SampleAnchor::TopLeft).unwrap();
        assert_eq!(sample.dim(), 30);

        let sample = PixelSample::from_decoded(&image, 16, SampleAnchor::TopLeft).unwrap();
        assert_eq!(sample.dim(), 16);
        assert_eq!(sample.pixel_count(), 256);
    }

    #[test]
    fn test_top_left_anchor() {
        let image = coordinate_image(20, 10);
        let sample = PixelSample::from_decoded(&image, 4, SampleAnchor::TopLeft).unwrap();
        assert_eq!(sample.channel(0, 0, 0), 0);
        assert_eq!(sample.channel(3, 3, 0), 3);
        assert_eq!(sample.channel(3, 3, 1), 3);
    }

    #[test]
    fn test_center_anchor() {
        let image = coordinate_image(20, 10);
        let sample = PixelSample::from_decoded(&image, 4, SampleAnchor::Center).unwrap();
        // x0 = (20 - 4) / 2 = 8, y0 = (10 - 4) / 2 = 3
        assert_eq!(sample.channel(0, 0, 0), 8);
        assert_eq!(sample.channel(0, 0, 1), 3);
    }

    #[test]
    fn test_zero_dimension_is_degenerate() {
        let image = DecodedImage::new(0, 10, Vec::new()).unwrap();
        let result = PixelSample::from_decoded(&image, 500, SampleAnchor::TopLeft);
        assert!(matches!(
            result,
            Err(DocQualityError::DegenerateInput { width: 0, height: 10 })
        ));
    }

    #[test]
    fn test_uniform_and_brightness() {
        let sample = PixelSample::uniform(3, [30, 60, 90]);
        assert_eq!(sample.pixel_count(), 9);
        assert_eq!(sample.pixels().count(), 9);
        assert_eq!(sample.brightness(2, 2), 60.0);
        assert_eq!(pixel_brightness([255, 255, 255]), 255.0);
    }

    #[test]
    fn test_from_rgb_size_check() {
        assert!(PixelSample::from_rgb(2, vec![0; 12]).is_ok());
        assert!(PixelSample::from_rgb(2, vec![0; 13]).is_err());
    }
}
