//! Raster decoder backed by the `image` crate.

use std::io::Cursor;

use image::{DynamicImage, ImageDecoder as _, ImageReader, Limits};

use crate::config::DecodeLimits;
use crate::error::{DocQualityError, Result};

use super::traits::{DecodedImage, DecoderInfo, ImageDecoder};

/// Decoder for the raster formats compiled into the `image` crate.
///
/// The format is sniffed from the content, not taken from the declared MIME
/// type, so a PNG uploaded as `image/jpeg` still decodes. EXIF orientation is
/// applied, so the sample window starts at the corner a viewer sees as
/// top-left.
#[derive(Debug, Clone, Default)]
pub struct RasterDecoder {
    limits: DecodeLimits,
}

impl RasterDecoder {
    /// Create a decoder with the given resource limits.
    pub fn new(limits: DecodeLimits) -> Self {
        Self { limits }
    }

    fn image_limits(&self) -> Limits {
        let mut limits = Limits::no_limits();
        limits.max_image_width = self.limits.max_dimension;
        limits.max_image_height = self.limits.max_dimension;
        limits.max_alloc = self.limits.max_alloc_bytes;
        limits
    }
}

impl ImageDecoder for RasterDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<DecodedImage> {
        let mut reader = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| DocQualityError::Decode(e.to_string()))?;

        let format = reader
            .format()
            .ok_or_else(|| DocQualityError::Decode("Unrecognized image format".into()))?;

        let mut limits = self.image_limits();
        reader.limits(limits.clone());
        let mut decoder = reader.into_decoder()?;
        limits.reserve(decoder.total_bytes())?;

        let orientation = decoder.orientation()?;
        let mut image = DynamicImage::from_decoder(decoder)?;
        image.apply_orientation(orientation);

        log::debug!(
            "Decoded {:?} image: {}x{} ({:?})",
            format,
            image.width(),
            image.height(),
            orientation
        );

        let rgb = image.to_rgb8();
        let (width, height) = rgb.dimensions();
        DecodedImage::new(width, height, rgb.into_raw())
    }

    fn info(&self) -> DecoderInfo {
        DecoderInfo { name: "image-rs" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage};

    fn encode(image: RgbImage, format: ImageFormat) -> Vec<u8> {
        let mut buffer = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(image)
            .write_to(&mut buffer, format)
            .unwrap();
        buffer.into_inner()
    }

    #[test]
    fn test_decode_png() {
        let mut image = RgbImage::from_pixel(4, 3, Rgb([10, 20, 30]));
        image.put_pixel(3, 2, Rgb([200, 100, 50]));
        let bytes = encode(image, ImageFormat::Png);

        let decoded = RasterDecoder::default().decode(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (4, 3));
        assert_eq!(decoded.row(0, 0, 1), &[10, 20, 30]);
        assert_eq!(decoded.row(3, 2, 1), &[200, 100, 50]);
    }

    #[test]
    fn test_decode_garbage_is_decode_error() {
        let result = RasterDecoder::default().decode(b"definitely not an image");
        assert!(matches!(result, Err(DocQualityError::Decode(_))));
    }

    #[test]
    fn test_decode_truncated_png() {
        let bytes = encode(RgbImage::new(32, 32), ImageFormat::Png);
        let result = RasterDecoder::default().decode(&bytes[..bytes.len() / 2]);
        assert!(result.is_err());
    }

    #[test]
    fn test_dimension_limit_rejects_large_image() {
        let bytes = encode(RgbImage::new(64, 8), ImageFormat::Png);
        let decoder = RasterDecoder::new(DecodeLimits {
            max_dimension: Some(32),
            max_alloc_bytes: None,
        });
        assert!(matches!(
            decoder.decode(&bytes),
            Err(DocQualityError::Decode(_))
        ));
    }

    /// Insert an APP1 Exif segment carrying only an orientation tag.
    fn with_exif_orientation(jpeg: &[u8], orientation: u8) -> Vec<u8> {
        let mut tiff = Vec::new();
        tiff.extend_from_slice(b"MM\x00\x2A\x00\x00\x00\x08");
        tiff.extend_from_slice(&[0x00, 0x01]);
        tiff.extend_from_slice(&[0x01, 0x12, 0x00, 0x03, 0x00, 0x00, 0x00, 0x01]);
        tiff.extend_from_slice(&[0x00, orientation, 0x00, 0x00]);
        tiff.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]);

        let payload_len = (2 + 6 + tiff.len()) as u16;
        let mut out = jpeg[..2].to_vec();
        out.extend_from_slice(&[0xFF, 0xE1]);
        out.extend_from_slice(&payload_len.to_be_bytes());
        out.extend_from_slice(b"Exif\x00\x00");
        out.extend_from_slice(&tiff);
        out.extend_from_slice(&jpeg[2..]);
        out
    }

    #[test]
    fn test_exif_orientation_is_applied() {
        let jpeg = encode(RgbImage::from_pixel(16, 8, Rgb([128, 128, 128])), ImageFormat::Jpeg);

        let plain = RasterDecoder::default().decode(&jpeg).unwrap();
        assert_eq!((plain.width(), plain.height()), (16, 8));

        // 6 = rotate 90 degrees clockwise
        let rotated = RasterDecoder::default()
            .decode(&with_exif_orientation(&jpeg, 6))
            .unwrap();
        assert_eq!((rotated.width(), rotated.height()), (8, 16));
    }

    #[test]
    fn test_alloc_limit_rejects_large_image() {
        let bytes = encode(RgbImage::new(64, 64), ImageFormat::Png);
        let decoder = RasterDecoder::new(DecodeLimits {
            max_dimension: None,
            max_alloc_bytes: Some(1024),
        });
        assert!(matches!(
            decoder.decode(&bytes),
            Err(DocQualityError::Decode(_))
        ));
    }
}
