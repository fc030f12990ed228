//! Decoder trait definitions.

use crate::error::{DocQualityError, Result};

/// Information about a decoder backend.
#[derive(Debug, Clone)]
pub struct DecoderInfo {
    /// Human-readable decoder name.
    pub name: &'static str,
}

/// A fully decoded image in row-major RGB8 layout.
///
/// The buffer always holds exactly `width * height` pixels; the only way to
/// build one is [`DecodedImage::new`], which checks that.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl DecodedImage {
    /// Create a decoded image, checking that the buffer matches the dimensions.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * 3;
        if pixels.len() != expected {
            return Err(DocQualityError::Decode(format!(
                "Pixel buffer size mismatch: expected {} bytes, got {}",
                expected,
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Native width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Native height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// RGB bytes of `len` pixels of row `y`, starting at column `x`.
    #[inline]
    pub fn row(&self, x: u32, y: u32, len: u32) -> &[u8] {
        let start = (y as usize * self.width as usize + x as usize) * 3;
        &self.pixels[start..start + len as usize * 3]
    }
}

/// Turns encoded bytes into pixels.
///
/// Keeps format-specific decoding apart from the format-agnostic statistics,
/// so analysis can be tested against synthetic buffers.
pub trait ImageDecoder: Send + Sync {
    /// Decode the full image.
    ///
    /// # Errors
    ///
    /// Returns [`DocQualityError::Decode`] for bytes that do not parse, or
    /// that exceed the decoder's resource limits.
    fn decode(&self, bytes: &[u8]) -> Result<DecodedImage>;

    /// Get decoder information.
    fn info(&self) -> DecoderInfo;
}
