//! Decoding and sampling of raster documents.
//!
//! This module provides the `ImageDecoder` trait, the default decoder built
//! on the `image` crate, and the bounded `PixelSample` window that every
//! metric reads from.

mod raster;
mod sample;
mod traits;

pub use raster::RasterDecoder;
pub use sample::{pixel_brightness, PixelSample};
pub use traits::{DecodedImage, DecoderInfo, ImageDecoder};

use crate::config::AssessmentConfig;

/// Factory for creating decoder instances.
pub struct DecoderFactory;

impl DecoderFactory {
    /// Create the default decoder for a configuration.
    pub fn for_config(config: &AssessmentConfig) -> Box<dyn ImageDecoder> {
        Box::new(RasterDecoder::new(config.decode_limits))
    }
}
