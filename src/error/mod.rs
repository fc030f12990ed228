//! Error types for the document quality engine.
//!
//! Two variants, [`DocQualityError::Decode`] and
//! [`DocQualityError::DegenerateInput`], describe the *content* of a document
//! and are turned into a failing report by the dispatcher. The rest describe
//! failures of the caller or of the surrounding tooling.

use thiserror::Error;

/// Result type alias for the library.
pub type Result<T> = std::result::Result<T, DocQualityError>;

/// Main error type for the document quality engine.
#[derive(Error, Debug)]
pub enum DocQualityError {
    /// The bytes could not be decoded as an image.
    #[error("Decode error: {0}")]
    Decode(String),

    /// The image decoded but has a zero dimension.
    #[error("Degenerate image: {width}x{height}")]
    DegenerateInput {
        /// Decoded width in pixels.
        width: u32,
        /// Decoded height in pixels.
        height: u32,
    },

    /// Caller contract violation (e.g., empty buffer with no declared type).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Report or configuration (de)serialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The operation was cancelled before this item started.
    #[error("Cancelled")]
    Cancelled,

    /// Generic internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DocQualityError {
    /// Whether this error describes the document's content rather than a fault.
    ///
    /// Content conditions never escape the dispatcher.
    pub fn is_data_condition(&self) -> bool {
        matches!(self, Self::Decode(_) | Self::DegenerateInput { .. })
    }
}

impl From<image::ImageError> for DocQualityError {
    fn from(err: image::ImageError) -> Self {
        DocQualityError::Decode(err.to_string())
    }
}

impl From<toml::de::Error> for DocQualityError {
    fn from(err: toml::de::Error) -> Self {
        DocQualityError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for DocQualityError {
    fn from(err: toml::ser::Error) -> Self {
        DocQualityError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for DocQualityError {
    fn from(err: serde_json::Error) -> Self {
        DocQualityError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_conditions() {
        assert!(DocQualityError::Decode("bad header".into()).is_data_condition());
        assert!(DocQualityError::DegenerateInput { width: 0, height: 10 }.is_data_condition());
        assert!(!DocQualityError::InvalidInput("empty".into()).is_data_condition());
        assert!(!DocQualityError::Config("bad".into()).is_data_condition());
    }

    #[test]
    fn test_error_display() {
        let err = DocQualityError::DegenerateInput { width: 0, height: 12 };
        assert_eq!(err.to_string(), "Degenerate image: 0x12");
    }
}
