//! Assessment pipeline.
//!
//! Routes a document to the image or generic scoring path and guarantees
//! that content problems come back as a failing report, never as an error.

mod report;

pub use report::QualityReport;

use std::path::Path;

use crate::codec::{DecoderFactory, ImageDecoder, PixelSample};
use crate::config::{AssessmentConfig, QualityThresholds, SampleAnchor, SharpnessSource};
use crate::document::{mime_from_path, DocumentKind, RawDocument};
use crate::error::{DocQualityError, Result};
use crate::metrics::{QualityMetrics, RasterMetrics};
use crate::scoring::{score_generic, score_image, ScoreOutcome};

/// Assess a document with the default configuration.
///
/// # Errors
///
/// Only on a caller contract breach (empty buffer with no declared MIME
/// type). Undecodable content yields a report with score 0.
///
/// # Example
///
/// ```rust,ignore
/// use doc_quality::assess_quality;
///
/// let report = assess_quality(&bytes, "image/jpeg", bytes.len() as u64)?;
/// println!("{} ({})", report.score, report.label);
/// ```
pub fn assess_quality(
    bytes: &[u8],
    mime_type: &str,
    declared_size_bytes: u64,
) -> Result<QualityReport> {
    QualityAssessor::default().assess_bytes(bytes, mime_type, declared_size_bytes)
}

/// Stateless quality assessor.
///
/// Holds only read-only configuration and a decoder, so one instance can be
/// shared across threads.
pub struct QualityAssessor {
    /// Assessment configuration.
    config: AssessmentConfig,
    /// Raster decoder backend.
    decoder: Box<dyn ImageDecoder>,
}

impl Default for QualityAssessor {
    fn default() -> Self {
        Self::new(AssessmentConfig::default())
    }
}

impl std::fmt::Debug for QualityAssessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QualityAssessor")
            .field("config", &self.config)
            .field("decoder", &self.decoder.info().name)
            .finish()
    }
}

impl QualityAssessor {
    /// Create an assessor with the default decoder for `config`.
    pub fn new(config: AssessmentConfig) -> Self {
        let decoder = DecoderFactory::for_config(&config);
        Self { config, decoder }
    }

    /// Create an assessor with a custom decoder.
    pub fn with_decoder(config: AssessmentConfig, decoder: Box<dyn ImageDecoder>) -> Self {
        Self { config, decoder }
    }

    /// Active configuration.
    pub fn config(&self) -> &AssessmentConfig {
        &self.config
    }

    /// Assess a document.
    pub fn assess(&self, document: &RawDocument<'_>) -> QualityReport {
        let size = document.declared_size();
        let thresholds = &self.config.thresholds;
        let kind = document.kind();

        let (outcome, metrics) = match kind {
            DocumentKind::Image => match self.measure_image(document) {
                Ok(raster) => (
                    score_image(&raster, size, thresholds),
                    QualityMetrics::with_raster(size, raster),
                ),
                Err(e) => {
                    log::log!(
                        failure_level(&e),
                        "Could not analyze {} document ({} bytes): {}",
                        document.mime_type(),
                        document.bytes().len(),
                        e
                    );
                    (ScoreOutcome::decode_failure(), QualityMetrics::size_only(size))
                }
            },
            DocumentKind::Generic => (
                score_generic(size, thresholds),
                QualityMetrics::size_only(size),
            ),
        };

        log::debug!(
            "Assessed {} document: score={} passed={} issues={}",
            kind,
            outcome.score,
            outcome.passed,
            outcome.issues.len()
        );

        QualityReport::new(kind, outcome, metrics)
    }

    /// Assess caller-owned bytes.
    ///
    /// # Errors
    ///
    /// [`crate::DocQualityError::InvalidInput`] on a caller contract breach.
    pub fn assess_bytes(
        &self,
        bytes: &[u8],
        mime_type: &str,
        declared_size_bytes: u64,
    ) -> Result<QualityReport> {
        let document = RawDocument::new(bytes, mime_type, declared_size_bytes)?;
        Ok(self.assess(&document))
    }

    /// Read and assess a file, guessing its MIME type from the extension.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be read.
    pub fn assess_file<P: AsRef<Path>>(&self, path: P) -> Result<QualityReport> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let mime_type = mime_from_path(path);

        log::info!("Assessing: {} ({})", path.display(), mime_type);
        self.assess_bytes(&bytes, &mime_type, bytes.len() as u64)
    }

    /// Decode, sample and measure. Any failure here, including a decoder
    /// backend fault, is reported as a decode failure by the caller.
    fn measure_image(&self, document: &RawDocument<'_>) -> Result<RasterMetrics> {
        let decoded = self.decoder.decode(document.bytes())?;
        let sample =
            PixelSample::from_decoded(&decoded, self.config.max_sample_dim, self.config.anchor)?;

        Ok(RasterMetrics::from_sample(
            decoded.width(),
            decoded.height(),
            &sample,
            self.config.sharpness_source,
        ))
    }
}

/// Log level for an image that could not be measured.
///
/// Undecodable or degenerate content is an expected property of uploads
/// (`warn`); anything else points at the decoder backend (`error`). Both end
/// in the same DecodeFailure report.
fn failure_level(error: &DocQualityError) -> log::Level {
    if error.is_data_condition() {
        log::Level::Warn
    } else {
        log::Level::Error
    }
}

/// Builder for creating assessors with custom settings.
pub struct AssessorBuilder {
    config: AssessmentConfig,
    decoder: Option<Box<dyn ImageDecoder>>,
}

impl AssessorBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            config: AssessmentConfig::default(),
            decoder: None,
        }
    }

    /// Set the whole configuration.
    pub fn config(mut self, config: AssessmentConfig) -> Self {
        self.config = config;
        self
    }

    /// Set scoring thresholds.
    pub fn thresholds(mut self, thresholds: QualityThresholds) -> Self {
        self.config.thresholds = thresholds;
        self
    }

    /// Set the sample window anchor.
    pub fn anchor(mut self, anchor: SampleAnchor) -> Self {
        self.config.anchor = anchor;
        self
    }

    /// Set the Laplacian input.
    pub fn sharpness_source(mut self, source: SharpnessSource) -> Self {
        self.config.sharpness_source = source;
        self
    }

    /// Use a custom decoder.
    pub fn decoder(mut self, decoder: Box<dyn ImageDecoder>) -> Self {
        self.decoder = Some(decoder);
        self
    }

    /// Validate the configuration and build the assessor.
    pub fn build(self) -> Result<QualityAssessor> {
        self.config.validate()?;
        Ok(match self.decoder {
            Some(decoder) => QualityAssessor::with_decoder(self.config, decoder),
            None => QualityAssessor::new(self.config),
        })
    }
}

impl Default for AssessorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
