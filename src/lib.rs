//! Document Quality Assessment Library
//!
//! Scores an uploaded document (a passport scan, a transcript photo, a PDF)
//! on a 0-100 scale before it is stored, and explains what is wrong with it.
//!
//! # Features
//!
//! - **Image analysis**: resolution, brightness, contrast and Laplacian
//!   sharpness over a bounded pixel sample
//! - **Generic documents**: file-size plausibility for PDFs and office files
//! - **Never fails on content**: undecodable images come back as a score of
//!   0 with an actionable suggestion
//! - **Batch scanning**: parallel directory assessment with progress
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use doc_quality::assess_quality;
//!
//! let bytes = std::fs::read("passport.jpg")?;
//! let report = assess_quality(&bytes, "image/jpeg", bytes.len() as u64)?;
//!
//! println!("{}/100 ({})", report.score, report.label);
//! for suggestion in report.suggestions() {
//!     println!("  - {}", suggestion);
//! }
//! ```
//!
//! # Custom thresholds
//!
//! ```rust,ignore
//! use doc_quality::{AssessorBuilder, config::QualityThresholds};
//!
//! let thresholds = QualityThresholds {
//!     min_resolution: 1200,
//!     ..Default::default()
//! };
//! let assessor = AssessorBuilder::new().thresholds(thresholds).build()?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod batch;
pub mod cli;
pub mod codec;
pub mod config;
pub mod document;
pub mod error;
pub mod metrics;
pub mod pipeline;
pub mod progress;
pub mod scoring;

// Re-export commonly used types
pub use config::AssessmentConfig;
pub use document::{DocumentKind, RawDocument};
pub use error::{DocQualityError, Result};
pub use pipeline::{assess_quality, AssessorBuilder, QualityAssessor, QualityReport};
pub use scoring::{IssueKind, QualityIssue, QualityLabel};

/// Library version information.
pub mod version {
    /// Library version string.
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");

    /// Library name.
    pub const NAME: &str = env!("CARGO_PKG_NAME");

    /// Get full version string.
    pub fn full_version() -> String {
        format!("{} {}", NAME, VERSION)
    }
}
