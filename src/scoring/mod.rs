//! Penalty-based scoring of quality metrics.
//!
//! Scores start at 100. Each check subtracts a fixed penalty and records one
//! issue; checks run in a fixed order and never short-circuit:
//!
//! 1. Resolution
//! 2. Brightness (too dark / overexposed / suboptimal)
//! 3. Contrast (low / moderate)
//! 4. Sharpness (blurry / could be sharper)
//! 5. File size
//!
//! Within a check only the first matching band applies. Non-raster documents
//! only get the file-size rules.

mod classifier;

pub use classifier::{LabelTone, QualityLabel};

use serde::Serialize;

use crate::config::{QualityThresholds, BYTES_PER_MIB};
use crate::metrics::RasterMetrics;

/// Category of a detected problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// Image too small.
    Resolution,
    /// Too dark, overexposed, or outside the ideal band.
    Brightness,
    /// Flat tonal range.
    Contrast,
    /// Blur.
    Sharpness,
    /// File size out of the expected range.
    FileSize,
    /// The document could not be decoded at all.
    DecodeFailure,
}

impl std::fmt::Display for IssueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Resolution => "resolution",
            Self::Brightness => "brightness",
            Self::Contrast => "contrast",
            Self::Sharpness => "sharpness",
            Self::FileSize => "file size",
            Self::DecodeFailure => "decode failure",
        };
        f.write_str(name)
    }
}

/// A single finding with an optional remedy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QualityIssue {
    /// Category.
    pub kind: IssueKind,
    /// What is wrong.
    pub message: String,
    /// How to fix it, if there is a useful hint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl QualityIssue {
    /// Issue with a suggestion.
    pub fn new(kind: IssueKind, message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            suggestion: Some(suggestion.into()),
        }
    }

    /// Issue without a suggestion.
    pub fn bare(kind: IssueKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            suggestion: None,
        }
    }

    /// The terminal issue attached to undecodable documents.
    pub fn decode_failure() -> Self {
        Self::new(
            IssueKind::DecodeFailure,
            "Failed to load image",
            "Try a different file format or re-scan the document",
        )
    }
}

/// Result of applying the penalty rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreOutcome {
    /// Score in `[0, 100]`.
    pub score: u8,
    /// `score >= pass_threshold`.
    pub passed: bool,
    /// Findings in check order.
    pub issues: Vec<QualityIssue>,
}

impl ScoreOutcome {
    /// The fixed outcome for undecodable input.
    pub fn decode_failure() -> Self {
        Self {
            score: 0,
            passed: false,
            issues: vec![QualityIssue::decode_failure()],
        }
    }
}

/// Accumulates penalties and issues in the order checks run.
#[derive(Debug, Default)]
struct Tally {
    deductions: u32,
    issues: Vec<QualityIssue>,
}

impl Tally {
    fn flag(&mut self, penalty: u32, issue: QualityIssue) {
        self.deductions = self.deductions.saturating_add(penalty);
        self.issues.push(issue);
    }

    fn finish(self, pass_threshold: u8) -> ScoreOutcome {
        let score = 100u32.saturating_sub(self.deductions) as u8;
        ScoreOutcome {
            score,
            passed: score >= pass_threshold,
            issues: self.issues,
        }
    }
}

/// Score a decoded raster image.
pub fn score_image(
    raster: &RasterMetrics,
    file_size_bytes: u64,
    thresholds: &QualityThresholds,
) -> ScoreOutcome {
    let t = thresholds;
    let mut tally = Tally::default();

    if raster.native_width < t.min_resolution || raster.native_height < t.min_resolution {
        tally.flag(
            t.resolution_penalty,
            QualityIssue::new(
                IssueKind::Resolution,
                format!(
                    "Low resolution: {}x{}px",
                    raster.native_width, raster.native_height
                ),
                format!(
                    "Use a higher resolution image (min {}x{}px)",
                    t.min_resolution, t.min_resolution
                ),
            ),
        );
    }

    let brightness = raster.mean_brightness;
    if brightness < t.dark_below {
        tally.flag(
            t.brightness_extreme_penalty,
            QualityIssue::new(
                IssueKind::Brightness,
                "Image is too dark",
                "Retake photo in better lighting conditions",
            ),
        );
    } else if brightness > t.overexposed_above {
        tally.flag(
            t.brightness_extreme_penalty,
            QualityIssue::new(
                IssueKind::Brightness,
                "Image is overexposed",
                "Reduce lighting or adjust camera exposure",
            ),
        );
    } else if brightness < t.ideal_brightness_min || brightness > t.ideal_brightness_max {
        tally.flag(
            t.brightness_suboptimal_penalty,
            QualityIssue::new(
                IssueKind::Brightness,
                "Image brightness is suboptimal",
                "Adjust lighting for better visibility",
            ),
        );
    }

    if raster.contrast < t.low_contrast_below {
        tally.flag(
            t.low_contrast_penalty,
            QualityIssue::new(
                IssueKind::Contrast,
                "Low contrast - text may be hard to read",
                "Ensure good lighting and avoid shadows",
            ),
        );
    } else if raster.contrast < t.moderate_contrast_below {
        tally.flag(
            t.moderate_contrast_penalty,
            QualityIssue::bare(IssueKind::Contrast, "Moderate contrast - could be improved"),
        );
    }

    if raster.sharpness < t.blurry_below {
        tally.flag(
            t.blurry_penalty,
            QualityIssue::new(
                IssueKind::Sharpness,
                "Image is blurry",
                "Hold camera steady and ensure proper focus",
            ),
        );
    } else if raster.sharpness < t.soft_below {
        tally.flag(
            t.soft_penalty,
            QualityIssue::new(
                IssueKind::Sharpness,
                "Image could be sharper",
                "Ensure camera is focused on the document",
            ),
        );
    }

    if mib(file_size_bytes) < t.min_image_size_mib {
        tally.flag(
            t.small_image_penalty,
            QualityIssue::bare(
                IssueKind::FileSize,
                "File size is very small - may indicate compression issues",
            ),
        );
    }

    tally.finish(t.pass_threshold)
}

/// Score a non-raster document from its size alone.
pub fn score_generic(file_size_bytes: u64, thresholds: &QualityThresholds) -> ScoreOutcome {
    let t = thresholds;
    let mut tally = Tally::default();
    let size_mib = mib(file_size_bytes);

    if size_mib < t.generic_min_size_mib {
        tally.flag(
            t.generic_small_penalty,
            QualityIssue::new(
                IssueKind::FileSize,
                "File size is unusually small",
                "Ensure the document is complete and not corrupted",
            ),
        );
    }

    if size_mib > t.generic_max_size_mib {
        tally.flag(
            t.generic_large_penalty,
            QualityIssue::new(
                IssueKind::FileSize,
                "File size is quite large",
                "Consider compressing the file if possible",
            ),
        );
    }

    tally.finish(t.pass_threshold)
}

fn mib(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_MIB
}
