//! The assessment verdict handed back to callers.

use serde::Serialize;

use crate::document::DocumentKind;
use crate::error::Result;
use crate::metrics::{QualityMetrics, RoundedMetrics};
use crate::scoring::{QualityIssue, QualityLabel, ScoreOutcome};

/// Quality verdict for one document.
///
/// Contains no timestamps or other per-call state, so identical input always
/// produces an identical report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityReport {
    /// `score >= pass_threshold`.
    pub passed: bool,
    /// Score in `[0, 100]`.
    pub score: u8,
    /// Human-readable band for `score`.
    pub label: QualityLabel,
    /// Which scoring path was used.
    pub kind: DocumentKind,
    /// Findings in check order.
    pub issues: Vec<QualityIssue>,
    /// Raw measurements.
    pub metrics: QualityMetrics,
}

impl QualityReport {
    /// Assemble a report from a scoring outcome.
    pub fn new(kind: DocumentKind, outcome: ScoreOutcome, metrics: QualityMetrics) -> Self {
        Self {
            passed: outcome.passed,
            score: outcome.score,
            label: QualityLabel::from_score(outcome.score),
            kind,
            issues: outcome.issues,
            metrics,
        }
    }

    /// Issue messages, in order.
    pub fn warnings(&self) -> impl Iterator<Item = &str> {
        self.issues.iter().map(|i| i.message.as_str())
    }

    /// Suggestions of the issues that carry one, in order.
    pub fn suggestions(&self) -> impl Iterator<Item = &str> {
        self.issues.iter().filter_map(|i| i.suggestion.as_deref())
    }

    /// Rounded raster metrics for display, if the document was decoded.
    pub fn display_metrics(&self) -> Option<RoundedMetrics> {
        self.metrics.raster.map(|r| r.rounded())
    }

    /// Serialize as pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl std::fmt::Display for QualityReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Quality Report")?;
        writeln!(f, "==============")?;
        writeln!(
            f,
            "Score: {}/100 ({}) - {}",
            self.score,
            self.label,
            if self.passed { "PASSED" } else { "FAILED" }
        )?;
        writeln!(f, "Document type: {}", self.kind)?;
        writeln!(
            f,
            "File size: {} bytes ({:.2} MB)",
            self.metrics.file_size_bytes,
            self.metrics.file_size_mib()
        )?;

        if let Some(raster) = self.metrics.raster {
            let rounded = raster.rounded();
            writeln!(f)?;
            writeln!(f, "Image Metrics:")?;
            writeln!(
                f,
                "  Resolution: {}x{}",
                raster.native_width, raster.native_height
            )?;
            writeln!(f, "  Brightness: {}", rounded.brightness)?;
            writeln!(f, "  Contrast: {}", rounded.contrast)?;
            writeln!(f, "  Sharpness: {:.1}", rounded.sharpness)?;
        }

        if !self.issues.is_empty() {
            writeln!(f)?;
            writeln!(f, "Issues:")?;
            for issue in &self.issues {
                writeln!(f, "  - [{}] {}", issue.kind, issue.message)?;
                if let Some(ref suggestion) = issue.suggestion {
                    writeln!(f, "    Suggestion: {}", suggestion)?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::RasterMetrics;
    use crate::scoring::IssueKind;

    fn sample_report() -> QualityReport {
        let raster = RasterMetrics {
            native_width: 640,
            native_height: 480,
            mean_brightness: 90.4,
            contrast: 24.6,
            sharpness: 3.04,
        };
        let outcome = ScoreOutcome {
            score: 55,
            passed: false,
            issues: vec![
                QualityIssue::new(
                    IssueKind::Resolution,
                    "Low resolution: 640x480px",
                    "Use more pixels",
                ),
                QualityIssue::bare(IssueKind::Contrast, "Moderate contrast - could be improved"),
            ],
        };
        QualityReport::new(
            DocumentKind::Image,
            outcome,
            QualityMetrics::with_raster(300_000, raster),
        )
    }

    #[test]
    fn test_label_follows_score() {
        let report = sample_report();
        assert_eq!(report.label, QualityLabel::Poor);
    }

    #[test]
    fn test_warnings_and_suggestions() {
        let report = sample_report();
        assert_eq!(report.warnings().count(), 2);
        assert_eq!(report.suggestions().collect::<Vec<_>>(), vec!["Use more pixels"]);
    }

    #[test]
    fn test_display_metrics() {
        let rounded = sample_report().display_metrics().unwrap();
        assert_eq!(rounded.brightness, 90);
        assert_eq!(rounded.contrast, 25);
        assert!((rounded.sharpness - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_display_output() {
        let display = sample_report().to_string();
        assert!(display.contains("Score: 55/100 (Poor) - FAILED"));
        assert!(display.contains("Resolution: 640x480"));
        assert!(display.contains("[contrast] Moderate contrast"));
    }

    #[test]
    fn test_json_shape() {
        let json = sample_report().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["score"], 55);
        assert_eq!(value["label"], "Poor");
        assert_eq!(value["kind"], "image");
        assert_eq!(value["issues"][0]["kind"], "resolution");
        assert!(value["issues"][1].get("suggestion").is_none());
        assert_eq!(value["metrics"]["raster"]["native_width"], 640);
    }
}
