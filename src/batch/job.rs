//! Per-file batch results.

use std::path::PathBuf;

use crate::error::DocQualityError;
use crate::pipeline::QualityReport;

/// Final state of one file in a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    /// Assessed and passed.
    Passed,
    /// Assessed and did not pass.
    Failed,
    /// Could not be read.
    Error,
    /// Skipped because the batch was cancelled.
    Cancelled,
}

impl std::fmt::Display for FileStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Passed => write!(f, "PASS"),
            Self::Failed => write!(f, "FAIL"),
            Self::Error => write!(f, "ERROR"),
            Self::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

/// Outcome of assessing one file.
#[derive(Debug)]
pub struct FileAssessment {
    /// Position in the batch, in path order.
    pub index: usize,

    /// Source file path.
    pub path: PathBuf,

    /// The report, or why there is none.
    pub outcome: Result<QualityReport, DocQualityError>,

    /// Time taken in milliseconds.
    pub duration_ms: u64,
}

impl FileAssessment {
    /// Status derived from the outcome.
    pub fn status(&self) -> FileStatus {
        match &self.outcome {
            Ok(report) if report.passed => FileStatus::Passed,
            Ok(_) => FileStatus::Failed,
            Err(DocQualityError::Cancelled) => FileStatus::Cancelled,
            Err(_) => FileStatus::Error,
        }
    }

    /// The report, if the file was assessed.
    pub fn report(&self) -> Option<&QualityReport> {
        self.outcome.as_ref().ok()
    }

    /// Get the file name.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "unknown".to_string())
    }
}
