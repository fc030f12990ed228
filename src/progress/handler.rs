//! Progress handler trait and related types.

use std::path::{Path, PathBuf};

use crate::batch::BatchSummary;
use crate::error::DocQualityError;

/// Phase of a batch assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressPhase {
    /// Discovering files to assess.
    Discovery,
    /// A file was assessed.
    Assessing,
    /// A file could not be read.
    Failed,
    /// A file was skipped after cancellation.
    Skipped,
    /// The batch finished.
    Complete,
}

impl ProgressPhase {
    /// Get a human-readable description of the phase.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Discovery => "Discovering files",
            Self::Assessing => "Assessing",
            Self::Failed => "Failed",
            Self::Skipped => "Skipped",
            Self::Complete => "Complete",
        }
    }
}

impl std::fmt::Display for ProgressPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Progress event emitted during batch assessment.
#[derive(Debug, Clone)]
pub struct ProgressEvent {
    /// Current phase of operation.
    pub phase: ProgressPhase,

    /// File the event refers to.
    pub current_file: Option<PathBuf>,

    /// Total files in batch, once known.
    pub total_files: Option<usize>,

    /// Number of files completed so far.
    pub completed_files: usize,

    /// Overall progress (0.0 to 1.0).
    pub overall_progress: f64,

    /// Status message.
    pub message: String,
}

impl Default for ProgressEvent {
    fn default() -> Self {
        Self {
            phase: ProgressPhase::Discovery,
            current_file: None,
            total_files: None,
            completed_files: 0,
            overall_progress: 0.0,
            message: String::new(),
        }
    }
}

impl ProgressEvent {
    /// Create a discovery phase event.
    pub fn discovery(message: impl Into<String>) -> Self {
        Self {
            phase: ProgressPhase::Discovery,
            message: message.into(),
            ..Default::default()
        }
    }

    /// Create an event for a file that finished assessment.
    pub fn assessed(file: &Path, score: u8) -> Self {
        Self {
            phase: ProgressPhase::Assessing,
            current_file: Some(file.to_path_buf()),
            message: format!("Assessed {} (score {})", file_display_name(file), score),
            ..Default::default()
        }
    }

    /// Create an event for a file that could not be read.
    pub fn failed(file: &Path, error: &DocQualityError) -> Self {
        Self {
            phase: ProgressPhase::Failed,
            current_file: Some(file.to_path_buf()),
            message: format!("{}: {}", file_display_name(file), error),
            ..Default::default()
        }
    }

    /// Create an event for a file skipped after cancellation.
    pub fn skipped(file: &Path) -> Self {
        Self {
            phase: ProgressPhase::Skipped,
            current_file: Some(file.to_path_buf()),
            message: format!("Skipped {}", file_display_name(file)),
            ..Default::default()
        }
    }

    /// Create a completion event.
    pub fn complete(files_processed: usize) -> Self {
        Self {
            phase: ProgressPhase::Complete,
            completed_files: files_processed,
            total_files: Some(files_processed),
            overall_progress: 1.0,
            message: format!("Completed {} files", files_processed),
            ..Default::default()
        }
    }

    /// Set batch progress information.
    pub fn with_batch_progress(mut self, completed: usize, total: usize) -> Self {
        self.completed_files = completed;
        self.total_files = Some(total);
        if total > 0 {
            self.overall_progress = completed as f64 / total as f64;
        }
        self
    }
}

impl std::fmt::Display for ProgressEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(total) = self.total_files {
            write!(
                f,
                "[{}/{}] {}: {}",
                self.completed_files, total, self.phase, self.message
            )
        } else {
            write!(f, "{}: {}", self.phase, self.message)
        }
    }
}

fn file_display_name(file: &Path) -> std::borrow::Cow<'_, str> {
    file.file_name().unwrap_or_default().to_string_lossy()
}

/// Receives progress updates from batch assessment.
///
/// Handlers are called from worker threads, hence `Send + Sync`.
pub trait ProgressHandler: Send + Sync {
    /// Called when progress is updated.
    fn on_progress(&self, event: &ProgressEvent);

    /// Called when a file could not be read.
    fn on_error(&self, error: &DocQualityError, file: Option<&Path>) {
        let _ = (error, file);
    }

    /// Called when the batch finishes.
    fn on_complete(&self, summary: &BatchSummary) {
        let _ = summary;
    }

    /// Return `true` to stop before the next file starts.
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// A no-op progress handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullProgress;

impl ProgressHandler for NullProgress {
    fn on_progress(&self, _event: &ProgressEvent) {}
}
