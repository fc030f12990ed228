//! Callback-based progress reporting.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::batch::BatchSummary;
use crate::error::DocQualityError;

use super::handler::{ProgressEvent, ProgressHandler};

type ErrorCallback = Arc<dyn Fn(&DocQualityError, Option<&Path>) + Send + Sync>;
type CompleteCallback = Arc<dyn Fn(&BatchSummary) + Send + Sync>;

/// A progress handler that invokes a callback function.
///
/// # Example
///
/// ```rust,ignore
/// use doc_quality::progress::CallbackProgress;
///
/// let progress = CallbackProgress::new(|event| {
///     println!("[{:.1}%] {}", event.overall_progress * 100.0, event.message);
/// });
///
/// progress.cancel(); // stops before the next file
/// ```
pub struct CallbackProgress<F>
where
    F: Fn(ProgressEvent) + Send + Sync,
{
    /// The callback function to invoke on progress.
    callback: F,

    /// Error callback (optional).
    error_callback: Option<ErrorCallback>,

    /// Completion callback (optional).
    complete_callback: Option<CompleteCallback>,

    /// Cancellation flag.
    cancelled: AtomicBool,
}

impl<F> CallbackProgress<F>
where
    F: Fn(ProgressEvent) + Send + Sync,
{
    /// Create a new callback progress handler.
    pub fn new(callback: F) -> Self {
        Self {
            callback,
            error_callback: None,
            complete_callback: None,
            cancelled: AtomicBool::new(false),
        }
    }

    /// Set an error callback.
    pub fn on_error<E>(mut self, callback: E) -> Self
    where
        E: Fn(&DocQualityError, Option<&Path>) + Send + Sync + 'static,
    {
        self.error_callback = Some(Arc::new(callback));
        self
    }

    /// Set a completion callback.
    pub fn on_complete<C>(mut self, callback: C) -> Self
    where
        C: Fn(&BatchSummary) + Send + Sync + 'static,
    {
        self.complete_callback = Some(Arc::new(callback));
        self
    }

    /// Request cancellation. Files already being assessed still finish.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Reset the cancellation flag.
    pub fn reset(&self) {
        self.cancelled.store(false, Ordering::SeqCst);
    }
}

impl<F> ProgressHandler for CallbackProgress<F>
where
    F: Fn(ProgressEvent) + Send + Sync,
{
    fn on_progress(&self, event: &ProgressEvent) {
        (self.callback)(event.clone());
    }

    fn on_error(&self, error: &DocQualityError, file: Option<&Path>) {
        if let Some(ref callback) = self.error_callback {
            callback(error, file);
        }
    }

    fn on_complete(&self, summary: &BatchSummary) {
        if let Some(ref callback) = self.complete_callback {
            callback(summary);
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_callback_progress_new() {
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = count.clone();

        let progress = CallbackProgress::new(move |_| {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });

        progress.on_progress(&ProgressEvent::default());
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_callback_progress_with_error_handler() {
        let error_count = Arc::new(AtomicUsize::new(0));
        let error_count_clone = error_count.clone();

        let progress = CallbackProgress::new(|_| {}).on_error(move |_, _| {
            error_count_clone.fetch_add(1, Ordering::SeqCst);
        });

        let error = DocQualityError::Internal("test".into());
        ProgressHandler::on_error(&progress, &error, None);
        assert_eq!(error_count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_callback_progress_completion() {
        let seen = Arc::new(AtomicUsize::new(0));
        let seen_clone = seen.clone();

        let progress = CallbackProgress::new(|_| {}).on_complete(move |summary| {
            seen_clone.store(summary.total_files, Ordering::SeqCst);
        });

        let summary = BatchSummary {
            total_files: 7,
            ..Default::default()
        };
        ProgressHandler::on_complete(&progress, &summary);
        assert_eq!(seen.load(Ordering::SeqCst), 7);
    }

    #[test]
    fn test_callback_progress_cancellation() {
        let progress = CallbackProgress::new(|_| {});

        assert!(!progress.is_cancelled());
        progress.cancel();
        assert!(progress.is_cancelled());
        progress.reset();
        assert!(!progress.is_cancelled());
    }
}
