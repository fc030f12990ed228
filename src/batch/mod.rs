//! Parallel quality assessment of many files.
//!
//! Assessments are independent, so files are spread over a rayon pool with
//! one shared, read-only assessor. Results come back in path order.
//!
//! # Example
//!
//! ```rust,ignore
//! use doc_quality::batch::BatchAssessor;
//! use doc_quality::config::AssessmentConfig;
//! use std::path::Path;
//!
//! let batch = BatchAssessor::without_progress(AssessmentConfig::default())
//!     .max_parallel(4)
//!     .recursive(true);
//!
//! let outcome = batch.assess_directory(Path::new("./uploads"))?;
//! println!("{} of {} passed", outcome.summary.passed, outcome.summary.total_files);
//! ```

mod file_discovery;
mod job;

pub use file_discovery::{FileDiscovery, DEFAULT_PATTERNS};
pub use job::{FileAssessment, FileStatus};

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use serde::Serialize;

use crate::config::AssessmentConfig;
use crate::error::{DocQualityError, Result};
use crate::pipeline::{AssessorBuilder, QualityAssessor};
use crate::progress::{NullProgress, ProgressEvent, ProgressHandler};
use crate::scoring::QualityLabel;

/// Aggregate statistics for a batch.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchSummary {
    /// Files in the batch.
    pub total_files: usize,
    /// Files that passed.
    pub passed: usize,
    /// Files assessed but not passing.
    pub failed: usize,
    /// Files that could not be read.
    pub errors: usize,
    /// Files skipped by cancellation.
    pub cancelled: usize,
    /// Mean score over assessed files.
    pub average_score: f64,
    /// Number of assessed files per label.
    pub labels: BTreeMap<QualityLabel, usize>,
    /// Wall-clock time in milliseconds.
    pub total_time_ms: u64,
}

impl BatchSummary {
    /// Build a summary from per-file results.
    pub fn from_results(results: &[FileAssessment], total_time_ms: u64) -> Self {
        let mut summary = BatchSummary {
            total_files: results.len(),
            total_time_ms,
            ..Default::default()
        };

        let mut score_sum = 0u64;
        for result in results {
            match result.status() {
                FileStatus::Passed => summary.passed += 1,
                FileStatus::Failed => summary.failed += 1,
                FileStatus::Error => summary.errors += 1,
                FileStatus::Cancelled => summary.cancelled += 1,
            }
            if let Some(report) = result.report() {
                score_sum += report.score as u64;
                *summary.labels.entry(report.label).or_insert(0) += 1;
            }
        }

        let assessed = summary.passed + summary.failed;
        if assessed > 0 {
            summary.average_score = score_sum as f64 / assessed as f64;
        }
        summary
    }

    /// Share of assessed files that passed, in percent.
    pub fn pass_rate_percent(&self) -> f64 {
        let assessed = self.passed + self.failed;
        if assessed == 0 {
            0.0
        } else {
            self.passed as f64 / assessed as f64 * 100.0
        }
    }
}

/// Per-file results plus their summary.
#[derive(Debug)]
pub struct BatchOutcome {
    /// One entry per file, in path order.
    pub results: Vec<FileAssessment>,
    /// Aggregate statistics.
    pub summary: BatchSummary,
}

/// Batch assessor for directories or file lists.
pub struct BatchAssessor<P: ProgressHandler> {
    /// Assessment configuration.
    config: AssessmentConfig,

    /// Progress handler.
    progress: P,

    /// Maximum parallel jobs.
    max_parallel: usize,

    /// Whether to scan directories recursively.
    recursive: bool,

    /// File patterns to match; `None` uses the default document extensions.
    patterns: Option<Vec<String>>,

    /// Whether to follow symbolic links during discovery.
    follow_symlinks: bool,

    /// Cancellation flag.
    cancelled: Arc<AtomicBool>,
}

impl<P: ProgressHandler> BatchAssessor<P> {
    /// Create a new batch assessor.
    pub fn new(config: AssessmentConfig, progress: P) -> Self {
        Self {
            config,
            progress,
            max_parallel: num_cpus::get(),
            recursive: false,
            patterns: None,
            follow_symlinks: false,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Set maximum parallel jobs.
    pub fn max_parallel(mut self, n: usize) -> Self {
        self.max_parallel = n.max(1);
        self
    }

    /// Enable recursive directory scanning.
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Follow symbolic links to files and directories.
    pub fn follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    /// Add a file pattern to match.
    pub fn pattern(mut self, pattern: &str) -> Self {
        self.patterns
            .get_or_insert_with(Vec::new)
            .push(pattern.to_string());
        self
    }

    /// Request cancellation. Files already started still finish.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst) || self.progress.is_cancelled()
    }

    /// Assess every matching file in a directory.
    pub fn assess_directory(&self, input_dir: &Path) -> Result<BatchOutcome> {
        self.progress.on_progress(&ProgressEvent::discovery(format!(
            "Scanning {}",
            input_dir.display()
        )));

        let mut discovery = FileDiscovery::new()
            .recursive(self.recursive)
            .follow_symlinks(self.follow_symlinks);
        if let Some(ref patterns) = self.patterns {
            discovery = discovery.patterns(patterns.clone());
        }
        let files = discovery.discover(input_dir)?;

        log::info!("Found {} documents in {}", files.len(), input_dir.display());
        self.assess_files(&files)
    }

    /// Assess a list of files.
    pub fn assess_files(&self, files: &[PathBuf]) -> Result<BatchOutcome> {
        let start = Instant::now();
        let total = files.len();

        let assessor = AssessorBuilder::new().config(self.config.clone()).build()?;

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.max_parallel)
            .build()
            .map_err(|e| DocQualityError::Internal(e.to_string()))?;

        let completed = AtomicUsize::new(0);
        let results: Vec<FileAssessment> = pool.install(|| {
            files
                .par_iter()
                .enumerate()
                .map(|(index, path)| {
                    let item = self.assess_one(&assessor, index, path);
                    let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                    let event = match &item.outcome {
                        Ok(report) => ProgressEvent::assessed(path, report.score),
                        Err(DocQualityError::Cancelled) => ProgressEvent::skipped(path),
                        Err(e) => ProgressEvent::failed(path, e),
                    };
                    self.progress.on_progress(&event.with_batch_progress(done, total));
                    item
                })
                .collect()
        });

        let summary = BatchSummary::from_results(&results, start.elapsed().as_millis() as u64);
        self.progress.on_progress(&ProgressEvent::complete(total));
        self.progress.on_complete(&summary);

        Ok(BatchOutcome { results, summary })
    }

    fn assess_one(&self, assessor: &QualityAssessor, index: usize, path: &Path) -> FileAssessment {
        if self.is_cancelled() {
            return FileAssessment {
                index,
                path: path.to_path_buf(),
                outcome: Err(DocQualityError::Cancelled),
                duration_ms: 0,
            };
        }

        let start = Instant::now();
        let outcome = assessor.assess_file(path);
        if let Err(ref e) = outcome {
            log::error!("Failed to assess {}: {}", path.display(), e);
            self.progress.on_error(e, Some(path));
        }

        FileAssessment {
            index,
            path: path.to_path_buf(),
            outcome,
            duration_ms: start.elapsed().as_millis() as u64,
        }
    }
}

impl BatchAssessor<NullProgress> {
    /// Create a batch assessor without progress reporting.
    pub fn without_progress(config: AssessmentConfig) -> Self {
        Self::new(config, NullProgress)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::{CallbackProgress, ProgressPhase};
    use std::sync::Mutex;
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
    use std::fs;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn write_png(path: &Path, image: RgbImage) {
        let mut buffer = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(image)
            .write_to(&mut buffer, ImageFormat::Png)
            .unwrap();
        fs::write(path, buffer.into_inner()).unwrap();
    }

    fn create_upload_directory() -> TempDir {
        let dir = TempDir::new().unwrap();
        write_png(
            &dir.path().join("a_gray.png"),
            RgbImage::from_pixel(32, 32, Rgb([140, 140, 140])),
        );
        fs::write(dir.path().join("b_broken.jpg"), b"not a jpeg").unwrap();
        fs::write(dir.path().join("c_statement.pdf"), vec![b'%'; 100 * 1024]).unwrap();
        fs::write(dir.path().join("ignored.txt"), b"notes").unwrap();
        dir
    }

    #[test]
    fn test_batch_assessor_defaults() {
        let batch = BatchAssessor::without_progress(AssessmentConfig::default());
        assert_eq!(batch.max_parallel, num_cpus::get());
        assert!(!batch.recursive);
        assert!(batch.patterns.is_none());

        let batch = batch.max_parallel(0).pattern("*.heic");
        assert_eq!(batch.max_parallel, 1);
        assert_eq!(batch.patterns, Some(vec!["*.heic".to_string()]));
    }

    #[test]
    fn test_assess_directory() {
        let dir = create_upload_directory();
        let batch = BatchAssessor::without_progress(AssessmentConfig::default()).max_parallel(2);
        let outcome = batch.assess_directory(dir.path()).unwrap();

        assert_eq!(outcome.results.len(), 3);
        let names: Vec<String> = outcome.results.iter().map(|r| r.file_name()).collect();
        assert_eq!(names, vec!["a_gray.png", "b_broken.jpg", "c_statement.pdf"]);
        assert!(outcome.results.iter().enumerate().all(|(i, r)| r.index == i));

        // 32x32 flat gray: resolution, contrast, sharpness, file size
        assert_eq!(outcome.results[0].report().unwrap().score, 35);
        assert_eq!(outcome.results[1].report().unwrap().score, 0);
        assert_eq!(outcome.results[2].report().unwrap().score, 100);

        let summary = &outcome.summary;
        assert_eq!(summary.total_files, 3);
        assert_eq!(summary.passed, 1);
        assert_eq!(summary.failed, 2);
        assert_eq!(summary.errors, 0);
        assert!((summary.average_score - 45.0).abs() < 1e-9);
        assert_eq!(summary.labels.get(&QualityLabel::Excellent), Some(&1));
        assert_eq!(summary.labels.get(&QualityLabel::VeryPoor), Some(&2));
    }

    #[test]
    fn test_missing_file_is_error_entry() {
        let batch = BatchAssessor::without_progress(AssessmentConfig::default());
        let outcome = batch
            .assess_files(&[PathBuf::from("/nonexistent/scan.png")])
            .unwrap();
        assert_eq!(outcome.results[0].status(), FileStatus::Error);
        assert_eq!(outcome.summary.errors, 1);
        assert_eq!(outcome.summary.pass_rate_percent(), 0.0);
    }

    #[test]
    fn test_cancelled_batch_skips_files() {
        let dir = create_upload_directory();
        let batch = BatchAssessor::without_progress(AssessmentConfig::default());
        batch.cancel();

        let outcome = batch.assess_directory(dir.path()).unwrap();
        assert!(outcome
            .results
            .iter()
            .all(|r| r.status() == FileStatus::Cancelled));
        assert_eq!(outcome.summary.cancelled, 3);
    }

    #[test]
    fn test_progress_callbacks() {
        let dir = create_upload_directory();
        let events = Arc::new(AtomicUsize::new(0));
        let events_clone = events.clone();
        let finished = Arc::new(AtomicBool::new(false));
        let finished_clone = finished.clone();

        let progress = CallbackProgress::new(move |_| {
            events_clone.fetch_add(1, Ordering::SeqCst);
        })
        .on_complete(move |summary| {
            assert_eq!(summary.total_files, 3);
            finished_clone.store(true, Ordering::SeqCst);
        });

        BatchAssessor::new(AssessmentConfig::default(), progress)
            .assess_directory(dir.path())
            .unwrap();

        // discovery + one per file + completion
        assert_eq!(events.load(Ordering::SeqCst), 5);
        assert!(finished.load(Ordering::SeqCst));
    }

    #[test]
    fn test_progress_event_for_every_file() {
        let dir = create_upload_directory();
        let mut files = FileDiscovery::new().discover(dir.path()).unwrap();
        files.push(dir.path().join("z_missing.png"));

        let events = Arc::new(Mutex::new(Vec::new()));
        let events_clone = events.clone();
        let progress = CallbackProgress::new(move |event: ProgressEvent| {
            if event.current_file.is_some() {
                events_clone.lock().unwrap().push(event);
            }
        });

        let outcome = BatchAssessor::new(AssessmentConfig::default(), progress)
            .max_parallel(1)
            .assess_files(&files)
            .unwrap();
        assert_eq!(outcome.summary.errors, 1);

        let events = events.lock().unwrap();
        assert_eq!(events.len(), 4);
        let mut completed: Vec<usize> = events.iter().map(|e| e.completed_files).collect();
        completed.sort();
        assert_eq!(completed, vec![1, 2, 3, 4]);

        let failed: Vec<&ProgressEvent> = events
            .iter()
            .filter(|e| e.phase == ProgressPhase::Failed)
            .collect();
        assert_eq!(failed.len(), 1);
        assert!(failed[0]
            .current_file
            .as_ref()
            .unwrap()
            .ends_with("z_missing.png"));
    }

    #[test]
    fn test_cancelled_files_emit_skipped_events() {
        let dir = create_upload_directory();
        let skipped = Arc::new(AtomicUsize::new(0));
        let skipped_clone = skipped.clone();
        let progress = CallbackProgress::new(move |event: ProgressEvent| {
            if event.phase == ProgressPhase::Skipped {
                skipped_clone.fetch_add(1, Ordering::SeqCst);
            }
        });
        progress.cancel();

        BatchAssessor::new(AssessmentConfig::default(), progress)
            .assess_directory(dir.path())
            .unwrap();
        assert_eq!(skipped.load(Ordering::SeqCst), 3);
    }

    #[cfg(unix)]
    #[test]
    fn test_follow_symlinks() {
        let dir = create_upload_directory();
        let shared = TempDir::new().unwrap();
        fs::write(shared.path().join("shared.pdf"), vec![b'%'; 100 * 1024]).unwrap();
        std::os::unix::fs::symlink(shared.path(), dir.path().join("linked")).unwrap();

        let plain = BatchAssessor::without_progress(AssessmentConfig::default())
            .recursive(true)
            .assess_directory(dir.path())
            .unwrap();
        assert_eq!(plain.results.len(), 3);

        let followed = BatchAssessor::without_progress(AssessmentConfig::default())
            .recursive(true)
            .follow_symlinks(true)
            .assess_directory(dir.path())
            .unwrap();
        assert_eq!(followed.results.len(), 4);
        assert!(followed
            .results
            .iter()
            .any(|r| r.path.ends_with("linked/shared.pdf")));
    }
}
