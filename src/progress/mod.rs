//! Progress reporting for batch assessment.
//!
//! # Example
//!
//! ```rust,ignore
//! use doc_quality::progress::CallbackProgress;
//!
//! let progress = CallbackProgress::new(|event| {
//!     println!("Progress: {:.1}%", event.overall_progress * 100.0);
//! });
//!
//! let assessor = BatchAssessor::new(config, progress);
//! ```

mod callback;
mod handler;

pub use callback::CallbackProgress;
pub use handler::{NullProgress, ProgressEvent, ProgressHandler, ProgressPhase};
