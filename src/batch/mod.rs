//! Batch clip processing.
//!
//! The core of the crate: takes a [`crate::models::BatchJob`], trims each
//! clip from the source video, feeds the trimmed file through the frame
//! extractor, and aggregates per-clip and overall progress into a single
//! event stream.
//!
//! # Architecture
//!
//! ```text
//! BatchProcessor
//!     for each clip (sequential):
//!         ├── trim       (ffmpeg stream copy -> temp file)
//!         ├── extract    (frame extractor, streamed progress)
//!         └── cleanup    (temp file removed on every path)
//!     final event: overall_progress == 100
//! ```
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use afe_core::batch::{BatchProcessor, ProgressCallback};
//! use afe_core::tools::SubprocessAdapter;
//!
//! let adapter = Arc::new(SubprocessAdapter::new(settings.tools.clone()));
//! let processor = BatchProcessor::new(adapter, ".temp");
//!
//! let callback: ProgressCallback = Box::new(|event| {
//!     println!("{} ({}%)", event.status, event.overall_progress);
//! });
//! let result = processor.process_batch(&job, Some(&callback))?;
//! println!("{} of {} clips succeeded", result.success_count(), result.results.len());
//! ```

mod processor;
mod progress;
mod temp;

pub use processor::{BatchError, BatchProcessor, CancelHandle, ProgressCallback};
pub use progress::{clamp_clip_progress, overall_progress};
pub use temp::TempClip;
