//! Batch clip processor.
//!
//! Drives the trim -> extract sequence for each clip in submission order,
//! strictly one at a time. Per-clip failures are recorded and never abort
//! the batch; exactly one result is produced per clip on every exit path.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;

use crate::logging::JobLogger;
use crate::models::{BatchJob, BatchProgress, BatchResult, Clip, ClipProcessResult, ClipSettings};
use crate::tools::{ExtractEvent, ToolAdapter};

use super::progress::{clamp_clip_progress, overall_progress};
use super::temp::TempClip;

/// Progress callback type for batch progress events.
pub type ProgressCallback = Box<dyn Fn(&BatchProgress) + Send + Sync>;

/// Error aborting a batch before any subprocess is spawned.
///
/// Everything that happens after pre-flight checks resolves into per-clip
/// results instead of an error.
#[derive(Error, Debug)]
pub enum BatchError {
    /// The clip list violates an invariant (empty id, inverted range,
    /// duplicate ids, out-of-range settings).
    #[error("Invalid batch job: {0}")]
    InvalidJob(String),

    /// Failed to prepare working directories.
    #[error("Batch setup failed: {message}")]
    Setup {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

/// Handle for cancelling a running batch.
///
/// Cancellation is cooperative and only takes effect between clips, never
/// mid-subprocess. Clips not yet attempted are recorded as failed so the
/// one-result-per-clip invariant holds.
#[derive(Clone)]
pub struct CancelHandle {
    flag: Arc<AtomicBool>,
}

impl CancelHandle {
    /// Request cancellation at the next clip boundary.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Check if cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Processor that runs a batch of clips through trim and extraction.
///
/// # Example
///
/// ```ignore
/// let adapter = Arc::new(SubprocessAdapter::new(settings.tools.clone()));
/// let processor = BatchProcessor::new(adapter, settings.paths.temp_root.clone());
/// let result = processor.process_batch(&job, Some(&callback))?;
/// ```
pub struct BatchProcessor {
    /// Adapter over the external tools.
    adapter: Arc<dyn ToolAdapter>,
    /// Directory for trimmed temp clips.
    temp_dir: PathBuf,
    /// Cancellation flag, checked between clips.
    cancelled: Arc<AtomicBool>,
    /// Optional per-batch logger. Receives phase markers, tool
    /// invocations, tool output, and a tail dump for failed clips.
    logger: Option<Arc<JobLogger>>,
}

impl BatchProcessor {
    /// Create a new batch processor.
    pub fn new(adapter: Arc<dyn ToolAdapter>, temp_dir: impl Into<PathBuf>) -> Self {
        Self {
            adapter,
            temp_dir: temp_dir.into(),
            cancelled: Arc::new(AtomicBool::new(false)),
            logger: None,
        }
    }

    /// Attach a per-batch logger.
    pub fn with_logger(mut self, logger: Arc<JobLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Get a cancellation handle for this processor.
    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            flag: Arc::clone(&self.cancelled),
        }
    }

    /// Process every clip of `job` in submission order.
    ///
    /// Always attempts the full sequence: individual clip failures are
    /// recorded in the returned [`BatchResult`] and the loop proceeds to
    /// the next clip. `Err` is returned only for invariant violations
    /// detected before any subprocess is spawned.
    ///
    /// An empty clip list short-circuits to a successful empty result with
    /// zero progress events.
    pub fn process_batch(
        &self,
        job: &BatchJob,
        on_progress: Option<&ProgressCallback>,
    ) -> Result<BatchResult, BatchError> {
        let total = job.clips.len();
        if total == 0 {
            return Ok(BatchResult::from_results(Vec::new()));
        }

        job.validate().map_err(BatchError::InvalidJob)?;

        fs::create_dir_all(&self.temp_dir).map_err(|e| BatchError::Setup {
            message: format!("cannot create temp directory {}", self.temp_dir.display()),
            source: e,
        })?;
        fs::create_dir_all(&job.output_dir).map_err(|e| BatchError::Setup {
            message: format!("cannot create output directory {}", job.output_dir.display()),
            source: e,
        })?;

        let logger = self.logger.as_deref();
        if let Some(l) = logger {
            l.info(&format!(
                "Starting batch: {} clips from {}",
                total,
                job.input_path.display()
            ));
        }

        let mut emitter = ProgressEmitter::new(on_progress, logger);
        let mut results = Vec::with_capacity(total);

        for (i, clip) in job.clips.iter().enumerate() {
            if self.cancelled.load(Ordering::SeqCst) {
                tracing::info!("Batch cancelled before clip {}/{}", i + 1, total);
                if let Some(l) = logger {
                    l.warn(&format!("Cancelled before clip {} of {}", i + 1, total));
                }
                results.push(ClipProcessResult::failed(
                    &clip.id,
                    "Cancelled before processing",
                ));
                continue;
            }

            let status = clip_status(i, total, &clip.name);
            tracing::info!("{}", status);
            if let Some(l) = logger {
                // Scope the tail dump to this clip's output
                l.clear_tail();
                l.phase(&status);
            }
            emitter.emit(BatchProgress {
                clip_id: clip.id.clone(),
                clip_index: i,
                total_clips: total,
                clip_progress: 0,
                overall_progress: overall_progress(i, 0, total),
                status,
            });

            results.push(self.process_clip(job, clip, i, total, &mut emitter));
        }

        emitter.emit(BatchProgress {
            clip_id: String::new(),
            clip_index: total,
            total_clips: total,
            clip_progress: 100,
            overall_progress: 100,
            status: "Processing complete!".to_string(),
        });

        if let Some(l) = logger {
            l.success("Processing complete!");
            l.flush();
        }

        Ok(BatchResult::from_results(results))
    }

    /// Run one clip through trim and extraction.
    ///
    /// Returns a result on every path; the trimmed temp file never
    /// outlives this call.
    fn process_clip(
        &self,
        job: &BatchJob,
        clip: &Clip,
        index: usize,
        total: usize,
        emitter: &mut ProgressEmitter<'_>,
    ) -> ClipProcessResult {
        let logger = self.logger.as_deref();
        let temp_path = self.temp_dir.join(format!("trim_{}.mp4", clip.id));

        if let Some(l) = logger {
            l.command(&format!(
                "trim {} [{:.3}s +{:.3}s] -> {}",
                job.input_path.display(),
                clip.start_time,
                clip.duration(),
                temp_path.display()
            ));
        }

        if let Err(e) = self.adapter.trim(
            &job.input_path,
            clip.start_time,
            clip.duration(),
            &temp_path,
        ) {
            tracing::warn!("Trim failed for clip '{}': {}", clip.id, e);
            if let Some(l) = logger {
                l.error(&format!("Trim failed for clip '{}': {}", clip.id, e));
                l.show_tail(&clip.id);
            }
            // Discard whatever the trim tool may have left behind
            drop(TempClip::new(temp_path));
            return ClipProcessResult::failed(&clip.id, format!("Trim failed: {e}"));
        }

        let temp = TempClip::new(temp_path);

        // Pin the output name so the extractor's result is where the
        // recorded output path says it is.
        let settings = ClipSettings {
            output_name: Some(clip.output_stem().to_string()),
            ..clip.settings.clone()
        };

        if let Some(l) = logger {
            l.command(&format!(
                "extract {} -> {} (mode {}, threshold {}, min-frames {})",
                temp.path().display(),
                job.output_dir.display(),
                settings.mode,
                settings.threshold,
                settings.min_frames
            ));
        }

        let status = clip_status(index, total, &clip.name);
        let clip_id = clip.id.clone();
        let mut on_event = |event: ExtractEvent<'_>| match event {
            ExtractEvent::Progress(raw) => {
                let clip_progress = clamp_clip_progress(raw);
                emitter.emit(BatchProgress {
                    clip_id: clip_id.clone(),
                    clip_index: index,
                    total_clips: total,
                    clip_progress,
                    overall_progress: overall_progress(index, clip_progress, total),
                    status: status.clone(),
                });
            }
            ExtractEvent::Output { line, is_stderr } => match logger {
                Some(l) => l.output_line(line, is_stderr),
                None => tracing::debug!("extractor: {}", line),
            },
        };

        let outcome = self
            .adapter
            .extract(temp.path(), &job.output_dir, &settings, &mut on_event);

        // `temp` is dropped at the end of this function on every path,
        // removing the trimmed file whether extraction succeeded or not.
        match outcome {
            Ok(()) => {
                let output_path = job
                    .output_dir
                    .join(format!("{}.mp4", clip.output_stem()));
                tracing::info!(
                    "Clip '{}' extracted to {}",
                    clip.id,
                    output_path.display()
                );
                if let Some(l) = logger {
                    l.success(&format!(
                        "Clip '{}' extracted to {}",
                        clip.id,
                        output_path.display()
                    ));
                }
                ClipProcessResult::ok(&clip.id, output_path)
            }
            Err(e) => {
                tracing::warn!("Extraction failed for clip '{}': {}", clip.id, e);
                if let Some(l) = logger {
                    l.error(&format!("Extraction failed for clip '{}': {}", clip.id, e));
                    l.show_tail(&clip.id);
                }
                ClipProcessResult::failed(&clip.id, format!("Extraction failed: {e}"))
            }
        }
    }

    /// Extract frames from a whole file without trimming.
    ///
    /// Used when the user processes a single video directly instead of a
    /// clip batch.
    pub fn process_file(
        &self,
        input: &Path,
        output_dir: &Path,
        settings: &ClipSettings,
        on_progress: Option<&ProgressCallback>,
    ) -> ClipProcessResult {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "video".to_string());
        let out_stem = settings.output_name.clone().unwrap_or_else(|| stem.clone());

        let logger = self.logger.as_deref();
        let settings = ClipSettings {
            output_name: Some(out_stem.clone()),
            ..settings.clone()
        };

        if let Some(l) = logger {
            l.clear_tail();
            l.command(&format!(
                "extract {} -> {} (mode {}, threshold {}, min-frames {})",
                input.display(),
                output_dir.display(),
                settings.mode,
                settings.threshold,
                settings.min_frames
            ));
        }

        let mut emitter = ProgressEmitter::new(on_progress, logger);
        let mut on_event = |event: ExtractEvent<'_>| match event {
            ExtractEvent::Progress(raw) => {
                let clip_progress = clamp_clip_progress(raw);
                emitter.emit(BatchProgress {
                    clip_id: stem.clone(),
                    clip_index: 0,
                    total_clips: 1,
                    clip_progress,
                    overall_progress: clip_progress,
                    status: format!("Processing {}", stem),
                });
            }
            ExtractEvent::Output { line, is_stderr } => match logger {
                Some(l) => l.output_line(line, is_stderr),
                None => tracing::debug!("extractor: {}", line),
            },
        };

        match self
            .adapter
            .extract(input, output_dir, &settings, &mut on_event)
        {
            Ok(()) => ClipProcessResult::ok(&stem, output_dir.join(format!("{out_stem}.mp4"))),
            Err(e) => {
                if let Some(l) = logger {
                    l.error(&format!("Extraction failed for {}: {}", stem, e));
                    l.show_tail(&stem);
                }
                ClipProcessResult::failed(&stem, format!("Extraction failed: {e}"))
            }
        }
    }
}

/// Status text naming the clip and its 1-based ordinal.
fn clip_status(index: usize, total: usize, name: &str) -> String {
    format!("Processing clip {} of {}: {}", index + 1, total, name)
}

/// Emits progress events while enforcing batch-level monotonicity.
///
/// The extractor's own progress may jitter; the emitted overall percentage
/// never decreases within a run.
struct ProgressEmitter<'a> {
    callback: Option<&'a ProgressCallback>,
    logger: Option<&'a JobLogger>,
    high_water: u8,
}

impl<'a> ProgressEmitter<'a> {
    fn new(callback: Option<&'a ProgressCallback>, logger: Option<&'a JobLogger>) -> Self {
        Self {
            callback,
            logger,
            high_water: 0,
        }
    }

    fn emit(&mut self, mut event: BatchProgress) {
        if event.overall_progress < self.high_water {
            event.overall_progress = self.high_water;
        }
        self.high_water = event.overall_progress;

        if let Some(logger) = self.logger {
            logger.progress(u32::from(event.overall_progress));
        }

        tracing::debug!(
            "progress: clip {}/{} clip={}% overall={}%",
            event.clip_index + 1,
            event.total_clips,
            event.clip_progress,
            event.overall_progress
        );

        if let Some(callback) = self.callback {
            callback(&event);
        }
    }
}
