//! Batch processing results and progress events.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Result of processing a single clip.
///
/// One entry is produced per clip, in submission order, on every exit path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipProcessResult {
    /// Clip that was processed.
    pub clip_id: String,
    /// Whether the trim and extract steps both succeeded.
    pub success: bool,
    /// Path to the extracted output (if successful).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_path: Option<PathBuf>,
    /// Error message (if failed), including the tool's diagnostic output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ClipProcessResult {
    /// Create a successful result.
    pub fn ok(clip_id: impl Into<String>, output_path: PathBuf) -> Self {
        Self {
            clip_id: clip_id.into(),
            success: true,
            output_path: Some(output_path),
            error: None,
        }
    }

    /// Create a failed result.
    pub fn failed(clip_id: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            clip_id: clip_id.into(),
            success: false,
            output_path: None,
            error: Some(error.into()),
        }
    }
}

/// Consolidated result of one batch run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchResult {
    /// True iff every per-clip result succeeded.
    pub success: bool,
    /// Per-clip results, in submission order. Always the same length as
    /// the input clip list.
    pub results: Vec<ClipProcessResult>,
}

impl BatchResult {
    /// Build a batch result from per-clip results.
    pub fn from_results(results: Vec<ClipProcessResult>) -> Self {
        let success = results.iter().all(|r| r.success);
        Self { success, results }
    }

    /// Number of clips that succeeded.
    pub fn success_count(&self) -> usize {
        self.results.iter().filter(|r| r.success).count()
    }

    /// Number of clips that failed.
    pub fn failure_count(&self) -> usize {
        self.results.iter().filter(|r| !r.success).count()
    }
}

/// Transient progress event emitted during a batch run.
///
/// `overall_progress` is monotonically non-decreasing for the whole batch;
/// `clip_progress` resets to 0 at the start of each clip. The last event of
/// a run always carries `overall_progress == 100`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchProgress {
    /// Clip currently being processed (empty for the final event).
    pub clip_id: String,
    /// 0-based index of the current clip; equals `total_clips` on the
    /// final event.
    pub clip_index: usize,
    /// Number of clips in the batch.
    pub total_clips: usize,
    /// Progress within the current clip, 0-100.
    pub clip_progress: u8,
    /// Progress across the whole batch, 0-100.
    pub overall_progress: u8,
    /// Human-readable status text.
    pub status: String,
}
