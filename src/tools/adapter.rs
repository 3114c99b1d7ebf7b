//! Typed adapter over the external tools.
//!
//! The batch processor talks to the outside world only through this trait,
//! so orchestration logic can be tested against a fake adapter with no
//! subprocess plumbing involved.

use std::path::Path;

use crate::config::ToolSettings;
use crate::models::{ClipSettings, VideoMetadata};

use super::error::ToolResult;
use super::{extractor, ffmpeg, probe};

/// Event streamed from the frame extractor while it runs.
#[derive(Debug)]
pub enum ExtractEvent<'a> {
    /// A progress marker from the tool's stdout. Values are passed through
    /// raw; callers must not assume they are monotonic or bounded.
    Progress(u32),
    /// Any other output line. stderr lines are replayed once the tool
    /// exits, so they may arrive after the last progress marker.
    Output { line: &'a str, is_stderr: bool },
}

/// Adapter over the trim, extract, and probe tools.
pub trait ToolAdapter: Send + Sync {
    /// Stream-copy the range `[start_secs, start_secs + duration_secs)` of
    /// `source` into `dest` without re-encoding.
    fn trim(
        &self,
        source: &Path,
        start_secs: f64,
        duration_secs: f64,
        dest: &Path,
    ) -> ToolResult<()>;

    /// Run the frame extractor on `input`, writing into `output_dir`.
    ///
    /// Progress markers and output lines are forwarded to `on_event` as
    /// they arrive.
    fn extract(
        &self,
        input: &Path,
        output_dir: &Path,
        settings: &ClipSettings,
        on_event: &mut dyn FnMut(ExtractEvent<'_>),
    ) -> ToolResult<()>;

    /// Probe a video file for duration, frame rate, and codec information.
    fn probe(&self, path: &Path) -> ToolResult<VideoMetadata>;
}

/// Production adapter that spawns the configured external binaries.
pub struct SubprocessAdapter {
    tools: ToolSettings,
}

impl SubprocessAdapter {
    /// Create an adapter using the given tool locations.
    pub fn new(tools: ToolSettings) -> Self {
        Self { tools }
    }
}

impl ToolAdapter for SubprocessAdapter {
    fn trim(
        &self,
        source: &Path,
        start_secs: f64,
        duration_secs: f64,
        dest: &Path,
    ) -> ToolResult<()> {
        ffmpeg::trim_stream_copy(&self.tools.ffmpeg_path, source, start_secs, duration_secs, dest)
    }

    fn extract(
        &self,
        input: &Path,
        output_dir: &Path,
        settings: &ClipSettings,
        on_event: &mut dyn FnMut(ExtractEvent<'_>),
    ) -> ToolResult<()> {
        extractor::run_extractor(
            &self.tools.frame_extractor_path,
            input,
            output_dir,
            settings,
            on_event,
        )
    }

    fn probe(&self, path: &Path) -> ToolResult<VideoMetadata> {
        probe::probe_file(&self.tools.ffprobe_path, path)
    }
}
