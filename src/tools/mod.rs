//! External tool adapters.
//!
//! The batch processor consumes three out-of-process collaborators:
//! - a trim tool (ffmpeg stream copy) for cutting clips,
//! - the frame-extraction executable, which streams `PROGRESS: <n>` lines,
//! - a metadata probe (ffprobe JSON).
//!
//! All three are reachable through the [`ToolAdapter`] trait so the
//! orchestrator never parses subprocess text itself.

mod adapter;
mod error;
mod extractor;
mod ffmpeg;
mod probe;

pub use adapter::{ExtractEvent, SubprocessAdapter, ToolAdapter};
pub use error::{ToolError, ToolResult};
pub use extractor::parse_progress_line;
pub use probe::probe_file;
