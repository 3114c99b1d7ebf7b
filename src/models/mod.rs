//! Data models for Anime Frame Extractor.
//!
//! This module contains the core data structures used throughout the crate:
//! - Enums (detection mode)
//! - Clip structures (clips, settings, video metadata)
//! - Batch structures (jobs, per-clip results, progress events)
//!
//! These are plain value types: the UI layer subscribes to progress events
//! and receives a full result set, but never shares mutable state with the
//! batch processor.

mod clips;
mod enums;
mod results;

// Re-export all public types
pub use clips::{BatchJob, Clip, ClipSettings, VideoMetadata};
pub use enums::DetectionMode;
pub use results::{BatchProgress, BatchResult, ClipProcessResult};
