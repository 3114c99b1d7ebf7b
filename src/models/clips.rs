//! Clip and batch-job structures.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::enums::DetectionMode;

/// Settings for processing a single clip.
///
/// Copied by value into each extractor invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipSettings {
    /// Motion detection mode.
    #[serde(default)]
    pub mode: DetectionMode,
    /// Motion threshold in `[0, 1]`.
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    /// Minimum consecutive static frames before frames are dropped.
    #[serde(default = "default_min_frames")]
    pub min_frames: u32,
    /// Optional output file stem; the clip name is used when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_name: Option<String>,
}

fn default_threshold() -> f64 {
    0.02
}

fn default_min_frames() -> u32 {
    1
}

impl Default for ClipSettings {
    fn default() -> Self {
        Self {
            mode: DetectionMode::default(),
            threshold: default_threshold(),
            min_frames: default_min_frames(),
            output_name: None,
        }
    }
}

impl ClipSettings {
    /// Validate the settings.
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(format!(
                "threshold {} is outside [0, 1]",
                self.threshold
            ));
        }
        if self.min_frames < 1 {
            return Err("min_frames must be at least 1".to_string());
        }
        Ok(())
    }
}

/// A user-defined segment of the source video.
///
/// Immutable once processing starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    /// Unique clip identifier.
    pub id: String,
    /// Display name (also the default output file stem).
    pub name: String,
    /// Start offset in the source video, seconds.
    pub start_time: f64,
    /// End offset in the source video, seconds. Must exceed `start_time`.
    pub end_time: f64,
    /// Processing settings for this clip.
    pub settings: ClipSettings,
}

impl Clip {
    /// Create a clip with default settings.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        start_time: f64,
        end_time: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            start_time,
            end_time,
            settings: ClipSettings::default(),
        }
    }

    /// Clip duration in seconds.
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }

    /// The output file stem: `output_name` when set, the clip name otherwise.
    pub fn output_stem(&self) -> &str {
        self.settings.output_name.as_deref().unwrap_or(&self.name)
    }

    /// Validate the clip.
    pub fn validate(&self) -> Result<(), String> {
        if self.id.is_empty() {
            return Err("clip id is empty".to_string());
        }
        if !(self.end_time > self.start_time) {
            return Err(format!(
                "clip '{}' has end_time {} <= start_time {}",
                self.id, self.end_time, self.start_time
            ));
        }
        self.settings
            .validate()
            .map_err(|e| format!("clip '{}': {}", self.id, e))
    }
}

/// Input to one batch processing run.
///
/// Ephemeral: exists only for the duration of a single run. The processor
/// exclusively owns the clip sequence for that run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchJob {
    /// Source video to trim clips from.
    pub input_path: PathBuf,
    /// Directory that receives the extracted outputs.
    pub output_dir: PathBuf,
    /// Clips to process, in submission order.
    pub clips: Vec<Clip>,
}

impl BatchJob {
    /// Create a batch job.
    pub fn new(
        input_path: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        clips: Vec<Clip>,
    ) -> Self {
        Self {
            input_path: input_path.into(),
            output_dir: output_dir.into(),
            clips,
        }
    }

    /// Validate the whole clip list.
    ///
    /// Checked before any subprocess is spawned. Duplicate clip IDs are
    /// rejected because temp file names embed the ID.
    pub fn validate(&self) -> Result<(), String> {
        let mut seen = std::collections::HashSet::new();
        for clip in &self.clips {
            clip.validate()?;
            if !seen.insert(clip.id.as_str()) {
                return Err(format!("duplicate clip id '{}'", clip.id));
            }
        }
        Ok(())
    }
}

/// Video metadata as reported by the probe tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoMetadata {
    /// Path that was probed.
    pub path: PathBuf,
    /// Duration in seconds.
    pub duration: f64,
    /// Frames per second.
    pub fps: f64,
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Video codec name, if reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub codec: Option<String>,
}
