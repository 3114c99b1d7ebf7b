//! Settings struct with TOML-based sections.
//!
//! Settings are organized into logical sections that map to TOML tables.
//! Each section can be updated independently for atomic section-level
//! updates.

use serde::{Deserialize, Serialize};

use crate::models::DetectionMode;

/// Root settings structure containing all configuration sections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Path-related settings.
    #[serde(default)]
    pub paths: PathSettings,

    /// External tool locations.
    #[serde(default)]
    pub tools: ToolSettings,

    /// Default processing settings for new clips.
    #[serde(default)]
    pub processing: ProcessingSettings,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Path configuration for output, temp, and logs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathSettings {
    /// Output folder for extracted frames.
    #[serde(default = "default_output_folder")]
    pub output_folder: String,

    /// Root folder for temporary trimmed clips.
    #[serde(default = "default_temp_root")]
    pub temp_root: String,

    /// Folder for log files.
    #[serde(default = "default_logs_folder")]
    pub logs_folder: String,

    /// Last video file opened by the user.
    #[serde(default)]
    pub last_input_path: String,
}

fn default_output_folder() -> String {
    "frames_output".to_string()
}

fn default_temp_root() -> String {
    ".temp".to_string()
}

fn default_logs_folder() -> String {
    ".logs".to_string()
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            output_folder: default_output_folder(),
            temp_root: default_temp_root(),
            logs_folder: default_logs_folder(),
            last_input_path: String::new(),
        }
    }
}

/// Locations of the external executables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSettings {
    /// Path to the ffmpeg binary used for trimming.
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: String,

    /// Path to the ffprobe binary used for metadata probing.
    #[serde(default = "default_ffprobe_path")]
    pub ffprobe_path: String,

    /// Path to the bundled frame-extractor executable.
    #[serde(default = "default_frame_extractor_path")]
    pub frame_extractor_path: String,
}

fn default_ffmpeg_path() -> String {
    "ffmpeg".to_string()
}

fn default_ffprobe_path() -> String {
    "ffprobe".to_string()
}

fn default_frame_extractor_path() -> String {
    "frame_processor".to_string()
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            ffmpeg_path: default_ffmpeg_path(),
            ffprobe_path: default_ffprobe_path(),
            frame_extractor_path: default_frame_extractor_path(),
        }
    }
}

/// Default processing settings applied to newly created clips.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingSettings {
    /// Default motion detection mode.
    #[serde(default)]
    pub default_mode: DetectionMode,

    /// Default motion threshold.
    #[serde(default = "default_threshold")]
    pub default_threshold: f64,

    /// Default minimum static frame run.
    #[serde(default = "default_min_frames")]
    pub default_min_frames: u32,
}

fn default_threshold() -> f64 {
    0.02
}

fn default_min_frames() -> u32 {
    1
}

impl Default for ProcessingSettings {
    fn default() -> Self {
        Self {
            default_mode: DetectionMode::default(),
            default_threshold: default_threshold(),
            default_min_frames: default_min_frames(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Use compact log format (progress filtered to step intervals).
    #[serde(default = "default_true")]
    pub compact: bool,

    /// Number of tool-output lines kept for error diagnosis.
    #[serde(default = "default_error_tail")]
    pub error_tail: u32,

    /// Progress update step percentage.
    #[serde(default = "default_progress_step")]
    pub progress_step: u32,

    /// Show timestamps in log output.
    #[serde(default = "default_true")]
    pub show_timestamps: bool,
}

fn default_true() -> bool {
    true
}

fn default_error_tail() -> u32 {
    20
}

fn default_progress_step() -> u32 {
    20
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            compact: true,
            error_tail: default_error_tail(),
            progress_step: default_progress_step(),
            show_timestamps: true,
        }
    }
}

/// Identifies a config section for atomic section-level updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSection {
    Paths,
    Tools,
    Processing,
    Logging,
}

impl ConfigSection {
    /// The TOML table name for this section.
    pub fn table_name(&self) -> &'static str {
        match self {
            ConfigSection::Paths => "paths",
            ConfigSection::Tools => "tools",
            ConfigSection::Processing => "processing",
            ConfigSection::Logging => "logging",
        }
    }

    /// All sections, in file order.
    pub fn all() -> [ConfigSection; 4] {
        [
            ConfigSection::Paths,
            ConfigSection::Tools,
            ConfigSection::Processing,
            ConfigSection::Logging,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_extractor_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.processing.default_mode, DetectionMode::Character);
        assert!((settings.processing.default_threshold - 0.02).abs() < f64::EPSILON);
        assert_eq!(settings.processing.default_min_frames, 1);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [tools]
            ffmpeg_path = "/opt/ffmpeg/bin/ffmpeg"
            "#,
        )
        .unwrap();

        assert_eq!(settings.tools.ffmpeg_path, "/opt/ffmpeg/bin/ffmpeg");
        assert_eq!(settings.tools.ffprobe_path, "ffprobe");
        assert_eq!(settings.paths.output_folder, "frames_output");
    }

    #[test]
    fn section_table_names() {
        for section in ConfigSection::all() {
            assert!(!section.table_name().is_empty());
        }
    }
}
