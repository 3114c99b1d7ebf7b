//! Logging types and configuration.

use serde::{Deserialize, Serialize};

use crate::config::LoggingSettings;

/// Callback used to mirror log lines into a GUI log view.
pub type GuiLogCallback = Box<dyn Fn(&str) + Send + Sync>;

/// Log level for filtering messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum LogLevel {
    /// Trace-level debugging (very verbose).
    Trace,
    /// Debug information.
    Debug,
    /// General information.
    #[default]
    Info,
    /// Warnings.
    Warn,
    /// Errors.
    Error,
}

/// Configuration for logging behavior.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Minimum log level to output.
    pub level: LogLevel,
    /// Use compact mode (filter progress, keep tool output in the tail only).
    pub compact: bool,
    /// Progress update step percentage (only log progress at these intervals).
    pub progress_step: u32,
    /// Number of tool-output lines kept for error diagnosis.
    pub error_tail: usize,
    /// Show timestamps in log output.
    pub show_timestamps: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            compact: true,
            progress_step: 20,
            error_tail: 20,
            show_timestamps: true,
        }
    }
}

impl LogConfig {
    /// Build a log config from the persisted logging settings.
    pub fn from_settings(settings: &LoggingSettings) -> Self {
        Self {
            level: LogLevel::Info,
            compact: settings.compact,
            progress_step: settings.progress_step.max(1),
            error_tail: settings.error_tail as usize,
            show_timestamps: settings.show_timestamps,
        }
    }
}

/// Standard message prefixes for structured log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessagePrefix {
    Warning,
    Error,
    Command,
    Phase,
    Success,
}

impl MessagePrefix {
    /// Format a message with this prefix.
    pub fn format(&self, message: &str) -> String {
        match self {
            MessagePrefix::Warning => format!("[WARN] {message}"),
            MessagePrefix::Error => format!("[ERROR] {message}"),
            MessagePrefix::Command => format!("$ {message}"),
            MessagePrefix::Phase => format!("--- {message} ---"),
            MessagePrefix::Success => format!("[OK] {message}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_ordering() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Warn < LogLevel::Error);
    }

    #[test]
    fn prefixes_format() {
        assert_eq!(MessagePrefix::Phase.format("Trim"), "--- Trim ---");
        assert_eq!(MessagePrefix::Error.format("boom"), "[ERROR] boom");
    }

    #[test]
    fn config_from_settings_guards_step() {
        let mut settings = LoggingSettings::default();
        settings.progress_step = 0;
        let config = LogConfig::from_settings(&settings);
        assert_eq!(config.progress_step, 1);
    }
}
