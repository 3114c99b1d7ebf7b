//! Logging infrastructure for Anime Frame Extractor.
//!
//! This module provides:
//! - Per-batch loggers with file + GUI callback dual output
//! - Compact mode with progress filtering
//! - Tail buffer for error diagnosis
//! - Integration with the `tracing` ecosystem
//!
//! # Example
//!
//! ```no_run
//! use afe_core::logging::{JobLogger, LogConfig};
//!
//! let logger = JobLogger::new(
//!     "evening_batch",
//!     "/path/to/logs",
//!     LogConfig::default(),
//!     None,
//! ).unwrap();
//!
//! logger.info("Starting batch");
//! logger.phase("Trim");
//! logger.command("ffmpeg -ss 0 -i input.mp4 ...");
//! logger.progress(50);
//! logger.success("Batch completed");
//! ```

mod job_logger;
mod types;

pub use job_logger::JobLogger;
pub use types::{GuiLogCallback, LogConfig, LogLevel, MessagePrefix};

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the global tracing subscriber for application-wide logging.
///
/// Respects `RUST_LOG`, falling back to the provided default level.
/// Should be called once at application startup.
pub fn init_tracing(default_level: LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_to_filter_str(default_level)));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(false))
        .with(filter)
        .init();
}

/// Convert LogLevel to filter string.
fn level_to_filter_str(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Trace => "trace",
        LogLevel::Debug => "debug",
        LogLevel::Info => "info",
        LogLevel::Warn => "warn",
        LogLevel::Error => "error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_to_filter_works() {
        assert_eq!(level_to_filter_str(LogLevel::Debug), "debug");
        assert_eq!(level_to_filter_str(LogLevel::Info), "info");
    }
}
