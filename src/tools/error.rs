//! Error types for external tool invocations.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Error from invoking an external tool.
///
/// Failure to launch the process at all (`SpawnFailed`) is kept distinct
/// from the process running and exiting non-zero (`NonZeroExit`), which
/// carries the captured diagnostic stream.
#[derive(Error, Debug)]
pub enum ToolError {
    /// The executable could not be launched (missing, not executable).
    #[error("Failed to launch {tool}: {source}")]
    SpawnFailed {
        tool: String,
        #[source]
        source: io::Error,
    },

    /// The tool ran but exited with a non-zero status.
    #[error("{tool} failed with exit code {exit_code}: {stderr}")]
    NonZeroExit {
        tool: String,
        exit_code: i32,
        stderr: String,
    },

    /// A required input file was not found.
    #[error("Required file not found: {0}")]
    FileNotFound(PathBuf),

    /// File I/O error while talking to the tool.
    #[error("I/O error in {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: io::Error,
    },

    /// The tool's output could not be parsed.
    #[error("Failed to parse {what}: {message}")]
    Parse { what: String, message: String },
}

impl ToolError {
    /// Create a spawn failed error.
    pub fn spawn_failed(tool: impl Into<String>, source: io::Error) -> Self {
        Self::SpawnFailed {
            tool: tool.into(),
            source,
        }
    }

    /// Create a non-zero exit error.
    pub fn non_zero_exit(
        tool: impl Into<String>,
        exit_code: i32,
        stderr: impl Into<String>,
    ) -> Self {
        Self::NonZeroExit {
            tool: tool.into(),
            exit_code,
            stderr: stderr.into(),
        }
    }

    /// Create an I/O error with context.
    pub fn io(operation: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            source,
        }
    }

    /// Create a parse error.
    pub fn parse(what: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            what: what.into(),
            message: message.into(),
        }
    }
}

/// Result type for tool operations.
pub type ToolResult<T> = Result<T, ToolError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_zero_exit_displays_diagnostics() {
        let err = ToolError::non_zero_exit("ffmpeg", 1, "Invalid data found");
        let msg = err.to_string();
        assert!(msg.contains("ffmpeg"));
        assert!(msg.contains("exit code 1"));
        assert!(msg.contains("Invalid data found"));
    }

    #[test]
    fn spawn_failed_names_tool() {
        let source = io::Error::new(io::ErrorKind::NotFound, "no such file");
        let err = ToolError::spawn_failed("frame_extractor", source);
        assert!(err.to_string().contains("Failed to launch frame_extractor"));
    }
}
