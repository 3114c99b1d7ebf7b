//! Low-level ffmpeg trim wrapper.
//!
//! Clips are cut with a lossless stream copy (no re-encoding) so the trim
//! step stays fast even for long source files.

use std::path::Path;
use std::process::Command;

use super::error::{ToolError, ToolResult};

/// Extract `[start_secs, start_secs + duration_secs)` from `source` into
/// `dest` using a stream copy.
pub fn trim_stream_copy(
    ffmpeg_path: &str,
    source: &Path,
    start_secs: f64,
    duration_secs: f64,
    dest: &Path,
) -> ToolResult<()> {
    if !source.exists() {
        return Err(ToolError::FileNotFound(source.to_path_buf()));
    }

    let mut cmd = Command::new(ffmpeg_path);
    cmd.args(trim_args(source, start_secs, duration_secs, dest));

    tracing::debug!("Running: {} {:?}", ffmpeg_path, cmd.get_args());

    let output = cmd
        .output()
        .map_err(|e| ToolError::spawn_failed(ffmpeg_path, e))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ToolError::non_zero_exit(
            ffmpeg_path,
            output.status.code().unwrap_or(-1),
            stderr,
        ));
    }

    tracing::info!(
        "Trimmed {:.3}s from {} into {}",
        duration_secs,
        source.display(),
        dest.display()
    );

    Ok(())
}

/// Build the ffmpeg argument list for a stream-copy trim.
///
/// `-ss` before `-i` keeps the seek fast; `-avoid_negative_ts make_zero`
/// prevents negative timestamps when the cut lands between keyframes.
fn trim_args(source: &Path, start_secs: f64, duration_secs: f64, dest: &Path) -> Vec<String> {
    vec![
        "-y".to_string(),
        "-ss".to_string(),
        format!("{start_secs}"),
        "-i".to_string(),
        source.display().to_string(),
        "-t".to_string(),
        format!("{duration_secs}"),
        "-c".to_string(),
        "copy".to_string(),
        "-avoid_negative_ts".to_string(),
        "make_zero".to_string(),
        dest.display().to_string(),
    ]
}
