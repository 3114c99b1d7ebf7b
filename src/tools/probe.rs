//! Video metadata probing using ffprobe's JSON output.

use std::path::Path;
use std::process::Command;

use serde_json::Value;

use crate::models::VideoMetadata;

use super::error::{ToolError, ToolResult};

/// Probe a video file for duration, frame rate, resolution, and codec.
pub fn probe_file(ffprobe_path: &str, path: &Path) -> ToolResult<VideoMetadata> {
    if !path.exists() {
        return Err(ToolError::FileNotFound(path.to_path_buf()));
    }

    tracing::debug!("Probing file: {}", path.display());

    let output = Command::new(ffprobe_path)
        .args([
            "-v",
            "error",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
        ])
        .arg(path)
        .output()
        .map_err(|e| ToolError::spawn_failed(ffprobe_path, e))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ToolError::non_zero_exit(
            ffprobe_path,
            output.status.code().unwrap_or(-1),
            stderr,
        ));
    }

    let json: Value = serde_json::from_slice(&output.stdout)
        .map_err(|e| ToolError::parse("ffprobe output", e.to_string()))?;

    parse_probe_json(&json, path)
}

/// Parse the JSON document produced by ffprobe.
fn parse_probe_json(json: &Value, path: &Path) -> ToolResult<VideoMetadata> {
    let duration = json
        .get("format")
        .and_then(|f| f.get("duration"))
        .and_then(|d| d.as_str())
        .and_then(|d| d.parse::<f64>().ok())
        .ok_or_else(|| ToolError::parse("ffprobe output", "missing format.duration"))?;

    let video_stream = json
        .get("streams")
        .and_then(|s| s.as_array())
        .and_then(|streams| {
            streams.iter().find(|s| {
                s.get("codec_type").and_then(|t| t.as_str()) == Some("video")
            })
        })
        .ok_or_else(|| ToolError::parse("ffprobe output", "no video stream"))?;

    let width = video_stream
        .get("width")
        .and_then(|w| w.as_u64())
        .unwrap_or(0) as u32;
    let height = video_stream
        .get("height")
        .and_then(|h| h.as_u64())
        .unwrap_or(0) as u32;
    let codec = video_stream
        .get("codec_name")
        .and_then(|c| c.as_str())
        .map(str::to_string);

    let fps = video_stream
        .get("r_frame_rate")
        .and_then(|r| r.as_str())
        .and_then(parse_frame_rate)
        .unwrap_or(0.0);

    Ok(VideoMetadata {
        path: path.to_path_buf(),
        duration,
        fps,
        width,
        height,
        codec,
    })
}

/// Parse ffprobe's rational frame rate ("24000/1001", "25/1").
fn parse_frame_rate(rate: &str) -> Option<f64> {
    let (num, den) = rate.split_once('/')?;
    let num: f64 = num.parse().ok()?;
    let den: f64 = den.parse().ok()?;
    if den == 0.0 {
        return None;
    }
    Some(num / den)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_rational_frame_rates() {
        assert_eq!(parse_frame_rate("25/1"), Some(25.0));
        let ntsc = parse_frame_rate("24000/1001").unwrap();
        assert!((ntsc - 23.976).abs() < 0.001);
        assert_eq!(parse_frame_rate("30/0"), None);
        assert_eq!(parse_frame_rate("garbage"), None);
    }

    #[test]
    fn parses_probe_document() {
        let doc = json!({
            "format": { "duration": "12.480000" },
            "streams": [
                { "codec_type": "audio", "codec_name": "aac" },
                {
                    "codec_type": "video",
                    "codec_name": "h264",
                    "width": 1920,
                    "height": 1080,
                    "r_frame_rate": "24000/1001"
                }
            ]
        });

        let meta = parse_probe_json(&doc, Path::new("/videos/ep01.mp4")).unwrap();
        assert!((meta.duration - 12.48).abs() < f64::EPSILON);
        assert_eq!(meta.width, 1920);
        assert_eq!(meta.height, 1080);
        assert_eq!(meta.codec.as_deref(), Some("h264"));
        assert!((meta.fps - 23.976).abs() < 0.001);
    }

    #[test]
    fn missing_video_stream_is_an_error() {
        let doc = json!({
            "format": { "duration": "3.0" },
            "streams": [ { "codec_type": "audio" } ]
        });
        let result = parse_probe_json(&doc, Path::new("/a.mp4"));
        assert!(matches!(result, Err(ToolError::Parse { .. })));
    }
}
