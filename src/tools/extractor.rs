//! Frame-extractor subprocess wrapper.
//!
//! The extractor emits progress as discrete lines of the form
//! `PROGRESS: <integer>` on stdout; every other line is informational and
//! forwarded to the caller as an output event. stderr is drained
//! concurrently, replayed as output events once the tool exits, and
//! attached to the error when the exit status is non-zero.

use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;

use crate::models::ClipSettings;

use super::adapter::ExtractEvent;
use super::error::{ToolError, ToolResult};

/// Run the frame extractor on `input`, forwarding progress units and
/// output lines to `on_event` as they arrive.
pub fn run_extractor(
    extractor_path: &str,
    input: &Path,
    output_dir: &Path,
    settings: &ClipSettings,
    on_event: &mut dyn FnMut(ExtractEvent<'_>),
) -> ToolResult<()> {
    if !input.exists() {
        return Err(ToolError::FileNotFound(input.to_path_buf()));
    }

    let args = extractor_args(input, output_dir, settings);
    tracing::debug!("Running: {} {}", extractor_path, args.join(" "));

    let mut child = Command::new(extractor_path)
        .args(&args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| ToolError::spawn_failed(extractor_path, e))?;

    // Drain stderr on its own thread so a chatty tool cannot deadlock
    // against the stdout pipe.
    let stderr = child.stderr.take();
    let stderr_handle = thread::spawn(move || {
        let mut buf = String::new();
        if let Some(mut stream) = stderr {
            let _ = stream.read_to_string(&mut buf);
        }
        buf
    });

    let pumped = match child.stdout.take() {
        Some(stdout) => pump_stdout(BufReader::new(stdout), on_event),
        None => Ok(()),
    };

    if let Err(e) = pumped {
        // Reap the child before surfacing the read error, otherwise it
        // lingers as a zombie until the host process exits.
        let _ = child.kill();
        let _ = child.wait();
        let _ = stderr_handle.join();
        return Err(ToolError::io("reading extractor stdout", e));
    }

    let status = child
        .wait()
        .map_err(|e| ToolError::io("waiting for extractor", e))?;
    let stderr_text = stderr_handle.join().unwrap_or_default();

    for line in stderr_text.lines() {
        on_event(ExtractEvent::Output {
            line,
            is_stderr: true,
        });
    }

    if !status.success() {
        return Err(ToolError::non_zero_exit(
            extractor_path,
            status.code().unwrap_or(-1),
            stderr_text.trim().to_string(),
        ));
    }

    Ok(())
}

/// Read the extractor's stdout to completion, turning each line into an
/// event. Split out from the process handling so the line protocol can be
/// tested without spawning anything.
fn pump_stdout(
    reader: impl BufRead,
    on_event: &mut dyn FnMut(ExtractEvent<'_>),
) -> io::Result<()> {
    for line in reader.lines() {
        let line = line?;
        match parse_progress_line(&line) {
            Some(percent) => on_event(ExtractEvent::Progress(percent)),
            None => on_event(ExtractEvent::Output {
                line: &line,
                is_stderr: false,
            }),
        }
    }
    Ok(())
}

/// Build the extractor's argument list from clip settings.
fn extractor_args(input: &Path, output_dir: &Path, settings: &ClipSettings) -> Vec<String> {
    let mut args = vec![
        "--input".to_string(),
        input.display().to_string(),
        "--output".to_string(),
        output_dir.display().to_string(),
        "--mode".to_string(),
        settings.mode.to_string(),
        "--threshold".to_string(),
        settings.threshold.to_string(),
        "--min-frames".to_string(),
        settings.min_frames.to_string(),
    ];
    if let Some(name) = &settings.output_name {
        args.push("--output-name".to_string());
        args.push(name.clone());
    }
    args
}

/// Parse a `PROGRESS: <integer>` marker out of a stdout line.
///
/// The marker may be preceded by other text on the same line. Returns
/// `None` for lines without a well-formed marker.
pub fn parse_progress_line(line: &str) -> Option<u32> {
    let idx = line.find("PROGRESS:")?;
    let rest = line[idx + "PROGRESS:".len()..].trim_start();
    let digits: &str = {
        let end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        &rest[..end]
    };
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}
