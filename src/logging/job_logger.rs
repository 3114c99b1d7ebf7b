//! Per-batch logger with file and callback output.
//!
//! Each batch run gets one of these. It writes a dedicated log file,
//! mirrors every line to an optional GUI callback, filters progress noise
//! in compact mode, and keeps a rolling tail of tool output so a failed
//! clip can dump the last lines the tool produced.

use std::collections::VecDeque;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use parking_lot::Mutex;

use super::types::{GuiLogCallback, LogConfig, LogLevel, MessagePrefix};

/// Mutable logger state, all behind one lock.
struct Inner {
    writer: Option<BufWriter<File>>,
    tail: VecDeque<String>,
    last_progress: u32,
}

/// Per-batch logger with dual output (file + GUI callback).
pub struct JobLogger {
    job_name: String,
    log_path: PathBuf,
    config: LogConfig,
    gui_callback: Option<GuiLogCallback>,
    inner: Mutex<Inner>,
}

impl JobLogger {
    /// Create a logger writing to `<log_dir>/<job_name>.log`, creating the
    /// directory if needed. The job name is sanitized for the filename.
    pub fn new(
        job_name: impl Into<String>,
        log_dir: impl AsRef<Path>,
        config: LogConfig,
        gui_callback: Option<GuiLogCallback>,
    ) -> std::io::Result<Self> {
        let job_name = job_name.into();
        let log_dir = log_dir.as_ref();
        fs::create_dir_all(log_dir)?;

        let log_path = log_dir.join(format!("{}.log", sanitize_filename(&job_name)));
        let writer = BufWriter::new(File::create(&log_path)?);

        Ok(Self {
            job_name,
            log_path,
            config,
            gui_callback,
            inner: Mutex::new(Inner {
                writer: Some(writer),
                tail: VecDeque::new(),
                last_progress: 0,
            }),
        })
    }

    pub fn job_name(&self) -> &str {
        &self.job_name
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Log a message at the given level, honoring the configured minimum.
    pub fn log(&self, level: LogLevel, message: &str) {
        if level >= self.config.level {
            self.write(message);
        }
    }

    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    pub fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, &MessagePrefix::Warning.format(message));
    }

    pub fn error(&self, message: &str) {
        self.log(LogLevel::Error, &MessagePrefix::Error.format(message));
    }

    /// Log a tool invocation.
    pub fn command(&self, command: &str) {
        self.log(LogLevel::Info, &MessagePrefix::Command.format(command));
    }

    /// Log a phase marker, one per clip.
    pub fn phase(&self, phase_name: &str) {
        self.log(LogLevel::Info, &MessagePrefix::Phase.format(phase_name));
    }

    pub fn success(&self, message: &str) {
        self.log(LogLevel::Info, &MessagePrefix::Success.format(message));
    }

    /// Log a progress update. In compact mode only step crossings and the
    /// 100% terminal value are written; returns whether the line was kept.
    pub fn progress(&self, percent: u32) -> bool {
        if self.config.compact {
            let step = self.config.progress_step.max(1);
            let mut inner = self.inner.lock();
            let crossed = percent / step > inner.last_progress / step;
            if !crossed && percent < 100 {
                return false;
            }
            inner.last_progress = percent;
        }
        self.log(LogLevel::Info, &format!("Progress: {}%", percent));
        true
    }

    /// Record a line of external tool output.
    ///
    /// The line always lands in the tail buffer; in compact mode it goes
    /// nowhere else, otherwise it is written like any log line.
    pub fn output_line(&self, line: &str, is_stderr: bool) {
        let cap = self.config.error_tail.max(1);
        {
            let mut inner = self.inner.lock();
            while inner.tail.len() >= cap {
                inner.tail.pop_front();
            }
            inner.tail.push_back(line.to_string());
        }

        if !self.config.compact {
            if is_stderr {
                self.write(&format!("[stderr] {}", line));
            } else {
                self.write(line);
            }
        }
    }

    /// Dump the tail buffer under a header, typically after a clip fails.
    /// Does nothing when the buffer is empty.
    pub fn show_tail(&self, header: &str) {
        let lines = self.get_tail();
        if lines.is_empty() {
            return;
        }
        self.write(&format!("[{}/tail]", header));
        for line in &lines {
            self.write(line);
        }
    }

    /// Clear the tail buffer. Called between clips so a dump only shows
    /// output from the clip that failed.
    pub fn clear_tail(&self) {
        self.inner.lock().tail.clear();
    }

    pub fn get_tail(&self) -> Vec<String> {
        self.inner.lock().tail.iter().cloned().collect()
    }

    pub fn flush(&self) {
        if let Some(writer) = self.inner.lock().writer.as_mut() {
            let _ = writer.flush();
        }
    }

    /// Flush and drop the file handle. Later writes go only to the GUI
    /// callback.
    pub fn close(&self) {
        let mut inner = self.inner.lock();
        if let Some(mut writer) = inner.writer.take() {
            let _ = writer.flush();
        }
    }

    fn write(&self, message: &str) {
        let line = if self.config.show_timestamps {
            format!("[{}] {}", Local::now().format("%H:%M:%S"), message)
        } else {
            message.to_string()
        };

        if let Some(writer) = self.inner.lock().writer.as_mut() {
            let _ = writeln!(writer, "{}", line);
        }
        if let Some(callback) = &self.gui_callback {
            callback(&line);
        }
    }
}

impl Drop for JobLogger {
    fn drop(&mut self) {
        self.close();
    }
}

/// Reduce a job name to filename-safe characters.
fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ' ') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tempfile::tempdir;

    #[test]
    fn creates_log_file() {
        let dir = tempdir().unwrap();
        let logger = JobLogger::new("batch_run", dir.path(), LogConfig::default(), None).unwrap();

        assert!(logger.log_path().exists());
        assert!(logger.log_path().to_string_lossy().contains("batch_run.log"));
    }

    #[test]
    fn writes_to_file() {
        let dir = tempdir().unwrap();
        let logger = JobLogger::new("batch_run", dir.path(), LogConfig::default(), None).unwrap();

        logger.info("Trimming clip 1 of 3");
        logger.flush();

        let content = fs::read_to_string(logger.log_path()).unwrap();
        assert!(content.contains("Trimming clip 1 of 3"));
    }

    #[test]
    fn calls_gui_callback() {
        let dir = tempdir().unwrap();
        let call_count = Arc::new(AtomicUsize::new(0));
        let count_clone = call_count.clone();

        let callback: GuiLogCallback = Box::new(move |_msg| {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });

        let logger =
            JobLogger::new("batch_run", dir.path(), LogConfig::default(), Some(callback)).unwrap();

        logger.info("Message 1");
        logger.info("Message 2");

        assert_eq!(call_count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn compact_mode_filters_progress() {
        let dir = tempdir().unwrap();
        let config = LogConfig {
            compact: true,
            progress_step: 20,
            ..Default::default()
        };

        let logger = JobLogger::new("batch_run", dir.path(), config, None).unwrap();

        assert!(!logger.progress(5));
        assert!(!logger.progress(10));
        assert!(logger.progress(20));
        assert!(!logger.progress(25));
        assert!(logger.progress(40));
        assert!(logger.progress(100));
    }

    #[test]
    fn tail_buffer_maintains_limit() {
        let dir = tempdir().unwrap();
        let config = LogConfig {
            compact: true,
            error_tail: 5,
            ..Default::default()
        };

        let logger = JobLogger::new("batch_run", dir.path(), config, None).unwrap();

        for i in 0..10 {
            logger.output_line(&format!("Line {}", i), false);
        }

        let tail = logger.get_tail();
        assert_eq!(tail.len(), 5);
        assert_eq!(tail[0], "Line 5");
        assert_eq!(tail[4], "Line 9");
    }

    #[test]
    fn show_tail_dumps_buffered_output_to_file() {
        let dir = tempdir().unwrap();
        let config = LogConfig {
            compact: true,
            ..Default::default()
        };
        let logger = JobLogger::new("batch_run", dir.path(), config, None).unwrap();

        logger.output_line("Opening video", false);
        logger.output_line("Could not decode frame 3", true);
        logger.show_tail("clip_a");
        logger.flush();

        let content = fs::read_to_string(logger.log_path()).unwrap();
        assert!(content.contains("[clip_a/tail]"));
        assert!(content.contains("Could not decode frame 3"));
        // In compact mode the lines reach the file only through the dump
        assert_eq!(content.matches("Opening video").count(), 1);
    }

    #[test]
    fn clear_tail_scopes_dump_to_current_clip() {
        let dir = tempdir().unwrap();
        let logger = JobLogger::new("batch_run", dir.path(), LogConfig::default(), None).unwrap();

        logger.output_line("stale line", false);
        logger.clear_tail();
        logger.output_line("fresh line", false);

        assert_eq!(logger.get_tail(), vec!["fresh line"]);
    }

    #[test]
    fn sanitizes_filename() {
        assert_eq!(sanitize_filename("normal_name"), "normal_name");
        assert_eq!(sanitize_filename("has/slash"), "has_slash");
        assert_eq!(sanitize_filename("a<b>c"), "a_b_c");
        assert_eq!(sanitize_filename("run 2026-08-30.v1"), "run 2026-08-30.v1");
    }
}
