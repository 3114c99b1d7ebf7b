//! Scoped temporary clip files.

use std::fs;
use std::path::{Path, PathBuf};

/// Guard for a trimmed temporary clip file.
///
/// The file is removed when the guard is dropped, on every exit path.
/// Removal failure does not affect output correctness, so it is only
/// logged and never propagated.
pub struct TempClip {
    path: PathBuf,
}

impl TempClip {
    /// Take ownership of the file at `path`.
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Path of the temporary file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempClip {
    fn drop(&mut self) {
        if !self.path.exists() {
            return;
        }
        if let Err(e) = fs::remove_file(&self.path) {
            tracing::warn!(
                "Failed to remove temp clip {}: {}",
                self.path.display(),
                e
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn removes_file_on_drop() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("trim_c1.mp4");
        fs::write(&path, b"fake clip").unwrap();

        {
            let _guard = TempClip::new(path.clone());
            assert!(path.exists());
        }

        assert!(!path.exists());
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("never_created.mp4");
        drop(TempClip::new(path));
    }
}
