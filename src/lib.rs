//! AFE Core - Backend logic for Anime Frame Extractor
//!
//! This crate contains the batch clip-processing logic with zero UI
//! dependencies. A GUI shell (or a CLI) drives it by submitting a
//! [`models::BatchJob`] to a [`batch::BatchProcessor`] and subscribing to
//! progress events through a callback.

pub mod batch;
pub mod config;
pub mod logging;
pub mod models;
pub mod tools;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_returns_value() {
        assert!(!version().is_empty());
    }
}
