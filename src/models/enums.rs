//! Enumerations shared across the crate.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Motion detection mode used by the frame extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectionMode {
    /// Pose-based character motion detection.
    #[default]
    Character,
    /// Whole-frame differencing.
    Full,
}

impl DetectionMode {
    /// The value passed to the extractor's `--mode` argument.
    pub fn as_str(&self) -> &'static str {
        match self {
            DetectionMode::Character => "character",
            DetectionMode::Full => "full",
        }
    }
}

impl fmt::Display for DetectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DetectionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "character" => Ok(DetectionMode::Character),
            "full" => Ok(DetectionMode::Full),
            other => Err(format!("unknown detection mode: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_round_trips_through_str() {
        for mode in [DetectionMode::Character, DetectionMode::Full] {
            assert_eq!(mode.as_str().parse::<DetectionMode>().unwrap(), mode);
        }
    }

    #[test]
    fn mode_serializes_lowercase() {
        let json = serde_json::to_string(&DetectionMode::Character).unwrap();
        assert_eq!(json, "\"character\"");
    }

    #[test]
    fn unknown_mode_is_rejected() {
        assert!("pose".parse::<DetectionMode>().is_err());
    }
}
