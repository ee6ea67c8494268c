// src/error.rs
use crate::landmarks::{PoseLandmark, TrackedJoint};
use thiserror::Error;

/// Reasons a single frame cannot update the rep counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FrameError {
    #[error("landmark {landmark:?} missing or below visibility threshold")]
    MissingLandmark { landmark: PoseLandmark },

    #[error("joint triple is degenerate, angle undefined")]
    DegenerateGeometry,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid thresholds: down ({down}) must be below up ({up}) and up below 360")]
    InvalidThresholdConfiguration { down: u16, up: u16 },

    #[error("visibility threshold {0} outside [0, 1]")]
    InvalidVisibility(f64),

    #[error("frame budget must be in (0, {max}] ms, got {0} ms", max = crate::config::MAX_FRAME_BUDGET_MS)]
    InvalidFrameBudget(f64),

    #[error("joint landmarks must be three distinct points, got {0:?}")]
    InvalidJoint(TrackedJoint),

    #[error("failed to access config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}
