// src/config.rs
use crate::error::ConfigError;
use crate::landmarks::TrackedJoint;
use crate::rep_counter::Thresholds;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILE_NAME: &str = "exercise.json";

/// One minute per frame; anything longer is a typo.
pub const MAX_FRAME_BUDGET_MS: f64 = 60_000.0;

/// What happens to the rep counter when a workout is stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopPolicy {
    /// Freeze phase and count until the next start.
    #[default]
    Retain,
    Reset,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExerciseConfig {
    pub name: String,
    pub joint: TrackedJoint,
    pub thresholds: Thresholds,
    /// Landmarks below this visibility are treated as missing.
    pub min_visibility: f64,
    pub stop_policy: StopPolicy,
    pub frame_budget_ms: f64,
}

impl Default for ExerciseConfig {
    fn default() -> Self {
        Self {
            name: "squat".to_string(),
            joint: TrackedJoint::LEFT_KNEE,
            thresholds: Thresholds::default(),
            min_visibility: 0.0,
            stop_policy: StopPolicy::Retain,
            frame_budget_ms: 1000.0 / 30.0,
        }
    }
}

impl ExerciseConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Thresholds are checked when constructed, re-check in case of direct edits.
        Thresholds::new(self.thresholds.down(), self.thresholds.up())?;

        if !self.joint.is_distinct() {
            return Err(ConfigError::InvalidJoint(self.joint));
        }
        if !(0.0..=1.0).contains(&self.min_visibility) {
            return Err(ConfigError::InvalidVisibility(self.min_visibility));
        }
        self.frame_budget()?;
        Ok(())
    }

    pub fn frame_budget(&self) -> Result<Duration, ConfigError> {
        let ms = self.frame_budget_ms;
        if !(ms > 0.0 && ms <= MAX_FRAME_BUDGET_MS) {
            return Err(ConfigError::InvalidFrameBudget(ms));
        }
        Duration::try_from_secs_f64(ms / 1000.0).map_err(|_| ConfigError::InvalidFrameBudget(ms))
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: ExerciseConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("Invalid config {}", path.display()))
    }

    /// Loads `path` if it exists, otherwise falls back to defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            tracing::info!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config {}", path.display()))?;
        Ok(())
    }

    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "squattracker", "SquatTracker")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
            .unwrap_or_else(|| PathBuf::from("./").join(CONFIG_FILE_NAME))
    }
}
