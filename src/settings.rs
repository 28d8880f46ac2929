//! Game settings
//!
//! Read from an optional JSON file. Missing fields take their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::TARGET_HZ;

/// Accepted simulation rates (ticks per second)
pub const MIN_TARGET_HZ: f32 = 1.0;
pub const MAX_TARGET_HZ: f32 = 1000.0;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid setting {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Simulation ticks per second
    pub target_hz: f32,
    /// Run seed; random when absent
    pub seed: Option<u64>,

    // === Audio ===
    /// Play the background score
    pub music: bool,
    /// Play collision sound effects
    pub sfx: bool,
    /// Start with the score muted (toggle in game)
    pub start_muted: bool,
    /// Note velocity for sound effects (0 - 127)
    pub sfx_velocity: u8,

    /// Stall after a level is cleared
    pub level_up_pause_ms: u64,

    /// Ticks the headless demo runs for
    pub demo_ticks: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            target_hz: TARGET_HZ,
            seed: None,

            music: true,
            sfx: true,
            start_muted: false,
            sfx_velocity: 100,

            level_up_pause_ms: 60,

            demo_ticks: 3600,
        }
    }
}

impl Settings {
    /// Load and validate settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.as_ref().display());
        Ok(settings)
    }

    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load from `path` if given, falling back to defaults on any error
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            log::info!("Using default settings");
            return Self::default();
        };

        match Self::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("{}, using default settings", e);
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(MIN_TARGET_HZ..=MAX_TARGET_HZ).contains(&self.target_hz) {
            return Err(SettingsError::Invalid {
                field: "target_hz",
                reason: format!(
                    "must be between {} and {}, got {}",
                    MIN_TARGET_HZ, MAX_TARGET_HZ, self.target_hz
                ),
            });
        }
        if self.sfx_velocity > 127 {
            return Err(SettingsError::Invalid {
                field: "sfx_velocity",
                reason: format!("must be at most 127, got {}", self.sfx_velocity),
            });
        }
        Ok(())
    }
}
