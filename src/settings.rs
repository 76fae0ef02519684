//! Runtime settings for drivers
//!
//! Loaded from an optional JSON file; any field left out keeps its default.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Viewport;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid settings JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// How the scripted player behaves
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AutopilotSettings {
    /// Drive the session with the autopilot at all
    pub enabled: bool,
    /// Enemies younger than this are ignored (human reaction time)
    pub reaction_ms: u64,
    /// Minimum gap between two swats
    pub swat_cooldown_ms: u64,
    /// Click the boss away once it starts scolding
    pub dismiss_boss: bool,
}

impl Default for AutopilotSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            reaction_ms: 450,
            swat_cooldown_ms: 350,
            dismiss_boss: true,
        }
    }
}

/// Session settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Screen bounds used for spawning and targeting
    pub viewport: Viewport,
    /// RNG seed (None = pick one at startup)
    pub seed: Option<u64>,
    /// Driver step in milliseconds
    pub step_ms: u64,
    /// Scripted player
    pub autopilot: AutopilotSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            seed: None,
            step_ms: 10,
            autopilot: AutopilotSettings::default(),
        }
    }
}

impl Settings {
    /// Parse settings from JSON text
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        Ok(settings.sanitized())
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Write settings to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Seed to use for this run
    pub fn seed_or(&self, fallback: u64) -> u64 {
        self.seed.unwrap_or(fallback)
    }

    /// Clamp values a driver can't work with
    fn sanitized(mut self) -> Self {
        if self.step_ms == 0 {
            log::warn!("step_ms of 0 would never advance the clock, using 1");
            self.step_ms = 1;
        }
        if self.viewport.width <= 0.0 || self.viewport.height <= 0.0 {
            log::warn!(
                "Viewport {}x{} is empty, using default",
                self.viewport.width,
                self.viewport.height
            );
            self.viewport = Viewport::default();
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{ "seed": 42, "autopilot": { "reaction_ms": 200 } }"#)
            .unwrap();
        assert_eq!(settings.seed, Some(42));
        assert_eq!(settings.step_ms, 10);
        assert_eq!(settings.autopilot.reaction_ms, 200);
        assert!(settings.autopilot.enabled);
        assert_eq!(settings.viewport, Viewport::default());
    }

    #[test]
    fn test_sanitize() {
        let settings = Settings::from_json(
            r#"{ "step_ms": 0, "viewport": { "width": 0.0, "height": 600.0 } }"#,
        )
        .unwrap();
        assert_eq!(settings.step_ms, 1);
        assert_eq!(settings.viewport, Viewport::default());
    }

    #[test]
    fn test_invalid_json() {
        let err = Settings::from_json("{ not json").unwrap_err();
        assert!(matches!(err, SettingsError::Json(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = Settings::load("/definitely/not/here/settings.json").unwrap_err();
        assert!(matches!(err, SettingsError::Io(_)));
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir().join(format!("tender-rescue-settings-{}.json", std::process::id()));
        let mut settings = Settings::default();
        settings.seed = Some(99);
        settings.step_ms = 25;
        settings.viewport = Viewport::new(800.0, 600.0);
        settings.autopilot.dismiss_boss = false;

        settings.save(&path).unwrap();
        let loaded = Settings::load(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded.seed, Some(99));
        assert_eq!(loaded.step_ms, 25);
        assert_eq!(loaded.viewport, Viewport::new(800.0, 600.0));
        assert!(!loaded.autopilot.dismiss_boss);
        assert_eq!(loaded.autopilot.reaction_ms, 450);
    }

    #[test]
    fn test_seed_or() {
        let mut settings = Settings::default();
        assert_eq!(settings.seed_or(7), 7);
        settings.seed = Some(3);
        assert_eq!(settings.seed_or(7), 3);
    }
}
