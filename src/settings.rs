//! Shell settings persistence
//!
//! Handles saving and loading user preferences.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::eq::{Easing, Preset};
pub use crate::error::SettingsError;

/// Application settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Playback settings
    pub playback: PlaybackSettings,
    /// EQ visualizer settings
    pub visualizer: VisualizerSettings,
}

/// Playback-related settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Volume level (0.0 to 1.0)
    pub volume: f32,
    /// How long a callback-based position/duration query may go unanswered
    pub query_timeout_ms: u64,
}

/// EQ visualizer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualizerSettings {
    /// Minimum spacing between paints
    pub frame_interval_ms: u64,
    /// Length of a preset transition
    pub transition_ms: u64,
    pub easing: Easing,
    pub eq_enabled: bool,
    /// Independent left/right presets
    pub split_ear: bool,
    /// Preset id for the unified curve
    pub preset: String,
    pub left_preset: String,
    pub right_preset: String,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            volume: 0.8,
            query_timeout_ms: 2000,
        }
    }
}

impl Default for VisualizerSettings {
    fn default() -> Self {
        let flat = Preset::Flat.id().to_string();
        Self {
            frame_interval_ms: 16,
            transition_ms: 300,
            easing: Easing::default(),
            eq_enabled: true,
            split_ear: false,
            preset: flat.clone(),
            left_preset: flat.clone(),
            right_preset: flat,
        }
    }
}

impl PlaybackSettings {
    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }
}

impl VisualizerSettings {
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }

    pub fn transition(&self) -> Duration {
        Duration::from_millis(self.transition_ms)
    }
}

impl Settings {
    /// Get the settings file path
    pub fn file_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "sonance", "Sonance")
            .map(|dirs| dirs.config_dir().join("settings.json"))
    }

    /// Load settings from file, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = Self::file_path() else {
            return Self::default();
        };
        match Self::load_from_file(&path) {
            Ok(settings) => settings,
            Err(SettingsError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                Self::default()
            }
            Err(e) => {
                tracing::warn!("Failed to load settings from {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Load settings from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save settings to the default file
    pub fn save(&self) -> Result<(), SettingsError> {
        let path = Self::file_path().ok_or(SettingsError::NoConfigDir)?;
        self.save_to_file(&path)
    }

    /// Save settings to a specific file
    pub fn save_to_file(&self, path: &Path) -> Result<(), SettingsError> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("sonance-settings-{}-{}", std::process::id(), name))
            .join("settings.json")
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.playback.volume, 0.8);
        assert_eq!(settings.playback.query_timeout(), Duration::from_secs(2));
        assert_eq!(settings.visualizer.frame_interval(), Duration::from_millis(16));
        assert_eq!(settings.visualizer.easing, Easing::EaseOutQuad);
        assert_eq!(settings.visualizer.preset, "flat");
    }

    #[test]
    fn test_save_and_load() {
        let path = temp_path("roundtrip");
        let mut settings = Settings::default();
        settings.visualizer.split_ear = true;
        settings.visualizer.left_preset = "bass_boost".to_string();
        settings.visualizer.easing = Easing::Linear;

        settings.save_to_file(&path).unwrap();
        let loaded = Settings::load_from_file(&path).unwrap();

        assert_eq!(loaded, settings);
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{"visualizer": {"transition_ms": 500}}"#).unwrap();

        assert_eq!(settings.visualizer.transition_ms, 500);
        assert_eq!(settings.visualizer.frame_interval_ms, 16);
        assert_eq!(settings.playback, PlaybackSettings::default());
    }

    #[test]
    fn test_malformed_file_is_a_parse_error() {
        let path = temp_path("malformed");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            Settings::load_from_file(&path),
            Err(SettingsError::Parse(_))
        ));
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }
}
