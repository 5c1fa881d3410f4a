//! Host preferences
//!
//! Chosen by the embedding page, separate from gameplay balance.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// How a pointer position drives the ship
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum PointerMode {
    /// Ship jumps to the pointer (clamped to the playfield)
    #[default]
    Snap,
    /// Ship travels toward the pointer at the player speed
    Seek,
}

impl PointerMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PointerMode::Snap => "snap",
            PointerMode::Seek => "seek",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "snap" => Some(PointerMode::Snap),
            "seek" | "follow" => Some(PointerMode::Seek),
            _ => None,
        }
    }
}

/// Host settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Pointer movement model
    pub pointer_mode: PointerMode,
    /// Accept keyboard movement alongside the pointer
    pub keyboard_enabled: bool,
    /// Minimize flashes (renderer should ignore `GameCore::flash`)
    pub reduced_motion: bool,
    /// Seconds between analytics position samples
    pub sample_interval: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            pointer_mode: PointerMode::Snap,
            keyboard_enabled: true,
            reduced_motion: false,
            sample_interval: 0.2,
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        if !settings.sample_interval.is_finite() || settings.sample_interval <= 0.0 {
            return Err(ConfigError::invalid(
                "sampleInterval",
                format!("must be positive (got {})", settings.sample_interval),
            ));
        }
        log::info!(
            "Loaded settings: pointer mode {}, keyboard {}",
            settings.pointer_mode.as_str(),
            settings.keyboard_enabled
        );
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Whether the renderer should play the hit flash
    pub fn effective_flash(&self) -> bool {
        !self.reduced_motion
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointer_mode_parse() {
        assert_eq!(PointerMode::parse("Seek"), Some(PointerMode::Seek));
        assert_eq!(PointerMode::parse("follow"), Some(PointerMode::Seek));
        assert_eq!(PointerMode::parse("snap"), Some(PointerMode::Snap));
        assert_eq!(PointerMode::parse("teleport"), None);
        assert_eq!(PointerMode::Seek.as_str(), "seek");
    }

    #[test]
    fn test_settings_json() {
        let settings =
            Settings::from_json(r#"{ "pointerMode": "seek", "reducedMotion": true }"#).unwrap();
        assert_eq!(settings.pointer_mode, PointerMode::Seek);
        assert!(!settings.effective_flash());
        assert!(settings.keyboard_enabled);
        assert!((settings.sample_interval - 0.2).abs() < f32::EPSILON);
    }

    #[test]
    fn test_rejects_zero_sample_interval() {
        let err = Settings::from_json(r#"{ "sampleInterval": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "sampleInterval", .. }));
    }
}
