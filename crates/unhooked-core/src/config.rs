//! TOML-based application configuration.
//!
//! Stores user preferences for the elapsed-time display and milestone
//! notifications. Configuration is stored at
//! `~/.config/unhooked/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ConfigError;
use crate::store::data_dir;

/// Notification configuration.
///
/// Scheduling itself lives in the host shell; the core only carries the
/// user's preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Announce newly unlocked milestone badges.
    #[serde(default = "default_true")]
    pub milestone_alerts: bool,
    /// Daily check-in reminder, "HH:MM" local time.
    #[serde(default)]
    pub daily_reminder: Option<String>,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            milestone_alerts: true,
            daily_reminder: None,
        }
    }
}

/// Elapsed-time display configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Tick the seconds component in the live counter.
    #[serde(default = "default_true")]
    pub show_seconds: bool,
    /// Show "2 months, 3 days" instead of a flat day count.
    #[serde(default = "default_true")]
    pub calendar_breakdown: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            show_seconds: true,
            calendar_breakdown: true,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub notifications: NotificationsConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

fn default_true() -> bool {
    true
}

impl Config {
    fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("~/.config/unhooked"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load the configuration, falling back to defaults when the file
    /// doesn't exist yet.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(&path).map_err(|e| ConfigError::LoadFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        toml::from_str(&raw).map_err(|e| ConfigError::ParseFailed(e.to_string()))
    }

    /// Persist the configuration.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        let raw = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, raw).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.notifications.enabled);
        assert!(config.notifications.milestone_alerts);
        assert!(config.notifications.daily_reminder.is_none());
        assert!(config.display.show_seconds);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            "[notifications]\n\
             enabled = false\n",
        )
        .unwrap();
        assert!(!config.notifications.enabled);
        assert!(config.notifications.milestone_alerts);
        assert!(config.display.calendar_breakdown);
    }

    #[test]
    fn test_roundtrip() {
        let mut config = Config::default();
        config.display.show_seconds = false;
        config.notifications.daily_reminder = Some("09:00".to_string());

        let raw = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&raw).unwrap();
        assert!(!parsed.display.show_seconds);
        assert_eq!(parsed.notifications.daily_reminder.as_deref(), Some("09:00"));
    }
}
