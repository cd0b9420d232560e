//! # Configuration State
//!
//! Stores application configuration loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`HEARTCALC_*`)
//! 2. Config file (`heartcalc.toml` in the platform config directory, or
//!    the path in `HEARTCALC_CONFIG`)
//! 3. Defaults (this file)
//!
//! ## File Format
//! ```toml
//! [screen]
//! width = 390.0
//! height = 844.0
//!
//! [easter_egg]
//! result = "777"
//! open_link = false
//!
//! [fx.burst]
//! count = 15
//! ```
//!
//! ## Thread Safety
//! Configuration is read-only after initialization, so no mutex needed.

use directories::ProjectDirs;
use heartcalc_core::EASTER_EGG_RESULT;
use heartcalc_fx::FxConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{AppError, AppResult};
use crate::layout::ScreenMetrics;

/// Link opened when the easter egg fires.
pub const DEFAULT_EASTER_EGG_URL: &str =
    "https://m.youtube.com/watch?v=TWo7ktEPxSg&pp=ygUOWmFtYW5zxLF6ZMSxayDSBwkJrQkBhyohjO8%3D";

const CONFIG_FILE_NAME: &str = "heartcalc.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EasterEggSettings {
    #[serde(default = "default_url")]
    pub url: String,

    /// Formatted result that fires the easter egg.
    #[serde(default = "default_result")]
    pub result: String,

    /// When false the link is only logged.
    #[serde(default = "default_open_link")]
    pub open_link: bool,
}

fn default_url() -> String {
    DEFAULT_EASTER_EGG_URL.to_string()
}

fn default_result() -> String {
    EASTER_EGG_RESULT.to_string()
}

fn default_open_link() -> bool {
    true
}

impl Default for EasterEggSettings {
    fn default() -> Self {
        EasterEggSettings {
            url: default_url(),
            result: default_result(),
            open_link: default_open_link(),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub screen: ScreenMetrics,

    #[serde(default)]
    pub easter_egg: EasterEggSettings,

    #[serde(default)]
    pub fx: FxConfig,
}

impl AppConfig {
    /// Loads from the default location, honoring `HEARTCALC_CONFIG`.
    pub fn load_default() -> AppResult<Self> {
        let path = std::env::var("HEARTCALC_CONFIG")
            .map(PathBuf::from)
            .ok()
            .or_else(default_config_path);
        Self::load(path.as_deref())
    }

    /// Loads configuration from file, environment, and defaults.
    pub fn load(config_path: Option<&Path>) -> AppResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> AppResult<()> {
        self.screen.validate()?;
        if self.easter_egg.result.trim().is_empty() {
            return Err(AppError::Config("easter_egg.result must not be empty".to_string()));
        }
        self.fx
            .validate()
            .map_err(|err| AppError::Config(err.to_string()))?;
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("HEARTCALC_EASTER_EGG_URL") {
            self.easter_egg.url = url;
        }

        if let Ok(result) = std::env::var("HEARTCALC_EASTER_EGG_RESULT") {
            self.easter_egg.result = result;
        }

        if let Ok(flag) = std::env::var("HEARTCALC_OPEN_LINKS") {
            self.easter_egg.open_link = matches!(flag.as_str(), "1" | "true" | "yes");
        }

        self.fx.apply_env_overrides();
    }
}

/// Platform-specific config file location.
///
/// - **macOS**: `~/Library/Application Support/com.heartcalc.heartcalc/heartcalc.toml`
/// - **Windows**: `%APPDATA%\heartcalc\heartcalc\config\heartcalc.toml`
/// - **Linux**: `~/.config/heartcalc/heartcalc.toml`
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("com", "heartcalc", "heartcalc")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.easter_egg.url, DEFAULT_EASTER_EGG_URL);
        assert_eq!(config.easter_egg.result, "777");
        assert!(config.easter_egg.open_link);
        assert_eq!(config.screen.spacing, 12.0);
        assert_eq!(config.fx.burst.count, 15);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_nested_fx_table() {
        let config: AppConfig = toml::from_str(
            r#"
            [easter_egg]
            result = "42"
            open_link = false

            [fx.burst]
            count = 4

            [fx.timing]
            lifetime_ms = 900
            "#,
        )
        .unwrap();

        assert!(!config.easter_egg.open_link);
        assert_eq!(config.easter_egg.result, "42");
        assert_eq!(config.easter_egg.url, DEFAULT_EASTER_EGG_URL);
        assert_eq!(config.fx.burst.count, 4);
        assert_eq!(config.fx.timing.lifetime_ms, 900);
        assert_eq!(config.screen, ScreenMetrics::default());
    }

    #[test]
    fn test_invalid_fx_section_rejected() {
        let mut config = AppConfig::default();
        config.fx.timing.rise_delay_ms = 5000;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_blank_easter_egg_result_rejected() {
        let mut config = AppConfig::default();
        config.easter_egg.result = "  ".to_string();
        assert!(matches!(config.validate(), Err(AppError::Config(_))));
    }
}
