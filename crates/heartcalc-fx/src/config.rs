//! # Fx Configuration
//!
//! Burst shape, rise destination and timer settings.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     HEARTCALC_BURST_COUNT=15                                           │
//! │     HEARTCALC_RISE_DELAY_MS=10                                         │
//! │     HEARTCALC_LIFETIME_MS=2100                                         │
//! │     HEARTCALC_TICK_MS=16                                               │
//! │                                                                         │
//! │  2. TOML Config File ([fx] table of heartcalc.toml)                    │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [burst]
//! count = 15
//! jitter_x = 20.0
//! jitter_y = 10.0
//! size_min = 8.0
//! size_max = 14.0
//!
//! [rise]
//! top_offset = 50.0
//! jitter_x = 20.0
//! jitter_y = 30.0
//!
//! [timing]
//! rise_delay_ms = 10
//! lifetime_ms = 2100
//! animation_ms = 2000
//! tick_ms = 16
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, warn};

use crate::error::{FxError, FxResult};

/// Upper bound on particle lifetime.
pub const MAX_LIFETIME_MS: u64 = 60_000;

// =============================================================================
// Burst Settings
// =============================================================================

/// Shape of the burst released by one digit tap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BurstSettings {
    /// Particles per burst.
    #[serde(default = "default_count")]
    pub count: usize,

    /// Horizontal spawn jitter (±, in points).
    #[serde(default = "default_burst_jitter_x")]
    pub jitter_x: f64,

    /// Vertical spawn jitter (±, in points).
    #[serde(default = "default_burst_jitter_y")]
    pub jitter_y: f64,

    /// Smallest heart size.
    #[serde(default = "default_size_min")]
    pub size_min: f64,

    /// Largest heart size.
    #[serde(default = "default_size_max")]
    pub size_max: f64,
}

fn default_count() -> usize {
    15
}

fn default_burst_jitter_x() -> f64 {
    20.0
}

fn default_burst_jitter_y() -> f64 {
    10.0
}

fn default_size_min() -> f64 {
    8.0
}

fn default_size_max() -> f64 {
    14.0
}

impl Default for BurstSettings {
    fn default() -> Self {
        BurstSettings {
            count: default_count(),
            jitter_x: default_burst_jitter_x(),
            jitter_y: default_burst_jitter_y(),
            size_min: default_size_min(),
            size_max: default_size_max(),
        }
    }
}

// =============================================================================
// Rise Settings
// =============================================================================

/// Where particles float to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiseSettings {
    /// Distance of the rise destination from the top of the screen.
    #[serde(default = "default_top_offset")]
    pub top_offset: f64,

    /// Horizontal drift added to the spawn x (±).
    #[serde(default = "default_rise_jitter_x")]
    pub jitter_x: f64,

    /// Vertical jitter around `top_offset` (±).
    #[serde(default = "default_rise_jitter_y")]
    pub jitter_y: f64,
}

fn default_top_offset() -> f64 {
    50.0
}

fn default_rise_jitter_x() -> f64 {
    20.0
}

fn default_rise_jitter_y() -> f64 {
    30.0
}

impl Default for RiseSettings {
    fn default() -> Self {
        RiseSettings {
            top_offset: default_top_offset(),
            jitter_x: default_rise_jitter_x(),
            jitter_y: default_rise_jitter_y(),
        }
    }
}

// =============================================================================
// Timing Settings
// =============================================================================

/// Timer offsets, all relative to spawn time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingSettings {
    /// Delay before the rise target is set.
    #[serde(default = "default_rise_delay")]
    pub rise_delay_ms: u64,

    /// Total lifetime; the particle is removed at this offset.
    #[serde(default = "default_lifetime")]
    pub lifetime_ms: u64,

    /// Duration of the linear rise animation (renderer hint).
    #[serde(default = "default_animation")]
    pub animation_ms: u64,

    /// How often the driver advances the scheduler.
    #[serde(default = "default_tick")]
    pub tick_ms: u64,
}

fn default_rise_delay() -> u64 {
    10
}

fn default_lifetime() -> u64 {
    2100
}

fn default_animation() -> u64 {
    2000
}

fn default_tick() -> u64 {
    16
}

impl Default for TimingSettings {
    fn default() -> Self {
        TimingSettings {
            rise_delay_ms: default_rise_delay(),
            lifetime_ms: default_lifetime(),
            animation_ms: default_animation(),
            tick_ms: default_tick(),
        }
    }
}

impl TimingSettings {
    pub fn rise_delay(&self) -> chrono::Duration {
        chrono::Duration::milliseconds(self.rise_delay_ms as i64)
    }

    pub fn lifetime(&self) -> chrono::Duration {
        chrono::Duration::milliseconds(self.lifetime_ms as i64)
    }

    pub fn animation(&self) -> chrono::Duration {
        chrono::Duration::milliseconds(self.animation_ms as i64)
    }

    pub fn tick(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.tick_ms)
    }
}

// =============================================================================
// Fx Configuration
// =============================================================================

/// Complete fx configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FxConfig {
    #[serde(default)]
    pub burst: BurstSettings,

    #[serde(default)]
    pub rise: RiseSettings,

    #[serde(default)]
    pub timing: TimingSettings,
}

impl FxConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (if given and present)
    /// 3. Environment variables
    pub fn load(config_path: Option<&Path>) -> FxResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path {
            if path.exists() {
                info!(?path, "Loading fx config from file");
                let contents = std::fs::read_to_string(path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Fx config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> FxResult<()> {
        if self.burst.count == 0 {
            return Err(FxError::InvalidConfig(
                "burst.count must be greater than 0".into(),
            ));
        }

        let spreads = [
            ("burst.jitter_x", self.burst.jitter_x),
            ("burst.jitter_y", self.burst.jitter_y),
            ("rise.jitter_x", self.rise.jitter_x),
            ("rise.jitter_y", self.rise.jitter_y),
        ];
        for (name, value) in spreads {
            if !value.is_finite() || value < 0.0 {
                return Err(FxError::InvalidConfig(format!(
                    "{} must be a finite, non-negative number, got {}",
                    name, value
                )));
            }
        }

        if !self.burst.size_min.is_finite()
            || !self.burst.size_max.is_finite()
            || self.burst.size_min <= 0.0
            || self.burst.size_min > self.burst.size_max
        {
            return Err(FxError::InvalidConfig(format!(
                "burst size range [{}, {}] is invalid",
                self.burst.size_min, self.burst.size_max
            )));
        }

        if !self.rise.top_offset.is_finite() {
            return Err(FxError::InvalidConfig("rise.top_offset must be finite".into()));
        }

        // The rise update must precede removal for every particle
        if self.timing.rise_delay_ms >= self.timing.lifetime_ms {
            return Err(FxError::InvalidConfig(format!(
                "rise_delay_ms ({}) must be less than lifetime_ms ({})",
                self.timing.rise_delay_ms, self.timing.lifetime_ms
            )));
        }

        if self.timing.lifetime_ms > MAX_LIFETIME_MS {
            return Err(FxError::InvalidConfig(format!(
                "lifetime_ms must be at most {}",
                MAX_LIFETIME_MS
            )));
        }

        if self.timing.tick_ms == 0 {
            return Err(FxError::InvalidConfig(
                "tick_ms must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Applies `HEARTCALC_*` environment variable overrides.
    ///
    /// Callers that embed this config in a larger file call this after
    /// deserializing, then [`validate`](Self::validate).
    pub fn apply_env_overrides(&mut self) {
        if let Ok(count) = std::env::var("HEARTCALC_BURST_COUNT") {
            match count.parse::<usize>() {
                Ok(n) => {
                    debug!(count = n, "Overriding burst count from environment");
                    self.burst.count = n;
                }
                Err(_) => warn!(value = %count, "Ignoring invalid HEARTCALC_BURST_COUNT"),
            }
        }

        if let Ok(delay) = std::env::var("HEARTCALC_RISE_DELAY_MS") {
            if let Ok(ms) = delay.parse::<u64>() {
                self.timing.rise_delay_ms = ms;
            }
        }

        if let Ok(lifetime) = std::env::var("HEARTCALC_LIFETIME_MS") {
            if let Ok(ms) = lifetime.parse::<u64>() {
                debug!(lifetime_ms = ms, "Overriding particle lifetime from environment");
                self.timing.lifetime_ms = ms;
            }
        }

        if let Ok(tick) = std::env::var("HEARTCALC_TICK_MS") {
            if let Ok(ms) = tick.parse::<u64>() {
                self.timing.tick_ms = ms;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FxConfig::default();
        assert_eq!(config.burst.count, 15);
        assert_eq!(config.timing.rise_delay_ms, 10);
        assert_eq!(config.timing.lifetime_ms, 2100);
        assert_eq!(config.timing.lifetime(), chrono::Duration::milliseconds(2100));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: FxConfig = toml::from_str(
            r#"
            [burst]
            count = 5

            [timing]
            lifetime_ms = 500
            "#,
        )
        .unwrap();
        assert_eq!(config.burst.count, 5);
        assert_eq!(config.burst.size_max, 14.0);
        assert_eq!(config.timing.lifetime_ms, 500);
        assert_eq!(config.timing.rise_delay_ms, 10);
        assert_eq!(config.rise, RiseSettings::default());
    }

    #[test]
    fn test_config_validation() {
        let mut config = FxConfig::default();
        config.burst.count = 0;
        assert!(config.validate().is_err());

        let mut config = FxConfig::default();
        config.timing.rise_delay_ms = config.timing.lifetime_ms;
        assert!(config.validate().is_err());

        let mut config = FxConfig::default();
        config.burst.size_min = 20.0;
        assert!(config.validate().is_err());

        let mut config = FxConfig::default();
        config.rise.jitter_y = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = FxConfig::default();
        config.timing.tick_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let path = std::env::temp_dir().join("heartcalc-fx-does-not-exist.toml");
        let config = FxConfig::load(Some(&path)).unwrap();
        assert_eq!(config.rise, RiseSettings::default());
    }
}
