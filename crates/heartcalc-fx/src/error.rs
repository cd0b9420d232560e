//! # Fx Error Types
//!
//! The scheduler itself has no failure modes: stale timers are no-ops.
//! Errors only come from loading configuration and from talking to a
//! driver task that has stopped.

use thiserror::Error;

/// Result type alias for fx operations.
pub type FxResult<T> = Result<T, FxError>;

#[derive(Debug, Error)]
pub enum FxError {
    /// Configuration values violate an invariant.
    #[error("Invalid fx configuration: {0}")]
    InvalidConfig(String),

    /// Failed to read or parse a config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// The driver task is gone.
    #[error("Fx driver channel closed: {0}")]
    ChannelClosed(String),
}

impl From<std::io::Error> for FxError {
    fn from(err: std::io::Error) -> Self {
        FxError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for FxError {
    fn from(err: toml::de::Error) -> Self {
        FxError::ConfigLoadFailed(err.to_string())
    }
}
