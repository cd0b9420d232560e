//! # App Error Type
//!
//! Unified error type for terminal commands.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in heartcalc-terminal                     │
//! │                                                                         │
//! │  stdin line ──► tap(label) / hearts                                     │
//! │                    │                                                    │
//! │                    ├── unknown label ──── UnknownButton ──┐             │
//! │                    │                                      │             │
//! │                    ├── fx driver gone ─── FxError ────────┼──► AppError │
//! │                    │                                      │             │
//! │                    └── config / stdout ── io, toml ───────┘             │
//! │                                                                         │
//! │  Evaluation failures never surface here: the engine turns them into     │
//! │  the "Error" display.                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use heartcalc_core::UnknownButton;
use heartcalc_fx::FxError;
use serde::Serialize;
use thiserror::Error;

/// Result type alias for app operations.
pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    UnknownButton(#[from] UnknownButton),

    #[error("Particle effects unavailable: {0}")]
    Fx(#[from] FxError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        AppError::Config(err.to_string())
    }
}

/// Machine-readable error codes for JSON output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    UnknownButton,
    FxUnavailable,
    ConfigError,
    Internal,
}

impl AppError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::UnknownButton(_) => ErrorCode::UnknownButton,
            AppError::Fx(_) => ErrorCode::FxUnavailable,
            AppError::Config(_) => ErrorCode::ConfigError,
            AppError::Io(_) | AppError::Json(_) => ErrorCode::Internal,
        }
    }
}
