//! # State Module
//!
//! Focused state types, each owned by whoever needs it:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ┌──────────────────────┐  ┌──────────────────┐  ┌──────────────────┐  │
//! │  │      CalcState       │  │    AppConfig     │  │    FxHandle      │  │
//! │  │                      │  │                  │  │  (heartcalc-fx)  │  │
//! │  │  Arc<Mutex<          │  │  screen metrics  │  │                  │  │
//! │  │    ExpressionEngine  │  │  easter egg link │  │  driver task     │  │
//! │  │  >>                  │  │  fx settings     │  │  owns particles  │  │
//! │  └──────────────────────┘  └──────────────────┘  └──────────────────┘  │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • CalcState: one tap at a time through the mutex                      │
//! │  • AppConfig: read-only after startup                                  │
//! │  • FxHandle: message passing, cloneable                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod calc;
mod config;

pub use calc::CalcState;
pub use config::{default_config_path, AppConfig, EasterEggSettings, DEFAULT_EASTER_EGG_URL};
