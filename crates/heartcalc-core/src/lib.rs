//! # heartcalc-core: Pure Calculator Logic for Heartcalc
//!
//! This crate is the **heart** of Heartcalc. It turns a sequence of keypad
//! taps into a displayed numeric result, with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Heartcalc Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Presentation Layer (apps/terminal)              │   │
//! │  │      Keypad grid ──► tap(label) ──► render display + hearts     │   │
//! │  └───────────────┬───────────────────────────────┬─────────────────┘   │
//! │                  │ every tap                     │ digit taps only      │
//! │  ┌───────────────▼─────────────────┐   ┌─────────▼─────────────────┐   │
//! │  │  ★ heartcalc-core (THIS CRATE) ★ │   │      heartcalc-fx         │   │
//! │  │                                  │   │  ParticleScheduler        │   │
//! │  │  engine ──► evaluator ──► format │   │  (spawn → rise → expire)  │   │
//! │  │                                  │   └───────────────────────────┘   │
//! │  │  NO I/O • NO TIMERS • PURE       │                                   │
//! │  └──────────────────────────────────┘                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Keypad buttons, operators, edit mode, tap outcomes
//! - [`engine`] - The `ExpressionEngine` input state machine
//! - [`evaluator`] - Tokenizer and two-pass four-function evaluator
//! - [`format`] - Result formatting and bare-number parsing
//! - [`error`] - Parse and evaluation error types
//!
//! ## Example Usage
//!
//! ```rust
//! use heartcalc_core::{CalcButton, ExpressionEngine};
//!
//! let mut engine = ExpressionEngine::new();
//! for label in ["2", "+", "3", "×", "4", "="] {
//!     let button: CalcButton = label.parse().unwrap();
//!     engine.apply(button);
//! }
//!
//! // Multiplication binds tighter than addition
//! assert_eq!(engine.display(), "14");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod engine;
pub mod error;
pub mod evaluator;
pub mod format;
pub mod types;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use engine::{EngineState, ExpressionEngine};
pub use error::{CalcError, CalcResult, ParseError, UnknownButton};
pub use evaluator::evaluate;
pub use format::format_result;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// The display shown after a full clear. The display is never empty.
pub const ZERO_DISPLAY: &str = "0";

/// Literal shown when evaluation fails for any reason.
pub const ERROR_MARKER: &str = "Error";

/// Formatted result that triggers the easter-egg signal.
pub const EASTER_EGG_RESULT: &str = "777";
