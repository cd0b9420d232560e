//! # Error Types
//!
//! Domain-specific error types for heartcalc-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  heartcalc-core errors (this file)                                     │
//! │  ├── CalcError        - Evaluation failed                              │
//! │  │   ├── Parse(ParseError)                                             │
//! │  │   └── NonFiniteResult                                               │
//! │  ├── ParseError       - Malformed expression text                      │
//! │  └── UnknownButton    - Keypad label that maps to no button            │
//! │                                                                         │
//! │  Flow: ParseError → CalcError → display "Error", edit mode Idle        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Neither error is fatal: the engine collapses both to the `"Error"`
//! display and stays ready for the next tap.

use thiserror::Error;

// =============================================================================
// Calc Error
// =============================================================================

/// Evaluation errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    /// The expression text could not be parsed.
    #[error("Parse failure: {0}")]
    Parse(#[from] ParseError),

    /// Division by zero or overflow produced infinity or NaN.
    ///
    /// ## When This Occurs
    /// - `10÷0` (infinity)
    /// - `0÷0` (NaN)
    /// - Products exceeding `f64::MAX`
    #[error("Result is not a finite number")]
    NonFiniteResult,
}

// =============================================================================
// Parse Error
// =============================================================================

/// Malformed expression errors, raised by the tokenizer and evaluator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Nothing to evaluate.
    #[error("Expression is empty")]
    EmptyExpression,

    /// A character outside the four-function grammar.
    #[error("Unexpected character '{ch}' at position {position}")]
    UnexpectedCharacter { ch: char, position: usize },

    /// A number literal with more than one decimal point, or a lone `.`.
    #[error("Malformed number '{literal}'")]
    MalformedNumber { literal: String },

    /// An operator with no operand after it (trailing or doubled operator).
    #[error("Missing operand at token {position}")]
    MissingOperand { position: usize },
}

// =============================================================================
// Button Error
// =============================================================================

/// A keypad label that maps to no button.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown button label: '{0}'")]
pub struct UnknownButton(pub String);

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CalcError.
pub type CalcResult<T> = Result<T, CalcError>;
