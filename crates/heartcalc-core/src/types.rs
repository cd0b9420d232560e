//! # Domain Types
//!
//! Keypad and state types exchanged with the presentation layer.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   CalcButton    │   │    Operator     │   │    EditMode     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  Digit(0-9)     │──►│  + - × ÷ .      │   │  Idle    "AC"   │       │
//! │  │  Add ... Negate │   │  (glyphs only)  │   │  Editing "⌫"    │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────────────────────────┐   ┌─────────────────────┐     │
//! │  │            TapOutcome               │   │       Signal        │     │
//! │  │  display, edit_mode, signal ───────────►│  DigitAccepted(d)   │     │
//! │  └─────────────────────────────────────┘   │  EasterEgg          │     │
//! │                                            └─────────────────────┘     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::UnknownButton;

// =============================================================================
// Digit
// =============================================================================

/// A single decimal digit (0-9).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(try_from = "u8", into = "u8")]
#[ts(export)]
pub struct Digit(u8);

impl Digit {
    /// Creates a digit, or `None` when `value > 9`.
    #[inline]
    pub const fn new(value: u8) -> Option<Self> {
        if value <= 9 {
            Some(Digit(value))
        } else {
            None
        }
    }

    /// Returns the numeric value.
    #[inline]
    pub const fn value(&self) -> u8 {
        self.0
    }

    /// Returns the ASCII character for this digit.
    #[inline]
    pub const fn as_char(&self) -> char {
        (b'0' + self.0) as char
    }
}

impl TryFrom<u8> for Digit {
    type Error = UnknownButton;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Digit::new(value).ok_or_else(|| UnknownButton(value.to_string()))
    }
}

impl From<Digit> for u8 {
    fn from(digit: Digit) -> Self {
        digit.0
    }
}

impl fmt::Display for Digit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Operator
// =============================================================================

/// Buttons that only grow the textual expression.
///
/// The decimal point is grouped with the arithmetic operators because it
/// is appended the same way: no validation until `=` is pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Decimal,
}

impl Operator {
    /// The glyph appended to the display.
    pub const fn glyph(&self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Subtract => '-',
            Operator::Multiply => '×',
            Operator::Divide => '÷',
            Operator::Decimal => '.',
        }
    }
}

// =============================================================================
// Calc Button
// =============================================================================

/// Every button on the keypad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum CalcButton {
    Digit(Digit),
    Add,
    Subtract,
    Multiply,
    Divide,
    Decimal,
    Equal,
    Clear,
    Percent,
    Negate,
}

const DIGIT_LABELS: [&str; 10] = ["0", "1", "2", "3", "4", "5", "6", "7", "8", "9"];

impl CalcButton {
    /// Builds a digit button from its numeric value.
    pub fn digit(value: u8) -> Option<Self> {
        Digit::new(value).map(CalcButton::Digit)
    }

    /// The label printed on the key.
    ///
    /// The clear key shows `"AC"` here; the live label depends on the
    /// engine's edit mode (see [`EditMode::clear_label`]).
    pub fn label(&self) -> &'static str {
        match self {
            CalcButton::Digit(d) => DIGIT_LABELS[d.value() as usize],
            CalcButton::Add => "+",
            CalcButton::Subtract => "-",
            CalcButton::Multiply => "×",
            CalcButton::Divide => "÷",
            CalcButton::Decimal => ".",
            CalcButton::Equal => "=",
            CalcButton::Clear => "AC",
            CalcButton::Percent => "%",
            CalcButton::Negate => "-/+",
        }
    }

    /// Returns the operator this button appends, if any.
    pub fn operator(&self) -> Option<Operator> {
        match self {
            CalcButton::Add => Some(Operator::Add),
            CalcButton::Subtract => Some(Operator::Subtract),
            CalcButton::Multiply => Some(Operator::Multiply),
            CalcButton::Divide => Some(Operator::Divide),
            CalcButton::Decimal => Some(Operator::Decimal),
            _ => None,
        }
    }

    /// Returns true for the ten digit keys.
    #[inline]
    pub fn is_digit(&self) -> bool {
        matches!(self, CalcButton::Digit(_))
    }
}

impl fmt::Display for CalcButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CalcButton {
    type Err = UnknownButton;

    /// Parses a key label. ASCII aliases are accepted for keyboards
    /// without the `×`, `÷` or `⌫` glyphs.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim();
        let mut chars = label.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if let Some(value) = c.to_digit(10) {
                return Ok(CalcButton::Digit(Digit(value as u8)));
            }
        }

        match label.to_lowercase().as_str() {
            "+" => Ok(CalcButton::Add),
            "-" | "−" => Ok(CalcButton::Subtract),
            "×" | "x" | "*" => Ok(CalcButton::Multiply),
            "÷" | "/" => Ok(CalcButton::Divide),
            "." => Ok(CalcButton::Decimal),
            "=" => Ok(CalcButton::Equal),
            "ac" | "c" | "⌫" => Ok(CalcButton::Clear),
            "%" => Ok(CalcButton::Percent),
            "-/+" | "+/-" | "±" => Ok(CalcButton::Negate),
            _ => Err(UnknownButton(label.to_string())),
        }
    }
}

// =============================================================================
// Edit Mode
// =============================================================================

/// Whether the clear key performs a full clear or a single backspace.
///
/// ## Invariant
/// `Idle` whenever the display reads `"0"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum EditMode {
    /// Last action was a full clear or a fresh result.
    #[default]
    Idle,
    /// Something was appended since the last clear or evaluation.
    Editing,
}

impl EditMode {
    /// The label the clear key shows in this mode.
    pub const fn clear_label(&self) -> &'static str {
        match self {
            EditMode::Idle => "AC",
            EditMode::Editing => "⌫",
        }
    }
}

// =============================================================================
// Signals and Outcomes
// =============================================================================

/// Side-channel notifications for the presentation layer.
///
/// Signals never alter engine state; they only tell the caller that
/// something decorative should happen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    /// A digit was appended; the caller spawns a particle burst.
    DigitAccepted(Digit),
    /// The formatted result matched the magic value.
    EasterEgg,
}

/// The state after a single tap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TapOutcome {
    pub display: String,
    pub edit_mode: EditMode,
    pub signal: Option<Signal>,
}

impl TapOutcome {
    /// Returns true when this tap produced the easter-egg signal.
    pub fn is_easter_egg(&self) -> bool {
        self.signal == Some(Signal::EasterEgg)
    }

    /// Returns the digit accepted by this tap, if any.
    pub fn accepted_digit(&self) -> Option<Digit> {
        match self.signal {
            Some(Signal::DigitAccepted(d)) => Some(d),
            _ => None,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
