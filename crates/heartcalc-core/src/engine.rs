//! # Expression Engine
//!
//! The input state machine behind the keypad.
//!
//! ## State Transitions
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    ExpressionEngine Transitions                         │
//! │                                                                         │
//! │  Tap          Display change                       Edit mode            │
//! │  ───          ──────────────                       ─────────            │
//! │  digit d      "0" → "d", else append d             Editing              │
//! │  + - × ÷ .    "0" → "", then append glyph          Editing              │
//! │  =            evaluate → result | "Error"          Idle                 │
//! │  AC (Idle)    → "0"                                Idle                 │
//! │  ⌫ (Editing)  drop last char, "" → "0"             Editing | Idle       │
//! │  -/+          toggle leading "-" on whole string   Editing              │
//! │  %            bare number n → n/100, else no-op    unchanged            │
//! │                                                                         │
//! │  After every tap: display "" → "0", and display "0" → Idle.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Known Quirks (kept on purpose)
//! - `-/+` on `"2+3"` yields `"-2+3"`: the sign applies to the whole
//!   string, not the trailing operand.
//! - `%` on a compound expression does nothing; it only rescales a bare
//!   number.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};
use ts_rs::TS;

use crate::evaluator::{evaluate, normalize};
use crate::format::{format_result, parse_number};
use crate::types::{CalcButton, Digit, EditMode, Operator, Signal, TapOutcome};
use crate::{EASTER_EGG_RESULT, ERROR_MARKER, ZERO_DISPLAY};

/// Read-only view of the engine for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct EngineState {
    pub display: String,
    pub edit_mode: EditMode,
}

/// Owns the display string and edit mode.
///
/// One tap is one synchronous call; there are no suspension points, so
/// callers never observe a partial update.
#[derive(Debug, Clone)]
pub struct ExpressionEngine {
    display: String,
    edit_mode: EditMode,
    easter_egg: String,
}

impl Default for ExpressionEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ExpressionEngine {
    /// Creates an engine showing `"0"` in `Idle` mode.
    pub fn new() -> Self {
        ExpressionEngine {
            display: ZERO_DISPLAY.to_string(),
            edit_mode: EditMode::Idle,
            easter_egg: EASTER_EGG_RESULT.to_string(),
        }
    }

    /// Overrides the formatted result that raises [`Signal::EasterEgg`].
    pub fn with_easter_egg(mut self, result: impl Into<String>) -> Self {
        self.easter_egg = result.into();
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn edit_mode(&self) -> EditMode {
        self.edit_mode
    }

    /// Label for the clear key: `"AC"` when idle, `"⌫"` while editing.
    pub fn clear_label(&self) -> &'static str {
        self.edit_mode.clear_label()
    }

    pub fn state(&self) -> EngineState {
        EngineState {
            display: self.display.clone(),
            edit_mode: self.edit_mode,
        }
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    /// Applies one keypad tap.
    pub fn apply(&mut self, button: CalcButton) -> TapOutcome {
        debug!(%button, display = %self.display, "Tap");
        match button {
            CalcButton::Digit(d) => self.handle_digit(d),
            CalcButton::Equal => self.handle_equal(),
            CalcButton::Clear => self.handle_clear(),
            CalcButton::Negate => self.handle_sign(),
            CalcButton::Percent => self.handle_percent(),
            CalcButton::Add => self.handle_operator(Operator::Add),
            CalcButton::Subtract => self.handle_operator(Operator::Subtract),
            CalcButton::Multiply => self.handle_operator(Operator::Multiply),
            CalcButton::Divide => self.handle_operator(Operator::Divide),
            CalcButton::Decimal => self.handle_operator(Operator::Decimal),
        }
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Appends a digit, replacing a lone `"0"` (or the error marker).
    ///
    /// The returned outcome carries [`Signal::DigitAccepted`] so the
    /// caller can spawn a particle burst.
    pub fn handle_digit(&mut self, digit: Digit) -> TapOutcome {
        if self.is_fresh() {
            self.display.clear();
        }
        self.display.push(digit.as_char());
        self.edit_mode = EditMode::Editing;

        self.finish(Some(Signal::DigitAccepted(digit)))
    }

    /// Appends an operator glyph. No validation happens until `=`.
    ///
    /// Only a lone `"0"` is dropped first; after `"Error"` the glyph is
    /// appended, so the next `=` fails again.
    pub fn handle_operator(&mut self, op: Operator) -> TapOutcome {
        // A leading operator must not prefix a stray zero
        if self.display == ZERO_DISPLAY {
            self.display.clear();
        }
        self.display.push(op.glyph());
        self.edit_mode = EditMode::Editing;

        self.finish(None)
    }

    /// Evaluates the display.
    ///
    /// ## Outcomes
    /// ```text
    /// "2+3×4" ──► "14"      Idle
    /// "7÷2"   ──► "3.50"    Idle
    /// "10÷0"  ──► "Error"   Idle   (NonFiniteResult)
    /// "1+"    ──► "Error"   Idle   (MissingOperand)
    /// "777"   ──► "777"     Idle   + Signal::EasterEgg
    /// ```
    pub fn handle_equal(&mut self) -> TapOutcome {
        match evaluate(&self.display) {
            Ok(value) => {
                let formatted = format_result(value);
                debug!(
                    expression = %normalize(&self.display),
                    result = %formatted,
                    "Evaluated expression"
                );
                self.display = formatted;
            }
            Err(e) => {
                debug!(expression = %self.display, error = %e, "Evaluation failed");
                self.display = ERROR_MARKER.to_string();
            }
        }
        self.edit_mode = EditMode::Idle;

        // Signalled after the result is in place; never alters state
        let signal = (self.display == self.easter_egg).then_some(Signal::EasterEgg);
        if signal.is_some() {
            debug!(result = %self.display, "Easter egg result");
        }
        self.finish(signal)
    }

    /// Full clear when idle, single-character backspace while editing.
    pub fn handle_clear(&mut self) -> TapOutcome {
        match self.edit_mode {
            EditMode::Idle => {
                self.display = ZERO_DISPLAY.to_string();
            }
            EditMode::Editing => {
                self.display.pop();
                if self.display.is_empty() {
                    self.edit_mode = EditMode::Idle;
                }
            }
        }

        self.finish(None)
    }

    /// Toggles a leading `-` on the whole display.
    pub fn handle_sign(&mut self) -> TapOutcome {
        match self.display.strip_prefix('-') {
            Some(rest) => self.display = rest.to_string(),
            None => self.display.insert(0, '-'),
        }
        self.edit_mode = EditMode::Editing;

        self.finish(None)
    }

    /// Divides a bare number by 100. Compound expressions are left alone.
    pub fn handle_percent(&mut self) -> TapOutcome {
        match parse_number(&self.display) {
            Some(value) => self.display = format_result(value / 100.0),
            None => trace!(display = %self.display, "Percent ignored on non-number"),
        }

        self.finish(None)
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    /// True when the next digit should replace the display.
    fn is_fresh(&self) -> bool {
        self.display == ZERO_DISPLAY || self.display == ERROR_MARKER
    }

    /// Restores the display invariants and builds the outcome.
    fn finish(&mut self, signal: Option<Signal>) -> TapOutcome {
        if self.display.is_empty() {
            self.display = ZERO_DISPLAY.to_string();
        }
        if self.display == ZERO_DISPLAY {
            self.edit_mode = EditMode::Idle;
        }

        TapOutcome {
            display: self.display.clone(),
            edit_mode: self.edit_mode,
            signal,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn press(engine: &mut ExpressionEngine, labels: &str) -> Vec<TapOutcome> {
        labels
            .split_whitespace()
            .map(|label| engine.apply(label.parse().unwrap()))
            .collect()
    }

    fn engine_with(display: &str) -> ExpressionEngine {
        let mut engine = ExpressionEngine::new();
        for c in display.chars() {
            engine.apply(c.to_string().parse().unwrap());
        }
        engine
    }

    #[test]
    fn test_initial_state() {
        let engine = ExpressionEngine::new();
        assert_eq!(engine.display(), "0");
        assert_eq!(engine.edit_mode(), EditMode::Idle);
        assert_eq!(engine.clear_label(), "AC");
    }

    #[test]
    fn test_digits_replace_leading_zero() {
        let mut engine = ExpressionEngine::new();
        press(&mut engine, "0 5");
        assert_eq!(engine.display(), "5");

        press(&mut engine, "0 7");
        assert_eq!(engine.display(), "507");
        assert_eq!(engine.edit_mode(), EditMode::Editing);
        assert_eq!(engine.clear_label(), "⌫");
    }

    #[test]
    fn test_zero_on_zero_stays_idle() {
        let mut engine = ExpressionEngine::new();
        let outcome = engine.apply(CalcButton::digit(0).unwrap());
        assert_eq!(outcome.display, "0");
        assert_eq!(outcome.edit_mode, EditMode::Idle);
        assert!(outcome.accepted_digit().is_some());
    }

    #[test]
    fn test_digit_signal() {
        let mut engine = ExpressionEngine::new();
        let outcome = engine.apply(CalcButton::digit(4).unwrap());
        assert_eq!(outcome.accepted_digit().map(|d| d.value()), Some(4));

        let outcome = engine.apply(CalcButton::Add);
        assert_eq!(outcome.signal, None);
    }

    #[test]
    fn test_operator_on_zero_drops_zero() {
        let mut engine = ExpressionEngine::new();
        press(&mut engine, ". 5");
        assert_eq!(engine.display(), ".5");

        let mut engine = ExpressionEngine::new();
        press(&mut engine, "× ×");
        assert_eq!(engine.display(), "××");
        assert_eq!(engine.edit_mode(), EditMode::Editing);
    }

    #[test]
    fn test_operators_append_without_validation() {
        let mut engine = engine_with("1");
        press(&mut engine, "+ + . . ÷");
        assert_eq!(engine.display(), "1++..÷");
    }

    #[test]
    fn test_equal_scenarios() {
        let mut engine = ExpressionEngine::new();
        press(&mut engine, "1 + 2 =");
        assert_eq!(engine.display(), "3");
        assert_eq!(engine.edit_mode(), EditMode::Idle);

        let mut engine = ExpressionEngine::new();
        press(&mut engine, "2 + 3 × 4 =");
        assert_eq!(engine.display(), "14");

        let mut engine = ExpressionEngine::new();
        press(&mut engine, "1 0 ÷ 0 =");
        assert_eq!(engine.display(), "Error");
        assert_eq!(engine.edit_mode(), EditMode::Idle);

        let mut engine = ExpressionEngine::new();
        press(&mut engine, "7 ÷ 2 =");
        assert_eq!(engine.display(), "3.50");
    }

    #[test]
    fn test_trailing_operator_is_error() {
        let mut engine = ExpressionEngine::new();
        let outcomes = press(&mut engine, "8 × =");
        assert_eq!(outcomes.last().map(|o| o.display.as_str()), Some("Error"));
        assert_eq!(engine.edit_mode(), EditMode::Idle);
    }

    #[test]
    fn test_digit_after_error_starts_fresh() {
        let mut engine = ExpressionEngine::new();
        press(&mut engine, "1 ÷ 0 = 4");
        assert_eq!(engine.display(), "4");
        assert_eq!(engine.edit_mode(), EditMode::Editing);
    }

    #[test]
    fn test_operator_after_error_appends() {
        let mut engine = ExpressionEngine::new();
        let outcomes = press(&mut engine, "1 ÷ 0 = - 5 =");
        let displays: Vec<&str> = outcomes.iter().map(|o| o.display.as_str()).collect();
        assert_eq!(displays[4..], ["Error-", "Error-5", "Error"]);
        assert_eq!(engine.edit_mode(), EditMode::Idle);
    }

    #[test]
    fn test_digit_after_result_appends() {
        let mut engine = ExpressionEngine::new();
        press(&mut engine, "1 + 2 = 5");
        assert_eq!(engine.display(), "35");
    }

    #[test]
    fn test_easter_egg_emitted_once() {
        let mut engine = ExpressionEngine::new();
        let outcomes = press(&mut engine, "7 7 7 =");
        let eggs = outcomes.iter().filter(|o| o.is_easter_egg()).count();
        assert_eq!(eggs, 1);
        assert_eq!(engine.display(), "777");
        assert_eq!(engine.edit_mode(), EditMode::Idle);

        let mut engine = ExpressionEngine::new();
        let outcomes = press(&mut engine, "7 0 0 + 7 7 =");
        assert!(outcomes.last().unwrap().is_easter_egg());
        assert_eq!(engine.display(), "777");
    }

    #[test]
    fn test_custom_easter_egg() {
        let mut engine = ExpressionEngine::new().with_easter_egg("42");
        let outcomes = press(&mut engine, "6 × 7 =");
        assert!(outcomes.last().unwrap().is_easter_egg());
    }

    #[test]
    fn test_clear_backspace_reaches_floor() {
        let mut engine = engine_with("12+3");
        assert_eq!(engine.edit_mode(), EditMode::Editing);

        engine.handle_clear();
        assert_eq!(engine.display(), "12+");
        engine.handle_clear();
        assert_eq!(engine.display(), "12");
        engine.handle_clear();
        assert_eq!(engine.display(), "1");
        assert_eq!(engine.edit_mode(), EditMode::Editing);
        engine.handle_clear();
        assert_eq!(engine.display(), "0");
        assert_eq!(engine.edit_mode(), EditMode::Idle);

        let floor = engine.state();
        engine.handle_clear();
        assert_eq!(engine.state(), floor);
    }

    #[test]
    fn test_backspace_removes_whole_glyph() {
        let mut engine = engine_with("9×");
        engine.handle_clear();
        assert_eq!(engine.display(), "9");
    }

    #[test]
    fn test_full_clear_after_result() {
        let mut engine = ExpressionEngine::new();
        press(&mut engine, "4 × 4 =");
        assert_eq!(engine.clear_label(), "AC");
        engine.handle_clear();
        assert_eq!(engine.display(), "0");
        assert_eq!(engine.edit_mode(), EditMode::Idle);
    }

    #[test]
    fn test_sign_is_an_involution() {
        for start in ["5", "12.5", "2+3", "-7"] {
            let mut engine = engine_with(start);
            let before = engine.display().to_string();
            engine.handle_sign();
            engine.handle_sign();
            assert_eq!(engine.display(), before);
        }

        let mut engine = engine_with("1÷0");
        engine.handle_equal();
        engine.handle_sign();
        assert_eq!(engine.display(), "-Error");
        engine.handle_sign();
        assert_eq!(engine.display(), "Error");
    }

    #[test]
    fn test_sign_toggles_whole_expression() {
        let mut engine = engine_with("2+3");
        engine.handle_sign();
        assert_eq!(engine.display(), "-2+3");
        engine.handle_equal();
        assert_eq!(engine.display(), "1");
    }

    #[test]
    fn test_sign_off_negative_zero_restores_idle() {
        let mut engine = ExpressionEngine::new();
        engine.handle_sign();
        assert_eq!(engine.display(), "-0");
        assert_eq!(engine.edit_mode(), EditMode::Editing);

        engine.handle_sign();
        assert_eq!(engine.display(), "0");
        assert_eq!(engine.edit_mode(), EditMode::Idle);
    }

    #[test]
    fn test_percent() {
        let mut engine = ExpressionEngine::new();
        press(&mut engine, "5 %");
        assert_eq!(engine.display(), "0.05");

        let mut engine = ExpressionEngine::new();
        press(&mut engine, "2 0 0 %");
        assert_eq!(engine.display(), "2");
    }

    #[test]
    fn test_percent_accepts_leading_plus() {
        let mut engine = ExpressionEngine::new();
        let outcomes = press(&mut engine, "+ 5 %");
        assert_eq!(outcomes[1].display, "+5");
        assert_eq!(engine.display(), "0.05");
    }

    #[test]
    fn test_percent_on_expression_is_noop() {
        let mut engine = engine_with("5+5");
        let before = engine.state();
        engine.handle_percent();
        assert_eq!(engine.state(), before);
    }

    #[test]
    fn test_percent_of_zero_keeps_invariant() {
        let mut engine = ExpressionEngine::new();
        engine.handle_sign();
        engine.handle_percent();
        assert_eq!(engine.display(), "0");
        assert_eq!(engine.edit_mode(), EditMode::Idle);
    }

    #[test]
    fn test_display_never_empty_and_zero_is_idle() {
        let mut engine = ExpressionEngine::new();
        let script = "+ AC 3 - C C C . ⌫ -/+ % = 1 ÷ = AC 0 ⌫";
        for outcome in press(&mut engine, script) {
            assert!(!outcome.display.is_empty());
            if outcome.display == "0" {
                assert_eq!(outcome.edit_mode, EditMode::Idle);
            }
        }
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_taps_log_at_debug_level() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            ExpressionEngine::new().apply(CalcButton::digit(5).unwrap());
        });

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("DEBUG"), "{output}");
        assert!(output.contains("Tap"), "{output}");
    }

    #[test]
    fn test_results_round_trip_within_tolerance() {
        for script in ["1 ÷ 3 =", "2 ÷ 3 =", "1 0 ÷ 4 =", "9 9 ÷ 7 ="] {
            let mut engine = ExpressionEngine::new();
            let outcomes = press(&mut engine, script);
            let shown = &outcomes.last().unwrap().display;

            let expression: String = script.split_whitespace().filter(|l| *l != "=").collect();
            let exact = evaluate(&expression).unwrap();
            let parsed = parse_number(shown).unwrap();
            assert!((parsed - exact).abs() <= 0.005, "{shown} vs {exact}");
        }
    }
}
