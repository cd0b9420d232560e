//! # Result Formatting
//!
//! Converts evaluated values to display text and back.
//!
//! ## Formatting Rule
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  value has no fractional part?                                          │
//! │     yes ──► plain integer text         14.0  → "14"                     │
//! │     no  ──► exactly two decimals        3.5  → "3.50"                   │
//! │                                       0.333… → "0.33"                   │
//! │                                                                         │
//! │  Rounding at the second decimal is whatever `{:.2}` does with the       │
//! │  exact binary value, which is the host default for decimal rounding.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

/// Formats an evaluated value for the display.
///
/// ## Example
/// ```rust
/// use heartcalc_core::format::format_result;
///
/// assert_eq!(format_result(14.0), "14");
/// assert_eq!(format_result(3.5), "3.50");
/// assert_eq!(format_result(-0.25), "-0.25");
/// ```
pub fn format_result(value: f64) -> String {
    if value.fract() == 0.0 {
        // -0.0 would otherwise print as "-0"
        if value == 0.0 {
            return "0".to_string();
        }
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}

/// Parses the display as a single bare number.
///
/// Accepts an optional leading `-` or `+`, digits and at most one `.`. Anything
/// else (operators, the error marker, `inf`/`NaN` spellings that
/// `f64::from_str` would accept) yields `None`.
pub fn parse_number(display: &str) -> Option<f64> {
    let body = display
        .strip_prefix(|c| c == '-' || c == '+')
        .unwrap_or(display);
    let mut digits = 0;
    let mut points = 0;
    for c in body.chars() {
        match c {
            '0'..='9' => digits += 1,
            '.' => points += 1,
            _ => return None,
        }
    }
    if digits == 0 || points > 1 {
        return None;
    }

    display.parse::<f64>().ok().filter(|v| v.is_finite())
}
