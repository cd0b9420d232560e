//! # Keypad Layout
//!
//! Where each key sits on screen, so a digit tap can release its hearts
//! from the key that was pressed.
//!
//! ## Grid
//! ```text
//! ┌──────┬──────┬──────┬──────┐
//! │  AC  │ -/+  │  %   │  ÷   │   row 0
//! ├──────┼──────┼──────┼──────┤
//! │  7   │  8   │  9   │  ×   │   row 1
//! ├──────┼──────┼──────┼──────┤
//! │  4   │  5   │  6   │  -   │   row 2
//! ├──────┼──────┼──────┼──────┤
//! │  1   │  2   │  3   │  +   │   row 3
//! ├─────────────┼──────┼──────┤
//! │      0      │  .   │  =   │   row 4
//! └─────────────┴──────┴──────┘
//! ```
//!
//! ## Burst Origin
//! ```text
//! bw = (W - 5s) / 4          standard key width, also the key height
//! w  = width of the tapped key (bw, or the double-width zero key)
//! x  = s + (widths of the keys to its left, each plus s) + w / 2
//! y  = H - (rows - row) * (bw + s) + bw / 2
//! ```

use heartcalc_core::CalcButton;
use heartcalc_fx::Point;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

// =============================================================================
// Screen Metrics
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenMetrics {
    #[serde(default = "default_width")]
    pub width: f64,

    #[serde(default = "default_height")]
    pub height: f64,

    /// Gap between keys and around the grid.
    #[serde(default = "default_spacing")]
    pub spacing: f64,
}

fn default_width() -> f64 {
    390.0
}

fn default_height() -> f64 {
    844.0
}

fn default_spacing() -> f64 {
    12.0
}

impl Default for ScreenMetrics {
    fn default() -> Self {
        ScreenMetrics {
            width: default_width(),
            height: default_height(),
            spacing: default_spacing(),
        }
    }
}

impl ScreenMetrics {
    pub fn button_width(&self) -> f64 {
        (self.width - 5.0 * self.spacing) / 4.0
    }

    /// The zero key spans two columns.
    pub fn zero_width(&self) -> f64 {
        ((self.width - 4.0 * self.spacing) / 4.0) * 2.0
    }

    /// Width of one key; only the zero key is wider.
    pub fn key_width(&self, button: CalcButton) -> f64 {
        match button {
            CalcButton::Digit(d) if d.value() == 0 => self.zero_width(),
            _ => self.button_width(),
        }
    }

    /// Keys are square.
    pub fn button_height(&self) -> f64 {
        self.button_width()
    }

    pub fn validate(&self) -> AppResult<()> {
        if !self.spacing.is_finite() || self.spacing < 0.0 {
            return Err(AppError::Config(format!(
                "screen.spacing must be a non-negative number, got {}",
                self.spacing
            )));
        }
        if !self.width.is_finite() || self.button_width() <= 0.0 {
            return Err(AppError::Config(format!(
                "screen.width {} leaves no room for four keys",
                self.width
            )));
        }
        if !self.height.is_finite() || self.height <= 0.0 {
            return Err(AppError::Config(format!(
                "screen.height must be positive, got {}",
                self.height
            )));
        }
        Ok(())
    }
}

// =============================================================================
// Button Grid
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ButtonGrid {
    rows: Vec<Vec<CalcButton>>,
}

impl Default for ButtonGrid {
    fn default() -> Self {
        use CalcButton::*;

        let digits: Vec<CalcButton> = (0..=9).filter_map(CalcButton::digit).collect();
        let d = |n: usize| digits[n];
        ButtonGrid {
            rows: vec![
                vec![Clear, Negate, Percent, Divide],
                vec![d(7), d(8), d(9), Multiply],
                vec![d(4), d(5), d(6), Subtract],
                vec![d(1), d(2), d(3), Add],
                vec![d(0), Decimal, Equal],
            ],
        }
    }
}

impl ButtonGrid {
    pub fn rows(&self) -> &[Vec<CalcButton>] {
        &self.rows
    }

    /// Returns `(row, col)` of a button.
    pub fn locate(&self, button: CalcButton) -> Option<(usize, usize)> {
        self.rows.iter().enumerate().find_map(|(row, keys)| {
            keys.iter()
                .position(|key| *key == button)
                .map(|col| (row, col))
        })
    }

    /// Centre of the key, used as the burst origin.
    pub fn origin_for(&self, button: CalcButton, metrics: &ScreenMetrics) -> Option<Point> {
        let (row, col) = self.locate(button)?;
        let s = metrics.spacing;
        let bh = metrics.button_height();
        let rows = self.rows.len() as f64;

        let left: f64 = self.rows[row][..col]
            .iter()
            .map(|key| metrics.key_width(*key) + s)
            .sum();
        let w = metrics.key_width(button);

        Some(Point::new(
            s + left + w / 2.0,
            metrics.height - (rows - row as f64) * (bh + s) + bh / 2.0,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digit(n: u8) -> CalcButton {
        CalcButton::digit(n).unwrap()
    }

    #[test]
    fn test_grid_has_every_button_once() {
        let grid = ButtonGrid::default();
        let total: usize = grid.rows().iter().map(Vec::len).sum();
        assert_eq!(total, 19);

        for n in 0..=9 {
            assert!(grid.locate(digit(n)).is_some());
        }
        assert_eq!(grid.locate(CalcButton::Clear), Some((0, 0)));
        assert_eq!(grid.locate(CalcButton::Equal), Some((4, 2)));
    }

    #[test]
    fn test_key_sizes() {
        let metrics = ScreenMetrics::default();
        assert_eq!(metrics.button_width(), 82.5);
        assert_eq!(metrics.button_height(), 82.5);
        assert_eq!(metrics.zero_width(), 171.0);
        assert_eq!(metrics.key_width(digit(0)), 171.0);
        assert_eq!(metrics.key_width(digit(7)), 82.5);
        assert_eq!(metrics.key_width(CalcButton::Equal), 82.5);
    }

    #[test]
    fn test_origins() {
        let grid = ButtonGrid::default();
        let metrics = ScreenMetrics::default();

        assert_eq!(
            grid.origin_for(digit(7), &metrics),
            Some(Point::new(53.25, 507.25))
        );
        assert_eq!(
            grid.origin_for(digit(9), &metrics),
            Some(Point::new(242.25, 507.25))
        );
        assert_eq!(
            grid.origin_for(digit(0), &metrics),
            Some(Point::new(97.5, 790.75))
        );
        // Keys right of the wide zero shift over by its extra width.
        assert_eq!(
            grid.origin_for(CalcButton::Equal, &metrics),
            Some(Point::new(330.75, 790.75))
        );
    }

    #[test]
    fn test_metrics_validation() {
        assert!(ScreenMetrics::default().validate().is_ok());

        let narrow = ScreenMetrics {
            width: 50.0,
            ..ScreenMetrics::default()
        };
        assert!(narrow.validate().is_err());
    }
}
