//! # Expression Evaluator
//!
//! A small explicit grammar for four-function expressions.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Evaluation Pipeline                                │
//! │                                                                         │
//! │  "2+3×4"                                                                │
//! │     │                                                                   │
//! │     ▼  tokenize()                                                       │
//! │  [2] [+] [3] [*] [4]        glyphs normalized: × x → *   ÷ → /          │
//! │     │                                                                   │
//! │     ▼  operands()                                                       │
//! │  operands: 2, 3, 4          ops: +, *      (unary minus folded in)      │
//! │     │                                                                   │
//! │     ▼  pass 1: * and / left to right                                    │
//! │  terms: 2, 12               ops: +                                      │
//! │     │                                                                   │
//! │     ▼  pass 2: + and - left to right                                    │
//! │  14                                                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Grammar
//! ```text
//! expression := operand (binary_op operand)*
//! operand    := "-"? number
//! number     := digits ("." digits?)? | "." digits
//! binary_op  := "+" | "-" | "*" | "/"
//! ```
//!
//! Every value is an IEEE-754 double. A non-finite intermediate or final
//! value is reported as [`CalcError::NonFiniteResult`].

use crate::error::{CalcError, CalcResult, ParseError};

// =============================================================================
// Tokens
// =============================================================================

/// Binary operators after glyph normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOp {
    fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(BinaryOp::Add),
            '-' | '−' => Some(BinaryOp::Sub),
            '*' | '×' | 'x' => Some(BinaryOp::Mul),
            '/' | '÷' => Some(BinaryOp::Div),
            _ => None,
        }
    }

    fn is_multiplicative(&self) -> bool {
        matches!(self, BinaryOp::Mul | BinaryOp::Div)
    }

    fn apply(&self, lhs: f64, rhs: f64) -> CalcResult<f64> {
        let value = match self {
            BinaryOp::Add => lhs + rhs,
            BinaryOp::Sub => lhs - rhs,
            BinaryOp::Mul => lhs * rhs,
            BinaryOp::Div => lhs / rhs,
        };
        finite(value)
    }
}

/// A lexical token.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Number(f64),
    Op(BinaryOp),
}

// =============================================================================
// Normalization & Tokenizing
// =============================================================================

/// Replaces display glyphs with the evaluator's ASCII operators.
///
/// ## Example
/// ```rust
/// use heartcalc_core::evaluator::normalize;
///
/// assert_eq!(normalize("8×2÷4"), "8*2/4");
/// ```
pub fn normalize(display: &str) -> String {
    display
        .chars()
        .map(|c| match c {
            '×' | 'x' => '*',
            '÷' => '/',
            '−' => '-',
            other => other,
        })
        .collect()
}

/// Splits an expression into numbers and operators.
///
/// Runs of digits and `.` form one literal; a literal with two decimal
/// points (`1.2.3`) or no digits at all (`.`) is rejected here.
pub fn tokenize(expr: &str) -> Result<Vec<Token>, ParseError> {
    let mut tokens = Vec::new();
    let mut chars = expr.chars().enumerate().peekable();

    while let Some((position, c)) = chars.next() {
        if c.is_whitespace() {
            continue;
        }

        if c.is_ascii_digit() || c == '.' {
            let mut literal = String::from(c);
            while let Some(&(_, next)) = chars.peek() {
                if next.is_ascii_digit() || next == '.' {
                    literal.push(next);
                    chars.next();
                } else {
                    break;
                }
            }
            tokens.push(Token::Number(parse_literal(literal)?));
            continue;
        }

        match BinaryOp::from_char(c) {
            Some(op) => tokens.push(Token::Op(op)),
            None => return Err(ParseError::UnexpectedCharacter { ch: c, position }),
        }
    }

    Ok(tokens)
}

fn parse_literal(literal: String) -> Result<f64, ParseError> {
    let points = literal.chars().filter(|&c| c == '.').count();
    let has_digit = literal.chars().any(|c| c.is_ascii_digit());
    if points > 1 || !has_digit {
        return Err(ParseError::MalformedNumber { literal });
    }

    literal
        .parse::<f64>()
        .map_err(|_| ParseError::MalformedNumber { literal })
}

// =============================================================================
// Evaluation
// =============================================================================

/// Evaluates a four-function expression.
///
/// ## Example
/// ```rust
/// use heartcalc_core::evaluate;
/// use heartcalc_core::CalcError;
///
/// assert_eq!(evaluate("2+3×4"), Ok(14.0));
/// assert_eq!(evaluate("7÷2"), Ok(3.5));
/// assert_eq!(evaluate("10÷0"), Err(CalcError::NonFiniteResult));
/// assert!(evaluate("1+").is_err());
/// ```
pub fn evaluate(expr: &str) -> CalcResult<f64> {
    let tokens = tokenize(expr)?;
    if tokens.is_empty() {
        return Err(ParseError::EmptyExpression.into());
    }

    let (operands, ops) = operands(&tokens)?;

    // Pass 1: fold multiplicative operators into the running term
    let mut terms = vec![operands[0]];
    let mut additive = Vec::new();
    for (op, &rhs) in ops.iter().zip(&operands[1..]) {
        if op.is_multiplicative() {
            if let Some(term) = terms.last_mut() {
                *term = op.apply(*term, rhs)?;
            }
        } else {
            additive.push(*op);
            terms.push(rhs);
        }
    }

    // Pass 2: fold additive operators
    let mut result = terms[0];
    for (op, &rhs) in additive.iter().zip(&terms[1..]) {
        result = op.apply(result, rhs)?;
    }

    finite(result)
}

/// Splits tokens into alternating operands and binary operators.
///
/// A `-` where an operand is expected negates that operand. The returned
/// operand list is never empty and always has one more entry than `ops`.
fn operands(tokens: &[Token]) -> Result<(Vec<f64>, Vec<BinaryOp>), ParseError> {
    let mut values = Vec::new();
    let mut ops = Vec::new();
    let mut index = 0;

    loop {
        let mut sign = 1.0;
        if let Some(Token::Op(BinaryOp::Sub)) = tokens.get(index) {
            sign = -1.0;
            index += 1;
        }

        match tokens.get(index) {
            Some(Token::Number(value)) => values.push(sign * value),
            _ => return Err(ParseError::MissingOperand { position: index }),
        }
        index += 1;

        match tokens.get(index) {
            None => break,
            Some(Token::Op(op)) => {
                ops.push(*op);
                index += 1;
            }
            // Adjacent literals are merged by the tokenizer
            Some(Token::Number(_)) => {
                return Err(ParseError::MissingOperand { position: index });
            }
        }
    }

    Ok((values, ops))
}

fn finite(value: f64) -> CalcResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CalcError::NonFiniteResult)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
