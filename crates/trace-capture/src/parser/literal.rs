//! Numeric literal grammar for trace values.
//!
//! ```text
//! value  := number | '[' number* ']'
//! number := sign? (decimal | 'inf' | 'infinity' | 'nan')
//! ```
//!
//! Whitespace and commas both delimit elements, so array printers that pad
//! columns with spaces and list printers that use commas parse alike.
//! Tokens are checked against the grammar before conversion; captured text
//! is never evaluated.

use crate::utils::error::LiteralError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

static DELIMITER_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s,]+").expect("Invalid delimiter regex"));

static DECIMAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?$").expect("Invalid decimal regex")
});

/// Value recovered from one trace line
///
/// Scalars stay 0-dimensional; [`TraceValue::values`] views both variants
/// as a slice.
#[derive(Debug, Clone, PartialEq)]
pub enum TraceValue {
    Scalar(f64),
    Array(Vec<f64>),
}

impl TraceValue {
    /// Elements in order (one element for a scalar)
    pub fn values(&self) -> &[f64] {
        match self {
            TraceValue::Scalar(value) => std::slice::from_ref(value),
            TraceValue::Array(values) => values,
        }
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, TraceValue::Scalar(_))
    }

    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            TraceValue::Scalar(value) => Some(*value),
            TraceValue::Array(_) => None,
        }
    }

    pub fn len(&self) -> usize {
        self.values().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values().is_empty()
    }

    /// Whether any element is `inf`, `-inf` or `nan`
    pub fn has_non_finite(&self) -> bool {
        self.values().iter().any(|v| !v.is_finite())
    }
}

impl fmt::Display for TraceValue {
    /// Renders in the capture convention: bare scalar or `[a b c]`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceValue::Scalar(value) => f.write_str(&format_number(*value)),
            TraceValue::Array(values) => {
                f.write_str("[")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    f.write_str(&format_number(*value))?;
                }
                f.write_str("]")
            }
        }
    }
}

/// Format a number so that [`parse_number`] recovers it exactly
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        "nan".to_string()
    } else if value.is_infinite() {
        let word = if value > 0.0 { "inf" } else { "-inf" };
        word.to_string()
    } else {
        // Debug output is the shortest representation that round-trips.
        format!("{:?}", value)
    }
}

/// Collapse delimiter runs into single spaces and pad brackets
///
/// `"[ -85.7   -9.18\n  0.107]"` becomes `"[ -85.7 -9.18 0.107 ]"`; a
/// scalar comes out as the bare number.
pub fn normalize_value_text(text: &str) -> String {
    let padded = text.replace('[', " [ ").replace(']', " ] ");
    DELIMITER_RUN
        .replace_all(&padded, " ")
        .trim()
        .to_string()
}

/// Parse value-text into a scalar or a flat array
///
/// # Errors
/// * `LiteralError::Empty` - nothing but delimiters
/// * `LiteralError::InvalidNumber` - a token outside the number grammar
/// * `LiteralError::UnbalancedBrackets` / `LiteralError::NestedArray`
/// * `LiteralError::TrailingToken` - text after a complete value
pub fn parse_value_text(text: &str) -> Result<TraceValue, LiteralError> {
    let normalized = normalize_value_text(text);
    let mut tokens = normalized.split(' ').filter(|t| !t.is_empty());

    let value = match tokens.next() {
        None => return Err(LiteralError::Empty),
        Some("[") => {
            let mut values = Vec::new();
            loop {
                match tokens.next() {
                    None => return Err(LiteralError::UnbalancedBrackets),
                    Some("]") => break,
                    Some("[") => return Err(LiteralError::NestedArray),
                    Some(token) => values.push(parse_number(token)?),
                }
            }
            TraceValue::Array(values)
        }
        Some("]") => return Err(LiteralError::UnbalancedBrackets),
        Some(token) => TraceValue::Scalar(parse_number(token)?),
    };

    match tokens.next() {
        Some(extra) => Err(LiteralError::TrailingToken(extra.to_string())),
        None => Ok(value),
    }
}

/// Parse a single numeric token
///
/// Accepts an optional sign, decimal and scientific notation, and the
/// case-insensitive words `inf`, `infinity` and `nan`.
pub fn parse_number(token: &str) -> Result<f64, LiteralError> {
    let (negative, body) = match token.as_bytes().first() {
        Some(b'-') => (true, &token[1..]),
        Some(b'+') => (false, &token[1..]),
        _ => (false, token),
    };

    let magnitude = if body.eq_ignore_ascii_case("inf") || body.eq_ignore_ascii_case("infinity") {
        f64::INFINITY
    } else if body.eq_ignore_ascii_case("nan") {
        f64::NAN
    } else if DECIMAL.is_match(body) {
        body.parse::<f64>()
            .map_err(|_| LiteralError::InvalidNumber(token.to_string()))?
    } else {
        return Err(LiteralError::InvalidNumber(token.to_string()));
    };

    Ok(if negative { -magnitude } else { magnitude })
}
