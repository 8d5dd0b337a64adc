use serde::{Deserialize, Serialize};

use crate::core::CellValue;

/// How a cell that fails numeric recognition enters a numeric series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MissingValuePolicy {
    /// Substitute `0.0`, matching charts exported before the flag existed.
    #[default]
    Zero,
    /// Keep an explicit gap (`None`, serialized as `null`).
    Null,
}

impl MissingValuePolicy {
    #[must_use]
    pub fn fill(self) -> Option<f64> {
        match self {
            Self::Zero => Some(0.0),
            Self::Null => None,
        }
    }
}

fn is_stripped_char(c: char) -> bool {
    matches!(c, ',' | '$' | '%') || c.is_whitespace()
}

fn parse_stripped(text: &str) -> Option<f64> {
    let stripped: String = text.chars().filter(|c| !is_stripped_char(*c)).collect();
    if stripped.is_empty() {
        return None;
    }
    stripped.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Returns the finite number a cell denotes, if any.
///
/// Strings have separators, currency and percent signs and whitespace
/// removed before parsing.
#[must_use]
pub fn numeric_value(value: &CellValue) -> Option<f64> {
    match value {
        CellValue::Empty => None,
        CellValue::Number(number) => number.is_finite().then_some(*number),
        CellValue::Text(text) => parse_stripped(text),
    }
}

#[must_use]
pub fn is_numeric_value(value: &CellValue) -> bool {
    numeric_value(value).is_some()
}

/// Coerces a cell to a number, substituting `0.0` on failure.
#[must_use]
pub fn coerce_numeric(value: &CellValue) -> f64 {
    numeric_value(value).unwrap_or(0.0)
}

#[must_use]
pub fn coerce_with_policy(value: &CellValue, policy: MissingValuePolicy) -> Option<f64> {
    numeric_value(value).or_else(|| policy.fill())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stripping_handles_mixed_separators() {
        assert_eq!(parse_stripped(" 1 234,5 "), Some(12_345.0));
        assert_eq!(parse_stripped("$-3.25"), Some(-3.25));
        assert_eq!(parse_stripped("$ %"), None);
    }

    #[test]
    fn non_finite_text_is_rejected() {
        assert_eq!(parse_stripped("inf"), None);
        assert_eq!(parse_stripped("NaN"), None);
        assert_eq!(parse_stripped("1e400"), None);
    }
}
