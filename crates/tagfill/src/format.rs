//! Rendering of resolved values under locale-style formatting hints.

use serde::{Deserialize, Serialize};

use crate::types::Value;

/// Formatting hints carried by a resolution context.
///
/// Hints affect how numeric values are rendered; strings and booleans pass
/// through unchanged. The default renders numbers the way Rust's `Display`
/// does: `.` decimal point, no digit grouping.
///
/// # Example
///
/// ```
/// use tagfill::{format_value, FormatHints, Value};
///
/// let hints = FormatHints::new()
///     .with_group_separator(',')
///     .with_decimal_separator('.');
/// assert_eq!(format_value(&Value::Number(1234567), &hints), "1,234,567");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FormatHints {
    decimal_separator: char,
    group_separator: Option<char>,
    max_fraction_digits: Option<u8>,
}

impl FormatHints {
    /// Hints with default rendering.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the decimal separator for fractional values.
    pub fn with_decimal_separator(mut self, separator: char) -> Self {
        self.decimal_separator = separator;
        self
    }

    /// Group integer digits in threes with the given separator.
    pub fn with_group_separator(mut self, separator: char) -> Self {
        self.group_separator = Some(separator);
        self
    }

    /// Round fractional values to at most this many digits.
    pub fn with_max_fraction_digits(mut self, digits: u8) -> Self {
        self.max_fraction_digits = Some(digits);
        self
    }
}

impl Default for FormatHints {
    fn default() -> Self {
        Self {
            decimal_separator: '.',
            group_separator: None,
            max_fraction_digits: None,
        }
    }
}

/// Render a value as substitution text under the given hints.
pub fn format_value(value: &Value, hints: &FormatHints) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => group_digits(&n.to_string(), hints.group_separator),
        Value::Float(f) => format_float(*f, hints),
    }
}

fn format_float(value: f64, hints: &FormatHints) -> String {
    let rendered = match hints.max_fraction_digits {
        Some(digits) => format!("{:.*}", digits as usize, value),
        None => value.to_string(),
    };

    match rendered.split_once('.') {
        Some((integral, fraction)) => {
            let mut out = group_digits(integral, hints.group_separator);
            out.push(hints.decimal_separator);
            out.push_str(fraction);
            out
        }
        None => group_digits(&rendered, hints.group_separator),
    }
}

/// Insert a separator every three digits from the right, preserving a sign.
fn group_digits(digits: &str, separator: Option<char>) -> String {
    let Some(separator) = separator else {
        return digits.to_string();
    };

    let (sign, digits) = match digits.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", digits),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, c) in digits.chars().enumerate() {
        let remaining = digits.len() - i;
        if i > 0 && remaining % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(c);
    }

    format!("{sign}{grouped}")
}
