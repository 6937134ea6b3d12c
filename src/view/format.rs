//! Number formatting
//!
//! en-US display conventions: thousands grouping and at most three fraction
//! digits for general numbers, fixed-precision output for rates.

use serde_json::Value;

fn round_to(value: f64, digits: usize) -> f64 {
    let scale = 10f64.powi(digits as i32);
    (value * scale).round() / scale
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn non_finite(value: f64) -> Option<String> {
    if value.is_nan() {
        Some("NaN".to_string())
    } else if value.is_infinite() {
        Some(if value > 0.0 { "∞" } else { "-∞" }.to_string())
    } else {
        None
    }
}

fn grouped(value: f64, max_fraction: usize) -> String {
    if let Some(text) = non_finite(value) {
        return text;
    }

    let rounded = round_to(value, max_fraction);
    let fixed = format!("{:.*}", max_fraction, rounded.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part.trim_end_matches('0')),
        None => (fixed.as_str(), ""),
    };

    let mut out = String::new();
    if rounded < 0.0 {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}

/// Grouped with up to three fraction digits (`1234.5678` → `1,234.568`)
pub fn format_number(value: f64) -> String {
    grouped(value, 3)
}

/// Grouped and rounded to a whole number (`1234.5` → `1,235`)
pub fn format_integer(value: f64) -> String {
    grouped(value, 0)
}

/// Fixed number of fraction digits, no grouping (`4.25` → `4.3` at 1 digit)
pub fn format_fixed(value: f64, digits: usize) -> String {
    if let Some(text) = non_finite(value) {
        return text;
    }
    let rounded = round_to(value, digits);
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{:.*}", digits, rounded)
}

/// Shortest plain rendering of a number (`4.5`, `10`)
pub fn plain_number(value: f64) -> String {
    match non_finite(value) {
        Some(text) => text,
        None if value == 0.0 => "0".to_string(),
        None => value.to_string(),
    }
}

/// Display text for a JSON value; numbers use [`format_number`]
pub fn format_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.as_f64().map(format_number).unwrap_or_default(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
