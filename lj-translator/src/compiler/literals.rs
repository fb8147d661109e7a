use std::sync::LazyLock;

use regex::Regex;

static DECIMAL_LITERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?$").expect("decimal pattern should compile")
});

static HEX_INTEGER_LITERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^0[xX][0-9a-fA-F]+$").expect("hex integer pattern should compile")
});

static HEX_FLOAT_LITERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^0[xX]([0-9a-fA-F]*)(?:\.([0-9a-fA-F]*))?(?:[pP]([+-]?\d+))?$")
        .expect("hex float pattern should compile")
});

/// Maps a Lua numeral to JavaScript numeric literal text.
///
/// Decimal and hexadecimal integers pass through (leading zeros are dropped
/// so `010` is not read as octal). Hexadecimal floats have no JavaScript
/// spelling and are converted to their decimal value. Anything else is left
/// untouched.
pub fn number_literal(text: &str) -> String {
    if DECIMAL_LITERAL.is_match(text) {
        return strip_leading_zeros(text);
    }
    if HEX_INTEGER_LITERAL.is_match(text) {
        return text.to_string();
    }
    if let Some(value) = hex_float_value(text) {
        return format_f64(value);
    }
    text.to_string()
}

fn strip_leading_zeros(text: &str) -> String {
    let int_len = text
        .find(|ch: char| !ch.is_ascii_digit())
        .unwrap_or(text.len());
    let (int_part, rest) = text.split_at(int_len);
    if int_part.len() <= 1 {
        return text.to_string();
    }
    let trimmed = int_part.trim_start_matches('0');
    if trimmed.is_empty() {
        format!("0{rest}")
    } else {
        format!("{trimmed}{rest}")
    }
}

fn hex_float_value(text: &str) -> Option<f64> {
    let captures = HEX_FLOAT_LITERAL.captures(text)?;
    let int_digits = captures.get(1).map_or("", |m| m.as_str());
    let frac_digits = captures.get(2).map_or("", |m| m.as_str());
    if int_digits.is_empty() && frac_digits.is_empty() {
        return None;
    }
    let mut value = 0f64;
    for digit in int_digits.chars() {
        value = value * 16.0 + f64::from(digit.to_digit(16)?);
    }
    let mut scale = 1.0 / 16.0;
    for digit in frac_digits.chars() {
        value += f64::from(digit.to_digit(16)?) * scale;
        scale /= 16.0;
    }
    if let Some(exponent) = captures.get(3) {
        let exponent = exponent.as_str().parse::<i32>().ok()?;
        value *= 2f64.powi(exponent);
    }
    Some(value)
}

fn format_f64(value: f64) -> String {
    if value.is_infinite() {
        "Infinity".to_string()
    } else {
        format!("{value}")
    }
}

/// Encodes decoded string contents as a JavaScript string literal.
pub fn string_literal(value: &str) -> Result<String, serde_json::Error> {
    serde_json::to_string(value)
}
