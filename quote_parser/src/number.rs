//! Numeric literal grammar and typed conversions shared by the tokenizer and extractor.
//!
//! Literals follow `-?[0-9]+(\.[0-9]+)?`. Anything else (exponents, leading `+`, a bare
//! `.`, thousands separators) is rejected here and surfaces as a malformed value.
use crate::error::ParseError;
use crate::field::Field;

/// Returns `true` if `text` is exactly one numeric literal.
pub fn is_number_literal(text: &str) -> bool {
    let digits = text.strip_prefix('-').unwrap_or(text);
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (digits, None),
    };
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    all_digits(int_part) && frac_part.is_none_or(all_digits)
}

/// Parses a price literal: finite and non-negative.
pub fn parse_price(field: Field, text: &str) -> Result<f64, ParseError> {
    let malformed = || ParseError::MalformedNumber(field, text.to_string());
    if !is_number_literal(text) {
        return Err(malformed());
    }
    let value: f64 = text.parse().map_err(|_| malformed())?;
    if !value.is_finite() || value < 0.0 {
        return Err(malformed());
    }
    Ok(value)
}

/// Parses a volume literal: an unsigned integer that fits in `u64`.
pub fn parse_volume(field: Field, text: &str) -> Result<u64, ParseError> {
    let malformed = || ParseError::MalformedNumber(field, text.to_string());
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }
    text.parse().map_err(|_| malformed())
}
