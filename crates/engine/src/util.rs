//! Internal helpers for request validation and conversion.
//!
//! These utilities centralize validation so every entry point (create,
//! update, list) enforces the same invariants.

use chrono::NaiveDate;

use crate::{EngineError, Money, ResultEngine};

/// Calendar format accepted for expense dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub(crate) const DESCRIPTION_MAX_CHARS: usize = 500;
pub(crate) const CATEGORY_MAX_CHARS: usize = 100;

/// Parse a `YYYY-MM-DD` calendar date.
///
/// Exactly ten characters: zero-padded month and day, no surrounding
/// whitespace, no sign. `label` names the offending field in the error message.
pub fn parse_date(value: &str, label: &str) -> ResultEngine<NaiveDate> {
    let invalid =
        || EngineError::InvalidInput(format!("invalid {label} '{value}', use YYYY-MM-DD"));

    let bytes = value.as_bytes();
    let shaped = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !shaped {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| invalid())
}

/// Trim a required text field and check its length in characters.
pub(crate) fn normalize_required_text(
    value: &str,
    label: &str,
    max_chars: usize,
) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidInput(format!("{label} must not be empty")));
    }
    if trimmed.chars().count() > max_chars {
        return Err(EngineError::InvalidInput(format!(
            "{label} must be at most {max_chars} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Convert a decimal amount into [`Money`], rejecting non-positive values.
pub(crate) fn positive_amount(value: f64) -> ResultEngine<Money> {
    let amount = Money::from_major(value)?;
    if !amount.is_positive() {
        return Err(EngineError::InvalidInput("amount must be > 0".to_string()));
    }
    Ok(amount)
}
