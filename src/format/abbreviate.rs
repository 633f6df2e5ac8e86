//! Number Abbreviation
//!
//! Formats large amounts with magnitude suffixes (`1500` -> `1.5K`).

use crate::error::{AppError, Result};

/// Thresholds, largest first.
const SUFFIXES: [(f64, &str); 6] = [
    (1e18, "QQ"),
    (1e15, "Q"),
    (1e12, "T"),
    (1e9, "B"),
    (1e6, "M"),
    (1e3, "K"),
];

/// Abbreviates `value` with one decimal place.
pub fn abbreviate(value: f64) -> Result<String> {
    abbreviate_with(value, 1)
}

/// Abbreviates `value` using the largest suffix whose threshold it reaches.
///
/// Values below 1000 are returned with plain formatting. Non-finite input is
/// rejected with [`AppError::Validation`].
pub fn abbreviate_with(value: f64, decimal_places: usize) -> Result<String> {
    if !value.is_finite() {
        return Err(AppError::Validation(format!(
            "'{}' is not a valid number",
            value
        )));
    }

    if value < 1000.0 {
        return Ok(value.to_string());
    }

    let (threshold, suffix) = SUFFIXES
        .iter()
        .find(|(threshold, _)| value >= *threshold)
        .copied()
        .unwrap_or((1.0, ""));

    Ok(format!(
        "{:.*}{}",
        decimal_places,
        value / threshold,
        suffix
    ))
}

/// Parses a query-string amount.
///
/// Blank or non-numeric input is a validation error naming the parameter.
pub fn parse_amount(field: &str, raw: &str) -> Result<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!(
            "Parameter \"{}\" must not be empty",
            field
        )));
    }

    trimmed
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| {
            AppError::Validation(format!(
                "Parameter \"{}\" must be a number, got \"{}\"",
                field, trimmed
            ))
        })
}
