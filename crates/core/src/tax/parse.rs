//! Lenient decimal parsing for extracted amount strings.

use rust_decimal::Decimal;
use std::str::FromStr;

use crate::tax::error::TaxError;

/// Parses an extracted amount string into a decimal.
///
/// Extraction engines emit amounts in whatever format the source document
/// used, so this accepts both anglophone (`1,234.56`) and European
/// (`1.234,56`) conventions plus stray currency symbols. Rules:
/// - empty or whitespace-only input parses to `None`
/// - exactly one comma: dots are treated as thousands separators and
///   stripped, the comma becomes the decimal point
/// - anything that is not a digit, dot, or leading minus sign is dropped
///
/// # Errors
///
/// Returns `TaxError::UnparsableAmount` if no decimal remains after cleanup.
pub fn parse_amount(value: &str) -> Result<Option<Decimal>, TaxError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let normalized = if trimmed.matches(',').count() == 1 {
        trimmed.replace('.', "").replace(',', ".")
    } else {
        trimmed.replace(',', "")
    };

    let negative = normalized.starts_with('-');
    let digits: String = normalized.chars().filter(|c| c.is_ascii_digit() || *c == '.').collect();
    if digits.is_empty() {
        return Err(TaxError::UnparsableAmount(value.to_string()));
    }

    let candidate = if negative { format!("-{digits}") } else { digits };

    Decimal::from_str(&candidate)
        .map(Some)
        .map_err(|_| TaxError::UnparsableAmount(value.to_string()))
}
