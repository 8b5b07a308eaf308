// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use thiserror::Error;

static NAME_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9\s]+$").unwrap());

/// Smallest accepted quantity/price.
static MIN_AMOUNT: Lazy<Decimal> = Lazy::new(|| Decimal::new(1, 2));

pub const MAX_NAME_LEN: usize = 100;

/// Field-level validation failures. These mirror what the server will
/// enforce anyway; catching them client-side just fails faster.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("name is required")]
    NameRequired,
    #[error("name must be at most {MAX_NAME_LEN} characters")]
    NameTooLong,
    #[error("name may only contain letters, numbers and spaces")]
    NameCharset,
    #[error("{field} '{value}' is not a number")]
    NotANumber { field: &'static str, value: String },
    #[error("{field} must be at least 0.01")]
    BelowMinimum { field: &'static str },
    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    BadDate(String),
    #[error("date {0} is in the future")]
    FutureDate(NaiveDate),
}

/// Validate a portfolio name and return it trimmed.
pub fn portfolio_name(raw: &str) -> Result<String, ValidationError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(ValidationError::NameRequired);
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::NameTooLong);
    }
    if !NAME_PATTERN.is_match(name) {
        return Err(ValidationError::NameCharset);
    }
    Ok(name.to_string())
}

pub fn quantity(raw: &str) -> Result<Decimal, ValidationError> {
    amount("quantity", raw)
}

pub fn price(raw: &str) -> Result<Decimal, ValidationError> {
    amount("price", raw)
}

// Non-numeric input is an error here, never a silent zero.
fn amount(field: &'static str, raw: &str) -> Result<Decimal, ValidationError> {
    let trimmed = raw.trim();
    let value: Decimal = trimmed.parse().map_err(|_| ValidationError::NotANumber {
        field,
        value: trimmed.to_string(),
    })?;
    if value < *MIN_AMOUNT {
        return Err(ValidationError::BelowMinimum { field });
    }
    Ok(value)
}

/// Parse a trade/purchase date and reject dates after `today`. The caller
/// supplies `today` so the check stays deterministic under test.
pub fn trade_date(raw: &str, today: NaiveDate) -> Result<NaiveDate, ValidationError> {
    let trimmed = raw.trim();
    let date = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map_err(|_| ValidationError::BadDate(trimmed.to_string()))?;
    if date > today {
        return Err(ValidationError::FutureDate(date));
    }
    Ok(date)
}
