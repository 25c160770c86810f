//! Input validation helpers
//!
//! Centralized text length constants and validation functions shared by the
//! account, catalog and reservation services.

use shared::models::serde_helpers::{parse_date, parse_time};
use validator::ValidateEmail;

use chrono::{NaiveDate, NaiveTime};

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: user, restaurant, meal
pub const MAX_NAME_LEN: usize = 200;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Passwords (before hashing)
pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_PASSWORD_LEN: usize = 128;

/// Addresses
pub const MAX_ADDRESS_LEN: usize = 500;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty"))
            .with_detail("field", field));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// Validate that an optional-content string is within the length limit.
pub fn validate_optional_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        ))
        .with_detail("field", field));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), AppError> {
    validate_required_text(email, "email", MAX_EMAIL_LEN)?;
    if !email.validate_email() {
        return Err(AppError::validation("email is not a valid address").with_detail("field", "email"));
    }
    Ok(())
}

/// A required field must be present
pub fn require<T>(value: Option<T>, field: &'static str) -> Result<T, AppError> {
    value.ok_or_else(|| AppError::required_field(field))
}

/// Parse a required `YYYY-MM-DD` date
pub fn require_date(value: Option<&str>, field: &'static str) -> Result<NaiveDate, AppError> {
    let raw = require(value.filter(|v| !v.trim().is_empty()), field)?;
    parse_date(raw).ok_or_else(|| invalid_format(field, "YYYY-MM-DD", raw))
}

/// Parse a required `HH:MM` time
pub fn require_time(value: Option<&str>, field: &'static str) -> Result<NaiveTime, AppError> {
    let raw = require(value.filter(|v| !v.trim().is_empty()), field)?;
    parse_time(raw).ok_or_else(|| invalid_format(field, "HH:MM", raw))
}

/// Parse a date that was explicitly supplied; blank is an error, not "unchanged"
pub fn supplied_date(value: &str, field: &'static str) -> Result<NaiveDate, AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty"))
            .with_detail("field", field));
    }
    parse_date(value).ok_or_else(|| invalid_format(field, "YYYY-MM-DD", value))
}

/// Parse a time that was explicitly supplied; blank is an error, not "unchanged"
pub fn supplied_time(value: &str, field: &'static str) -> Result<NaiveTime, AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty"))
            .with_detail("field", field));
    }
    parse_time(value).ok_or_else(|| invalid_format(field, "HH:MM", value))
}

fn invalid_format(field: &'static str, expected: &str, got: &str) -> AppError {
    AppError::with_message(
        shared::ErrorCode::InvalidFormat,
        format!("{field} must be {expected}"),
    )
    .with_detail("field", field)
    .with_detail("value", got)
}
