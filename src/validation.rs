//! Field-level checks shared by the request types.
//!
//! Lengths are counted in characters, not bytes, so a 50 character limit
//! admits 50 multi-byte characters.

use crate::error::AppError;

pub const MAX_IDENTIFIER_LENGTH: usize = 50;
pub const MIN_SECRET_LENGTH: usize = 8;
pub const MAX_SECRET_LENGTH: usize = 300;

/// Reject values that are empty or longer than `max` characters.
pub fn require(field: &str, value: &str, max: usize) -> Result<(), AppError> {
    length_between(field, value, 1, max)
}

pub fn length_between(field: &str, value: &str, min: usize, max: usize) -> Result<(), AppError> {
    let len = value.chars().count();
    if len == 0 {
        return Err(AppError::ValidationError(format!("{} is required", field)));
    }
    if len < min {
        return Err(AppError::ValidationError(format!(
            "{} must be at least {} characters",
            field, min
        )));
    }
    if len > max {
        return Err(AppError::ValidationError(format!(
            "{} must be at most {} characters",
            field, max
        )));
    }
    Ok(())
}

/// Identifier and secret constraints for registration and login.
pub fn credentials(identifier: &str, secret: &str) -> Result<(), AppError> {
    require("username", identifier, MAX_IDENTIFIER_LENGTH)?;
    length_between("password", secret, MIN_SECRET_LENGTH, MAX_SECRET_LENGTH)
}
