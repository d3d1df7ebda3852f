//! Input validation for merchant-side parameters
//!
//! These checks run while a request is being assembled or an inbound payload
//! is being unpacked, always before any key derivation takes place.

use tracing::warn;

use crate::constants::order::{MAX_LENGTH, MIN_LENGTH, NUMERIC_PREFIX};

/// Error type for input validation failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The input was not within the expected length bounds
    #[error("{field} has incorrect length: expected {min}..={max}, got {actual}")]
    IncorrectLength {
        /// Field being validated
        field: &'static str,
        /// Minimum length
        min: usize,
        /// Maximum length
        max: usize,
        /// Actual length
        actual: usize,
    },

    /// The input contained invalid characters
    #[error("{0} contains invalid characters")]
    InvalidCharacters(&'static str),

    /// The input was out of the allowed range
    #[error("{field} is out of allowed range: value {value}, min {min}, max {max}")]
    OutOfRange {
        /// Field being validated
        field: &'static str,
        /// The value that was out of range
        value: u64,
        /// Minimum allowed value
        min: u64,
        /// Maximum allowed value
        max: u64,
    },

    /// The input was empty or only whitespace
    #[error("{0} must not be blank")]
    Blank(&'static str),

    /// A required wire field was absent
    #[error("Missing required field {0}")]
    MissingField(&'static str),

    /// The input is not an absolute URL
    #[error("{0} is not a valid URL")]
    InvalidUrl(&'static str),

    /// Unknown gateway environment name
    #[error("Unknown environment {0:?}, expected \"test\" or \"live\"")]
    UnknownEnvironment(String),

    /// Decoded payload does not have the expected shape
    #[error("{0}")]
    Message(String),
}

/// Result type for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validates an order identifier
///
/// An order must be 4 to 12 bytes long and its first four characters must be
/// ASCII digits.
pub fn validate_order(order: &str) -> ValidationResult<&str> {
    if !(MIN_LENGTH..=MAX_LENGTH).contains(&order.len()) {
        return Err(ValidationError::IncorrectLength {
            field: "order",
            min: MIN_LENGTH,
            max: MAX_LENGTH,
            actual: order.len(),
        });
    }

    if !order.as_bytes()[..NUMERIC_PREFIX]
        .iter()
        .all(u8::is_ascii_digit)
    {
        warn!("Order id rejected, numeric prefix missing");
        return Err(ValidationError::InvalidCharacters("order"));
    }

    Ok(order)
}

/// Validates an ISO 4217 numeric currency code (exactly three digits)
pub fn validate_currency(currency: u16) -> ValidationResult<u16> {
    if !(100..=999).contains(&currency) {
        return Err(ValidationError::OutOfRange {
            field: "currency",
            value: currency.into(),
            min: 100,
            max: 999,
        });
    }

    Ok(currency)
}

/// Validates a consumer language code, which the gateway numbers 1 to 13
pub fn validate_language(language: u8) -> ValidationResult<u8> {
    if !(1..=13).contains(&language) {
        return Err(ValidationError::OutOfRange {
            field: "language",
            value: language.into(),
            min: 1,
            max: 13,
        });
    }

    Ok(language)
}

/// Validates that `value` parses as an absolute URL
pub fn validate_url<'a>(field: &'static str, value: &'a str) -> ValidationResult<&'a str> {
    url::Url::parse(value).map_err(|_| ValidationError::InvalidUrl(field))?;
    Ok(value)
}

/// Trims `value` and rejects it when nothing is left
pub fn validate_not_blank<'a>(field: &'static str, value: &'a str) -> ValidationResult<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Blank(field));
    }

    Ok(trimmed)
}
