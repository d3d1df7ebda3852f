//! Gateway response codes and their classification

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::Level;

use crate::constants::codes::{
    AUTHORIZED_CANCELLATION, AUTHORIZED_RANGE_END, AUTHORIZED_REFUND,
};

/// Terminal classification of a gateway response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    /// Payment, refund, confirmation or cancellation went through
    Authorized,
    /// The gateway answered normally but did not authorize
    Declined,
    /// Structural error, unknown code shape or failed signature check
    ProtocolError,
}

impl Classification {
    /// Whether the classification is reported as an error to the caller
    pub const fn is_error(&self) -> bool {
        !matches!(self, Self::Authorized)
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Authorized => "authorized",
            Self::Declined => "declined",
            Self::ProtocolError => "protocol error",
        })
    }
}

/// A response code as returned by the gateway
///
/// Operation codes are 3-4 digit numeric strings (`"0000"`, `"0190"`,
/// `"900"`); structural errors come back as `SIS`-prefixed text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResponseCode(String);

impl ResponseCode {
    /// Wrap a raw code
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// The code exactly as received
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The numeric value of the code, if it is numeric
    ///
    /// Surrounding whitespace and an explicit sign are accepted, anything else
    /// makes the code non-numeric. Values beyond the `i64` range saturate.
    pub fn numeric(&self) -> Option<i64> {
        if !self.is_numeric() {
            return None;
        }
        let trimmed = self.0.trim();
        Some(trimmed.parse().unwrap_or(if trimmed.starts_with('-') {
            i64::MIN
        } else {
            i64::MAX
        }))
    }

    /// Check if the code is numeric: ASCII digits with an optional sign
    pub fn is_numeric(&self) -> bool {
        let trimmed = self.0.trim();
        let digits = trimmed.strip_prefix(['+', '-']).unwrap_or(trimmed);
        !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
    }

    /// Check if this code authorizes the operation
    ///
    /// `0..=99` authorizes payments and pre-authorizations, `900` refunds and
    /// confirmations, `400` cancellations.
    pub fn is_authorized(&self) -> bool {
        self.numeric().is_some_and(|code| {
            (0..AUTHORIZED_RANGE_END).contains(&code)
                || code == AUTHORIZED_REFUND
                || code == AUTHORIZED_CANCELLATION
        })
    }

    /// Classify the code on its own
    pub fn classification(&self) -> Classification {
        match self.numeric() {
            None => Classification::ProtocolError,
            Some(_) if self.is_authorized() => Classification::Authorized,
            Some(_) => Classification::Declined,
        }
    }

    /// Get the appropriate tracing level for this code
    pub fn tracing_level(&self) -> Level {
        match self.classification() {
            Classification::Authorized => Level::DEBUG,
            Classification::Declined => Level::INFO,
            Classification::ProtocolError => Level::WARN,
        }
    }

    /// Get a coarse description of this code
    ///
    /// The catalog carries the precise per-code text.
    pub fn description(&self) -> &'static str {
        match self.numeric() {
            Some(0..=99) => "Authorized payment or pre-authorization",
            Some(AUTHORIZED_REFUND) => "Authorized refund or confirmation",
            Some(AUTHORIZED_CANCELLATION) => "Authorized cancellation",
            Some(101..=299) => "Denied by the issuer",
            Some(900..=999) => "Denied by the gateway",
            Some(9000..=9999) => "Rejected by the gateway",
            Some(_) => "Unknown response code",
            None if self.0.starts_with("SIS") => "Gateway protocol error",
            None => "Non-numeric response code",
        }
    }
}

impl From<&str> for ResponseCode {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

impl From<String> for ResponseCode {
    fn from(code: String) -> Self {
        Self(code)
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
