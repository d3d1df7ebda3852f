//! Error types for Redsys operations

use thiserror::Error;

use crate::validation::ValidationError;

/// Result type for Redsys operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for Redsys operations
///
/// Only structural and input problems end up here. A declined payment or a
/// signature that does not verify is reported through
/// [`NormalizedResult`](crate::NormalizedResult) instead.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed input detected before any cryptographic work
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Merchant secret unusable as a 3DES key
    #[error(transparent)]
    Key(#[from] KeyError),

    /// Base64 payload could not be decoded
    #[error("Invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    /// JSON payload could not be parsed or produced
    #[error("Invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),

    /// XML payload could not be parsed
    #[error("Invalid XML payload: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Decoded payload is not valid UTF-8
    #[error("Payload is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// I/O error while reading a catalog or response file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while turning a merchant secret into a cipher key
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KeyError {
    /// The secret is not valid base64
    #[error("Merchant secret is not valid base64")]
    Encoding,

    /// The decoded secret has the wrong size for 3-key triple DES
    #[error("Invalid merchant secret length: expected {expected} bytes, got {actual}")]
    InvalidLength {
        /// Expected length
        expected: usize,
        /// Actual length
        actual: usize,
    },
}
