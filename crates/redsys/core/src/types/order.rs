use std::str::FromStr;

use derive_more::{AsRef, Deref, Display};

use crate::validation::{ValidationError, validate_order};

/// A validated order identifier
///
/// Doubles as the transaction identifier and as the plaintext of the
/// per-order key derivation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, AsRef, Deref, Display)]
pub struct OrderId(String);

impl OrderId {
    /// Validate and wrap an order identifier, trimming surrounding whitespace
    pub fn new(order: &str) -> Result<Self, ValidationError> {
        validate_order(order.trim()).map(|order| Self(order.to_owned()))
    }

    /// The identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for OrderId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for OrderId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<OrderId> for String {
    fn from(order: OrderId) -> Self {
        order.0
    }
}
