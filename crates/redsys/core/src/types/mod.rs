//! Domain types shared by requests and responses

mod order;
mod parameters;
mod response_code;

pub use order::OrderId;
pub use parameters::ParameterSet;
pub use response_code::{Classification, ResponseCode};

use std::borrow::Cow;

use serde_json::Value;

/// Render a scalar mapping value the way it is concatenated into a
/// canonical string
///
/// Absent fields, nulls and empty elements contribute nothing. Booleans follow
/// the gateway's `1` / empty convention.
pub(crate) fn scalar_text(value: Option<&Value>) -> Cow<'_, str> {
    match value {
        Some(Value::String(s)) => Cow::Borrowed(s.as_str()),
        Some(Value::Number(n)) => Cow::Owned(n.to_string()),
        Some(Value::Bool(true)) => Cow::Borrowed("1"),
        _ => Cow::Borrowed(""),
    }
}
