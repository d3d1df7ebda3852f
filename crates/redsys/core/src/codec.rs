//! Base64 and JSON codecs for the wire format
//!
//! Signatures are always computed over the literal bytes that travel on the
//! wire. Nothing in here re-serializes a decoded payload for signing.

use base64::{
    Engine as _,
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    prelude::BASE64_STANDARD,
};

use crate::{Result, types::ParameterSet, validation::ValidationError};

/// Standard alphabet, accepting input with or without trailing padding
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Encode bytes with the standard base64 alphabet
pub fn encode_base64(data: impl AsRef<[u8]>) -> String {
    BASE64_STANDARD.encode(data)
}

/// Decode standard base64
pub fn decode_base64(data: &str) -> Result<Vec<u8>> {
    Ok(BASE64_STANDARD.decode(data.trim())?)
}

/// Map `+` to `-` and `/` to `_`
///
/// A textual substitution over already encoded base64, used only when
/// comparing notification signatures.
pub fn url_safe(encoded: &str) -> String {
    encoded
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            c => c,
        })
        .collect()
}

/// Decode a notification parameter blob
///
/// The gateway may post the blob in either base64 flavour, so the url-safe
/// characters are mapped back before decoding.
pub fn decode_parameters(blob: &str) -> Result<Vec<u8>> {
    let standard: String = blob
        .trim()
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            c => c,
        })
        .collect();
    Ok(LENIENT.decode(standard)?)
}

/// Serialize a parameter set as compact JSON, keys in insertion order
pub fn to_json(parameters: &ParameterSet) -> Result<String> {
    Ok(serde_json::to_string(parameters)?)
}

/// Parse a JSON object into a parameter set
///
/// Numbers stay numbers and booleans stay booleans.
pub fn from_json(json: &str) -> Result<ParameterSet> {
    match serde_json::from_str(json)? {
        serde_json::Value::Object(map) => Ok(ParameterSet::from(map)),
        other => Err(ValidationError::Message(format!(
            "Expected a JSON object of parameters, got {}",
            json_kind(&other)
        ))
        .into()),
    }
}

const fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
