//! Inbound response handling
//!
//! Authenticates the synchronous operation block and tags the direct-call
//! response by the shape the gateway chose for it.

use serde_json::{Map, Value};
use tracing::{debug, trace, warn};

use crate::{
    MerchantSecret, Result, codec,
    constants::{fields, xml},
    crypto,
    types::{ResponseCode, scalar_text},
    validation::ValidationError,
};

/// Canonical string of an operation block including the card number
pub fn candidate_with_card(operation: &Map<String, Value>) -> String {
    [
        fields::AMOUNT,
        fields::ORDER,
        fields::MERCHANT_CODE,
        fields::CURRENCY,
        fields::RESPONSE,
        fields::CARD_NUMBER,
        fields::TRANSACTION_TYPE,
        fields::SECURE_PAYMENT,
    ]
    .iter()
    .map(|field| scalar_text(operation.get(*field)))
    .collect()
}

/// Canonical string of an operation block without the card number
pub fn candidate_without_card(operation: &Map<String, Value>) -> String {
    [
        fields::AMOUNT,
        fields::ORDER,
        fields::MERCHANT_CODE,
        fields::CURRENCY,
        fields::RESPONSE,
        fields::TRANSACTION_TYPE,
        fields::SECURE_PAYMENT,
    ]
    .iter()
    .map(|field| scalar_text(operation.get(*field)))
    .collect()
}

/// Verify the signature carried by a synchronous operation block
///
/// Whether the gateway included the card number in the signed string cannot
/// be told from the response, so both canonical strings are tried. Either
/// one matching authenticates the block.
///
/// # Errors
///
/// Fails with [`ValidationError::MissingField`] when the block carries no
/// order, since no key can be derived without one. A missing signature is not
/// an error, it simply does not verify.
pub fn verify_response_signature(
    operation: &Map<String, Value>,
    secret: &MerchantSecret,
) -> Result<bool> {
    let order = scalar_text(operation.get(fields::ORDER));
    if order.trim().is_empty() {
        return Err(ValidationError::MissingField(fields::ORDER).into());
    }

    let received = scalar_text(operation.get(fields::SIGNATURE));
    if received.is_empty() {
        debug!(order = %order, "Operation block carries no signature");
        return Ok(false);
    }

    let key = crypto::derive_key(&order, secret);
    let with_card = crypto::sign_and_encode(candidate_with_card(operation).as_bytes(), &key);
    if crypto::signatures_match(&with_card, &received) {
        trace!(order = %order, "Signature matched with card number");
        return Ok(true);
    }

    let without_card = crypto::sign_and_encode(candidate_without_card(operation).as_bytes(), &key);
    let matched = crypto::signatures_match(&without_card, &received);
    trace!(order = %order, matched, "Signature checked without card number");
    Ok(matched)
}

/// Verify a notification signature
///
/// The signature is computed over `blob` exactly as posted, mapped to the
/// url-safe alphabet and compared with `received` in constant time.
pub fn verify_notification_signature(
    blob: &str,
    received: &str,
    order: &str,
    secret: &MerchantSecret,
) -> bool {
    let expected = codec::url_safe(&crypto::signature_for(blob.as_bytes(), order, secret));
    crypto::signatures_match(&expected, received)
}

/// A synchronous response, tagged by where its descriptive data lives
#[derive(Debug, Clone, PartialEq)]
pub enum DirectResponse {
    /// Non-numeric top-level code: the gateway rejected the request itself and
    /// echoed the input parameters back
    StructuralEcho {
        /// Top-level code, e.g. `SIS0598`
        code: ResponseCode,
        /// The echoed `DATOSENTRADA` block
        echo: Map<String, Value>,
    },

    /// Numeric top-level code: the request was processed
    OperationResult {
        /// Top-level code
        code: ResponseCode,
        /// The `OPERACION` block
        operation: Map<String, Value>,
    },
}

impl DirectResponse {
    /// Tag a decoded response mapping
    ///
    /// # Errors
    ///
    /// Fails when `CODIGO` is absent, or when the code is numeric but no
    /// `OPERACION` block came with it.
    pub fn from_mapping(response: &Map<String, Value>) -> Result<Self> {
        let Some(raw_code) = response.get(xml::CODE) else {
            return Err(ValidationError::MissingField(xml::CODE).into());
        };
        let code = ResponseCode::new(scalar_text(Some(raw_code)));

        if !code.is_numeric() {
            let echo = response
                .get(xml::RECEIVED)
                .and_then(|received| received.get(xml::REQUEST))
                .and_then(|request| request.get(xml::INPUT_DATA))
                .and_then(Value::as_object)
                .cloned()
                .unwrap_or_else(|| {
                    warn!(code = %code, "Structural error without an echoed request");
                    Map::new()
                });
            return Ok(Self::StructuralEcho { code, echo });
        }

        match response.get(xml::OPERATION) {
            Some(Value::Object(operation)) => Ok(Self::OperationResult {
                code,
                operation: operation.clone(),
            }),
            _ => Err(ValidationError::MissingField(xml::OPERATION).into()),
        }
    }

    /// The top-level code
    pub const fn code(&self) -> &ResponseCode {
        match self {
            Self::StructuralEcho { code, .. } | Self::OperationResult { code, .. } => code,
        }
    }

    /// The operation's `Ds_Response`, absent for a structural echo
    pub fn sub_code(&self) -> Option<ResponseCode> {
        match self {
            Self::StructuralEcho { .. } => None,
            Self::OperationResult { operation, .. } => Some(ResponseCode::new(scalar_text(
                operation.get(fields::RESPONSE),
            ))),
        }
    }

    /// The block descriptive data is read from
    pub const fn payload(&self) -> &Map<String, Value> {
        match self {
            Self::StructuralEcho { echo, .. } => echo,
            Self::OperationResult { operation, .. } => operation,
        }
    }

    /// Consume the response, returning its payload block
    pub fn into_payload(self) -> Map<String, Value> {
        match self {
            Self::StructuralEcho { echo, .. } => echo,
            Self::OperationResult { operation, .. } => operation,
        }
    }
}
