//! Evaluation of gateway responses
//!
//! [`ProtocolDriver`] runs the two inbound paths, direct-call responses and
//! redirect notifications, and funnels both into a [`NormalizedResult`].
//! Declines and failed signature checks are results, not errors.

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{Level, debug, info, warn};

use crate::{
    MerchantSecret, Result,
    catalog::{CatalogCode, CatalogEntry, MessageCatalog},
    codec,
    constants::{codes, fields},
    notification::Notification,
    response::{self, DirectResponse},
    types::{Classification, ResponseCode, scalar_text},
    validation::ValidationError,
    xml,
};

/// Outcome of evaluating a gateway response
///
/// Serializes as a single flat object: `error`, `code` and `error_info`
/// followed by the payload fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedResult {
    /// Whether the outcome is anything but an authorization
    #[serde(rename = "error")]
    pub is_error: bool,

    /// Code the outcome is reported under
    pub code: String,

    /// Catalog entry for `code`, if known
    #[serde(rename = "error_info")]
    pub description: Option<CatalogEntry>,

    /// Data returned by the gateway
    #[serde(flatten)]
    pub payload: Map<String, Value>,

    /// Classification of the outcome
    #[serde(skip)]
    pub classification: Classification,
}

impl NormalizedResult {
    /// Check if the operation was authorized
    pub const fn is_authorized(&self) -> bool {
        matches!(self.classification, Classification::Authorized)
    }
}

/// Evaluates gateway responses against a message catalog
#[derive(Debug)]
pub struct ProtocolDriver<'a, C: ?Sized> {
    catalog: &'a C,
}

impl<'a, C: MessageCatalog + ?Sized> ProtocolDriver<'a, C> {
    /// Create a driver describing codes through `catalog`
    pub const fn new(catalog: &'a C) -> Self {
        Self { catalog }
    }

    /// Evaluate a synchronous response already decoded into a mapping
    ///
    /// 1. A non-numeric `CODIGO` is a protocol error reported with the echoed
    ///    request.
    /// 2. A `Ds_Response` outside the authorized set is a decline reported
    ///    under that sub-code.
    /// 3. Otherwise the operation block must carry a valid signature, failing
    ///    which the result is a protocol error under `SIS0041`.
    ///
    /// # Errors
    ///
    /// Fails only on structurally unusable input, see
    /// [`DirectResponse::from_mapping`] and
    /// [`response::verify_response_signature`].
    pub fn evaluate_direct_response(
        &self,
        response: &Map<String, Value>,
        secret: &MerchantSecret,
    ) -> Result<NormalizedResult> {
        let tagged = DirectResponse::from_mapping(response)?;

        let (code, operation) = match tagged {
            DirectResponse::StructuralEcho { code, echo } => {
                return Ok(self.normalize(code.as_str(), echo, Classification::ProtocolError));
            }
            DirectResponse::OperationResult { code, operation } => (code, operation),
        };

        let sub_code = ResponseCode::new(scalar_text(operation.get(fields::RESPONSE)));
        if !sub_code.is_authorized() {
            let classification = match sub_code.classification() {
                Classification::ProtocolError => Classification::ProtocolError,
                _ => Classification::Declined,
            };
            return Ok(self.normalize(sub_code.as_str(), operation, classification));
        }

        if !response::verify_response_signature(&operation, secret)? {
            return Ok(self.normalize(
                codes::DIRECT_SIGNATURE_MISMATCH,
                operation,
                Classification::ProtocolError,
            ));
        }

        Ok(self.normalize(code.as_str(), operation, Classification::Authorized))
    }

    /// Decode an XML direct response and evaluate it
    pub fn evaluate_direct_xml(
        &self,
        response: &str,
        secret: &MerchantSecret,
    ) -> Result<NormalizedResult> {
        let mapping = xml::to_mapping(response)?;
        self.evaluate_direct_response(&mapping, secret)
    }

    /// Evaluate a notification posted after a redirect payment
    ///
    /// The key is derived from the `Ds_Order` inside the blob and the
    /// signature is recomputed over the blob exactly as posted.
    ///
    /// # Errors
    ///
    /// Fails before any key derivation when the blob or the signature is
    /// missing, when the blob does not decode to a JSON object or when that
    /// object carries no order.
    pub fn evaluate_notification(
        &self,
        notification: &Notification,
        secret: &MerchantSecret,
    ) -> Result<NormalizedResult> {
        let (blob, signature) = notification.required_fields()?;

        let decoded = String::from_utf8(codec::decode_parameters(blob)?)?;
        let parameters = codec::from_json(&decoded)?;
        let order = parameters
            .text(fields::ORDER)
            .filter(|order| !order.trim().is_empty())
            .ok_or(ValidationError::MissingField(fields::ORDER))?;

        if response::verify_notification_signature(blob, signature, &order, secret) {
            Ok(self.normalize(
                codes::NOTIFICATION_OK,
                parameters.into_inner(),
                Classification::Authorized,
            ))
        } else {
            Ok(self.normalize(
                codes::NOTIFICATION_SIGNATURE_MISMATCH,
                parameters.into_inner(),
                Classification::ProtocolError,
            ))
        }
    }

    /// Build the result for `code`, attaching its catalog description
    ///
    /// The description is looked up under `code` as given. A result with
    /// neither code nor payload is then reported as `9998`.
    pub fn normalize(
        &self,
        code: &str,
        payload: Map<String, Value>,
        classification: Classification,
    ) -> NormalizedResult {
        let description = self.catalog.lookup(&CatalogCode::from(code));
        let code = if payload.is_empty() && matches!(code.trim(), "" | "0") {
            codes::EMPTY_RESPONSE
        } else {
            code
        };

        let result = NormalizedResult {
            is_error: classification.is_error(),
            code: code.to_owned(),
            description,
            payload,
            classification,
        };
        log_outcome(&result);
        result
    }
}

fn log_outcome(result: &NormalizedResult) {
    let order = result.payload.get(fields::ORDER).and_then(Value::as_str);
    let level = match result.classification {
        Classification::Authorized => ResponseCode::new(result.code.as_str()).tracing_level(),
        Classification::Declined => Level::INFO,
        Classification::ProtocolError => Level::WARN,
    };

    if level == Level::WARN {
        warn!(code = %result.code, order, "Gateway response rejected");
    } else if level == Level::INFO {
        info!(code = %result.code, order, "Gateway response declined");
    } else {
        debug!(code = %result.code, order, "Gateway response authorized");
    }
}
