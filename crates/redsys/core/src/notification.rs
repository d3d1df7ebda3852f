//! Fields posted back by the gateway after a redirect payment

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::{constants::fields, validation::ValidationError};

/// Notification posted to the merchant URL
///
/// Fields are kept exactly as posted. Signatures are verified over the raw
/// parameter blob, so nothing here is decoded eagerly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Signature version announced by the gateway
    #[serde(rename = "Ds_SignatureVersion", default, skip_serializing_if = "Option::is_none")]
    pub signature_version: Option<String>,

    /// Base64 JSON parameter blob
    #[serde(rename = "Ds_MerchantParameters", default)]
    pub merchant_parameters: Option<String>,

    /// Url-safe base64 signature
    #[serde(rename = "Ds_Signature", default)]
    pub signature: Option<String>,
}

impl Notification {
    /// Build a notification from its two required fields
    pub fn new(merchant_parameters: impl Into<String>, signature: impl Into<String>) -> Self {
        Self {
            signature_version: None,
            merchant_parameters: Some(merchant_parameters.into()),
            signature: Some(signature.into()),
        }
    }

    /// Parse an `application/x-www-form-urlencoded` request body
    ///
    /// Unknown fields are ignored. Later occurrences of a field win.
    pub fn from_form(body: &[u8]) -> Self {
        let mut notification = Self::default();
        for (name, value) in form_urlencoded::parse(body) {
            let slot = match name.as_ref() {
                fields::SIGNATURE_VERSION => &mut notification.signature_version,
                fields::MERCHANT_PARAMETERS => &mut notification.merchant_parameters,
                fields::SIGNATURE => &mut notification.signature,
                _ => continue,
            };
            *slot = Some(value.into_owned());
        }
        notification
    }

    /// The parameter blob and signature, both required and non-blank
    ///
    /// Values are returned exactly as posted, surrounding whitespace included.
    pub fn required_fields(&self) -> Result<(&str, &str), ValidationError> {
        let parameters = present(self.merchant_parameters.as_deref())
            .ok_or(ValidationError::MissingField(fields::MERCHANT_PARAMETERS))?;
        let signature = present(self.signature.as_deref())
            .ok_or(ValidationError::MissingField(fields::SIGNATURE))?;
        Ok((parameters, signature))
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.trim().is_empty())
}
