//! Outbound payment requests
//!
//! [`PaymentRequest`] assembles the merchant parameters through validating
//! setters and signs them for either the redirect form or the SOAP entry
//! point. Card data (number, expiry, CVV) is never accepted here.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::{
    MerchantSecret, Result, codec,
    config::Config,
    constants::{merchant, xml as elements},
    crypto,
    types::{OrderId, ParameterSet},
    validation::{
        ValidationError, ValidationResult, validate_currency, validate_language,
        validate_not_blank, validate_url,
    },
    xml,
};

/// The three wire fields of a signed redirect request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedRequest {
    /// Signature scheme identifier
    #[serde(rename = "Ds_SignatureVersion")]
    pub signature_version: String,

    /// Base64 JSON parameter blob
    #[serde(rename = "Ds_MerchantParameters")]
    pub merchant_parameters: String,

    /// Base64 signature over `merchant_parameters`
    #[serde(rename = "Ds_Signature")]
    pub signature: String,
}

/// Builder for the merchant parameters of one payment attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRequest {
    parameters: ParameterSet,
    order: Option<OrderId>,
}

impl Default for PaymentRequest {
    fn default() -> Self {
        Self::new()
    }
}

impl PaymentRequest {
    /// Create a request with the gateway defaults: no direct payment, euros,
    /// a standard authorization on terminal 1, a Spanish card payment page
    /// and a stored-credential reference requested from the gateway
    pub fn new() -> Self {
        let mut parameters = ParameterSet::new();
        parameters
            .set(merchant::DIRECT_PAYMENT, false)
            .set(merchant::CURRENCY, 978)
            .set(merchant::TRANSACTION_TYPE, "O")
            .set(merchant::TERMINAL, 1)
            .set(merchant::CONSUMER_LANGUAGE, "001")
            .set(merchant::PAY_METHODS, "C")
            .set(merchant::IDENTIFIER, "REQUIRED");

        Self {
            parameters,
            order: None,
        }
    }

    /// Wrap an already assembled parameter set
    ///
    /// The set must carry a valid `DS_MERCHANT_ORDER`. No defaults are added.
    pub fn from_parameters(parameters: ParameterSet) -> ValidationResult<Self> {
        let order = parameters
            .text(merchant::ORDER)
            .ok_or(ValidationError::MissingField(merchant::ORDER))?;
        let order = OrderId::new(&order)?;

        Ok(Self {
            parameters,
            order: Some(order),
        })
    }

    /// Set the amount in minor units
    pub fn set_amount(&mut self, minor_units: u64) -> &mut Self {
        self.parameters.set(merchant::AMOUNT, minor_units);
        self
    }

    /// Set the total of a deferred or recurring payment in minor units
    pub fn set_sum_total(&mut self, minor_units: u64) -> &mut Self {
        self.parameters.set(merchant::SUM_TOTAL, minor_units);
        self
    }

    /// Set the order identifier
    pub fn set_order(&mut self, order: &str) -> ValidationResult<&mut Self> {
        let order = OrderId::new(order)?;
        self.parameters.set(merchant::ORDER, order.as_str());
        self.order = Some(order);
        Ok(self)
    }

    /// Set the merchant code (FUC)
    pub fn set_merchant_code(&mut self, code: &str) -> ValidationResult<&mut Self> {
        self.set_text(merchant::MERCHANT_CODE, "merchant code", code)
    }

    /// Set the ISO 4217 numeric currency code
    pub fn set_currency(&mut self, currency: u16) -> ValidationResult<&mut Self> {
        self.parameters.set(merchant::CURRENCY, validate_currency(currency)?);
        Ok(self)
    }

    /// Set the transaction type
    pub fn set_transaction_type(&mut self, transaction_type: &str) -> ValidationResult<&mut Self> {
        self.set_text(merchant::TRANSACTION_TYPE, "transaction type", transaction_type)
    }

    /// Set the terminal number
    pub fn set_terminal(&mut self, terminal: u32) -> ValidationResult<&mut Self> {
        if terminal == 0 {
            return Err(ValidationError::OutOfRange {
                field: "terminal",
                value: 0,
                min: 1,
                max: u32::MAX.into(),
            });
        }
        self.parameters.set(merchant::TERMINAL, terminal);
        Ok(self)
    }

    /// Set the URL the gateway posts the notification to
    pub fn set_notification_url(&mut self, url: &str) -> ValidationResult<&mut Self> {
        self.set_url(merchant::MERCHANT_URL, "notification URL", url)
    }

    /// Set the URL the customer returns to after a successful payment
    pub fn set_url_ok(&mut self, url: &str) -> ValidationResult<&mut Self> {
        self.set_url(merchant::URL_OK, "success URL", url)
    }

    /// Set the URL the customer returns to after a failed payment
    pub fn set_url_ko(&mut self, url: &str) -> ValidationResult<&mut Self> {
        self.set_url(merchant::URL_KO, "failure URL", url)
    }

    /// Set the language of the payment page, `1` (Spanish) to `13`, sent as
    /// a three digit code
    pub fn set_language(&mut self, language: u8) -> ValidationResult<&mut Self> {
        self.parameters
            .set(merchant::CONSUMER_LANGUAGE, format!("{:03}", validate_language(language)?));
        Ok(self)
    }

    /// Set free-form data echoed back in the notification
    pub fn set_merchant_data(&mut self, data: &str) -> ValidationResult<&mut Self> {
        self.set_text(merchant::MERCHANT_DATA, "merchant data", data)
    }

    /// Set the product description shown to the customer
    pub fn set_product_description(&mut self, description: &str) -> ValidationResult<&mut Self> {
        self.set_text(merchant::PRODUCT_DESCRIPTION, "product description", description)
    }

    /// Set the card holder name
    pub fn set_titular(&mut self, titular: &str) -> ValidationResult<&mut Self> {
        self.set_text(merchant::TITULAR, "titular", titular)
    }

    /// Set the merchant trade name shown to the customer
    pub fn set_trade_name(&mut self, name: &str) -> ValidationResult<&mut Self> {
        self.set_text(merchant::MERCHANT_NAME, "trade name", name)
    }

    /// Restrict the accepted payment methods
    pub fn set_pay_methods(&mut self, methods: &str) -> ValidationResult<&mut Self> {
        self.set_text(merchant::PAY_METHODS, "pay methods", methods)
    }

    /// Set the stored-credential identifier
    pub fn set_identifier(&mut self, identifier: &str) -> ValidationResult<&mut Self> {
        self.set_text(merchant::IDENTIFIER, "identifier", identifier)
    }

    /// Enable or disable direct payment
    pub fn set_direct_payment(&mut self, direct: bool) -> &mut Self {
        self.parameters.set(merchant::DIRECT_PAYMENT, direct);
        self
    }

    fn set_text(
        &mut self,
        key: &'static str,
        field: &'static str,
        value: &str,
    ) -> ValidationResult<&mut Self> {
        self.parameters.set(key, validate_not_blank(field, value)?);
        Ok(self)
    }

    fn set_url(
        &mut self,
        key: &'static str,
        field: &'static str,
        value: &str,
    ) -> ValidationResult<&mut Self> {
        self.parameters.set(key, validate_url(field, value.trim())?);
        Ok(self)
    }

    /// The parameters assembled so far
    pub const fn parameters(&self) -> &ParameterSet {
        &self.parameters
    }

    /// The order identifier, once set
    pub const fn order(&self) -> Option<&OrderId> {
        self.order.as_ref()
    }

    /// The base64 encoded JSON parameter blob
    pub fn merchant_parameters(&self) -> Result<String> {
        Ok(codec::encode_base64(codec::to_json(&self.parameters)?))
    }

    fn required_order(&self) -> ValidationResult<&OrderId> {
        self.order
            .as_ref()
            .ok_or(ValidationError::MissingField(merchant::ORDER))
    }

    /// Sign the request for the redirect form
    ///
    /// The signature covers the exact blob returned in
    /// [`SignedRequest::merchant_parameters`].
    pub fn sign(&self, secret: &MerchantSecret, config: &Config) -> Result<SignedRequest> {
        let order = self.required_order()?;
        let merchant_parameters = self.merchant_parameters()?;
        let signature = crypto::signature_for(merchant_parameters.as_bytes(), order, secret);

        debug!(order = %order, environment = %config.environment, "Signed redirect request");
        Ok(SignedRequest {
            signature_version: config.signature_version.clone(),
            merchant_parameters,
            signature,
        })
    }

    /// The `<DATOSENTRADA>` block, one element per parameter in insertion
    /// order
    pub fn parameters_xml(&self) -> String {
        let body: String = self
            .parameters
            .iter()
            .map(|(name, value)| xml::element(name, &xml_value(value)))
            .collect();
        format!("<{0}>{body}</{0}>", elements::INPUT_DATA)
    }

    /// Build the signed `<REQUEST>` body for the SOAP entry point
    ///
    /// The signature covers the exact `<DATOSENTRADA>` text embedded in the
    /// request.
    pub fn to_xml_request(&self, secret: &MerchantSecret, config: &Config) -> Result<String> {
        let order = self.required_order()?;
        let data = self.parameters_xml();
        let signature = crypto::signature_for(data.as_bytes(), order, secret);

        debug!(order = %order, environment = %config.environment, "Signed SOAP request");
        Ok(format!(
            "<{request}>{data}{version}{signature}</{request}>",
            request = elements::REQUEST,
            version = xml::element(elements::SIGNATURE_VERSION, &config.signature_version),
            signature = xml::element(elements::SIGNATURE, &signature),
        ))
    }
}

fn xml_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
