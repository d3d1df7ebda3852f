//! Redsys card-payment gateway protocol
//!
//! This crate implements the merchant side of the `HMAC_SHA256_V1` signature
//! scheme: per-order key derivation, signing of outbound requests, and the
//! verification and classification of both kinds of gateway response
//! (synchronous direct-call responses and asynchronous notifications).
//!
//! The main entry points are [`PaymentRequest`] for outbound requests and
//! [`ProtocolDriver`] for inbound responses. Transport is left to the caller.

pub mod catalog;
pub mod codec;
pub mod config;
pub mod constants;
pub mod crypto;
pub mod error;
pub mod gateway;
pub mod notification;
pub mod request;
pub mod response;
pub mod secrets;
pub mod types;
pub mod validation;
pub mod xml;

// Re-exports
pub use catalog::{Catalog, CatalogCode, CatalogEntry, MessageCatalog};
pub use config::{Config, Environment};
pub use crypto::{DerivedKey, Signature};
pub use error::{Error, KeyError, Result};
pub use gateway::{NormalizedResult, ProtocolDriver};
pub use notification::Notification;
pub use request::{PaymentRequest, SignedRequest};
pub use response::DirectResponse;
pub use secrets::MerchantSecret;
pub use types::{Classification, OrderId, ParameterSet, ResponseCode};
pub use validation::ValidationError;

/// Convenience functions for common operations
pub mod operations {
    use crate::{Catalog, MerchantSecret, Notification, NormalizedResult, ProtocolDriver, Result};

    static CATALOG: Catalog = Catalog::embedded();

    /// The embedded catalog shared by these functions, loaded on first use
    pub fn catalog() -> &'static Catalog {
        &CATALOG
    }

    /// Verify a notification form body against a base64 merchant secret,
    /// describing codes with the embedded catalog
    pub fn check_notification(body: &[u8], secret: &str) -> Result<NormalizedResult> {
        let secret = MerchantSecret::from_base64(secret)?;
        ProtocolDriver::new(&CATALOG).evaluate_notification(&Notification::from_form(body), &secret)
    }

    /// Evaluate an XML direct response against a base64 merchant secret,
    /// describing codes with the embedded catalog
    pub fn check_direct_response(xml: &str, secret: &str) -> Result<NormalizedResult> {
        let secret = MerchantSecret::from_base64(secret)?;
        ProtocolDriver::new(&CATALOG).evaluate_direct_xml(xml, &secret)
    }
}
