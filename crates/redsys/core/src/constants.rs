//! Constants of the Redsys wire protocol
//!
//! Field names, sentinel codes and gateway endpoints shared by the request
//! and response sides.

/// Signature version announced alongside every signature
pub const SIGNATURE_VERSION: &str = "HMAC_SHA256_V1";

/// Size in bytes of a decoded merchant secret (three DES keys)
pub const MERCHANT_SECRET_LEN: usize = 24;

/// Block size of the cipher used for key derivation
pub const DES_BLOCK_SIZE: usize = 8;

/// Size in bytes of an HMAC-SHA256 signature
pub const SIGNATURE_LEN: usize = 32;

/// Order identifier rules
pub mod order {
    /// Minimum order length
    pub const MIN_LENGTH: usize = 4;
    /// Maximum order length
    pub const MAX_LENGTH: usize = 12;
    /// Number of leading characters that must be digits
    pub const NUMERIC_PREFIX: usize = 4;
}

/// Sentinel codes produced locally rather than by the gateway
pub mod codes {
    /// Signature of a synchronous response failed verification
    pub const DIRECT_SIGNATURE_MISMATCH: &str = "SIS0041";
    /// Signature of a notification failed verification
    pub const NOTIFICATION_SIGNATURE_MISMATCH: &str = "SIS041";
    /// Notification verified successfully
    pub const NOTIFICATION_OK: &str = "0";
    /// Reported when the gateway returned neither a code nor data
    pub const EMPTY_RESPONSE: &str = "9998";
    /// Sub-code for an authorized refund or confirmation
    pub const AUTHORIZED_REFUND: i64 = 900;
    /// Sub-code for an authorized cancellation
    pub const AUTHORIZED_CANCELLATION: i64 = 400;
    /// Exclusive upper bound of the authorized payment range
    pub const AUTHORIZED_RANGE_END: i64 = 100;
}

/// Wire fields exchanged with the gateway
pub mod fields {
    /// Base64 JSON parameter blob
    pub const MERCHANT_PARAMETERS: &str = "Ds_MerchantParameters";
    /// Base64 signature
    pub const SIGNATURE: &str = "Ds_Signature";
    /// Signature version identifier
    pub const SIGNATURE_VERSION: &str = "Ds_SignatureVersion";

    /// Amount in minor units
    pub const AMOUNT: &str = "Ds_Amount";
    /// Order identifier
    pub const ORDER: &str = "Ds_Order";
    /// Merchant code (FUC)
    pub const MERCHANT_CODE: &str = "Ds_MerchantCode";
    /// Numeric currency code
    pub const CURRENCY: &str = "Ds_Currency";
    /// Operation response code
    pub const RESPONSE: &str = "Ds_Response";
    /// Masked card number
    pub const CARD_NUMBER: &str = "Ds_CardNumber";
    /// Transaction type
    pub const TRANSACTION_TYPE: &str = "Ds_TransactionType";
    /// Secure payment flag
    pub const SECURE_PAYMENT: &str = "Ds_SecurePayment";
}

/// Element names of the SOAP `trataPeticion` exchange
pub mod xml {
    /// Top-level result code
    pub const CODE: &str = "CODIGO";
    /// Operation result block
    pub const OPERATION: &str = "OPERACION";
    /// Echo of the received request
    pub const RECEIVED: &str = "RECIBIDO";
    /// Request wrapper
    pub const REQUEST: &str = "REQUEST";
    /// Parameter block
    pub const INPUT_DATA: &str = "DATOSENTRADA";
    /// Signature version element of an outbound request
    pub const SIGNATURE_VERSION: &str = "DS_SIGNATUREVERSION";
    /// Signature element of an outbound request
    pub const SIGNATURE: &str = "DS_SIGNATURE";
}

/// Merchant request parameter names
pub mod merchant {
    /// Amount in minor units
    pub const AMOUNT: &str = "DS_MERCHANT_AMOUNT";
    /// Sum total in minor units
    pub const SUM_TOTAL: &str = "DS_MERCHANT_SUMTOTAL";
    /// Order identifier
    pub const ORDER: &str = "DS_MERCHANT_ORDER";
    /// Merchant code (FUC)
    pub const MERCHANT_CODE: &str = "DS_MERCHANT_MERCHANTCODE";
    /// Numeric currency code
    pub const CURRENCY: &str = "DS_MERCHANT_CURRENCY";
    /// Transaction type
    pub const TRANSACTION_TYPE: &str = "DS_MERCHANT_TRANSACTIONTYPE";
    /// Terminal number
    pub const TERMINAL: &str = "DS_MERCHANT_TERMINAL";
    /// Notification URL
    pub const MERCHANT_URL: &str = "DS_MERCHANT_MERCHANTURL";
    /// Redirect URL on success
    pub const URL_OK: &str = "DS_MERCHANT_URLOK";
    /// Redirect URL on failure
    pub const URL_KO: &str = "DS_MERCHANT_URLKO";
    /// Consumer language
    pub const CONSUMER_LANGUAGE: &str = "DS_MERCHANT_CONSUMERLANGUAGE";
    /// Free-form merchant data
    pub const MERCHANT_DATA: &str = "DS_MERCHANT_MERCHANTDATA";
    /// Product description
    pub const PRODUCT_DESCRIPTION: &str = "DS_MERCHANT_PRODUCTDESCRIPTION";
    /// Card holder name
    pub const TITULAR: &str = "DS_MERCHANT_TITULAR";
    /// Merchant trade name
    pub const MERCHANT_NAME: &str = "DS_MERCHANT_MERCHANTNAME";
    /// Accepted pay methods
    pub const PAY_METHODS: &str = "DS_MERCHANT_PAYMETHODS";
    /// Stored-credential identifier
    pub const IDENTIFIER: &str = "DS_MERCHANT_IDENTIFIER";
    /// Direct payment flag
    pub const DIRECT_PAYMENT: &str = "DS_MERCHANT_DIRECTPAYMENT";
}

/// Gateway endpoints
pub mod endpoints {
    /// Production redirect endpoint
    pub const LIVE_REDIRECT: &str = "https://sis.redsys.es/sis/realizarPago";
    /// Production SOAP endpoint
    pub const LIVE_SOAP: &str = "https://sis.redsys.es/sis/services/SerClsWSEntrada?wsdl";
    /// Test redirect endpoint
    pub const TEST_REDIRECT: &str = "https://sis-t.redsys.es:25443/sis/realizarPago";
    /// Test SOAP endpoint
    pub const TEST_SOAP: &str = "https://sis-t.redsys.es:25443/sis/services/SerClsWSEntrada?wsdl";
}
