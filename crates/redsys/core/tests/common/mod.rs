//! Common test fixtures
//!
//! Vectors were produced with an independent 3DES / HMAC-SHA256
//! implementation.

#![allow(dead_code, unreachable_pub)]

use redsys_core::{Catalog, MerchantSecret};
use serde_json::{Map, Value, json};

/// Integration merchant secret published by the gateway operator
pub const TEST_SECRET: &str = "sq7HjrUOBfKmC576ILgskD5srU870gJ7";

/// 24 zero bytes
pub const ZERO_SECRET: &str = "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

/// base64 of `{"a":1}`
pub const SMALL_BLOB: &str = "eyJhIjoxfQ==";

/// Signature of [`SMALL_BLOB`] under [`ZERO_SECRET`] and order `1234`
pub const SMALL_BLOB_SIGNATURE: &str = "XO9v/f06iqmxKA2czfCiUkw5g+LsPboBqUEy0yY4wUE=";

/// An authorized notification for order `1446068581`
pub const AUTHORIZED_BLOB: &str = "eyJEc19EYXRlIjoiMDElMkYwMSUyRjIwMjYiLCJEc19Ib3VyIjoiMTAlM0EwMCIsIkRzX0Ftb3VudCI6IjE0NSIsIkRzX0N1cnJlbmN5IjoiOTc4IiwiRHNfT3JkZXIiOiIxNDQ2MDY4NTgxIiwiRHNfTWVyY2hhbnRDb2RlIjoiOTk5MDA4ODgxIiwiRHNfVGVybWluYWwiOiIwMDEiLCJEc19SZXNwb25zZSI6IjAwMDAiLCJEc19UcmFuc2FjdGlvblR5cGUiOiIwIiwiRHNfU2VjdXJlUGF5bWVudCI6IjEiLCJEc19BdXRob3Jpc2F0aW9uQ29kZSI6IjEyMzQ1NiJ9";

/// Url-safe signature of [`AUTHORIZED_BLOB`] under [`TEST_SECRET`]
pub const AUTHORIZED_SIGNATURE: &str = "9gYwJUPwYEtoSDWm-2prjNGSw6Yu_7jCvNB9ufnwYQY=";

/// A declined (`0190`) notification for order `2020abcd`
pub const DECLINED_BLOB: &str = "eyJEc19EYXRlIjoiMDElMkYwMSUyRjIwMjYiLCJEc19Ib3VyIjoiMTAlM0EwMCIsIkRzX0Ftb3VudCI6IjE0NSIsIkRzX0N1cnJlbmN5IjoiOTc4IiwiRHNfT3JkZXIiOiIyMDIwYWJjZCIsIkRzX01lcmNoYW50Q29kZSI6Ijk5OTAwODg4MSIsIkRzX1Rlcm1pbmFsIjoiMDAxIiwiRHNfUmVzcG9uc2UiOiIwMTkwIiwiRHNfVHJhbnNhY3Rpb25UeXBlIjoiMCIsIkRzX1NlY3VyZVBheW1lbnQiOiIxIiwiRHNfQXV0aG9yaXNhdGlvbkNvZGUiOiIxMjM0NTYifQ==";

/// Url-safe signature of [`DECLINED_BLOB`] under [`TEST_SECRET`]
pub const DECLINED_SIGNATURE: &str = "h1_guasF0Exr7OvuQ8NrH5_aQ8usPYlCA7tVCdXiw78=";

/// Signature of [`operation_block`] over the string that includes the card
pub const WITH_CARD_SIGNATURE: &str = "hbQhbfqWRC/wiwzDo35Rc8/QGpi0M5Le9NKqJZ0QacE=";

/// Signature of [`operation_block`] over the string without the card
pub const WITHOUT_CARD_SIGNATURE: &str = "BfpS8/3SM/CkAn8kEf0pMjkPAbaxiqFfwHh2AOewttA=";

/// The integration secret
pub fn test_secret() -> MerchantSecret {
    MerchantSecret::from_base64(TEST_SECRET).expect("valid test secret")
}

/// The all-zero secret
pub fn zero_secret() -> MerchantSecret {
    MerchantSecret::from_base64(ZERO_SECRET).expect("valid zero secret")
}

/// The embedded catalog
pub fn catalog() -> Catalog {
    Catalog::embedded()
}

/// An authorized operation block signed with `signature`
pub fn operation_block(signature: &str) -> Value {
    json!({
        "Ds_Amount": "145",
        "Ds_Currency": "978",
        "Ds_Order": "1446068581",
        "Ds_Signature": signature,
        "Ds_MerchantCode": "999008881",
        "Ds_Terminal": "1",
        "Ds_Response": "0000",
        "Ds_AuthorisationCode": "123456",
        "Ds_TransactionType": "A",
        "Ds_SecurePayment": "0",
        "Ds_Language": "1",
        "Ds_CardNumber": "454881******0004",
        "Ds_MerchantData": "",
        "Ds_Card_Country": "724"
    })
}

/// A direct response mapping with top-level code `0`
pub fn direct_response(signature: &str) -> Map<String, Value> {
    let mut response = Map::new();
    response.insert("CODIGO".into(), json!("0"));
    response.insert("OPERACION".into(), operation_block(signature));
    response
}

/// A SOAP response with a structural error and the echoed request
pub fn structural_error_xml() -> &'static str {
    r#"<?xml version="1.0" encoding="UTF-8"?>
<RETORNOXML>
  <CODIGO>SIS0598</CODIGO>
  <OPERACION>
    <Ds_Response>0000</Ds_Response>
  </OPERACION>
  <RECIBIDO>
    <REQUEST>
      <DATOSENTRADA>
        <DS_MERCHANT_AMOUNT>145</DS_MERCHANT_AMOUNT>
        <DS_MERCHANT_ORDER>1446068581</DS_MERCHANT_ORDER>
        <DS_MERCHANT_MERCHANTCODE>999008881</DS_MERCHANT_MERCHANTCODE>
        <DS_MERCHANT_CURRENCY>978</DS_MERCHANT_CURRENCY>
        <DS_MERCHANT_TRANSACTIONTYPE>A</DS_MERCHANT_TRANSACTIONTYPE>
        <DS_MERCHANT_TERMINAL>1</DS_MERCHANT_TERMINAL>
      </DATOSENTRADA>
      <DS_SIGNATUREVERSION>HMAC_SHA256_V1</DS_SIGNATUREVERSION>
      <DS_SIGNATURE>Zm9vYmFy</DS_SIGNATURE>
    </REQUEST>
  </RECIBIDO>
</RETORNOXML>"#
}

/// Flip one character of a signature
pub fn tamper(signature: &str) -> String {
    let mut chars: Vec<char> = signature.chars().collect();
    chars[0] = if chars[0] == 'A' { 'B' } else { 'A' };
    chars.into_iter().collect()
}
