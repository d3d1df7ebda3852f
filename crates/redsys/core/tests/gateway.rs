//! End-to-end tests of signing and response evaluation

mod common;

use std::thread;

use hex_literal::hex;
use redsys_core::{
    Classification, Config, Error, MerchantSecret, Notification, PaymentRequest, ProtocolDriver,
    ValidationError, codec, crypto, operations, response, xml,
};
use serde_json::json;

use common::*;

#[test]
fn test_zero_secret_notification_round_trip() {
    let secret = zero_secret();

    let key = crypto::derive_key("1234", &secret);
    assert_eq!(key.as_bytes(), hex!("d0e13219a1bd3fdc"));

    let signature = crypto::sign_and_encode(SMALL_BLOB.as_bytes(), &key);
    assert_eq!(signature, SMALL_BLOB_SIGNATURE);

    let posted = codec::url_safe(&signature);
    assert!(response::verify_notification_signature(
        SMALL_BLOB, &posted, "1234", &secret
    ));
}

#[test]
fn test_tampered_signature_is_rejected() {
    let secret = zero_secret();
    let posted = tamper(&codec::url_safe(SMALL_BLOB_SIGNATURE));
    assert!(!response::verify_notification_signature(
        SMALL_BLOB, &posted, "1234", &secret
    ));

    let catalog = catalog();
    let driver = ProtocolDriver::new(&catalog);
    let notification = Notification::new(AUTHORIZED_BLOB, tamper(AUTHORIZED_SIGNATURE));
    let result = driver
        .evaluate_notification(&notification, &test_secret())
        .unwrap();

    assert!(result.is_error);
    assert_eq!(result.code, "SIS041");
    assert_eq!(result.classification, Classification::ProtocolError);
    assert_eq!(result.payload["Ds_Order"], json!("1446068581"));
}

#[test]
fn test_authorized_notification() {
    let catalog = catalog();
    let driver = ProtocolDriver::new(&catalog);
    let notification = Notification::new(AUTHORIZED_BLOB, AUTHORIZED_SIGNATURE);

    let result = driver
        .evaluate_notification(&notification, &test_secret())
        .unwrap();
    assert!(!result.is_error);
    assert!(result.is_authorized());
    assert_eq!(result.code, "0");
    assert_eq!(result.payload["Ds_Response"], json!("0000"));
    assert_eq!(result.payload["Ds_Date"], json!("01%2F01%2F2026"));
}

#[test]
fn test_notification_in_standard_alphabet_is_rejected() {
    let catalog = catalog();
    let driver = ProtocolDriver::new(&catalog);
    let standard = AUTHORIZED_SIGNATURE.replace('-', "+").replace('_', "/");
    let notification = Notification::new(AUTHORIZED_BLOB, standard);

    let result = driver
        .evaluate_notification(&notification, &test_secret())
        .unwrap();
    assert_eq!(result.code, "SIS041");
}

#[test]
fn test_notification_from_form_body() {
    let body = format!(
        "Ds_SignatureVersion=HMAC_SHA256_V1&Ds_MerchantParameters={}&Ds_Signature={}",
        DECLINED_BLOB.replace('=', "%3D"),
        DECLINED_SIGNATURE.replace('=', "%3D"),
    );
    let result = operations::check_notification(body.as_bytes(), TEST_SECRET).unwrap();

    // The notification path authenticates the blob, it does not classify the
    // embedded response code
    assert_eq!(result.code, "0");
    assert_eq!(result.payload["Ds_Response"], json!("0190"));
}

#[test]
fn test_notification_blob_is_signed_as_posted() {
    let catalog = catalog();
    let driver = ProtocolDriver::new(&catalog);
    let notification = Notification::new(format!("{AUTHORIZED_BLOB}\n"), AUTHORIZED_SIGNATURE);

    let result = driver
        .evaluate_notification(&notification, &test_secret())
        .unwrap();
    assert!(result.is_error);
    assert_eq!(result.code, "SIS041");
    assert_eq!(result.payload["Ds_Order"], json!("1446068581"));
}

#[test]
fn test_operations_share_one_catalog() {
    let body = format!(
        "Ds_MerchantParameters={}&Ds_Signature={}",
        AUTHORIZED_BLOB.replace('=', "%3D"),
        AUTHORIZED_SIGNATURE.replace('=', "%3D"),
    );

    let first = operations::check_notification(body.as_bytes(), TEST_SECRET).unwrap();
    let catalog = operations::catalog();
    assert!(catalog.is_loaded());
    let entries = catalog.len();

    for _ in 0..4 {
        let result = operations::check_notification(body.as_bytes(), TEST_SECRET).unwrap();
        assert_eq!(result.description, first.description);
        assert!(std::ptr::eq(operations::catalog(), catalog));
    }
    assert_eq!(catalog.len(), entries);
}

#[test]
fn test_notification_missing_fields() {
    let catalog = catalog();
    let driver = ProtocolDriver::new(&catalog);

    let result = driver.evaluate_notification(&Notification::default(), &test_secret());
    assert!(matches!(
        result,
        Err(Error::Validation(ValidationError::MissingField(
            "Ds_MerchantParameters"
        )))
    ));

    let notification = Notification {
        merchant_parameters: Some(AUTHORIZED_BLOB.into()),
        ..Default::default()
    };
    let result = driver.evaluate_notification(&notification, &test_secret());
    assert!(matches!(
        result,
        Err(Error::Validation(ValidationError::MissingField("Ds_Signature")))
    ));
}

#[test]
fn test_structural_error_reads_echoed_request() {
    let catalog = catalog();
    let driver = ProtocolDriver::new(&catalog);

    let result = driver
        .evaluate_direct_xml(structural_error_xml(), &test_secret())
        .unwrap();
    assert!(result.is_error);
    assert_eq!(result.code, "SIS0598");
    assert_eq!(result.classification, Classification::ProtocolError);
    assert_eq!(result.payload["DS_MERCHANT_ORDER"], json!("1446068581"));
    assert!(!result.payload.contains_key("Ds_Response"));
}

#[test]
fn test_direct_response_with_and_without_card() {
    let catalog = catalog();
    let driver = ProtocolDriver::new(&catalog);

    for signature in [WITH_CARD_SIGNATURE, WITHOUT_CARD_SIGNATURE] {
        let result = driver
            .evaluate_direct_response(&direct_response(signature), &test_secret())
            .unwrap();
        assert!(result.is_authorized(), "signature {signature} should verify");
        assert_eq!(result.code, "0");
        assert_eq!(result.payload["Ds_CardNumber"], json!("454881******0004"));
    }

    let result = driver
        .evaluate_direct_response(&direct_response(&tamper(WITH_CARD_SIGNATURE)), &test_secret())
        .unwrap();
    assert!(result.is_error);
    assert_eq!(result.code, "SIS0041");
}

#[test]
fn test_direct_response_under_wrong_secret() {
    let catalog = catalog();
    let driver = ProtocolDriver::new(&catalog);

    let result = driver
        .evaluate_direct_response(&direct_response(WITH_CARD_SIGNATURE), &zero_secret())
        .unwrap();
    assert_eq!(result.code, "SIS0041");
}

#[test]
fn test_direct_xml_round_trip_through_mapping() {
    let xml_response = format!(
        "<RETORNOXML><CODIGO>0</CODIGO><OPERACION>\
         <Ds_Amount>145</Ds_Amount><Ds_Currency>978</Ds_Currency>\
         <Ds_Order>1446068581</Ds_Order><Ds_Signature>{WITHOUT_CARD_SIGNATURE}</Ds_Signature>\
         <Ds_MerchantCode>999008881</Ds_MerchantCode><Ds_Terminal>1</Ds_Terminal>\
         <Ds_Response>0000</Ds_Response><Ds_AuthorisationCode>123456</Ds_AuthorisationCode>\
         <Ds_TransactionType>A</Ds_TransactionType><Ds_SecurePayment>0</Ds_SecurePayment>\
         <Ds_Language>1</Ds_Language><Ds_MerchantData></Ds_MerchantData>\
         </OPERACION></RETORNOXML>"
    );

    let mapping = xml::to_mapping(&xml_response).unwrap();
    assert_eq!(mapping["OPERACION"]["Ds_MerchantData"], json!(""));

    let result = operations::check_direct_response(&xml_response, TEST_SECRET).unwrap();
    assert!(result.is_authorized());
}

#[test]
fn test_concurrent_notifications_do_not_interfere() {
    let catalog = catalog();
    let secret = test_secret();
    let driver = ProtocolDriver::new(&catalog);

    let (authorized, tampered) = thread::scope(|scope| {
        let authorized = scope.spawn(|| {
            (0..16)
                .map(|_| {
                    driver
                        .evaluate_notification(
                            &Notification::new(AUTHORIZED_BLOB, AUTHORIZED_SIGNATURE),
                            &secret,
                        )
                        .unwrap()
                })
                .collect::<Vec<_>>()
        });
        let tampered = scope.spawn(|| {
            (0..16)
                .map(|_| {
                    driver
                        .evaluate_notification(
                            &Notification::new(DECLINED_BLOB, tamper(DECLINED_SIGNATURE)),
                            &secret,
                        )
                        .unwrap()
                })
                .collect::<Vec<_>>()
        });

        (authorized.join().unwrap(), tampered.join().unwrap())
    });

    for result in authorized {
        assert_eq!(result.code, "0");
        assert_eq!(result.payload["Ds_Order"], json!("1446068581"));
    }
    for result in tampered {
        assert_eq!(result.code, "SIS041");
        assert_eq!(result.payload["Ds_Order"], json!("2020abcd"));
    }
    assert!(catalog.is_loaded());
}

#[test]
fn test_signed_request_verifies_as_notification() {
    // A blob signed by the request builder verifies on the notification path
    // once mapped to the url-safe alphabet
    let secret = test_secret();
    let mut request = PaymentRequest::new();
    request
        .set_amount(145)
        .set_order("1446068581")
        .unwrap()
        .set_merchant_code("999008881")
        .unwrap();

    let signed = request.sign(&secret, &Config::default()).unwrap();
    assert!(response::verify_notification_signature(
        &signed.merchant_parameters,
        &codec::url_safe(&signed.signature),
        "1446068581",
        &secret,
    ));
}

#[test]
fn test_bad_secrets_fail_before_derivation() {
    assert!(matches!(
        MerchantSecret::from_base64(""),
        Err(Error::Validation(ValidationError::Blank(_)))
    ));
    assert!(matches!(
        operations::check_notification(b"", "AAAA"),
        Err(Error::Key(_))
    ));
}
