//! Integration tests for error translation

use super::*;
use integrations_vipps::services::ecom::TransactionRequest;
use integrations_vipps::telemetry::LogLevel;
use integrations_vipps::{EcomServiceTrait, InMemoryLogger, RecurringServiceTrait, VippsError};

#[tokio::test]
async fn test_ecom_error_envelope() {
    let mock_server = setup_mock_server().await;
    mount_token_endpoint(&mock_server, "3600").await;

    Mock::given(method("POST"))
        .and(path("/ecomm/v2/payments/order-1/capture"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!([
            {"errorGroup": "G", "errorMessage": "bad", "errorCode": "E1"}
        ])))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let error = client
        .ecom()
        .capture_payment("order-1", TransactionRequest::new(1000, "socks"))
        .await
        .unwrap_err();

    assert!(matches!(error, VippsError::Ecom(ref e) if e.0.len() == 1));
    assert_eq!(error.to_string(), "vipps: [G] bad (code E1)");
}

#[tokio::test]
async fn test_recurring_error_not_json() {
    let mock_server = setup_mock_server().await;
    mount_token_endpoint(&mock_server, "3600").await;

    Mock::given(method("GET"))
        .and(path("/recurring/v2/agreements/agr_1"))
        .respond_with(ResponseTemplate::new(500).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let error = client.recurring().get_agreement("agr_1").await.unwrap_err();

    match error {
        VippsError::UnexpectedResponse(e) => {
            assert_eq!(e.status, 500);
            assert_eq!(&e.body[..], b"not json");
        }
        other => panic!("expected unexpected response, got {:?}", other),
    }
}

#[tokio::test]
async fn test_recurring_multiple_errors() {
    let mock_server = setup_mock_server().await;
    mount_token_endpoint(&mock_server, "3600").await;

    Mock::given(method("PATCH"))
        .and(path("/recurring/v2/agreements/agr_1"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!([
            {"field": "price", "code": "c1", "message": "m1", "contextId": "ctx"},
            {"field": "productName", "code": "c2", "message": "m2", "contextId": "ctx"}
        ])))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let error = client
        .recurring()
        .update_agreement(
            "agr_1",
            integrations_vipps::services::recurring::UpdateAgreementRequest::new().price(0),
        )
        .await
        .unwrap_err();

    assert_eq!(
        error.to_string(),
        "vipps: multiple errors: field price: m1 (code c1) field productName: m2 (code c2)"
    );
}

#[tokio::test]
async fn test_malformed_success_body_is_decode_error() {
    let mock_server = setup_mock_server().await;
    mount_token_endpoint(&mock_server, "3600").await;

    Mock::given(method("GET"))
        .and(path("/ecomm/v2/payments/order-1/details"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"orderId\":"))
        .mount(&mock_server)
        .await;

    let logger = Arc::new(InMemoryLogger::new());
    let client = test_client_with_logger(&mock_server, logger.clone());
    let error = client.ecom().get_payment_details("order-1").await.unwrap_err();

    assert!(matches!(error, VippsError::Decode(_)));
    assert_eq!(logger.get_entries_by_level(LogLevel::Info).len(), 1);
    assert_eq!(logger.get_entries_by_level(LogLevel::Error).len(), 1);
}

#[tokio::test]
async fn test_network_failure_is_logged() {
    let mock_server = setup_mock_server().await;
    mount_token_endpoint(&mock_server, "3600").await;

    let logger = Arc::new(InMemoryLogger::new());
    let client = test_client_with_logger(&mock_server, logger.clone());

    // Fetch a token first so the failure below is the API call itself.
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;
    client.recurring().list_agreements(None).await.unwrap();
    logger.clear();

    let request = client
        .api()
        .new_empty_request(integrations_vipps::HttpMethod::Get, "http://127.0.0.1:1/unreachable")
        .unwrap();
    let error = client.api().execute_no_content(request).await.unwrap_err();

    assert!(matches!(error, VippsError::Network(_)));
    let entries = logger.get_entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].level, LogLevel::Error);
    assert_eq!(entries[0].message, "error executing Vipps HTTP request");
    assert_eq!(entries[0].argument("url"), Some("http://127.0.0.1:1/unreachable"));
}
