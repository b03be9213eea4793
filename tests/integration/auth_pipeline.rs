//! Integration tests for token acquisition and header injection

use super::*;
use integrations_vipps::services::recurring::AgreementStatus;
use integrations_vipps::{HttpMethod, RecurringServiceTrait, TokenError, VippsError};
use wiremock::matchers::{body_string, header, query_param};

#[tokio::test]
async fn test_token_request_carries_client_credentials() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .and(header("client_id", CLIENT_ID))
        .and(header("client_secret", CLIENT_SECRET))
        .and(header("Ocp-Apim-Subscription-Key", SUBSCRIPTION_KEY))
        .and(header("accept", "application/json"))
        .and(body_string("grant_type=client_credentials"))
        .respond_with(TokenResponder::new("86398"))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/recurring/v2/agreements"))
        .and(query_param("status", "ACTIVE"))
        .and(header("Authorization", "Bearer token-1"))
        .and(header("Ocp-Apim-Subscription-Key", SUBSCRIPTION_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let agreements = client
        .recurring()
        .list_agreements(Some(AgreementStatus::Active))
        .await
        .unwrap();
    assert!(agreements.is_empty());
}

#[tokio::test]
async fn test_credentials_only_on_token_path() {
    let mock_server = setup_mock_server().await;
    mount_token_endpoint(&mock_server, "3600").await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    client.recurring().list_agreements(None).await.unwrap();
    client.recurring().list_charges("agr_1").await.unwrap();

    let received = mock_server.received_requests().await.unwrap();
    assert_eq!(received.len(), 3);

    for request in &received {
        let keys: Vec<_> = request
            .headers
            .get_all("Ocp-Apim-Subscription-Key")
            .iter()
            .collect();
        assert_eq!(keys.len(), 1, "{}", request.url);
        assert_eq!(keys[0], SUBSCRIPTION_KEY);

        let is_token_request = request.url.path() == TOKEN_PATH;
        assert_eq!(request.headers.contains_key("client_id"), is_token_request);
        assert_eq!(request.headers.contains_key("client_secret"), is_token_request);
        assert_eq!(request.headers.contains_key("authorization"), !is_token_request);
    }
}

#[tokio::test]
async fn test_token_is_cached_across_calls() {
    let mock_server = setup_mock_server().await;
    mount_token_endpoint(&mock_server, "3600").await;

    Mock::given(method("GET"))
        .and(path("/recurring/v2/agreements/agr_1"))
        .and(header("Authorization", "Bearer token-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "agr_1",
            "status": "ACTIVE",
            "productName": "Paper",
            "price": 9900,
            "interval": "MONTH",
            "intervalCount": 1,
            "currency": "NOK"
        })))
        .expect(3)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    for _ in 0..3 {
        let agreement = client.recurring().get_agreement("agr_1").await.unwrap();
        assert_eq!(agreement.id, "agr_1");
    }

    assert_eq!(requests_to(&mock_server, TOKEN_PATH).await.len(), 1);
}

#[tokio::test]
async fn test_expired_token_is_refreshed() {
    let mock_server = setup_mock_server().await;
    // Inside the expiry buffer from the moment it is issued.
    mount_token_endpoint(&mock_server, "0").await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    for _ in 0..3 {
        client.recurring().list_agreements(None).await.unwrap();
    }

    let api_requests = requests_to(&mock_server, "/recurring/v2/agreements").await;
    let bearer: Vec<_> = api_requests
        .iter()
        .map(|r| r.headers.get("authorization").unwrap().to_str().unwrap().to_string())
        .collect();
    assert_eq!(bearer, vec!["Bearer token-1", "Bearer token-2", "Bearer token-3"]);
}

#[tokio::test]
async fn test_rejected_token_fails_call_without_api_request() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid client"))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let error = client.recurring().list_agreements(None).await.unwrap_err();
    match error {
        VippsError::Token(TokenError::Rejected { status, body }) => {
            assert_eq!(status, 401);
            assert_eq!(&body[..], b"invalid client");
        }
        other => panic!("expected rejected token, got {:?}", other),
    }
}

#[tokio::test]
async fn test_redirects_are_not_followed() {
    let mock_server = setup_mock_server().await;
    mount_token_endpoint(&mock_server, "3600").await;

    Mock::given(method("GET"))
        .and(path("/moved"))
        .respond_with(
            ResponseTemplate::new(302).insert_header("Location", format!("{}/elsewhere", mock_server.uri())),
        )
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let request = client.api().new_empty_request(HttpMethod::Get, "/moved").unwrap();
    let error = client.api().execute_no_content(request).await.unwrap_err();

    assert_eq!(error.status(), Some(302));
    assert!(requests_to(&mock_server, "/elsewhere").await.is_empty());
}
