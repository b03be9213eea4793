//! Integration tests for concurrent token refresh

use super::*;
use futures::future::join_all;
use integrations_vipps::RecurringServiceTrait;
use std::time::Duration;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_calls_share_one_token() {
    let mock_server = setup_mock_server().await;
    mount_token_endpoint(&mock_server, "3600").await;

    Mock::given(method("GET"))
        .and(path("/recurring/v2/agreements"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(16)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let calls = (0..16).map(|_| {
        let client = client.clone();
        async move { client.recurring().list_agreements(None).await }
    });

    for result in join_all(calls).await {
        assert!(result.unwrap().is_empty());
    }
    assert_eq!(requests_to(&mock_server, TOKEN_PATH).await.len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_calls_after_expiry_use_fresh_tokens() {
    let mock_server = setup_mock_server().await;
    // Usable for one second: 11 s lifetime minus the 10 s expiry buffer.
    mount_token_endpoint(&mock_server, "11").await;

    Mock::given(method("GET"))
        .and(path("/recurring/v2/agreements"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    client.recurring().list_agreements(None).await.unwrap();

    tokio::time::sleep(Duration::from_millis(1500)).await;

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let client = client.clone();
            tokio::spawn(async move { client.recurring().list_agreements(None).await })
        })
        .collect();

    for handle in handles {
        assert!(handle.await.unwrap().is_ok());
    }

    let bearers: Vec<String> = requests_to(&mock_server, "/recurring/v2/agreements")
        .await
        .iter()
        .map(|r| r.headers.get("authorization").unwrap().to_str().unwrap().to_string())
        .collect();
    assert_eq!(bearers.len(), 17);
    assert_eq!(bearers[0], "Bearer token-1");
    for bearer in &bearers[1..] {
        assert!(bearer.starts_with("Bearer token-"), "{}", bearer);
        assert_ne!(bearer, "Bearer token-1");
    }
    assert!(requests_to(&mock_server, TOKEN_PATH).await.len() >= 2);
}
