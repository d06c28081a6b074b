//! Integration tests for the settings store.
//!
//! The default-payload test expects a database where no settings have
//! been written yet; the write tests are safe against any state.
//!
//! Run with: cargo test -p ceycan-integration-tests -- --ignored

#![allow(clippy::unwrap_used)]

use ceycan_client::{ApiClientError, SessionToken};
use ceycan_core::SettingsKind;
use ceycan_integration_tests::{client, super_admin_token};
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
#[ignore = "Requires running ceycan-server with a fresh database"]
async fn test_contact_defaults_served_verbatim_when_absent() {
    let client = client();
    let contact = client.get_settings(SettingsKind::Contact).await.unwrap();

    assert_eq!(
        contact,
        json!({
            "address": "123 Agricultural Avenue, Colombo 07, Sri Lanka",
            "phone": "+94 11 234 5678",
            "email": "info@ceycanagro.com",
            "website": "www.ceycanagro.com",
            "description": "CeyCan Agro is a leading agricultural company in Sri Lanka, dedicated to providing the highest quality agricultural products to our customers."
        })
    );
}

#[tokio::test]
#[ignore = "Requires running ceycan-server"]
async fn test_upsert_then_read_back() {
    let client = client();
    let token = super_admin_token(&client).await;

    let payload = json!({
        "facebook": "https://facebook.com/ceycanagro",
        "instagram": "https://instagram.com/ceycanagro",
        "twitter": "https://twitter.com/ceycanagro",
        "linkedin": "https://linkedin.com/company/ceycanagro"
    });

    let response = client
        .put_settings(&token, SettingsKind::Social, &payload)
        .await
        .unwrap();
    assert_eq!(response["success"], true);

    let social = client.get_settings(SettingsKind::Social).await.unwrap();
    assert_eq!(social, payload);

    // Upsert again: update-if-present path
    let response = client
        .put_settings(&token, SettingsKind::Social, &payload)
        .await
        .unwrap();
    assert_eq!(response["success"], true);
}

#[tokio::test]
#[ignore = "Requires running ceycan-server"]
async fn test_settings_write_401_does_not_force_logout() {
    let client = client();
    let bogus = SessionToken::new("not.a.token");

    // The whitelist keeps this as a plain API error, not SessionExpired
    let err = client
        .put_settings(&bogus, SettingsKind::Contact, &json!({"phone": "x"}))
        .await
        .unwrap_err();

    match err {
        ApiClientError::Api { status, .. } => assert_eq!(status, StatusCode::UNAUTHORIZED),
        other => panic!("expected Api error, got {other:?}"),
    }
}
