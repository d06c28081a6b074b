//! Integration tests for CeyCan.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and run migrations
//! cargo run -p ceycan-cli -- migrate
//!
//! # Provision the super admin the tests log in as
//! cargo run -p ceycan-cli -- bootstrap super-admin
//!
//! # Start the server
//! cargo run -p ceycan-server
//!
//! # Run the tests (they are #[ignore]d by default)
//! cargo test -p ceycan-integration-tests -- --ignored
//! ```
//!
//! # Environment Variables
//!
//! - `CEYCAN_BASE_URL` - Server base URL (default: `http://localhost:5000`)
//! - `CEYCAN_TEST_EMAIL` - Login email (default: bootstrap super admin)
//! - `CEYCAN_TEST_PASSWORD` - Login password (default: bootstrap password)

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::unwrap_used, clippy::expect_used)]

use ceycan_client::{ApiClient, SessionToken};
use url::Url;

/// Base URL for the API (configurable via environment).
#[must_use]
pub fn base_url() -> Url {
    let raw = std::env::var("CEYCAN_BASE_URL")
        .unwrap_or_else(|_| "http://localhost:5000".to_owned());
    Url::parse(&raw).expect("invalid CEYCAN_BASE_URL")
}

/// Create an API client against the configured server.
#[must_use]
pub fn client() -> ApiClient {
    ApiClient::new(base_url()).expect("Failed to create API client")
}

/// Log in as the test super admin and return the token.
///
/// # Panics
///
/// Panics if the login fails; the bootstrap super admin must exist.
pub async fn super_admin_token(client: &ApiClient) -> SessionToken {
    let email = std::env::var("CEYCAN_TEST_EMAIL")
        .unwrap_or_else(|_| "superadmin@ceycanagro.com".to_owned());
    let password =
        std::env::var("CEYCAN_TEST_PASSWORD").unwrap_or_else(|_| "superadmin123".to_owned());

    let login = client
        .login(&email, &password)
        .await
        .expect("Failed to log in as test super admin");

    SessionToken::new(login.token)
}

/// A unique name for test fixtures, so runs never collide.
#[must_use]
pub fn unique_name(prefix: &str) -> String {
    format!("{prefix}-{}", uuid::Uuid::new_v4())
}
