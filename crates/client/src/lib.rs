//! CeyCan API client.
//!
//! A typed client for the CeyCan REST API, built for tooling, scripts
//! and integration tests.
//!
//! # Credential handling
//!
//! The credential is injected into each request explicitly - there is no
//! global mutable header state, so concurrent requests can never observe
//! a half-updated credential. Callers pass `Option<&SessionToken>` per
//! call; [`session::SessionStore`] persists the token across runs.
//!
//! A 401 response clears the session through the registered
//! unauthorized hook, except for the settings-write endpoints, which are
//! exempt from forced logout.
//!
//! # Settings cache
//!
//! [`settings_cache::SettingsCache`] is a TTL cache over settings
//! payloads with an explicit publish/subscribe invalidation bus:
//! successful writes publish an event, subscribers re-fetch.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod error;
pub mod session;
pub mod settings_cache;
pub mod types;

pub use api::ApiClient;
pub use error::ApiClientError;
pub use session::{SessionStore, SessionToken, StoredSession};
pub use settings_cache::{SettingsCache, SettingsEvent};
