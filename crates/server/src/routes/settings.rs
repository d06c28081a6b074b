//! Settings route handlers.
//!
//! Reads are public and fall back to documented default payloads when no
//! record exists. Writes require any authenticated identity - the admin
//! tier is deliberately not required here.

use axum::{Json, extract::State};
use serde_json::{Value, json};
use tracing::instrument;

use ceycan_core::SettingsKind;

use crate::db::settings::{get_settings, upsert_settings};
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::state::AppState;

/// The fallback payload served when no record of the kind exists yet.
///
/// The contact and social payloads are part of the public contract and
/// must be served verbatim.
#[must_use]
pub fn default_payload(kind: SettingsKind) -> Value {
    match kind {
        SettingsKind::Contact => json!({
            "address": "123 Agricultural Avenue, Colombo 07, Sri Lanka",
            "phone": "+94 11 234 5678",
            "email": "info@ceycanagro.com",
            "website": "www.ceycanagro.com",
            "description": "CeyCan Agro is a leading agricultural company in Sri Lanka, dedicated to providing the highest quality agricultural products to our customers."
        }),
        SettingsKind::Social => json!({
            "facebook": "https://facebook.com/ceycanagro",
            "instagram": "https://instagram.com/ceycanagro",
            "twitter": "https://twitter.com/ceycanagro",
            "linkedin": "https://linkedin.com/company/ceycanagro"
        }),
        SettingsKind::General => json!({}),
    }
}

async fn get_kind(state: &AppState, kind: SettingsKind) -> Result<Json<Value>> {
    let stored = get_settings(state.pool(), kind).await?;
    Ok(Json(stored.unwrap_or_else(|| default_payload(kind))))
}

async fn put_kind(
    state: &AppState,
    kind: SettingsKind,
    payload: Value,
    message: &str,
) -> Result<Json<Value>> {
    if payload.is_null() {
        return Err(AppError::Validation("Settings payload is required".to_owned()));
    }

    upsert_settings(state.pool(), kind, &payload).await?;

    Ok(Json(json!({ "success": true, "message": message })))
}

/// Get contact information, or its documented defaults.
///
/// GET /api/settings/contact
#[instrument(skip(state))]
pub async fn get_contact(State(state): State<AppState>) -> Result<Json<Value>> {
    get_kind(&state, SettingsKind::Contact).await
}

/// Upsert contact information.
///
/// PUT /api/settings/contact
#[instrument(skip(state, user, payload))]
pub async fn put_contact(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(payload): Json<Value>,
) -> Result<Json<Value>> {
    tracing::debug!(user = %user.name, "settings update authenticated");
    put_kind(&state, SettingsKind::Contact, payload, "Contact settings updated").await
}

/// Get social media links, or their documented defaults.
///
/// GET /api/settings/social
#[instrument(skip(state))]
pub async fn get_social(State(state): State<AppState>) -> Result<Json<Value>> {
    get_kind(&state, SettingsKind::Social).await
}

/// Upsert social media links.
///
/// PUT /api/settings/social
#[instrument(skip(state, user, payload))]
pub async fn put_social(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(payload): Json<Value>,
) -> Result<Json<Value>> {
    tracing::debug!(user = %user.name, "settings update authenticated");
    put_kind(&state, SettingsKind::Social, payload, "Social media settings updated").await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_defaults_are_the_documented_payload() {
        let payload = default_payload(SettingsKind::Contact);
        assert_eq!(
            payload["address"],
            "123 Agricultural Avenue, Colombo 07, Sri Lanka"
        );
        assert_eq!(payload["phone"], "+94 11 234 5678");
        assert_eq!(payload["email"], "info@ceycanagro.com");
        assert_eq!(payload["website"], "www.ceycanagro.com");
        assert!(
            payload["description"]
                .as_str()
                .unwrap()
                .starts_with("CeyCan Agro is a leading agricultural company")
        );
    }

    #[test]
    fn test_social_defaults_are_the_documented_payload() {
        let payload = default_payload(SettingsKind::Social);
        assert_eq!(payload["facebook"], "https://facebook.com/ceycanagro");
        assert_eq!(payload["instagram"], "https://instagram.com/ceycanagro");
        assert_eq!(payload["twitter"], "https://twitter.com/ceycanagro");
        assert_eq!(
            payload["linkedin"],
            "https://linkedin.com/company/ceycanagro"
        );
    }

    #[test]
    fn test_general_defaults_to_empty_object() {
        assert_eq!(default_payload(SettingsKind::General), json!({}));
    }
}
