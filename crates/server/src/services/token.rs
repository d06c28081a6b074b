//! Signed identity tokens.
//!
//! Tokens are symmetric HS256 JWTs carrying the user's id, name, email
//! and role, with an absolute expiry. The signing secret comes from
//! configuration; there is no revocation.

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::User;

/// Errors from token verification or issuance.
#[derive(Debug, Error)]
pub enum TokenError {
    /// The token's expiry is in the past.
    #[error("token expired")]
    Expired,

    /// Malformed token, bad signature, or any other verification failure.
    #[error("token invalid")]
    Invalid,
}

/// JWT payload.
///
/// `role` is the wire-form role string embedded at issuance; the
/// access-control layer derives the authorization tier from it alone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID.
    pub sub: i32,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Wire-form role (`admin` / `super_admin`), absent in older tokens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Issued-at, seconds since epoch.
    pub iat: i64,
    /// Expiry, seconds since epoch.
    pub exp: i64,
}

/// Issues and verifies identity tokens.
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: chrono::Duration,
}

impl TokenIssuer {
    /// Create an issuer from the signing secret and token lifetime.
    #[must_use]
    pub fn new(secret: &SecretString, ttl: chrono::Duration) -> Self {
        let secret_bytes = secret.expose_secret().as_bytes();
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret_bytes),
            decoding: DecodingKey::from_secret(secret_bytes),
            validation,
            ttl,
        }
    }

    /// Issue a token for a user.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Invalid` if signing fails.
    pub fn issue(&self, user: &User) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.as_i32(),
            name: user.name.clone(),
            email: user.email.to_string(),
            role: Some(user.role.as_wire_str().to_owned()),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|_| TokenError::Invalid)
    }

    /// Verify a token and return its claims.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Expired` for an expired token, and
    /// `TokenError::Invalid` for anything else (malformed input, bad
    /// signature, wrong algorithm).
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{Duration, Utc};
    use secrecy::SecretString;

    use ceycan_core::{Email, Role, UserId};

    use super::*;

    fn test_user() -> User {
        User {
            id: UserId::new(7),
            name: "Admin User".to_owned(),
            email: Email::parse("admin@ceycanagro.com").unwrap(),
            role: Role::SuperAdmin,
            active: true,
            last_login: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn issuer(secret: &str, ttl: Duration) -> TokenIssuer {
        TokenIssuer::new(&SecretString::from(secret.to_owned()), ttl)
    }

    #[test]
    fn test_issue_verify_roundtrip() {
        let issuer = issuer("k7Qz9xW3mPr5vT1nB8fLd2hYcJ6gS4aE", Duration::days(30));
        let token = issuer.issue(&test_user()).unwrap();

        let claims = issuer.verify(&token).unwrap();
        assert_eq!(claims.sub, 7);
        assert_eq!(claims.name, "Admin User");
        assert_eq!(claims.email, "admin@ceycanagro.com");
        assert_eq!(claims.role.as_deref(), Some("super_admin"));
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let a = issuer("k7Qz9xW3mPr5vT1nB8fLd2hYcJ6gS4aE", Duration::days(30));
        let b = issuer("e2Xv8cR4nQt6wY1mD9gKf3jZbL7hU5sP", Duration::days(30));

        let token = a.issue(&test_user()).unwrap();
        assert!(matches!(b.verify(&token), Err(TokenError::Invalid)));
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let issuer = issuer("k7Qz9xW3mPr5vT1nB8fLd2hYcJ6gS4aE", Duration::days(30));
        let token = issuer.issue(&test_user()).unwrap();

        // Swap in the payload of a differently-signed token
        let other = {
            let mut user = test_user();
            user.name = "Someone Else".to_owned();
            issuer.issue(&user).unwrap()
        };
        let mut parts: Vec<&str> = token.split('.').collect();
        let other_payload = other.split('.').nth(1).unwrap();
        parts[1] = other_payload;
        let forged = parts.join(".");

        assert!(matches!(issuer.verify(&forged), Err(TokenError::Invalid)));
    }

    #[test]
    fn test_expired_token_rejected() {
        let issuer = issuer("k7Qz9xW3mPr5vT1nB8fLd2hYcJ6gS4aE", Duration::seconds(-60));
        let token = issuer.issue(&test_user()).unwrap();

        assert!(matches!(issuer.verify(&token), Err(TokenError::Expired)));
    }

    #[test]
    fn test_garbage_rejected() {
        let issuer = issuer("k7Qz9xW3mPr5vT1nB8fLd2hYcJ6gS4aE", Duration::days(30));
        assert!(matches!(
            issuer.verify("not-a-token"),
            Err(TokenError::Invalid)
        ));
        assert!(matches!(issuer.verify(""), Err(TokenError::Invalid)));
    }
}
