//! The API client.
//!
//! Every call takes the credential explicitly and injects it into that
//! one request. A 401 triggers the registered unauthorized hook (which
//! typically clears the [`crate::SessionStore`]) and surfaces as
//! [`ApiClientError::SessionExpired`] - except for the settings-write
//! endpoints, which are exempt from forced logout.

use std::sync::Arc;

use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use ceycan_core::{CategoryId, ProductId, SettingsKind};

use crate::error::ApiClientError;
use crate::session::SessionToken;
use crate::types::{
    Category, CategoryInput, Envelope, LoginResponse, Product, ProductInput, Profile,
};

/// Paths whose 401 responses must NOT force a logout.
const LOGOUT_EXEMPT_PATHS: &[&str] = &["/api/settings/contact", "/api/settings/social"];

/// Whether a 401 on this request should clear the session.
fn forced_logout_applies(method: &Method, path: &str) -> bool {
    !(*method == Method::PUT && LOGOUT_EXEMPT_PATHS.contains(&path))
}

/// Hook invoked when a non-exempt request receives a 401.
type UnauthorizedHook = Arc<dyn Fn() + Send + Sync>;

/// Typed client for the CeyCan REST API.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    on_unauthorized: Option<UnauthorizedHook>,
}

impl ApiClient {
    /// Create a client for the given base URL.
    ///
    /// # Errors
    ///
    /// Returns `ApiClientError::Http` if the underlying HTTP client
    /// cannot be constructed.
    pub fn new(base_url: Url) -> Result<Self, ApiClientError> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            base_url,
            on_unauthorized: None,
        })
    }

    /// Register a hook to run when a request is rejected with 401.
    ///
    /// Typically wired to [`crate::SessionStore::clear`] plus whatever
    /// "redirect to login" means for the embedding application.
    #[must_use]
    pub fn with_unauthorized_hook(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_unauthorized = Some(Arc::new(hook));
        self
    }

    // =========================================================================
    // Auth
    // =========================================================================

    /// Log in and receive a token.
    ///
    /// # Errors
    ///
    /// Returns `ApiClientError::Api` with status 401 on bad credentials.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiClientError> {
        #[derive(Serialize)]
        struct LoginBody<'a> {
            email: &'a str,
            password: &'a str,
        }

        self.send(
            Method::POST,
            "/api/users/login",
            None,
            Some(&LoginBody { email, password }),
        )
        .await
    }

    /// Fetch the calling user's profile.
    ///
    /// # Errors
    ///
    /// Returns `ApiClientError::SessionExpired` when the token no longer
    /// verifies.
    pub async fn profile(&self, token: &SessionToken) -> Result<Profile, ApiClientError> {
        self.send::<Profile, ()>(Method::GET, "/api/users/profile", Some(token), None)
            .await
    }

    // =========================================================================
    // Categories
    // =========================================================================

    /// List all categories with product counts.
    ///
    /// # Errors
    ///
    /// Returns `ApiClientError` on transport or API failure.
    pub async fn list_categories(&self) -> Result<Vec<Category>, ApiClientError> {
        let envelope: Envelope<Vec<Category>> = self
            .send::<_, ()>(Method::GET, "/api/categories", None, None)
            .await?;
        Ok(envelope.data)
    }

    /// Get a single category.
    ///
    /// # Errors
    ///
    /// Returns `ApiClientError::Api` with status 404 if absent.
    pub async fn get_category(&self, id: CategoryId) -> Result<Category, ApiClientError> {
        let envelope: Envelope<Category> = self
            .send::<_, ()>(Method::GET, &format!("/api/categories/{id}"), None, None)
            .await?;
        Ok(envelope.data)
    }

    /// Create a category (admin).
    ///
    /// # Errors
    ///
    /// Returns `ApiClientError::Api` with status 400 on a missing or
    /// duplicate name.
    pub async fn create_category(
        &self,
        token: &SessionToken,
        input: &CategoryInput,
    ) -> Result<Category, ApiClientError> {
        let envelope: Envelope<Category> = self
            .send(Method::POST, "/api/categories", Some(token), Some(input))
            .await?;
        Ok(envelope.data)
    }

    /// Partially update a category (admin).
    ///
    /// # Errors
    ///
    /// Returns `ApiClientError` on transport or API failure.
    pub async fn update_category(
        &self,
        token: &SessionToken,
        id: CategoryId,
        input: &CategoryInput,
    ) -> Result<Value, ApiClientError> {
        self.send(
            Method::PUT,
            &format!("/api/categories/{id}"),
            Some(token),
            Some(input),
        )
        .await
    }

    /// Delete a category (admin). Fails while products reference it.
    ///
    /// # Errors
    ///
    /// Returns `ApiClientError::Api` with status 400 while dependent
    /// products exist.
    pub async fn delete_category(
        &self,
        token: &SessionToken,
        id: CategoryId,
    ) -> Result<Value, ApiClientError> {
        self.send::<_, ()>(
            Method::DELETE,
            &format!("/api/categories/{id}"),
            Some(token),
            None,
        )
        .await
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// List all products.
    ///
    /// # Errors
    ///
    /// Returns `ApiClientError` on transport or API failure.
    pub async fn list_products(&self) -> Result<Vec<Product>, ApiClientError> {
        let envelope: Envelope<Vec<Product>> = self
            .send::<_, ()>(Method::GET, "/api/products", None, None)
            .await?;
        Ok(envelope.data)
    }

    /// List products in a category. An unknown category yields an empty
    /// list.
    ///
    /// # Errors
    ///
    /// Returns `ApiClientError` on transport or API failure.
    pub async fn list_products_by_category(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<Product>, ApiClientError> {
        let envelope: Envelope<Vec<Product>> = self
            .send::<_, ()>(
                Method::GET,
                &format!("/api/products/category/{category_id}"),
                None,
                None,
            )
            .await?;
        Ok(envelope.data)
    }

    /// Get a single product.
    ///
    /// # Errors
    ///
    /// Returns `ApiClientError::Api` with status 404 if absent.
    pub async fn get_product(&self, id: ProductId) -> Result<Product, ApiClientError> {
        self.send::<_, ()>(Method::GET, &format!("/api/products/{id}"), None, None)
            .await
    }

    /// Create a product (admin).
    ///
    /// # Errors
    ///
    /// Returns `ApiClientError::Api` with status 400 on an invalid
    /// category reference.
    pub async fn create_product(
        &self,
        token: &SessionToken,
        input: &ProductInput,
    ) -> Result<Product, ApiClientError> {
        self.send(Method::POST, "/api/products", Some(token), Some(input))
            .await
    }

    /// Partially update a product (admin).
    ///
    /// # Errors
    ///
    /// Returns `ApiClientError` on transport or API failure.
    pub async fn update_product(
        &self,
        token: &SessionToken,
        id: ProductId,
        input: &ProductInput,
    ) -> Result<Product, ApiClientError> {
        self.send(
            Method::PUT,
            &format!("/api/products/{id}"),
            Some(token),
            Some(input),
        )
        .await
    }

    /// Delete a product (admin).
    ///
    /// # Errors
    ///
    /// Returns `ApiClientError::Api` with status 404 if absent.
    pub async fn delete_product(
        &self,
        token: &SessionToken,
        id: ProductId,
    ) -> Result<Value, ApiClientError> {
        self.send::<_, ()>(
            Method::DELETE,
            &format!("/api/products/{id}"),
            Some(token),
            None,
        )
        .await
    }

    // =========================================================================
    // Settings
    // =========================================================================

    /// Get a settings payload (stored or documented default).
    ///
    /// # Errors
    ///
    /// Returns `ApiClientError` on transport or API failure.
    pub async fn get_settings(&self, kind: SettingsKind) -> Result<Value, ApiClientError> {
        self.send::<_, ()>(Method::GET, &format!("/api/settings/{kind}"), None, None)
            .await
    }

    /// Upsert a settings payload (any authenticated identity).
    ///
    /// A 401 here does NOT force a logout; it surfaces as a plain
    /// `ApiClientError::Api`.
    ///
    /// # Errors
    ///
    /// Returns `ApiClientError` on transport or API failure.
    pub async fn put_settings(
        &self,
        token: &SessionToken,
        kind: SettingsKind,
        payload: &Value,
    ) -> Result<Value, ApiClientError> {
        self.send(
            Method::PUT,
            &format!("/api/settings/{kind}"),
            Some(token),
            Some(payload),
        )
        .await
    }

    // =========================================================================
    // Plumbing
    // =========================================================================

    /// Build, send and decode one request, injecting the credential into
    /// this request alone.
    async fn send<T, B>(
        &self,
        method: Method,
        path: &str,
        token: Option<&SessionToken>,
        body: Option<&B>,
    ) -> Result<T, ApiClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self
            .base_url
            .join(path)
            .map_err(|e| ApiClientError::Api {
                status: StatusCode::BAD_REQUEST,
                message: format!("invalid request path {path}: {e}"),
            })?;

        let mut request = self.http.request(method.clone(), url);

        if let Some(token) = token {
            request = request.bearer_auth(token.as_str());
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED && forced_logout_applies(&method, path) {
            tracing::debug!(%path, "unauthorized response, clearing session");
            if let Some(hook) = &self.on_unauthorized {
                hook();
            }
            return Err(ApiClientError::SessionExpired);
        }

        if !status.is_success() {
            let message = error_message(&response.text().await.unwrap_or_default());
            return Err(ApiClientError::Api { status, message });
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// Pull the human-readable message out of an error body.
///
/// The server answers with `{"message": ...}` from the error translator
/// and `{"error": ...}` from the auth middleware; fall back to the raw
/// body for anything else.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("message")
                .or_else(|| v.get("error"))
                .and_then(Value::as_str)
                .map(str::to_owned)
        })
        .unwrap_or_else(|| body.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_writes_are_exempt_from_forced_logout() {
        assert!(!forced_logout_applies(
            &Method::PUT,
            "/api/settings/contact"
        ));
        assert!(!forced_logout_applies(&Method::PUT, "/api/settings/social"));
    }

    #[test]
    fn test_everything_else_forces_logout_on_401() {
        assert!(forced_logout_applies(&Method::GET, "/api/users/profile"));
        assert!(forced_logout_applies(&Method::POST, "/api/categories"));
        // Reads of settings are not exempt, only writes
        assert!(forced_logout_applies(&Method::GET, "/api/settings/contact"));
    }

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(
            error_message(r#"{"message": "Category not found"}"#),
            "Category not found"
        );
        assert_eq!(
            error_message(r#"{"error": "Not authorized, no token"}"#),
            "Not authorized, no token"
        );
        assert_eq!(error_message("plain text"), "plain text");
    }
}
