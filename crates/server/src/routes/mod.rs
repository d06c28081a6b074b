//! HTTP route handlers for the API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                                   - Liveness string (no DB)
//! GET  /health                             - Liveness
//! GET  /health/ready                       - Readiness (DB ping)
//!
//! # Categories
//! GET    /api/categories                   - List with product counts (public)
//! GET    /api/categories/{id}              - Single category with count (public)
//! POST   /api/categories                   - Create (admin)
//! PUT    /api/categories/{id}              - Partial update (admin)
//! DELETE /api/categories/{id}              - Delete, guarded by product count (admin)
//!
//! # Products
//! GET    /api/products                     - List (public)
//! GET    /api/products/category/{id}       - List by category (public)
//! GET    /api/products/{id}                - Single product (public)
//! POST   /api/products                     - Create (admin)
//! PUT    /api/products/{id}                - Partial update (admin)
//! DELETE /api/products/{id}                - Delete (admin)
//!
//! # Users
//! POST   /api/users/login                  - Authenticate, returns token (public)
//! GET    /api/users/profile                - Current user (authenticated)
//! GET    /api/users                        - List (super-admin)
//! POST   /api/users                        - Create (super-admin)
//! GET    /api/users/{id}                   - Single user (super-admin)
//! PUT    /api/users/{id}                   - Update (super-admin)
//! DELETE /api/users/{id}                   - Delete, never oneself (super-admin)
//!
//! # Settings
//! GET    /api/settings/contact             - Contact info or defaults (public)
//! PUT    /api/settings/contact             - Upsert (authenticated)
//! GET    /api/settings/social              - Social links or defaults (public)
//! PUT    /api/settings/social              - Upsert (authenticated)
//! ```

pub mod categories;
pub mod products;
pub mod settings;
pub mod users;

use axum::{
    Router,
    routing::{get, post},
};
use serde::Serialize;

use crate::state::AppState;

/// Response envelope used by the collection endpoints.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: T,
    pub message: String,
}

impl<T> Envelope<T> {
    /// Wrap a successful payload.
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            message: message.into(),
        }
    }
}

/// Create the category routes router.
pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(categories::list).post(categories::create))
        .route(
            "/{id}",
            get(categories::show)
                .put(categories::update)
                .delete(categories::delete),
        )
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::list).post(products::create))
        .route("/category/{category_id}", get(products::list_by_category))
        .route(
            "/{id}",
            get(products::show)
                .put(products::update)
                .delete(products::delete),
        )
}

/// Create the user routes router.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(users::login))
        .route("/profile", get(users::profile))
        .route("/", get(users::list).post(users::create))
        .route(
            "/{id}",
            get(users::show).put(users::update).delete(users::delete),
        )
}

/// Create the settings routes router.
pub fn settings_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/contact",
            get(settings::get_contact).put(settings::put_contact),
        )
        .route(
            "/social",
            get(settings::get_social).put(settings::put_social),
        )
}

/// Create all `/api` routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/categories", category_routes())
        .nest("/api/products", product_routes())
        .nest("/api/users", user_routes())
        .nest("/api/settings", settings_routes())
}
