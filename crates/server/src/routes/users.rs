//! User route handlers.
//!
//! Login is public and profile requires any verified token; everything
//! else here is user management and sits behind the super-admin gate.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::instrument;

use ceycan_core::{Email, Role, UserId};

use crate::db::{RepositoryError, UserRepository};
use crate::error::{AppError, Result};
use crate::middleware::{RequireAuth, RequireSuperAdmin};
use crate::models::{NewUser, User};
use crate::routes::Envelope;
use crate::services::auth::{self, AuthService};
use crate::state::AppState;

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response body for a successful login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    /// Wire-form role (`super_admin` for super admins).
    pub role: Role,
    pub token: String,
}

/// Request body for creating a user.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    /// Accepts either spelling of the super-admin role.
    pub role: Option<String>,
    pub active: Option<bool>,
}

/// Request body for a partial user update.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
    pub active: Option<bool>,
}

/// Authenticate and issue a token.
///
/// POST /api/users/login
#[instrument(skip(state, req))]
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let service = AuthService::new(state.pool(), state.tokens());
    let session = service.login(&req.email, &req.password).await?;

    tracing::info!(
        user = %session.user.name,
        email = %session.user.email,
        "User logged in"
    );

    Ok(Json(LoginResponse {
        id: session.user.id,
        name: session.user.name,
        email: session.user.email,
        role: session.user.role,
        token: session.token,
    }))
}

/// Get the calling user's profile.
///
/// GET /api/users/profile
#[instrument(skip(state, user))]
pub async fn profile(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Value>> {
    let user = UserRepository::new(state.pool())
        .get(user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_owned()))?;

    Ok(Json(json!({
        "id": user.id,
        "name": user.name,
        "email": user.email,
        "role": user.role,
    })))
}

/// List all users, newest first.
///
/// GET /api/users
#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    RequireSuperAdmin(_admin): RequireSuperAdmin,
) -> Result<Json<Vec<User>>> {
    let users = UserRepository::new(state.pool()).list().await?;
    Ok(Json(users))
}

/// Create a new admin user.
///
/// POST /api/users
#[instrument(skip(state, req))]
pub async fn create(
    State(state): State<AppState>,
    RequireSuperAdmin(_admin): RequireSuperAdmin,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<Envelope<User>>)> {
    let email =
        Email::parse(&req.email).map_err(|e| AppError::Validation(format!("Invalid email: {e}")))?;

    auth::validate_password(&req.password)?;
    let password_hash = auth::hash_password(&req.password)?;

    let role = match req.role.as_deref() {
        None | Some("") => Role::Admin,
        Some(raw) => raw
            .parse::<Role>()
            .map_err(|e| AppError::Validation(e.to_string()))?,
    };

    let new = NewUser {
        name: req.name,
        email,
        password_hash,
        role,
        active: req.active.unwrap_or(true),
    };

    let user = UserRepository::new(state.pool()).create(&new).await?;

    Ok((
        StatusCode::CREATED,
        Json(Envelope::ok(user, "Admin user created successfully")),
    ))
}

/// Get a single user.
///
/// GET /api/users/{id}
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    RequireSuperAdmin(_admin): RequireSuperAdmin,
    Path(id): Path<i32>,
) -> Result<Json<User>> {
    let user = UserRepository::new(state.pool())
        .get(UserId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_owned()))?;

    Ok(Json(user))
}

/// Update a user. The password is re-hashed only when provided.
///
/// PUT /api/users/{id}
#[instrument(skip(state, req))]
pub async fn update(
    State(state): State<AppState>,
    RequireSuperAdmin(_admin): RequireSuperAdmin,
    Path(id): Path<i32>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<User>> {
    let id = UserId::new(id);
    let repo = UserRepository::new(state.pool());

    let current = repo
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_owned()))?;

    let name = match req.name {
        Some(ref n) if !n.is_empty() => n.clone(),
        _ => current.name,
    };

    let email = match req.email.as_deref() {
        Some(raw) if !raw.is_empty() => Email::parse(raw)
            .map_err(|e| AppError::Validation(format!("Invalid email: {e}")))?,
        _ => current.email,
    };

    let role = match req.role.as_deref() {
        Some(raw) if !raw.is_empty() => raw
            .parse::<Role>()
            .map_err(|e| AppError::Validation(e.to_string()))?,
        _ => current.role,
    };

    let active = req.active.unwrap_or(current.active);

    let password_hash = match req.password.as_deref() {
        Some(password) if !password.is_empty() => {
            auth::validate_password(password)?;
            Some(auth::hash_password(password)?)
        }
        _ => None,
    };

    let user = repo
        .update(id, &name, &email, role, active, password_hash.as_deref())
        .await?;

    Ok(Json(user))
}

/// Delete a user. A user can never delete their own account.
///
/// DELETE /api/users/{id}
#[instrument(skip(state, admin))]
pub async fn delete(
    State(state): State<AppState>,
    RequireSuperAdmin(admin): RequireSuperAdmin,
    Path(id): Path<i32>,
) -> Result<Json<Value>> {
    let id = UserId::new(id);

    if id == admin.id {
        return Err(AppError::Validation(
            "You cannot delete your own account".to_owned(),
        ));
    }

    UserRepository::new(state.pool())
        .delete(id)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound("User not found".to_owned()),
            other => other.into(),
        })?;

    Ok(Json(json!({ "message": "User removed" })))
}
