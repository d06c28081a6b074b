//! Admin identity domain types.
//!
//! The password hash is never part of the domain type; repositories
//! return it separately where verification needs it.

use chrono::{DateTime, Utc};
use serde::Serialize;

use ceycan_core::{Email, Role, UserId};

/// An admin-panel identity.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    pub name: String,
    /// Unique email address, the login identifier.
    pub email: Email,
    /// Serializes in wire form (`super_admin`).
    pub role: Role,
    /// Disabled accounts cannot authenticate.
    pub active: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for creating a user. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: Email,
    pub password_hash: String,
    pub role: Role,
    pub active: bool,
}
