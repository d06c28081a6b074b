//! Core types for CeyCan.
//!
//! Newtype wrappers and enums shared by the server, client and CLI:
//! type-safe IDs, validated emails, roles and statuses.

pub mod email;
pub mod id;
pub mod role;
pub mod status;

pub use email::{Email, EmailError};
pub use id::{CategoryId, ProductId, UserId};
pub use role::{Role, RoleParseError};
pub use status::{CategoryStatus, SettingsKind, SettingsKindParseError};
