//! Authorization roles.
//!
//! Storage and wire forms disagree about the super-admin spelling: the
//! database stores `superadmin` while the API and UI speak `super_admin`.
//! Both mappings live here and nowhere else.

use serde::{Deserialize, Serialize};

/// Error returned when a role string matches neither form.
#[derive(thiserror::Error, Debug, Clone)]
#[error("invalid role: {0}")]
pub struct RoleParseError(pub String);

/// Authorization tier for admin-panel identities.
///
/// `Admin` can manage store data; `SuperAdmin` can additionally manage
/// other admin accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full access to store management features.
    #[default]
    Admin,
    /// Admin plus user management.
    SuperAdmin,
}

impl Role {
    /// The form persisted in the database (`admin` / `superadmin`).
    #[must_use]
    pub const fn as_db_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::SuperAdmin => "superadmin",
        }
    }

    /// The form used on the wire and in the UI (`admin` / `super_admin`).
    #[must_use]
    pub const fn as_wire_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::SuperAdmin => "super_admin",
        }
    }

    /// Parse either form. Accepting both spellings at every boundary
    /// keeps old clients and old database rows working.
    ///
    /// # Errors
    ///
    /// Returns [`RoleParseError`] if the string is neither form.
    pub fn parse(s: &str) -> Result<Self, RoleParseError> {
        match s {
            "admin" => Ok(Self::Admin),
            "superadmin" | "super_admin" => Ok(Self::SuperAdmin),
            other => Err(RoleParseError(other.to_owned())),
        }
    }

    /// Whether this role passes the super-admin gate.
    #[must_use]
    pub const fn is_super_admin(&self) -> bool {
        matches!(self, Self::SuperAdmin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_wire_str())
    }
}

impl std::str::FromStr for Role {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// Stored as TEXT in its db form (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Role {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Role {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <&str as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::parse(s)?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Role {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <&str as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.as_db_str(), buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_db_and_wire_forms_differ_only_for_super_admin() {
        assert_eq!(Role::Admin.as_db_str(), "admin");
        assert_eq!(Role::Admin.as_wire_str(), "admin");
        assert_eq!(Role::SuperAdmin.as_db_str(), "superadmin");
        assert_eq!(Role::SuperAdmin.as_wire_str(), "super_admin");
    }

    #[test]
    fn test_parse_accepts_both_forms() {
        assert_eq!(Role::parse("admin").unwrap(), Role::Admin);
        assert_eq!(Role::parse("superadmin").unwrap(), Role::SuperAdmin);
        assert_eq!(Role::parse("super_admin").unwrap(), Role::SuperAdmin);
        assert!(Role::parse("viewer").is_err());
        assert!(Role::parse("").is_err());
    }

    #[test]
    fn test_mapping_roundtrips() {
        for role in [Role::Admin, Role::SuperAdmin] {
            assert_eq!(Role::parse(role.as_db_str()).unwrap(), role);
            assert_eq!(Role::parse(role.as_wire_str()).unwrap(), role);
        }
    }

    #[test]
    fn test_display_uses_wire_form() {
        assert_eq!(Role::SuperAdmin.to_string(), "super_admin");
    }
}
