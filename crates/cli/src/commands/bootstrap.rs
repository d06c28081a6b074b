//! First super-admin provisioning.
//!
//! # Usage
//!
//! ```bash
//! ceycan-cli bootstrap super-admin
//! ```
//!
//! Idempotent: if any super admin already exists the command logs and
//! exits without touching the database. This runs out of band from the
//! server's request handling.

use ceycan_core::{Email, Role};

use super::{CommandError, connect, hash_password};

/// Create the first super admin if none exists.
///
/// # Errors
///
/// Returns `CommandError` on connection failure, invalid input, or
/// insert failure.
pub async fn super_admin(email: &str, name: &str, password: &str) -> Result<(), CommandError> {
    let email = Email::parse(email).map_err(|e| CommandError::InvalidEmail(e.to_string()))?;

    let pool = connect().await?;

    // Check if a super admin already exists
    let existing = sqlx::query_scalar::<_, i32>(
        r#"SELECT id FROM ceycan."user" WHERE role = $1 LIMIT 1"#,
    )
    .bind(Role::SuperAdmin.as_db_str())
    .fetch_optional(&pool)
    .await?;

    if existing.is_some() {
        tracing::info!("A super admin already exists; nothing to do");
        return Ok(());
    }

    let password_hash = hash_password(password)?;

    let user_id = sqlx::query_scalar::<_, i32>(
        r#"
        INSERT INTO ceycan."user" (name, email, password_hash, role, active)
        VALUES ($1, $2, $3, $4, TRUE)
        RETURNING id
        "#,
    )
    .bind(name)
    .bind(email.as_str())
    .bind(&password_hash)
    .bind(Role::SuperAdmin.as_db_str())
    .fetch_one(&pool)
    .await?;

    tracing::info!("Super admin created successfully! ID: {user_id}, Email: {email}");
    tracing::warn!("Please change the password after first login!");

    Ok(())
}
