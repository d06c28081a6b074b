//! Admin user management commands.
//!
//! # Usage
//!
//! ```bash
//! ceycan-cli admin create -e admin@example.com -n "Admin Name" -p <password> -r super_admin
//! ```
//!
//! # Environment Variables
//!
//! - `CEYCAN_DATABASE_URL` - `PostgreSQL` connection string (falls back
//!   to `DATABASE_URL`)

use ceycan_core::{Email, Role};

use super::{CommandError, connect, hash_password};

/// Create a new admin user.
///
/// # Arguments
///
/// * `email` - Admin's email address
/// * `name` - Admin's display name
/// * `password` - Initial password
/// * `role` - Admin's role (`super_admin` or `admin`, either spelling)
///
/// # Returns
///
/// The ID of the created admin user.
///
/// # Errors
///
/// Returns `CommandError` on invalid input, a duplicate email, or a
/// database failure.
pub async fn create_user(
    email: &str,
    name: &str,
    password: &str,
    role: &str,
) -> Result<i32, CommandError> {
    // Parse and validate role
    let role: Role = role
        .parse()
        .map_err(|_| CommandError::InvalidRole(role.to_owned()))?;

    let email = Email::parse(email).map_err(|e| CommandError::InvalidEmail(e.to_string()))?;

    let pool = connect().await?;

    tracing::info!("Creating admin user: {} ({})", email, role);

    // Check if user already exists
    let existing =
        sqlx::query_scalar::<_, i32>(r#"SELECT id FROM ceycan."user" WHERE email = $1"#)
            .bind(email.as_str())
            .fetch_optional(&pool)
            .await?;

    if existing.is_some() {
        return Err(CommandError::UserExists(email.to_string()));
    }

    let password_hash = hash_password(password)?;

    // Create the user
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
    .bind(role.as_db_str())
    .fetch_one(&pool)
    .await?;

    tracing::info!(
        "Admin user created successfully! ID: {}, Email: {}, Role: {}",
        user_id,
        email,
        role
    );

    Ok(user_id)
}
