//! User repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use ceycan_core::{Email, Role, UserId};

use super::RepositoryError;
use crate::models::{NewUser, User};

/// Internal row type for user queries.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i32,
    name: String,
    email: String,
    role: Role,
    active: bool,
    last_login: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: UserId::new(row.id),
            name: row.name,
            email,
            role: row.role,
            active: row.active,
            last_login: row.last_login,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const USER_COLUMNS: &str =
    "id, name, email, role, active, last_login, created_at, updated_at";

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a user by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let query = format!(r#"SELECT {USER_COLUMNS} FROM ceycan."user" WHERE id = $1"#);
        let row = sqlx::query_as::<_, UserRow>(&query)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Get a user and their password hash by exact email match.
    ///
    /// Returns `None` when no user has this email; callers collapse that
    /// case and a failed verification into one error.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_with_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        #[derive(sqlx::FromRow)]
        struct UserHashRow {
            #[sqlx(flatten)]
            user: UserRow,
            password_hash: String,
        }

        let query = format!(
            r#"SELECT {USER_COLUMNS}, password_hash FROM ceycan."user" WHERE email = $1"#
        );
        let row = sqlx::query_as::<_, UserHashRow>(&query)
            .bind(email)
            .fetch_optional(self.pool)
            .await?;

        match row {
            Some(r) => Ok(Some((r.user.try_into()?, r.password_hash))),
            None => Ok(None),
        }
    }

    /// List all users, newest first. Password hashes are never selected.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        let query = format!(
            r#"SELECT {USER_COLUMNS} FROM ceycan."user" ORDER BY created_at DESC"#
        );
        let rows = sqlx::query_as::<_, UserRow>(&query)
            .fetch_all(self.pool)
            .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Create a new user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, new: &NewUser) -> Result<User, RepositoryError> {
        let query = format!(
            r#"
            INSERT INTO ceycan."user" (name, email, password_hash, role, active)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {USER_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, UserRow>(&query)
            .bind(&new.name)
            .bind(&new.email)
            .bind(&new.password_hash)
            .bind(new.role)
            .bind(new.active)
            .fetch_one(self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(ref db_err) = e
                    && db_err.is_unique_violation()
                {
                    return RepositoryError::Conflict(
                        "User with this email already exists".to_owned(),
                    );
                }
                RepositoryError::Database(e)
            })?;

        row.try_into()
    }

    /// Update a user with fully merged field values. The password hash
    /// changes only when a new one is provided.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the ID is unknown.
    /// Returns `RepositoryError::Conflict` on an email collision.
    pub async fn update(
        &self,
        id: UserId,
        name: &str,
        email: &Email,
        role: Role,
        active: bool,
        password_hash: Option<&str>,
    ) -> Result<User, RepositoryError> {
        let query = format!(
            r#"
            UPDATE ceycan."user"
            SET name = $2, email = $3, role = $4, active = $5,
                password_hash = COALESCE($6, password_hash),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, UserRow>(&query)
            .bind(id)
            .bind(name)
            .bind(email)
            .bind(role)
            .bind(active)
            .bind(password_hash)
            .fetch_optional(self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(ref db_err) = e
                    && db_err.is_unique_violation()
                {
                    return RepositoryError::Conflict(
                        "User with this email already exists".to_owned(),
                    );
                }
                RepositoryError::Database(e)
            })?;

        row.map(TryInto::try_into)
            .transpose()?
            .ok_or(RepositoryError::NotFound)
    }

    /// Delete a user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the ID is unknown.
    pub async fn delete(&self, id: UserId) -> Result<(), RepositoryError> {
        let result = sqlx::query(r#"DELETE FROM ceycan."user" WHERE id = $1"#)
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Record a successful login.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn record_login(&self, id: UserId) -> Result<(), RepositoryError> {
        sqlx::query(r#"UPDATE ceycan."user" SET last_login = NOW() WHERE id = $1"#)
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(())
    }
}
