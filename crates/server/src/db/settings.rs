//! Settings database operations.
//!
//! One JSONB record per [`SettingsKind`]; writes upsert. The payload is
//! intentionally schema-loose.

use serde_json::Value as JsonValue;
use sqlx::PgPool;

use ceycan_core::SettingsKind;

use super::RepositoryError;

/// Get the stored payload for a settings kind, if any.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn get_settings(
    pool: &PgPool,
    kind: SettingsKind,
) -> Result<Option<JsonValue>, RepositoryError> {
    let value = sqlx::query_scalar::<_, JsonValue>(
        r"SELECT data FROM ceycan.settings WHERE kind = $1",
    )
    .bind(kind)
    .fetch_optional(pool)
    .await?;

    Ok(value)
}

/// Replace the payload for a settings kind, inserting the record if it
/// does not exist yet.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn upsert_settings(
    pool: &PgPool,
    kind: SettingsKind,
    data: &JsonValue,
) -> Result<(), RepositoryError> {
    sqlx::query(
        r"
        INSERT INTO ceycan.settings (kind, data)
        VALUES ($1, $2)
        ON CONFLICT (kind) DO UPDATE SET data = $2, updated_at = NOW()
        ",
    )
    .bind(kind)
    .bind(data)
    .execute(pool)
    .await?;

    Ok(())
}
