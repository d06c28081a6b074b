//! Category repository for database operations.
//!
//! Queries use the runtime sqlx API with `FromRow` row types mapped into
//! domain models. Product counts are always computed at read time.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use ceycan_core::{CategoryId, CategoryStatus};

use super::RepositoryError;
use crate::models::{Category, CategoryWithCount, NewCategory};

/// Internal row type for category queries.
#[derive(Debug, sqlx::FromRow)]
struct CategoryRow {
    id: i32,
    name: String,
    description: String,
    icon: String,
    image: String,
    status: CategoryStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: CategoryId::new(row.id),
            name: row.name,
            description: row.description,
            icon: row.icon,
            image: row.image,
            status: row.status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Category row joined with its live product count.
#[derive(Debug, sqlx::FromRow)]
struct CategoryCountRow {
    #[sqlx(flatten)]
    category: CategoryRow,
    products: i64,
}

impl From<CategoryCountRow> for CategoryWithCount {
    fn from(row: CategoryCountRow) -> Self {
        Self {
            category: row.category.into(),
            products: row.products,
        }
    }
}

/// Repository for category database operations.
pub struct CategoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CategoryRepository<'a> {
    /// Create a new category repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all categories sorted by name ascending, each with its
    /// product count.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<CategoryWithCount>, RepositoryError> {
        let rows = sqlx::query_as::<_, CategoryCountRow>(
            r"
            SELECT c.*,
                   (SELECT COUNT(*) FROM ceycan.product p WHERE p.category_id = c.id) AS products
            FROM ceycan.category c
            ORDER BY c.name ASC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get a category by ID, with its product count.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: CategoryId) -> Result<Option<CategoryWithCount>, RepositoryError> {
        let row = sqlx::query_as::<_, CategoryCountRow>(
            r"
            SELECT c.*,
                   (SELECT COUNT(*) FROM ceycan.product p WHERE p.category_id = c.id) AS products
            FROM ceycan.category c
            WHERE c.id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Find a category by exact name (case-sensitive).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_name(&self, name: &str) -> Result<Option<Category>, RepositoryError> {
        let row = sqlx::query_as::<_, CategoryRow>(
            r"SELECT * FROM ceycan.category WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Find a category by exact name, excluding the given ID.
    ///
    /// Used by rename to check uniqueness against all *other* categories.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_other_by_name(
        &self,
        name: &str,
        exclude: CategoryId,
    ) -> Result<Option<Category>, RepositoryError> {
        let row = sqlx::query_as::<_, CategoryRow>(
            r"SELECT * FROM ceycan.category WHERE name = $1 AND id <> $2",
        )
        .bind(name)
        .bind(exclude)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Create a new category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the name already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, new: &NewCategory) -> Result<Category, RepositoryError> {
        let row = sqlx::query_as::<_, CategoryRow>(
            r"
            INSERT INTO ceycan.category (name, description, icon, image, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            ",
        )
        .bind(&new.name)
        .bind(&new.description)
        .bind(&new.icon)
        .bind(&new.image)
        .bind(new.status)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict(
                    "Category with this name already exists".to_owned(),
                );
            }
            RepositoryError::Database(e)
        })?;

        Ok(row.into())
    }

    /// Update a category with fully merged field values.
    ///
    /// Callers merge partial input with the existing record first; this
    /// writes every column and refreshes `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the ID is unknown.
    /// Returns `RepositoryError::Conflict` on a name collision.
    pub async fn update(
        &self,
        id: CategoryId,
        name: &str,
        description: &str,
        icon: &str,
        image: &str,
        status: CategoryStatus,
    ) -> Result<Category, RepositoryError> {
        let row = sqlx::query_as::<_, CategoryRow>(
            r"
            UPDATE ceycan.category
            SET name = $2, description = $3, icon = $4, image = $5, status = $6,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            ",
        )
        .bind(id)
        .bind(name)
        .bind(description)
        .bind(icon)
        .bind(image)
        .bind(status)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict(
                    "Category with this name already exists".to_owned(),
                );
            }
            RepositoryError::Database(e)
        })?;

        row.map(Into::into).ok_or(RepositoryError::NotFound)
    }

    /// Count products referencing a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn product_count(&self, id: CategoryId) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>(
            r"SELECT COUNT(*) FROM ceycan.product WHERE category_id = $1",
        )
        .bind(id)
        .fetch_one(self.pool)
        .await?;

        Ok(count)
    }

    /// Delete a category.
    ///
    /// The caller is responsible for checking the product count first;
    /// the foreign key still rejects a delete that lost that race.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the ID is unknown.
    /// Returns `RepositoryError::Conflict` if products still reference it.
    pub async fn delete(&self, id: CategoryId) -> Result<(), RepositoryError> {
        let result = sqlx::query(r"DELETE FROM ceycan.category WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(ref db_err) = e
                    && db_err.is_foreign_key_violation()
                {
                    return RepositoryError::Conflict(
                        "Cannot delete category with associated products".to_owned(),
                    );
                }
                RepositoryError::Database(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
