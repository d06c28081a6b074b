//! Product repository for database operations.
//!
//! Product reads join the owning category's name so responses can embed
//! a `{id, name}` category reference without a second round trip.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use ceycan_core::{CategoryId, ProductId};

use super::RepositoryError;
use crate::models::{CategoryRef, NewProduct, Product};

/// Internal row type for product queries joined with the category name.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i32,
    name: String,
    description: String,
    image: String,
    price: String,
    in_stock: bool,
    category_id: i32,
    category_name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: ProductId::new(row.id),
            name: row.name,
            description: row.description,
            image: row.image,
            price: row.price,
            in_stock: row.in_stock,
            category: CategoryRef {
                id: CategoryId::new(row.category_id),
                name: row.category_name,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const SELECT_JOINED: &str = r"
    SELECT p.id, p.name, p.description, p.image, p.price, p.in_stock,
           p.category_id, c.name AS category_name, p.created_at, p.updated_at
    FROM ceycan.product p
    JOIN ceycan.category c ON c.id = p.category_id
";

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all products with their category names.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(SELECT_JOINED)
            .fetch_all(self.pool)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// List all products referencing the given category.
    ///
    /// An unknown category yields an empty list, not an error.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_category(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<Product>, RepositoryError> {
        let query = format!("{SELECT_JOINED} WHERE p.category_id = $1");
        let rows = sqlx::query_as::<_, ProductRow>(&query)
            .bind(category_id)
            .fetch_all(self.pool)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let query = format!("{SELECT_JOINED} WHERE p.id = $1");
        let row = sqlx::query_as::<_, ProductRow>(&query)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(Into::into))
    }

    /// Create a product. The category must already be validated; its
    /// name is passed through into the returned record.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        new: &NewProduct,
        category_name: &str,
    ) -> Result<Product, RepositoryError> {
        #[derive(sqlx::FromRow)]
        struct InsertedRow {
            id: i32,
            created_at: DateTime<Utc>,
            updated_at: DateTime<Utc>,
        }

        let row = sqlx::query_as::<_, InsertedRow>(
            r"
            INSERT INTO ceycan.product (name, description, image, price, in_stock, category_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, created_at, updated_at
            ",
        )
        .bind(&new.name)
        .bind(&new.description)
        .bind(&new.image)
        .bind(&new.price)
        .bind(new.in_stock)
        .bind(new.category_id)
        .fetch_one(self.pool)
        .await?;

        Ok(Product {
            id: ProductId::new(row.id),
            name: new.name.clone(),
            description: new.description.clone(),
            image: new.image.clone(),
            price: new.price.clone(),
            in_stock: new.in_stock,
            category: CategoryRef {
                id: new.category_id,
                name: category_name.to_owned(),
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }

    /// Update a product with fully merged field values.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the ID is unknown.
    pub async fn update(
        &self,
        id: ProductId,
        name: &str,
        description: &str,
        image: &str,
        price: &str,
        in_stock: bool,
        category_id: CategoryId,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE ceycan.product
            SET name = $2, description = $3, image = $4, price = $5, in_stock = $6,
                category_id = $7, updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(id)
        .bind(name)
        .bind(description)
        .bind(image)
        .bind(price)
        .bind(in_stock)
        .bind(category_id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Delete a product. Products have no dependents; deletion is
    /// unconditional once the ID resolves.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the ID is unknown.
    pub async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query(r"DELETE FROM ceycan.product WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
