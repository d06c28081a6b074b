//! Product route handlers.
//!
//! The category reference is validated on create, and again on update
//! whenever it changes. Listing by an unknown category yields an empty
//! list rather than an error.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use ceycan_core::{CategoryId, ProductId};

use crate::db::{CategoryRepository, ProductRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::{NewProduct, Product};
use crate::routes::Envelope;
use crate::state::AppState;

/// Request body for creating a product.
#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub price: Option<String>,
    #[serde(rename = "inStock")]
    pub in_stock: Option<bool>,
    pub category: Option<i32>,
}

/// Request body for a partial product update.
#[derive(Debug, Deserialize)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub price: Option<String>,
    #[serde(rename = "inStock")]
    pub in_stock: Option<bool>,
    pub category: Option<i32>,
}

/// List all products.
///
/// GET /api/products
#[instrument(skip(state))]
pub async fn list(State(state): State<AppState>) -> Result<Json<Envelope<Vec<Product>>>> {
    let products = ProductRepository::new(state.pool()).list().await?;

    Ok(Json(Envelope::ok(
        products,
        "Products retrieved successfully",
    )))
}

/// List products referencing a category.
///
/// GET /api/products/category/{category_id}
#[instrument(skip(state))]
pub async fn list_by_category(
    State(state): State<AppState>,
    Path(category_id): Path<i32>,
) -> Result<Json<Envelope<Vec<Product>>>> {
    // No existence check on the category: unknown IDs yield an empty list
    let products = ProductRepository::new(state.pool())
        .list_by_category(CategoryId::new(category_id))
        .await?;

    Ok(Json(Envelope::ok(
        products,
        "Products for category retrieved successfully",
    )))
}

/// Get a single product.
///
/// GET /api/products/{id}
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(id): Path<i32>) -> Result<Json<Product>> {
    let product = ProductRepository::new(state.pool())
        .get(ProductId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_owned()))?;

    Ok(Json(product))
}

/// Create a product.
///
/// POST /api/products
#[instrument(skip(state, req))]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(req): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<Product>)> {
    let name = require_field(req.name, "name")?;
    let description = require_field(req.description, "description")?;
    let image = require_field(req.image, "image")?;
    let price = require_field(req.price, "price")?;
    let category_id = CategoryId::new(
        req.category
            .ok_or_else(|| AppError::Validation("Invalid category".to_owned()))?,
    );

    let category = CategoryRepository::new(state.pool())
        .get(category_id)
        .await?
        .ok_or_else(|| AppError::Validation("Invalid category".to_owned()))?
        .category;

    let new = NewProduct {
        name,
        description,
        image,
        price,
        in_stock: req.in_stock.unwrap_or(true),
        category_id,
    };

    let product = ProductRepository::new(state.pool())
        .create(&new, &category.name)
        .await?;

    Ok((StatusCode::CREATED, Json(product)))
}

/// Update a product, revalidating the category when it changes.
///
/// PUT /api/products/{id}
#[instrument(skip(state, req))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i32>,
    Json(req): Json<UpdateProductRequest>,
) -> Result<Json<Product>> {
    let id = ProductId::new(id);
    let repo = ProductRepository::new(state.pool());

    let mut product = repo
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_owned()))?;

    // If the category is changing, the new one must exist before anything
    // is written
    if let Some(category) = req.category {
        let category_id = CategoryId::new(category);
        if category_id != product.category.id {
            let category = CategoryRepository::new(state.pool())
                .get(category_id)
                .await?
                .ok_or_else(|| AppError::Validation("Invalid category".to_owned()))?
                .category;
            product.category.id = category.id;
            product.category.name = category.name;
        }
    }

    if let Some(name) = non_empty(req.name) {
        product.name = name;
    }
    if let Some(description) = non_empty(req.description) {
        product.description = description;
    }
    if let Some(image) = non_empty(req.image) {
        product.image = image;
    }
    if let Some(price) = non_empty(req.price) {
        product.price = price;
    }
    if let Some(in_stock) = req.in_stock {
        product.in_stock = in_stock;
    }

    repo.update(
        id,
        &product.name,
        &product.description,
        &product.image,
        &product.price,
        product.in_stock,
        product.category.id,
    )
    .await?;

    Ok(Json(product))
}

/// Delete a product.
///
/// DELETE /api/products/{id}
#[instrument(skip(state))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i32>,
) -> Result<Json<Value>> {
    ProductRepository::new(state.pool())
        .delete(ProductId::new(id))
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => {
                AppError::NotFound("Product not found".to_owned())
            }
            other => other.into(),
        })?;

    Ok(Json(json!({ "message": "Product removed" })))
}

/// Reject a missing or empty required field.
fn require_field(value: Option<String>, field: &str) -> Result<String> {
    non_empty(value).ok_or_else(|| AppError::Validation(format!("Product {field} is required")))
}

/// Treat `None` and `Some("")` alike.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_field() {
        assert!(require_field(None, "name").is_err());
        assert!(require_field(Some(String::new()), "name").is_err());
        assert_eq!(
            require_field(Some("Rice".to_owned()), "name").ok(),
            Some("Rice".to_owned())
        );
    }

    #[test]
    fn test_missing_field_error_names_the_field() {
        let err = require_field(None, "price").unwrap_err();
        assert!(err.to_string().contains("price"));
    }
}
