//! Product domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use ceycan_core::{CategoryId, ProductId};

/// The category a product belongs to, as served alongside the product.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryRef {
    pub id: CategoryId,
    pub name: String,
}

/// A sellable item belonging to exactly one category.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub image: String,
    /// Free-form display text ("Rs. 450 / kg"), not a numeric amount.
    pub price: String,
    pub in_stock: bool,
    pub category: CategoryRef,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for creating a product. The category must already be validated.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub image: String,
    pub price: String,
    pub in_stock: bool,
    pub category_id: CategoryId,
}
