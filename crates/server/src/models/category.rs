//! Category domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use ceycan_core::{CategoryId, CategoryStatus};

/// A product category.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Unique category ID.
    pub id: CategoryId,
    /// Display name, unique across all categories.
    pub name: String,
    pub description: String,
    /// Symbolic icon tag rendered by the UI.
    pub icon: String,
    /// Optional image URL; empty string when unset.
    pub image: String,
    pub status: CategoryStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A category annotated with its live product count.
///
/// The count is computed at read time, never stored.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryWithCount {
    #[serde(flatten)]
    pub category: Category,
    /// Number of products referencing this category.
    pub products: i64,
}

/// Fields for creating a category.
#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: String,
    pub description: String,
    pub icon: String,
    pub image: String,
    pub status: CategoryStatus,
}
