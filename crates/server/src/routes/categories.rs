//! Category route handlers.
//!
//! Writes are admin-gated; reads are public. Deletion is guarded by the
//! live product count so a category can never orphan its products.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use ceycan_core::{CategoryId, CategoryStatus};

use crate::db::CategoryRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::{Category, CategoryWithCount, NewCategory};
use crate::routes::Envelope;
use crate::state::AppState;

/// Icon assigned when the client does not pick one.
const DEFAULT_ICON: &str = "ChefHat";

/// Request body for creating a category.
#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub image: Option<String>,
}

/// Request body for a partial category update.
#[derive(Debug, Deserialize)]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub image: Option<String>,
    pub status: Option<CategoryStatus>,
}

/// Merged field values for an update.
#[derive(Debug, PartialEq, Eq)]
struct MergedCategory {
    name: String,
    description: String,
    icon: String,
    image: String,
    status: CategoryStatus,
}

impl UpdateCategoryRequest {
    /// Merge this partial update over the current record.
    ///
    /// `description` and `image` may be explicitly cleared to empty;
    /// for `name`, `icon` and `status` an empty or absent value keeps
    /// the prior one.
    fn merge_into(&self, current: &Category) -> MergedCategory {
        MergedCategory {
            name: non_empty(self.name.as_deref())
                .unwrap_or(&current.name)
                .to_owned(),
            description: self
                .description
                .clone()
                .unwrap_or_else(|| current.description.clone()),
            icon: non_empty(self.icon.as_deref())
                .unwrap_or(&current.icon)
                .to_owned(),
            image: self.image.clone().unwrap_or_else(|| current.image.clone()),
            status: self.status.unwrap_or(current.status),
        }
    }
}

/// Treat `None` and `Some("")` alike.
fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

/// List all categories with product counts.
///
/// GET /api/categories
#[instrument(skip(state))]
pub async fn list(State(state): State<AppState>) -> Result<Json<Envelope<Vec<CategoryWithCount>>>> {
    let categories = CategoryRepository::new(state.pool()).list().await?;

    Ok(Json(Envelope::ok(
        categories,
        "Categories retrieved successfully",
    )))
}

/// Get a single category with its product count.
///
/// GET /api/categories/{id}
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Envelope<CategoryWithCount>>> {
    let category = CategoryRepository::new(state.pool())
        .get(CategoryId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound("Category not found".to_owned()))?;

    Ok(Json(Envelope::ok(
        category,
        "Category retrieved successfully",
    )))
}

/// Create a new category.
///
/// POST /api/categories
#[instrument(skip(state, req))]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(req): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<Envelope<CategoryWithCount>>)> {
    let Some(name) = non_empty(req.name.as_deref()) else {
        return Err(AppError::Validation("Category name is required".to_owned()));
    };

    let repo = CategoryRepository::new(state.pool());

    if repo.find_by_name(name).await?.is_some() {
        return Err(AppError::Validation(
            "Category with this name already exists".to_owned(),
        ));
    }

    let new = NewCategory {
        name: name.to_owned(),
        description: req.description.unwrap_or_default(),
        icon: non_empty(req.icon.as_deref())
            .unwrap_or(DEFAULT_ICON)
            .to_owned(),
        image: req.image.unwrap_or_default(),
        status: CategoryStatus::Active,
    };

    let category = repo.create(&new).await?;

    // A fresh category necessarily has zero products
    let with_count = CategoryWithCount {
        category,
        products: 0,
    };

    Ok((
        StatusCode::CREATED,
        Json(Envelope::ok(with_count, "Category created successfully")),
    ))
}

/// Update a category.
///
/// PUT /api/categories/{id}
#[instrument(skip(state, req))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i32>,
    Json(req): Json<UpdateCategoryRequest>,
) -> Result<Json<Envelope<Category>>> {
    let id = CategoryId::new(id);
    let repo = CategoryRepository::new(state.pool());

    let current = repo
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Category not found".to_owned()))?
        .category;

    let merged = req.merge_into(&current);

    // Renames re-check uniqueness against all *other* categories
    if merged.name != current.name && repo.find_other_by_name(&merged.name, id).await?.is_some() {
        return Err(AppError::Validation(
            "Category with this name already exists".to_owned(),
        ));
    }

    let updated = repo
        .update(
            id,
            &merged.name,
            &merged.description,
            &merged.icon,
            &merged.image,
            merged.status,
        )
        .await?;

    Ok(Json(Envelope::ok(updated, "Category updated successfully")))
}

/// Delete a category, unless products still reference it.
///
/// DELETE /api/categories/{id}
#[instrument(skip(state))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i32>,
) -> Result<Json<Value>> {
    let id = CategoryId::new(id);
    let repo = CategoryRepository::new(state.pool());

    repo.get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Category not found".to_owned()))?;

    let count = repo.product_count(id).await?;
    if count > 0 {
        return Err(AppError::Dependency(
            "Cannot delete category with associated products. Remove or reassign products first."
                .to_owned(),
        ));
    }

    repo.delete(id).await?;

    Ok(Json(json!({ "success": true, "message": "Category removed" })))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn existing() -> Category {
        Category {
            id: CategoryId::new(1),
            name: "Spices".to_owned(),
            description: "Ceylon spices".to_owned(),
            icon: "ChefHat".to_owned(),
            image: "spices.jpg".to_owned(),
            status: CategoryStatus::Active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn empty_request() -> UpdateCategoryRequest {
        UpdateCategoryRequest {
            name: None,
            description: None,
            icon: None,
            image: None,
            status: None,
        }
    }

    #[test]
    fn test_merge_keeps_unspecified_fields() {
        let merged = empty_request().merge_into(&existing());
        assert_eq!(merged.name, "Spices");
        assert_eq!(merged.description, "Ceylon spices");
        assert_eq!(merged.icon, "ChefHat");
        assert_eq!(merged.image, "spices.jpg");
        assert_eq!(merged.status, CategoryStatus::Active);
    }

    #[test]
    fn test_merge_applies_provided_fields() {
        let req = UpdateCategoryRequest {
            name: Some("Herbs".to_owned()),
            status: Some(CategoryStatus::Inactive),
            ..empty_request()
        };
        let merged = req.merge_into(&existing());
        assert_eq!(merged.name, "Herbs");
        assert_eq!(merged.status, CategoryStatus::Inactive);
    }

    #[test]
    fn test_merge_empty_name_keeps_prior_value() {
        let req = UpdateCategoryRequest {
            name: Some(String::new()),
            ..empty_request()
        };
        assert_eq!(req.merge_into(&existing()).name, "Spices");
    }

    #[test]
    fn test_merge_description_and_image_can_be_cleared() {
        let req = UpdateCategoryRequest {
            description: Some(String::new()),
            image: Some(String::new()),
            ..empty_request()
        };
        let merged = req.merge_into(&existing());
        assert_eq!(merged.description, "");
        assert_eq!(merged.image, "");
    }

    #[test]
    fn test_non_empty_filter() {
        assert_eq!(non_empty(None), None);
        assert_eq!(non_empty(Some("")), None);
        assert_eq!(non_empty(Some("x")), Some("x"));
    }
}
