//! Integration tests for category CRUD and the deletion guard.
//!
//! These tests require a running server with a migrated database and
//! the bootstrap super admin provisioned.
//!
//! Run with: cargo test -p ceycan-integration-tests -- --ignored

#![allow(clippy::unwrap_used)]

use ceycan_client::ApiClientError;
use ceycan_client::types::{CategoryInput, ProductInput};
use ceycan_core::CategoryId;
use ceycan_integration_tests::{client, super_admin_token, unique_name};
use reqwest::StatusCode;

fn category_input(name: &str) -> CategoryInput {
    CategoryInput {
        name: Some(name.to_owned()),
        description: Some("desc".to_owned()),
        icon: Some("ChefHat".to_owned()),
        ..CategoryInput::default()
    }
}

#[tokio::test]
#[ignore = "Requires running ceycan-server"]
async fn test_create_defaults_and_zero_product_count() {
    let client = client();
    let token = super_admin_token(&client).await;

    let name = unique_name("Spices");
    let created = client
        .create_category(&token, &category_input(&name))
        .await
        .unwrap();

    assert_eq!(created.name, name);
    assert_eq!(created.icon, "ChefHat");
    assert_eq!(created.products, 0);

    // Round trip: the stored record matches what was sent
    let fetched = client.get_category(created.id).await.unwrap();
    assert_eq!(fetched.name, name);
    assert_eq!(fetched.description, "desc");
    assert_eq!(fetched.products, 0);

    // Appears in the list, which is sorted by name ascending
    let listed = client.list_categories().await.unwrap();
    assert!(listed.iter().any(|c| c.id == created.id));
    let names: Vec<&str> = listed.iter().map(|c| c.name.as_str()).collect();
    let mut sorted = names.clone();
    sorted.sort_unstable();
    assert_eq!(names, sorted);

    client.delete_category(&token, created.id).await.unwrap();
}

#[tokio::test]
#[ignore = "Requires running ceycan-server"]
async fn test_duplicate_name_rejected() {
    let client = client();
    let token = super_admin_token(&client).await;

    let name = unique_name("Oils");
    let created = client
        .create_category(&token, &category_input(&name))
        .await
        .unwrap();

    let err = client
        .create_category(&token, &category_input(&name))
        .await
        .unwrap_err();
    match err {
        ApiClientError::Api { status, message } => {
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert!(message.contains("already exists"));
        }
        other => panic!("expected Api error, got {other:?}"),
    }

    client.delete_category(&token, created.id).await.unwrap();
}

#[tokio::test]
#[ignore = "Requires running ceycan-server"]
async fn test_missing_name_rejected() {
    let client = client();
    let token = super_admin_token(&client).await;

    let err = client
        .create_category(&token, &CategoryInput::default())
        .await
        .unwrap_err();
    match err {
        ApiClientError::Api { status, .. } => assert_eq!(status, StatusCode::BAD_REQUEST),
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
#[ignore = "Requires running ceycan-server"]
async fn test_delete_guard_lifecycle() {
    let client = client();
    let token = super_admin_token(&client).await;

    // Category starts with zero products
    let category = client
        .create_category(&token, &category_input(&unique_name("Spices")))
        .await
        .unwrap();
    assert_eq!(category.products, 0);

    // Creating a product bumps the live count to 1
    let product = client
        .create_product(
            &token,
            &ProductInput {
                name: Some("Ceylon Cinnamon".to_owned()),
                description: Some("True cinnamon quills".to_owned()),
                image: Some("cinnamon.jpg".to_owned()),
                price: Some("Rs. 450 / 100g".to_owned()),
                category: Some(category.id),
                ..ProductInput::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(product.category.id, category.id);

    let fetched = client.get_category(category.id).await.unwrap();
    assert_eq!(fetched.products, 1);

    // Deleting the category is blocked while the product references it
    let err = client.delete_category(&token, category.id).await.unwrap_err();
    match err {
        ApiClientError::Api { status, message } => {
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert!(message.contains("Cannot delete category"));
        }
        other => panic!("expected Api error, got {other:?}"),
    }

    // The category must still be there
    assert!(client.get_category(category.id).await.is_ok());

    // Delete the product, then the category delete succeeds
    client.delete_product(&token, product.id).await.unwrap();
    client.delete_category(&token, category.id).await.unwrap();

    let err = client.get_category(category.id).await.unwrap_err();
    match err {
        ApiClientError::Api { status, .. } => assert_eq!(status, StatusCode::NOT_FOUND),
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
#[ignore = "Requires running ceycan-server"]
async fn test_product_with_unknown_category_rejected() {
    let client = client();
    let token = super_admin_token(&client).await;

    let err = client
        .create_product(
            &token,
            &ProductInput {
                name: Some("Orphan".to_owned()),
                description: Some("no category".to_owned()),
                image: Some("none.jpg".to_owned()),
                price: Some("Rs. 1".to_owned()),
                category: Some(CategoryId::new(999_999_999)),
                ..ProductInput::default()
            },
        )
        .await
        .unwrap_err();
    match err {
        ApiClientError::Api { status, message } => {
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert!(message.contains("Invalid category"));
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
#[ignore = "Requires running ceycan-server"]
async fn test_unknown_category_listing_is_empty_not_an_error() {
    let client = client();

    let products = client
        .list_products_by_category(CategoryId::new(999_999_999))
        .await
        .unwrap();
    assert!(products.is_empty());
}
