//! Shared test utilities for the catalog and review engine.
//!
//! This module provides common helper functions for setting up test databases,
//! building identities, and creating test entities with sensible defaults.

use crate::{
    api::{self, AppState},
    core::{category, product, review},
    entities,
    errors::Result,
    identity::{Capability, Identity, StaticIdentityProvider},
};
use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

/// Bearer token of the admin user (id 1) in [`test_app`].
pub const ADMIN_TOKEN: &str = "admin-token";
/// Bearer token of the supplier user in [`test_app`].
pub const SUPPLIER_TOKEN: &str = "supplier-token";
/// Id of the supplier user in [`test_app`].
pub const SUPPLIER_ID: i64 = 2;
/// Bearer token of a second supplier who owns nothing.
pub const OTHER_SUPPLIER_TOKEN: &str = "other-supplier-token";
/// Bearer token of the customer user in [`test_app`].
pub const CUSTOMER_TOKEN: &str = "customer-token";
/// Id of the customer user in [`test_app`].
pub const CUSTOMER_ID: i64 = 3;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Identity with id 1 and the admin capability only.
pub fn admin() -> Identity {
    Identity::new(1, [Capability::Admin])
}

/// Identity with the supplier capability only.
pub fn supplier(id: i64) -> Identity {
    Identity::new(id, [Capability::Supplier])
}

/// Identity with the customer capability only.
pub fn customer(id: i64) -> Identity {
    Identity::new(id, [Capability::Customer])
}

/// Product input with sensible defaults.
///
/// # Defaults
/// * `description`: "Test product"
/// * `price`: 1000
/// * `stock`: 10
/// * `image_url`: None
pub fn product_input(name: &str, category_id: i64) -> product::ProductInput {
    product::ProductInput {
        name: name.to_string(),
        description: "Test product".to_string(),
        price: 1000,
        image_url: None,
        stock: 10,
        category_id,
    }
}

/// Review input with a default comment.
pub fn review_input(product_id: i64, grade: f64) -> review::ReviewInput {
    review::ReviewInput {
        product_id,
        grade,
        comment: "Test review".to_string(),
    }
}

/// Creates a category as admin, optionally under the category with `parent_slug`.
pub async fn create_test_category(
    db: &DatabaseConnection,
    name: &str,
    parent_slug: Option<&str>,
) -> Result<entities::category::Model> {
    category::create_category(db, name.to_string(), parent_slug, &admin()).await
}

/// Creates an in-stock product as admin with the defaults of [`product_input`].
pub async fn create_test_product(
    db: &DatabaseConnection,
    name: &str,
    category_id: i64,
) -> Result<entities::product::Model> {
    product::create_product(db, product_input(name, category_id), &admin()).await
}

/// Inserts a rating row directly, bypassing the review engine.
/// Used to set up states the engine never produces on its own.
pub async fn insert_raw_rating(
    db: &DatabaseConnection,
    product_id: i64,
    grade: f64,
    is_active: bool,
) -> Result<entities::rating::Model> {
    let rating = entities::rating::ActiveModel {
        grade: Set(grade),
        user_id: Set(99),
        product_id: Set(product_id),
        is_active: Set(is_active),
        ..Default::default()
    };
    rating.insert(db).await.map_err(Into::into)
}

/// Sets up a test environment with one top-level category.
/// Returns (db, category).
pub async fn setup_with_category() -> Result<(DatabaseConnection, entities::category::Model)> {
    let db = setup_test_db().await?;
    let category = create_test_category(&db, "Test Category", None).await?;
    Ok((db, category))
}

/// Sets up a complete test environment with a category and an in-stock product.
/// Returns (db, category, product) for review-related tests.
pub async fn setup_with_product() -> Result<(
    DatabaseConnection,
    entities::category::Model,
    entities::product::Model,
)> {
    let (db, category) = setup_with_category().await?;
    let product = create_test_product(&db, "Test Product", category.id).await?;
    Ok((db, category, product))
}

/// Builds the full application router over `db` with a fixed set of test users.
pub fn test_app(db: DatabaseConnection) -> Router {
    let identities = StaticIdentityProvider::new([
        (ADMIN_TOKEN.to_string(), admin()),
        (SUPPLIER_TOKEN.to_string(), supplier(SUPPLIER_ID)),
        (OTHER_SUPPLIER_TOKEN.to_string(), supplier(4)),
        (CUSTOMER_TOKEN.to_string(), customer(CUSTOMER_ID)),
    ]);
    api::router(AppState::new(db, Arc::new(identities)), &[])
}

/// Sends one request through `app` and returns the status and the JSON body
/// (`Value::Null` when the body is empty or not JSON).
#[allow(clippy::expect_used)]
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("valid test request");

    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("router is infallible");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("readable response body");
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}
