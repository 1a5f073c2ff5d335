//! Product endpoints under `/products`.

use crate::{
    api::{
        AppState,
        auth::CurrentUser,
        extract::{ValidJson, ValidPath, ValidQuery},
        response::TransactionResponse,
    },
    core::product::{self, ProductInput},
    entities::product::Model as ProductModel,
    errors::Result,
};
use axum::{
    Json, Router,
    extract::State,
    routing::{delete, get, post},
};
use serde::Deserialize;

/// Query string of `DELETE /products/delete`.
#[derive(Debug, Deserialize)]
pub struct DeleteProductQuery {
    pub product_slug: String,
}

/// Product routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products/", get(all_products))
        .route("/products/create", post(create_product))
        .route("/products/delete", delete(delete_product))
        .route(
            "/products/detail/:product_slug",
            get(product_detail).put(update_product),
        )
        .route("/products/:category_slug", get(products_by_category))
}

async fn all_products(State(state): State<AppState>) -> Result<Json<Vec<ProductModel>>> {
    product::list_active_products(&state.database)
        .await
        .map(Json)
}

async fn create_product(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidJson(input): ValidJson<ProductInput>,
) -> Result<TransactionResponse> {
    product::create_product(&state.database, input, &user).await?;
    Ok(TransactionResponse::created())
}

async fn products_by_category(
    State(state): State<AppState>,
    ValidPath(category_slug): ValidPath<String>,
) -> Result<Json<Vec<ProductModel>>> {
    product::list_by_category(&state.database, &category_slug)
        .await
        .map(Json)
}

async fn product_detail(
    State(state): State<AppState>,
    ValidPath(product_slug): ValidPath<String>,
) -> Result<Json<ProductModel>> {
    product::get_product_detail(&state.database, &product_slug)
        .await
        .map(Json)
}

async fn update_product(
    State(state): State<AppState>,
    ValidPath(product_slug): ValidPath<String>,
    CurrentUser(user): CurrentUser,
    ValidJson(input): ValidJson<ProductInput>,
) -> Result<TransactionResponse> {
    product::update_product(&state.database, &product_slug, input, &user).await?;
    Ok(TransactionResponse::ok("Product update is successful"))
}

async fn delete_product(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidQuery(query): ValidQuery<DeleteProductQuery>,
) -> Result<TransactionResponse> {
    product::delete_product(&state.database, &query.product_slug, &user).await?;
    Ok(TransactionResponse::ok("Product delete is successful"))
}
