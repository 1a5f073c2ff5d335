//! Category endpoints under `/categories`.

use crate::{
    api::{
        AppState,
        auth::CurrentUser,
        extract::ValidJson,
        response::TransactionResponse,
    },
    core::category,
    entities::category::Model as CategoryModel,
    errors::Result,
};
use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use serde::Deserialize;

/// Body of `POST /categories/create`.
#[derive(Debug, Deserialize)]
pub struct CreateCategory {
    pub name: String,
    /// Slug of the parent category, omitted for a top-level category
    #[serde(default)]
    pub parent: Option<String>,
}

/// Category routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/categories/", get(all_categories))
        .route("/categories/create", post(create_category))
}

async fn all_categories(State(state): State<AppState>) -> Result<Json<Vec<CategoryModel>>> {
    category::list_categories(&state.database).await.map(Json)
}

async fn create_category(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidJson(input): ValidJson<CreateCategory>,
) -> Result<TransactionResponse> {
    category::create_category(&state.database, input.name, input.parent.as_deref(), &user)
        .await?;
    Ok(TransactionResponse::created())
}
