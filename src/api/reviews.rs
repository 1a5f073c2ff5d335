//! Review endpoints under `/reviews`.

use crate::{
    api::{
        AppState,
        auth::CurrentUser,
        extract::{ValidJson, ValidPath, ValidQuery},
        response::TransactionResponse,
    },
    core::review::{self, RatingWithReview, ReviewInput},
    errors::Result,
};
use axum::{
    Json, Router,
    extract::State,
    routing::{delete, get, post},
};
use serde::Deserialize;

/// Query string of `DELETE /reviews/delete`.
#[derive(Debug, Deserialize)]
pub struct DeleteReviewQuery {
    pub review_id: i64,
}

/// Review routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reviews/", get(all_reviews))
        .route("/reviews/create", post(add_review))
        .route("/reviews/delete", delete(delete_review))
        .route("/reviews/:product_id", get(reviews_by_product))
}

async fn all_reviews(State(state): State<AppState>) -> Result<Json<Vec<RatingWithReview>>> {
    review::list_all_reviews(&state.database).await.map(Json)
}

async fn reviews_by_product(
    State(state): State<AppState>,
    ValidPath(product_id): ValidPath<i64>,
) -> Result<Json<Vec<RatingWithReview>>> {
    review::list_reviews_for_product(&state.database, product_id)
        .await
        .map(Json)
}

async fn add_review(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidJson(input): ValidJson<ReviewInput>,
) -> Result<TransactionResponse> {
    review::submit_review(&state.database, input, &user).await?;
    Ok(TransactionResponse::created())
}

async fn delete_review(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidQuery(query): ValidQuery<DeleteReviewQuery>,
) -> Result<TransactionResponse> {
    review::delete_review(&state.database, query.review_id, &user).await?;
    Ok(TransactionResponse::ok("Review delete is successful"))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    #[tokio::test]
    async fn test_review_lifecycle() -> Result<()> {
        let (db, _category, product) = setup_with_product().await?;
        let app = test_app(db);

        for grade in [4.0, 2.0] {
            let body = json!({"product_id": product.id, "grade": grade, "comment": "ok"});
            let (status, response) =
                send(&app, Method::POST, "/reviews/create", Some(CUSTOMER_TOKEN), Some(body))
                    .await;
            assert_eq!(status, StatusCode::CREATED);
            assert_eq!(response["transaction"], "Successful");
        }

        let (_, detail) =
            send(&app, Method::GET, "/products/detail/test-product", None, None).await;
        assert_eq!(detail["rating"], 3.0);

        let uri = format!("/reviews/{}", product.id);
        let (status, listed) = send(&app, Method::GET, &uri, None, None).await;
        assert_eq!(status, StatusCode::OK);
        let pairs = listed.as_array().unwrap();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0]["rating"]["grade"], 4.0);
        assert_eq!(pairs[0]["review"]["user_id"], CUSTOMER_ID);
        assert_eq!(pairs[0]["review"]["rating_id"], pairs[0]["rating"]["id"]);

        let review_id = pairs[1]["review"]["id"].as_i64().unwrap();
        let uri = format!("/reviews/delete?review_id={review_id}");
        let (status, response) = send(&app, Method::DELETE, &uri, Some(ADMIN_TOKEN), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(response["transaction"], "Review delete is successful");

        let (_, listed) = send(&app, Method::GET, "/reviews/", None, None).await;
        assert_eq!(listed.as_array().unwrap().len(), 1);

        let (_, detail) =
            send(&app, Method::GET, "/products/detail/test-product", None, None).await;
        assert_eq!(detail["rating"], 4.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_add_review_errors() -> Result<()> {
        let (db, _category, product) = setup_with_product().await?;
        let app = test_app(db);

        let body = json!({"product_id": product.id, "grade": 5.0, "comment": "great"});
        let (status, _) =
            send(&app, Method::POST, "/reviews/create", Some(ADMIN_TOKEN), Some(body)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let body = json!({"product_id": 4242, "grade": 5.0, "comment": "great"});
        let (status, _) =
            send(&app, Method::POST, "/reviews/create", Some(CUSTOMER_TOKEN), Some(body)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let body = json!({"product_id": product.id, "grade": 11.0, "comment": "great"});
        let (status, _) =
            send(&app, Method::POST, "/reviews/create", Some(CUSTOMER_TOKEN), Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, listed) = send(&app, Method::GET, "/reviews/", None, None).await;
        assert!(listed.as_array().unwrap().is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_review_errors() -> Result<()> {
        let (db, _category, product) = setup_with_product().await?;
        let app = test_app(db);

        let body = json!({"product_id": product.id, "grade": 5.0, "comment": "great"});
        send(&app, Method::POST, "/reviews/create", Some(CUSTOMER_TOKEN), Some(body)).await;

        let (status, _) =
            send(&app, Method::DELETE, "/reviews/delete?review_id=1", Some(CUSTOMER_TOKEN), None)
                .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, response) =
            send(&app, Method::DELETE, "/reviews/delete?review_id=77", Some(ADMIN_TOKEN), None)
                .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(response["detail"], "No review found: 77");

        let (_, listed) = send(&app, Method::GET, "/reviews/", None, None).await;
        assert_eq!(listed.as_array().unwrap().len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_malformed_requests_return_json_errors() -> Result<()> {
        let (db, _category, _product) = setup_with_product().await?;
        let app = test_app(db);

        let (status, response) = send(&app, Method::GET, "/reviews/abc", None, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["status_code"], 400);
        assert!(response["detail"].as_str().unwrap().starts_with("Invalid input"));

        let (status, response) =
            send(&app, Method::DELETE, "/reviews/delete?review_id=x", Some(ADMIN_TOKEN), None)
                .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["status_code"], 400);

        let body = json!({"grade": 4.0});
        let (status, response) =
            send(&app, Method::POST, "/reviews/create", Some(CUSTOMER_TOKEN), Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["status_code"], 400);
        assert!(response["detail"].as_str().unwrap().contains("product_id"));

        Ok(())
    }
}
