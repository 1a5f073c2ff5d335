//! Review business logic - submission, listing and deletion of reviews.
//!
//! A review is always submitted together with a rating. Both rows and the product's new
//! aggregate are written in one transaction, so a failure at any step leaves no trace.
//! Deleting a review deactivates its rating as well and recomputes the aggregate, so the
//! product's `rating` never counts a grade that is no longer active.

use crate::{
    core::rating::recompute_product_rating,
    entities::{Product, Rating, Review, product, rating, review},
    errors::{Error, Result},
    identity::Identity,
};
use sea_orm::{QueryOrder, QuerySelect, Set, TransactionTrait, prelude::*};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{info, instrument};

/// Lowest grade a customer can give.
pub const MIN_GRADE: f64 = 1.0;
/// Highest grade a customer can give.
pub const MAX_GRADE: f64 = 5.0;

/// Fields supplied when submitting a review.
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewInput {
    /// Product being reviewed
    pub product_id: i64,
    /// Numeric score between [`MIN_GRADE`] and [`MAX_GRADE`]
    pub grade: f64,
    /// Review text
    #[serde(default)]
    pub comment: String,
}

/// An active rating together with the active review that carries it.
///
/// `review` is `None` only when the data is inconsistent: every rating is created with a
/// review, and deleting the review deactivates the rating.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingWithReview {
    /// The rating
    pub rating: rating::Model,
    /// The review linked to it, if any
    pub review: Option<review::Model>,
}

/// Checks that a grade is a finite number within the accepted range.
///
/// # Errors
/// Returns [`Error::InvalidGrade`] otherwise.
pub fn validate_grade(grade: f64) -> Result<()> {
    if !grade.is_finite() || !(MIN_GRADE..=MAX_GRADE).contains(&grade) {
        return Err(Error::InvalidGrade { grade });
    }
    Ok(())
}

async fn insert_rating<C>(
    db: &C,
    product_id: i64,
    grade: f64,
    user_id: i64,
) -> Result<rating::Model>
where
    C: ConnectionTrait,
{
    let rating = rating::ActiveModel {
        grade: Set(grade),
        user_id: Set(user_id),
        product_id: Set(product_id),
        is_active: Set(true),
        ..Default::default()
    };
    rating.insert(db).await.map_err(Into::into)
}

async fn insert_review<C>(db: &C, rating: &rating::Model, comment: String) -> Result<review::Model>
where
    C: ConnectionTrait,
{
    let review = review::ActiveModel {
        user_id: Set(rating.user_id),
        product_id: Set(rating.product_id),
        rating_id: Set(Some(rating.id)),
        comment: Set(comment),
        comment_date: Set(chrono::Utc::now().date_naive()),
        is_active: Set(true),
        ..Default::default()
    };
    review.insert(db).await.map_err(Into::into)
}

/// Submits a review: creates the rating, the review, and refreshes the product's aggregate.
///
/// The product must exist and be active. It is checked and locked before anything is
/// written, and all three writes commit together.
///
/// # Errors
/// Returns an error if:
/// - The author does not have the customer capability
/// - The grade is not finite or outside the accepted range
/// - The product does not exist or is inactive
/// - Any database operation fails (nothing is persisted in that case)
#[instrument(skip(db, input, author), fields(author = author.id, product_id = input.product_id))]
pub async fn submit_review(
    db: &DatabaseConnection,
    input: ReviewInput,
    author: &Identity,
) -> Result<RatingWithReview> {
    if !author.is_customer() {
        return Err(Error::Unauthorized);
    }
    validate_grade(input.grade)?;

    let txn = db.begin().await?;

    Product::find_by_id(input.product_id)
        .filter(product::Column::IsActive.eq(true))
        .lock_exclusive()
        .one(&txn)
        .await?
        .ok_or_else(|| Error::ProductNotFound {
            key: input.product_id.to_string(),
        })?;

    let rating = insert_rating(&txn, input.product_id, input.grade, author.id).await?;
    let review = insert_review(&txn, &rating, input.comment).await?;
    let product = recompute_product_rating(&txn, input.product_id).await?;

    txn.commit().await?;

    info!(
        rating_id = rating.id,
        review_id = review.id,
        aggregate = product.rating,
        "Review submitted"
    );
    Ok(RatingWithReview {
        rating,
        review: Some(review),
    })
}

/// Pairs each rating with the active review whose `rating_id` points at it.
async fn pair_with_reviews<C>(
    db: &C,
    ratings: Vec<rating::Model>,
) -> Result<Vec<RatingWithReview>>
where
    C: ConnectionTrait,
{
    if ratings.is_empty() {
        return Ok(Vec::new());
    }

    let rating_ids: Vec<i64> = ratings.iter().map(|r| r.id).collect();
    let reviews = Review::find()
        .filter(review::Column::RatingId.is_in(rating_ids))
        .filter(review::Column::IsActive.eq(true))
        .order_by_asc(review::Column::Id)
        .all(db)
        .await?;

    let mut by_rating: HashMap<i64, review::Model> = HashMap::with_capacity(reviews.len());
    for review in reviews {
        if let Some(rating_id) = review.rating_id {
            by_rating.entry(rating_id).or_insert(review);
        }
    }

    Ok(ratings
        .into_iter()
        .map(|rating| {
            let review = by_rating.remove(&rating.id);
            RatingWithReview { rating, review }
        })
        .collect())
}

/// Lists every active rating of a product with its review. Ordered by rating id.
pub async fn list_reviews_for_product(
    db: &DatabaseConnection,
    product_id: i64,
) -> Result<Vec<RatingWithReview>> {
    let ratings = Rating::find()
        .filter(rating::Column::ProductId.eq(product_id))
        .filter(rating::Column::IsActive.eq(true))
        .order_by_asc(rating::Column::Id)
        .all(db)
        .await?;

    pair_with_reviews(db, ratings).await
}

/// Lists every active rating in the catalog with its review. Ordered by rating id.
pub async fn list_all_reviews(db: &DatabaseConnection) -> Result<Vec<RatingWithReview>> {
    let ratings = Rating::find()
        .filter(rating::Column::IsActive.eq(true))
        .order_by_asc(rating::Column::Id)
        .all(db)
        .await?;

    pair_with_reviews(db, ratings).await
}

/// Soft deletes a review, deactivates its rating and refreshes the product's aggregate.
///
/// # Errors
/// Returns an error if:
/// - The actor is not an admin (checked before any lookup)
/// - No active review has `review_id`
/// - The review links a rating that does not exist
#[instrument(skip(db, actor), fields(actor = actor.id))]
pub async fn delete_review(
    db: &DatabaseConnection,
    review_id: i64,
    actor: &Identity,
) -> Result<review::Model> {
    if !actor.is_admin() {
        return Err(Error::Unauthorized);
    }

    let txn = db.begin().await?;

    let existing = Review::find_by_id(review_id)
        .filter(review::Column::IsActive.eq(true))
        .one(&txn)
        .await?
        .ok_or(Error::ReviewNotFound { id: review_id })?;

    let linked_rating = match existing.rating_id {
        Some(rating_id) => Some(
            Rating::find_by_id(rating_id)
                .one(&txn)
                .await?
                .ok_or(Error::RatingNotFound { id: rating_id })?,
        ),
        None => None,
    };

    let mut review: review::ActiveModel = existing.into();
    review.is_active = Set(false);
    let deleted = review.update(&txn).await?;

    if let Some(rating) = linked_rating {
        let product_id = rating.product_id;
        let mut rating: rating::ActiveModel = rating.into();
        rating.is_active = Set(false);
        rating.update(&txn).await?;

        recompute_product_rating(&txn, product_id).await?;
    }

    txn.commit().await?;

    info!(review_id, "Review deactivated");
    Ok(deleted)
}
