//! Aggregate rating computation.
//!
//! A product's `rating` column caches the mean grade of its active ratings. It is rewritten
//! inside the same transaction as every change to the rating set, with the product row locked
//! so concurrent submissions cannot overwrite each other's aggregate.

use crate::{
    entities::{Product, Rating, product, rating},
    errors::{Error, Result},
};
use sea_orm::{QuerySelect, Set, prelude::*};
use tracing::debug;

/// Arithmetic mean of `grades`, or `None` for an empty set.
#[must_use]
pub fn mean_grade(grades: &[f64]) -> Option<f64> {
    if grades.is_empty() {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    let count = grades.len() as f64;
    Some(grades.iter().sum::<f64>() / count)
}

/// Grades of all active ratings for a product.
pub async fn active_grades<C>(db: &C, product_id: i64) -> Result<Vec<f64>>
where
    C: ConnectionTrait,
{
    Rating::find()
        .select_only()
        .column(rating::Column::Grade)
        .filter(rating::Column::ProductId.eq(product_id))
        .filter(rating::Column::IsActive.eq(true))
        .into_tuple::<f64>()
        .all(db)
        .await
        .map_err(Into::into)
}

/// Recomputes and stores a product's aggregate rating from its active ratings.
///
/// Call this with an open transaction: the product row is locked for the rest of it
/// (`SELECT ... FOR UPDATE` on backends that support row locks). A product with no active
/// ratings gets an aggregate of 0.
///
/// # Errors
/// Returns [`Error::ProductNotFound`] if the product row does not exist.
pub async fn recompute_product_rating<C>(db: &C, product_id: i64) -> Result<product::Model>
where
    C: ConnectionTrait,
{
    let product = Product::find_by_id(product_id)
        .lock_exclusive()
        .one(db)
        .await?
        .ok_or_else(|| Error::ProductNotFound {
            key: product_id.to_string(),
        })?;

    let grades = active_grades(db, product_id).await?;
    let aggregate = mean_grade(&grades).unwrap_or(0.0);
    debug!(
        product_id,
        active_ratings = grades.len(),
        aggregate,
        "Recomputed aggregate rating"
    );

    let mut product: product::ActiveModel = product.into();
    product.rating = Set(aggregate);
    product.update(db).await.map_err(Into::into)
}
