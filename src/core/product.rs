//! Product business logic - Handles all product-related operations.
//!
//! This module provides functions for creating, retrieving, updating, and soft-deleting
//! products. Writes are restricted to admins and suppliers, and a supplier may only touch
//! the products they listed. Public listings only show active products that are in stock.

use crate::{
    core::{category, slug::slugify},
    entities::{Product, product},
    errors::{Error, Result},
    identity::Identity,
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use serde::Deserialize;
use tracing::{info, instrument};

/// Fields supplied when creating or updating a product.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductInput {
    /// Display name; the slug is derived from it
    pub name: String,
    /// Free-form description
    #[serde(default)]
    pub description: String,
    /// Price in minor currency units
    pub price: i64,
    /// Optional image location
    #[serde(default)]
    pub image_url: Option<String>,
    /// Units in stock
    pub stock: i64,
    /// Category to file the product under
    #[serde(alias = "category")]
    pub category_id: i64,
}

impl ProductInput {
    /// Checks field values and returns the slug derived from the name.
    fn validate(&self) -> Result<String> {
        let slug = slugify(&self.name);
        if slug.is_empty() {
            return Err(Error::Validation {
                message: "Product name must contain letters or digits".to_string(),
            });
        }
        if self.price < 0 {
            return Err(Error::Validation {
                message: format!("Price cannot be negative: {}", self.price),
            });
        }
        if self.stock < 0 {
            return Err(Error::Validation {
                message: format!("Stock cannot be negative: {}", self.stock),
            });
        }
        Ok(slug)
    }
}

/// Returns true if `actor` may modify `product`: admins always, suppliers only their own.
#[must_use]
pub fn can_manage(actor: &Identity, product: &product::Model) -> bool {
    actor.is_admin() || (actor.is_supplier() && product.supplier_id == Some(actor.id))
}

/// Retrieves all active, in-stock products ordered by id.
pub async fn list_active_products(db: &DatabaseConnection) -> Result<Vec<product::Model>> {
    Product::find()
        .filter(product::Column::IsActive.eq(true))
        .filter(product::Column::Stock.gt(0))
        .order_by_asc(product::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves the active, in-stock products of a category and its direct subcategories.
///
/// # Errors
/// Returns [`Error::CategoryNotFound`] if the slug does not name an active category.
pub async fn list_by_category(
    db: &DatabaseConnection,
    category_slug: &str,
) -> Result<Vec<product::Model>> {
    let category_ids = category::category_and_children_ids(db, category_slug).await?;

    Product::find()
        .filter(product::Column::CategoryId.is_in(category_ids))
        .filter(product::Column::IsActive.eq(true))
        .filter(product::Column::Stock.gt(0))
        .order_by_asc(product::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a specific product by its unique ID, regardless of its state.
pub async fn get_product_by_id<C>(db: &C, product_id: i64) -> Result<Option<product::Model>>
where
    C: ConnectionTrait,
{
    Product::find_by_id(product_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds an active product by slug, returning None if not found or deleted.
pub async fn get_product_by_slug<C>(db: &C, slug: &str) -> Result<Option<product::Model>>
where
    C: ConnectionTrait,
{
    Product::find()
        .filter(product::Column::Slug.eq(slug))
        .filter(product::Column::IsActive.eq(true))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves the public detail view of a product: it must be active and in stock.
///
/// # Errors
/// Returns [`Error::ProductNotFound`] otherwise.
pub async fn get_product_detail(db: &DatabaseConnection, slug: &str) -> Result<product::Model> {
    get_product_by_slug(db, slug)
        .await?
        .filter(|product| product.stock > 0)
        .ok_or_else(|| Error::ProductNotFound {
            key: slug.to_string(),
        })
}

async fn ensure_category_exists<C>(db: &C, category_id: i64) -> Result<()>
where
    C: ConnectionTrait,
{
    category::get_category_by_id(db, category_id)
        .await?
        .map(|_| ())
        .ok_or_else(|| Error::CategoryNotFound {
            slug: category_id.to_string(),
        })
}

/// Fails with [`Error::Conflict`] if a product other than `except_id` already uses `slug`.
async fn ensure_slug_free<C>(db: &C, slug: &str, except_id: Option<i64>) -> Result<()>
where
    C: ConnectionTrait,
{
    let mut query = Product::find().filter(product::Column::Slug.eq(slug));
    if let Some(id) = except_id {
        query = query.filter(product::Column::Id.ne(id));
    }

    match query.one(db).await? {
        Some(_) => Err(Error::Conflict {
            slug: slug.to_string(),
        }),
        None => Ok(()),
    }
}

/// Creates a new product owned by `actor`.
///
/// # Errors
/// Returns an error if:
/// - The actor is neither admin nor supplier
/// - The name yields an empty slug, or price/stock is negative
/// - The category does not exist
/// - Another product already uses the derived slug
#[instrument(skip(db, input, actor), fields(actor = actor.id, name = %input.name))]
pub async fn create_product(
    db: &DatabaseConnection,
    input: ProductInput,
    actor: &Identity,
) -> Result<product::Model> {
    if !(actor.is_admin() || actor.is_supplier()) {
        return Err(Error::Unauthorized);
    }

    let slug = input.validate()?;

    let txn = db.begin().await?;

    ensure_category_exists(&txn, input.category_id).await?;
    ensure_slug_free(&txn, &slug, None).await?;

    let product = product::ActiveModel {
        name: Set(input.name.trim().to_string()),
        slug: Set(slug.clone()),
        description: Set(input.description),
        price: Set(input.price),
        image_url: Set(input.image_url),
        stock: Set(input.stock),
        category_id: Set(input.category_id),
        supplier_id: Set(Some(actor.id)),
        rating: Set(0.0),
        is_active: Set(true),
        ..Default::default()
    };

    let created = product
        .insert(&txn)
        .await
        .map_err(|e| Error::from_write(e, &slug))?;
    txn.commit().await?;

    info!(product_id = created.id, slug = %created.slug, "Product created");
    Ok(created)
}

/// Replaces a product's editable fields. The slug is re-derived from the new name.
///
/// # Errors
/// Returns an error if:
/// - No active product has `slug`
/// - The actor is neither admin nor the owning supplier
/// - The input fails validation or names a missing category
/// - The new slug belongs to another product
#[instrument(skip(db, input, actor), fields(actor = actor.id))]
pub async fn update_product(
    db: &DatabaseConnection,
    slug: &str,
    input: ProductInput,
    actor: &Identity,
) -> Result<product::Model> {
    let txn = db.begin().await?;

    let existing = get_product_by_slug(&txn, slug)
        .await?
        .ok_or_else(|| Error::ProductNotFound {
            key: slug.to_string(),
        })?;

    if !can_manage(actor, &existing) {
        return Err(Error::Unauthorized);
    }

    let new_slug = input.validate()?;
    ensure_category_exists(&txn, input.category_id).await?;
    ensure_slug_free(&txn, &new_slug, Some(existing.id)).await?;

    let mut product: product::ActiveModel = existing.into();
    product.name = Set(input.name.trim().to_string());
    product.slug = Set(new_slug.clone());
    product.description = Set(input.description);
    product.price = Set(input.price);
    product.image_url = Set(input.image_url);
    product.stock = Set(input.stock);
    product.category_id = Set(input.category_id);

    let updated = product
        .update(&txn)
        .await
        .map_err(|e| Error::from_write(e, &new_slug))?;
    txn.commit().await?;

    info!(product_id = updated.id, slug = %updated.slug, "Product updated");
    Ok(updated)
}

/// Soft deletes a product by marking it inactive, preserving its ratings and reviews.
///
/// # Errors
/// Returns an error if:
/// - No active product has `slug`
/// - The actor is neither admin nor the owning supplier
#[instrument(skip(db, actor), fields(actor = actor.id))]
pub async fn delete_product(
    db: &DatabaseConnection,
    slug: &str,
    actor: &Identity,
) -> Result<product::Model> {
    let txn = db.begin().await?;

    let existing = get_product_by_slug(&txn, slug)
        .await?
        .ok_or_else(|| Error::ProductNotFound {
            key: slug.to_string(),
        })?;

    if !can_manage(actor, &existing) {
        return Err(Error::Unauthorized);
    }

    let mut product: product::ActiveModel = existing.into();
    product.is_active = Set(false);
    let deleted = product.update(&txn).await?;
    txn.commit().await?;

    info!(product_id = deleted.id, "Product deactivated");
    Ok(deleted)
}
