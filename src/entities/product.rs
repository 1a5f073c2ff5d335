//! Product entity - Represents an item in the catalog.
//!
//! Products belong to a category and optionally to the supplier who listed them.
//! The `rating` column is derived: it always holds the mean grade of the product's
//! active ratings and is only written by the review engine.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Product database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    /// Unique identifier for the product
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name of the product
    pub name: String,
    /// URL-safe identifier derived from the name
    #[sea_orm(unique)]
    pub slug: String,
    /// Free-form description
    pub description: String,
    /// Price in minor currency units
    pub price: i64,
    /// Optional image location
    pub image_url: Option<String>,
    /// Units in stock; products with zero stock are hidden from listings
    pub stock: i64,
    /// ID of the category this product is filed under
    pub category_id: i64,
    /// ID of the supplier who owns this listing, if any
    pub supplier_id: Option<i64>,
    /// Mean grade over all active ratings, 0 when there are none
    pub rating: f64,
    /// Soft delete flag - if false, product is hidden but data is preserved
    pub is_active: bool,
}

/// Defines relationships between Product and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each product belongs to one category
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id"
    )]
    Category,
    /// One product has many ratings
    #[sea_orm(has_many = "super::rating::Entity")]
    Ratings,
    /// One product has many reviews
    #[sea_orm(has_many = "super::review::Entity")]
    Reviews,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::rating::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ratings.def()
    }
}

impl Related<super::review::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reviews.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
