//! Rating entity - A single numeric grade given to a product.
//!
//! Ratings are never created on their own: each one is inserted together with the
//! review that references it. Deactivating a rating removes its grade from the
//! product's aggregate.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Rating database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "ratings")]
pub struct Model {
    /// Unique identifier for the rating
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Numeric score
    pub grade: f64,
    /// ID of the user who gave the grade
    pub user_id: i64,
    /// ID of the rated product
    pub product_id: i64,
    /// Soft delete flag
    pub is_active: bool,
}

/// Defines relationships between Rating and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each rating belongs to one product
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
    /// The review that carries this rating
    #[sea_orm(has_one = "super::review::Entity")]
    Review,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl Related<super::review::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Review.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
