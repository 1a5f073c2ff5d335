//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the catalog and review tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod category;
pub mod product;
pub mod rating;
pub mod review;

// Re-export specific types to avoid conflicts
pub use category::{Column as CategoryColumn, Entity as Category, Model as CategoryModel};
pub use product::{Column as ProductColumn, Entity as Product, Model as ProductModel};
pub use rating::{Column as RatingColumn, Entity as Rating, Model as RatingModel};
pub use review::{Column as ReviewColumn, Entity as Review, Model as ReviewModel};
