//! Core business logic - framework-agnostic catalog and review operations.
//!
//! Every write operation takes the caller's [`Identity`](crate::identity::Identity) and performs
//! its own authorization check, so the HTTP layer never decides who may do what.

/// Category lookup and creation
pub mod category;
/// Product CRUD, listings and ownership checks
pub mod product;
/// Aggregate rating computation
pub mod rating;
/// Review submission, listing and cascading soft-delete
pub mod review;
/// URL-safe slug derivation
pub mod slug;
