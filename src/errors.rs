use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Unified error type for the catalog, the review engine and the HTTP layer.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// The caller is authenticated but lacks the capability or ownership the operation needs.
    #[error("You are not authorized to use this method")]
    Unauthorized,

    /// No credential was presented, or the identity provider did not recognize it.
    #[error("Could not validate credentials")]
    Unauthenticated,

    #[error("No product found: {key}")]
    ProductNotFound { key: String },

    #[error("Category not found: {slug}")]
    CategoryNotFound { slug: String },

    #[error("No review found: {id}")]
    ReviewNotFound { id: i64 },

    #[error("No rating found: {id}")]
    RatingNotFound { id: i64 },

    #[error("Slug '{slug}' is already taken")]
    Conflict { slug: String },

    #[error("Invalid grade: {grade} (must be between 1 and 5)")]
    InvalidGrade { grade: f64 },

    #[error("Invalid input: {message}")]
    Validation { message: String },
}

impl Error {
    /// Maps a unique-constraint violation on insert/update to [`Error::Conflict`].
    pub(crate) fn from_write(err: DbErr, slug: &str) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => Self::Conflict {
                slug: slug.to_string(),
            },
            _ => Self::Database(err),
        }
    }
}

// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
