//! Response bodies shared by all endpoints.
//!
//! Write endpoints answer `{"status_code", "transaction"}`; failures answer
//! `{"status_code", "detail"}` with the matching HTTP status.

use crate::errors::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::error;

/// Body returned by successful write endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionResponse {
    /// Mirrors the HTTP status of the response
    pub status_code: u16,
    /// `"Successful"` or a short description of what happened
    pub transaction: String,
}

impl TransactionResponse {
    /// 201 with `"Successful"`.
    #[must_use]
    pub fn created() -> Self {
        Self {
            status_code: StatusCode::CREATED.as_u16(),
            transaction: "Successful".to_string(),
        }
    }

    /// 200 with the given message.
    #[must_use]
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            status_code: StatusCode::OK.as_u16(),
            transaction: message.into(),
        }
    }
}

impl IntoResponse for TransactionResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::OK);
        (status, Json(self)).into_response()
    }
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status_code: u16,
    pub detail: String,
}

impl Error {
    /// Get HTTP status code for this error
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized | Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::ProductNotFound { .. }
            | Self::CategoryNotFound { .. }
            | Self::ReviewNotFound { .. }
            | Self::RatingNotFound { .. } => StatusCode::NOT_FOUND,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::InvalidGrade { .. } | Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::Config { .. } | Self::Database(_) | Self::Io(_) | Self::EnvVar(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let detail = if status.is_server_error() {
            error!("Request failed: {}", self);
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        let body = ErrorResponse {
            status_code: status.as_u16(),
            detail,
        };
        (status, Json(body)).into_response()
    }
}
