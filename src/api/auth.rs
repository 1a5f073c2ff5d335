//! Resolves the `Authorization: Bearer <token>` header to an [`Identity`].

use crate::{api::AppState, errors::Error, identity::Identity};
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

/// The authenticated caller of a request.
///
/// Extraction fails with [`Error::Unauthenticated`] (401) when the header is missing,
/// malformed, or names a token the identity provider does not know.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Identity);

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Error;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> std::result::Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(Error::Unauthenticated)?;
        state
            .identity
            .resolve(token)
            .map(CurrentUser)
            .ok_or(Error::Unauthenticated)
    }
}
