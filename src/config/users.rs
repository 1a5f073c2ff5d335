//! User configuration module for building the identity provider.
//!
//! Turns the `[[users]]` entries of `config.toml` into a [`StaticIdentityProvider`] that the
//! HTTP layer consults once per request.

use crate::config::UserConfig;
use crate::identity::{Identity, StaticIdentityProvider};

/// Builds a token-to-identity lookup from the configured users.
#[must_use]
pub fn identity_provider_from_config(users: &[UserConfig]) -> StaticIdentityProvider {
    StaticIdentityProvider::new(users.iter().map(|user| {
        (
            user.token.clone(),
            Identity::new(user.id, user.capabilities.iter().copied()),
        )
    }))
}
