//! Identity resolution - who is calling, and what they may do.
//!
//! Credentials are issued elsewhere; this module only maps a presented bearer token to an
//! [`Identity`] carrying a closed set of [`Capability`] values. The HTTP layer resolves the
//! identity once per request and hands it to the core operations, which perform every
//! authorization check themselves.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A named permission attached to an authenticated identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    /// Full catalog and moderation rights.
    Admin,
    /// May list products and manage the ones they own.
    Supplier,
    /// May submit reviews.
    Customer,
}

/// An authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// User id, used for ownership checks and as the author of ratings and reviews
    pub id: i64,
    capabilities: Vec<Capability>,
}

impl Identity {
    /// Creates an identity holding the given capabilities.
    #[must_use]
    pub fn new(id: i64, capabilities: impl IntoIterator<Item = Capability>) -> Self {
        let mut held = Vec::new();
        for capability in capabilities {
            if !held.contains(&capability) {
                held.push(capability);
            }
        }
        Self {
            id,
            capabilities: held,
        }
    }

    /// Returns true if this identity holds `capability`.
    #[must_use]
    pub fn has(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.has(Capability::Admin)
    }

    #[must_use]
    pub fn is_supplier(&self) -> bool {
        self.has(Capability::Supplier)
    }

    #[must_use]
    pub fn is_customer(&self) -> bool {
        self.has(Capability::Customer)
    }

    /// Capabilities held by this identity.
    #[must_use]
    pub fn capabilities(&self) -> &[Capability] {
        &self.capabilities
    }
}

/// Resolves a request credential to an identity.
pub trait IdentityProvider: Send + Sync {
    /// Returns the identity for `credential`, or `None` if it is not recognized.
    fn resolve(&self, credential: &str) -> Option<Identity>;
}

/// Identity provider backed by a fixed token table, typically loaded from `config.toml`.
#[derive(Debug, Default, Clone)]
pub struct StaticIdentityProvider {
    tokens: HashMap<String, Identity>,
}

impl StaticIdentityProvider {
    /// Builds a provider from `(token, identity)` pairs. Later duplicates win.
    #[must_use]
    pub fn new(entries: impl IntoIterator<Item = (String, Identity)>) -> Self {
        Self {
            tokens: entries.into_iter().collect(),
        }
    }

    /// Number of known tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl IdentityProvider for StaticIdentityProvider {
    fn resolve(&self, credential: &str) -> Option<Identity> {
        self.tokens.get(credential).cloned()
    }
}
