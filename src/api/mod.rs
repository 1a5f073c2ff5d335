//! HTTP layer - routes, extractors and response mapping.
//!
//! Handlers are thin: they resolve the caller, call into [`crate::core`], and translate the
//! result into a status code and JSON body.

/// Bearer-token extractor resolving the calling identity
pub mod auth;
/// Category endpoints
pub mod categories;
/// Request extractors that report malformed input as JSON errors
pub mod extract;
/// Product endpoints
pub mod products;
/// Write-result bodies and error-to-status mapping
pub mod response;
/// Review endpoints
pub mod reviews;

use crate::{errors::Result, identity::IdentityProvider};
use axum::{Router, http::HeaderValue};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info, warn};

/// Shared data available to all handlers.
/// Holds the database connection and the identity provider behind `Arc`s.
#[derive(Clone)]
pub struct AppState {
    /// Database connection for all database operations
    pub database: Arc<DatabaseConnection>,
    /// Resolves bearer tokens to identities
    pub identity: Arc<dyn IdentityProvider>,
}

impl AppState {
    /// Creates a new `AppState` from a database connection and an identity provider.
    #[must_use]
    pub fn new(database: DatabaseConnection, identity: Arc<dyn IdentityProvider>) -> Self {
        Self {
            database: Arc::new(database),
            identity,
        }
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(parsed))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Builds the complete application router.
pub fn router(state: AppState, cors_origins: &[String]) -> Router {
    Router::new()
        .merge(products::routes())
        .merge(reviews::routes())
        .merge(categories::routes())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(cors_origins)),
        )
        .with_state(state)
}

/// Serves `router` on `addr` until Ctrl-C is received.
pub async fn serve(router: Router, addr: &str) -> Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    info!("Shutdown signal received");
}
