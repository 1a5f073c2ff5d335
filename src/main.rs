use catalog_reviews::{
    api::{self, AppState},
    config::{self, database},
    errors::Result,
};
use dotenvy::dotenv;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load the main application configuration
    let app_config = config::load_app_configuration()?;
    let identities = config::users::identity_provider_from_config(&app_config.users);
    if identities.is_empty() {
        info!("No users configured; write endpoints will reject every request.");
    }

    // 4. Connect to the database and make sure the tables exist
    let database_url = database::get_database_url();
    let db = database::create_connection(&database_url)
        .await
        .inspect(|_| info!("Database connection established."))
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    // 5. Serve the API
    let state = AppState::new(db, Arc::new(identities));
    let router = api::router(state, &app_config.server.cors_origins);
    api::serve(router, &app_config.server.socket_addr()).await
}
