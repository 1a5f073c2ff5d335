//! Database configuration module.
//!
//! This module handles the database connection and table creation using `SeaORM`.
//! Tables are generated with `Schema::create_table_from_entity`, so the schema always
//! matches the entity definitions without hand-written SQL. Creation is idempotent so the
//! binary can call it on every start.

use crate::entities::{Category, Product, Rating, Review};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema};
use tracing::{debug, info};

const DEFAULT_DATABASE_URL: &str = "sqlite://data/catalog.sqlite?mode=rwc";

/// Gets the database URL from the `DATABASE_URL` environment variable or returns the default
/// local `SQLite` path.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the database named by `database_url`.
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    debug!("Connecting to database at {}", database_url);
    Database::connect(database_url).await.map_err(Into::into)
}

/// Creates all tables that do not exist yet.
///
/// Order matters: every table is created after the tables its foreign keys point at.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    create_table(db, Category).await?;
    create_table(db, Product).await?;
    create_table(db, Rating).await?;
    create_table(db, Review).await?;
    info!("Database tables are in place");
    Ok(())
}

async fn create_table<E>(db: &DatabaseConnection, entity: E) -> Result<()>
where
    E: EntityTrait,
{
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();
    db.execute(builder.build(&statement)).await?;
    Ok(())
}
