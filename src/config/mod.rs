/// Database connection and table creation
pub mod database;

/// Application settings loaded from config.toml
pub mod settings;

/// Identity provider configuration from the `[[users]]` table
pub mod users;

pub use settings::{AppConfig, ServerConfig, UserConfig, load_app_configuration, load_config};
