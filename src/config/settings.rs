//! Application settings loaded from `config.toml`.
//!
//! The file configures the HTTP listener and the token table used by the static identity
//! provider. Every section is optional; missing values fall back to defaults suitable for
//! local development.

use crate::errors::{Error, Result};
use crate::identity::Capability;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info, warn};

const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    /// HTTP listener settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Known API users and their capabilities
    #[serde(default)]
    pub users: Vec<UserConfig>,
}

/// HTTP listener settings
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind to
    #[serde(default = "default_port")]
    pub port: u16,
    /// Allowed CORS origins; empty means any origin
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

const fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// Get the socket address string
    #[must_use]
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// A user entry: the bearer token they present and what it grants
#[derive(Debug, Clone, Deserialize)]
pub struct UserConfig {
    /// User id stored on ratings, reviews and supplied products
    pub id: i64,
    /// Bearer token presented in the `Authorization` header
    pub token: String,
    /// Capabilities granted to this user
    #[serde(default)]
    pub capabilities: Vec<Capability>,
}

/// Loads configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - A user entry has an empty token
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;

    parse_config(&contents)
}

fn parse_config(contents: &str) -> Result<AppConfig> {
    let config: AppConfig = toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })?;

    if let Some(user) = config.users.iter().find(|u| u.token.trim().is_empty()) {
        return Err(Error::Config {
            message: format!("User {} has an empty token", user.id),
        });
    }

    Ok(config)
}

/// Loads the application configuration from `CONFIG_PATH` (default `./config.toml`).
///
/// A missing file is not fatal: the server starts with defaults and no known users, so every
/// write endpoint will answer 401.
pub fn load_app_configuration() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

    if !Path::new(&path).exists() {
        warn!("Config file {} not found, using defaults", path);
        return Ok(AppConfig::default());
    }

    let config = load_config(&path)?;
    info!(
        "Loaded configuration from {} ({} users)",
        path,
        config.users.len()
    );
    Ok(config)
}
