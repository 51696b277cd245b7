//! Configuration management for the AgriStack Mock API
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (config/development.toml, config/production.toml)
//! 3. Environment variable overrides such as `AGRI_DATABASE__URL`
//! 4. The conventional `DATABASE_URL` variable, which wins over all of the above

use std::{net::SocketAddr, time::Duration};

use config::{builder::DefaultState, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,

    /// Store work running longer than this is abandoned and answered with 503
    pub request_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,

    /// How long a request waits for a pooled connection
    pub acquire_timeout_secs: u64,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("AGRI_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        Self::builder(&environment)?
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            .add_source(Self::environment())
            .set_override_option("database.url", std::env::var("DATABASE_URL").ok())?
            .build()?
            .try_deserialize()
    }

    /// `AGRI_SECTION__KEY` variables, e.g. `AGRI_SERVER__PORT`
    fn environment() -> Environment {
        Environment::with_prefix("AGRI")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    /// Builder seeded with the defaults for `environment`
    fn builder(environment: &str) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        config::Config::builder()
            .set_default("environment", environment)?
            .set_default("server.port", 8000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.request_timeout_secs", 30)?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 0)?
            .set_default("database.acquire_timeout_secs", 10)
    }

    /// Configuration with defaults everywhere except the database URL
    pub fn with_database_url(url: &str) -> Result<Self, ConfigError> {
        Self::builder("development")?
            .set_override("database.url", url)?
            .build()?
            .try_deserialize()
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl DatabaseConfig {
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            host: "0.0.0.0".to_string(),
            request_timeout_secs: 30,
        }
    }
}
