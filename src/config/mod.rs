use crate::core::{AppError, Result};
use serde::Deserialize;
use std::env;
use std::str::FromStr;

pub mod database;
pub mod server;

pub use database::DatabaseConfig;
pub use server::ServerConfig;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub env: String,
    /// Emit JSON log lines instead of the human-readable format
    pub json_logs: bool,
    /// Apply pending migrations before binding
    pub run_migrations: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    /// Argon2 PHC string of the admin bearer token
    pub admin_token_hash: String,
    pub rate_limit_per_minute: u32,
    /// Empty means any origin
    pub cors_allowed_origins: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let config = Config {
            app: AppConfig {
                env: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
                json_logs: env::var("LOG_FORMAT")
                    .map(|v| v.eq_ignore_ascii_case("json"))
                    .unwrap_or(false),
                run_migrations: parse_var("RUN_MIGRATIONS", false)?,
            },
            database: DatabaseConfig::from_env()?,
            server: ServerConfig::from_env()?,
            security: SecurityConfig {
                admin_token_hash: env::var("ADMIN_TOKEN_HASH")
                    .map_err(|_| AppError::Configuration("ADMIN_TOKEN_HASH not set".to_string()))?,
                rate_limit_per_minute: parse_var("RATE_LIMIT_PER_MINUTE", 600)?,
                cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                    .map(|v| split_list(&v))
                    .unwrap_or_default(),
            },
        };

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.security.rate_limit_per_minute == 0 {
            return Err(AppError::Configuration(
                "Rate limit must be greater than 0".to_string(),
            ));
        }

        if self.security.admin_token_hash.trim().is_empty() {
            return Err(AppError::Configuration(
                "ADMIN_TOKEN_HASH must not be empty".to_string(),
            ));
        }

        if self.database.max_connections == 0
            || self.database.pool_size > self.database.max_connections
        {
            return Err(AppError::Configuration(
                "DATABASE_POOL_SIZE must not exceed a non-zero DATABASE_MAX_CONNECTIONS".to_string(),
            ));
        }

        if self.server.workers == 0 {
            return Err(AppError::Configuration(
                "SERVER_WORKERS must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Parse an optional variable, falling back to `default` when unset
pub(crate) fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Configuration(format!("Invalid {}", name))),
        Err(_) => Ok(default),
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
