//! Server configuration.
//!
//! Loaded from environment variables (a `.env` file is read first when
//! present) with development defaults.

use std::env;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP listen port.
    pub http_port: u16,

    /// Path to the SQLite database file.
    pub database_path: String,

    /// Stock level at or below which an item counts as low stock.
    pub low_stock_threshold: i64,
}

impl ServerConfig {
    /// Loads configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let config = ServerConfig {
            http_port: env::var("TILL_HTTP_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("TILL_HTTP_PORT"))?,

            database_path: env::var("TILL_DATABASE_PATH")
                .unwrap_or_else(|_| "./data/till.db".to_string()),

            low_stock_threshold: env::var("TILL_LOW_STOCK_THRESHOLD")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("TILL_LOW_STOCK_THRESHOLD"))?,
        };

        Ok(config)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_env() {
        // Not set in the test environment.
        let config = ServerConfig::load().unwrap();
        assert_eq!(config.http_port, 8080);
        assert_eq!(config.low_stock_threshold, 5);
    }
}
