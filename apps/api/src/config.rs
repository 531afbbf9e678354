//! API server configuration.
//!
//! Configuration is loaded from environment variables with fallback to defaults.
//!
//! | Variable                       | Default           |
//! |--------------------------------|-------------------|
//! | `BOOKTOPIA_BIND_ADDR`          | `0.0.0.0`         |
//! | `BOOKTOPIA_PORT`               | `8080`            |
//! | `BOOKTOPIA_DB_PATH`            | `./booktopia.db`  |
//! | `BOOKTOPIA_DB_MAX_CONNECTIONS` | `5`               |
//! | `BOOKTOPIA_RUN_MIGRATIONS`     | `true`            |
//! | `BOOKTOPIA_RANKING_POLICY`     | `sort_then_limit` |

use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use booktopia_db::{DbConfig, RankingPolicy};

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Interface to listen on
    pub bind_addr: IpAddr,

    /// HTTP port
    pub port: u16,

    /// SQLite database file
    pub db_path: PathBuf,

    /// Pool size
    pub db_max_connections: u32,

    /// Apply pending migrations on startup
    pub run_migrations: bool,

    /// How the top-N sales routes combine ranking and limiting
    pub ranking_policy: RankingPolicy,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key/value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        let invalid = |key: &str| ConfigError::InvalidValue(key.to_string());

        let config = ApiConfig {
            bind_addr: var("BOOKTOPIA_BIND_ADDR", "0.0.0.0")
                .parse()
                .map_err(|_| invalid("BOOKTOPIA_BIND_ADDR"))?,

            port: var("BOOKTOPIA_PORT", "8080")
                .parse()
                .map_err(|_| invalid("BOOKTOPIA_PORT"))?,

            db_path: PathBuf::from(var("BOOKTOPIA_DB_PATH", "./booktopia.db")),

            db_max_connections: var("BOOKTOPIA_DB_MAX_CONNECTIONS", "5")
                .parse()
                .map_err(|_| invalid("BOOKTOPIA_DB_MAX_CONNECTIONS"))?,

            run_migrations: var("BOOKTOPIA_RUN_MIGRATIONS", "true")
                .parse()
                .map_err(|_| invalid("BOOKTOPIA_RUN_MIGRATIONS"))?,

            ranking_policy: var("BOOKTOPIA_RANKING_POLICY", "sort_then_limit")
                .parse()
                .map_err(|_| invalid("BOOKTOPIA_RANKING_POLICY"))?,
        };

        if config.db_max_connections == 0 {
            return Err(invalid("BOOKTOPIA_DB_MAX_CONNECTIONS"));
        }

        Ok(config)
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }

    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(self.db_path.clone())
            .max_connections(self.db_max_connections)
            .run_migrations(self.run_migrations)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}
