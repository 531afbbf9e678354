//! # Booktopia API
//!
//! HTTP server exposing the Title resource of the bookstore database.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Booktopia API                                   │
//! │                                                                         │
//! │  HTTP client                                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Transport (axum Router + TraceLayer)          routes/mod.rs     │  │
//! │  │  decode path segments and JSON bodies                            │  │
//! │  └──────────────────────────────┬───────────────────────────────────┘  │
//! │                                 ▼                                       │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Title handlers                                routes/titles.rs  │  │
//! │  │  validate → one repository call → status + JSON                  │  │
//! │  └──────────────────────────────┬───────────────────────────────────┘  │
//! │                                 ▼                                       │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  booktopia-db: TitleRepository → Query Engine → SQLite           │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! Environment variables, see [`config`]:
//! - `BOOKTOPIA_BIND_ADDR` / `BOOKTOPIA_PORT` - listen address (default: 0.0.0.0:8080)
//! - `BOOKTOPIA_DB_PATH` - SQLite file (default: ./booktopia.db)
//! - `BOOKTOPIA_DB_MAX_CONNECTIONS` - pool size (default: 5)
//! - `BOOKTOPIA_RUN_MIGRATIONS` - migrate on startup (default: true)
//! - `BOOKTOPIA_RANKING_POLICY` - `sort_then_limit` or `limit_then_sort`

pub mod config;
pub mod error;
pub mod routes;

// Re-exports
pub use config::ApiConfig;
pub use error::{ApiError, ErrorCode};
pub use routes::router;

use booktopia_db::{Database, RankingPolicy};

/// Shared application state.
///
/// Holds no request data; every handler gets its own pooled connection
/// through the repositories.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
    pub ranking_policy: RankingPolicy,
}

impl AppState {
    pub fn new(db: Database, ranking_policy: RankingPolicy) -> Self {
        AppState { db, ranking_policy }
    }
}
