//! # booktopia-db: Database Layer for Booktopia
//!
//! This crate provides database access for the Booktopia API.
//! It uses SQLite with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Booktopia Data Flow                              │
//! │                                                                         │
//! │  HTTP handler (GET /titles/top/20180101/20181231/5)                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   booktopia-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐   ┌───────────────┐   ┌──────────────┐     │   │
//! │  │   │   Database    │   │ Repositories  │   │ Query Engine │     │   │
//! │  │   │   (pool.rs)   │   │ (repository/) │   │  (query.rs)  │     │   │
//! │  │   │               │   │               │   │              │     │   │
//! │  │   │ SqlitePool    │◄──│ TitleRepo     │──►│ TitleQuery   │     │   │
//! │  │   │ Migrations    │   │ OrderRepo     │   │ SalesReport  │     │   │
//! │  │   │               │   │ CustomerRepo  │   │              │     │   │
//! │  │   └───────────────┘   └───────────────┘   └──────────────┘     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   customers ◄── orders ◄── order_details ──► titles             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`query`] - Filter, sort and ranking queries over titles
//! - [`repository`] - Repository implementations (title, order, customer)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use booktopia_db::{Database, DbConfig, TitleField};
//!
//! let db = Database::new(DbConfig::new("booktopia.db")).await?;
//!
//! let mysteries = db.titles().find_by_field(TitleField::Genre, "Mystery").await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod query;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig, DbLocation};
pub use query::{
    Bounds, DateWindow, ParseRankingPolicyError, RankingPolicy, SalesGrouping, SalesReport,
    SortKey, TitleField, TitleFilter, TitleQuery,
};

// Repository re-exports for convenience
pub use repository::customer::CustomerRepository;
pub use repository::order::OrderRepository;
pub use repository::title::TitleRepository;
