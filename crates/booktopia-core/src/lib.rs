//! # booktopia-core: Pure Domain Model for Booktopia
//!
//! This crate holds the bookstore domain as plain data and pure functions
//! with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Booktopia Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    HTTP clients                                 │   │
//! │  │    GET /titles ── POST /titles ── GET /titles/top/...          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ JSON                                   │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    booktopia-api (axum)                         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ booktopia-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐                  │   │
//! │  │   │   types   │  │   money   │  │ validation│                  │   │
//! │  │   │   Title   │  │   Money   │  │  lengths  │                  │   │
//! │  │   │   Order   │  │  decimal  │  │  ranges   │                  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘                  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    booktopia-db (SQLite)                        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Entities (Title, Order, OrderDetail, Customer) and report rows
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Field and route-parameter validation
//!
//! ## Example Usage
//!
//! ```rust
//! use booktopia_core::validation::{parse_compact_date, validate_date_range};
//!
//! let start = parse_compact_date("start", "20180101").unwrap();
//! let end = parse_compact_date("end", "20181231").unwrap();
//! assert!(validate_date_range(start, end).is_ok());
//! assert!(validate_date_range(end, start).is_err());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Genre assigned by the store when a title is created without one.
pub const DEFAULT_GENRE: &str = "Misc";

/// Status assigned by the store when an order is created without one.
pub const DEFAULT_ORDER_STATUS: &str = "InProgress";

/// Largest price representable as decimal(10, 2), in cents.
pub const MAX_PRICE_CENTS: i64 = 99_999_999_99;
