//! # Domain Errors
//!
//! Failures detected before storage is touched: malformed route segments,
//! bad bodies, mismatched ids.
//!
//! ```text
//!   "abc" in /titles/{id}  ──► ValidationError::InvalidFormat ─┐
//!   PUT /titles/7 {titleId: 8} ──► CoreError::IdMismatch ──────┼──► 400
//!   price 20 > 10          ──► ValidationError::ReversedRange ─┘
//! ```
//!
//! Storage failures live in `booktopia-db` as `DbError`.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Domain errors raised by the Title resource before or after storage access.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No title exists for the requested primary key.
    #[error("Title not found: {0}")]
    TitleNotFound(i64),

    /// The id in the route does not match the id in the request body.
    ///
    /// ## When This Occurs
    /// ```text
    /// PUT /titles/7   { "titleId": 8, ... }
    ///      │
    ///      ▼
    /// IdMismatch { route: 7, body: Some(8) }   ← rejected before any query
    /// ```
    #[error("Route id {route} does not match body id {body:?}")]
    IdMismatch { route: i64, body: Option<i64> },

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// A route segment or body field that cannot be used as given.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: String },

    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Non-numeric id, unparsable `yyyyMMdd` date, bad decimal.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Lower bound of a range is greater than its upper bound.
    #[error("{field} range is reversed: {low} > {high}")]
    ReversedRange {
        field: String,
        low: String,
        high: String,
    },
}

// =============================================================================
// Unit Tests
// =============================================================================
