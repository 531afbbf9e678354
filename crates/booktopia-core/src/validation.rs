//! # Validation Module
//!
//! Input validation for every route-bound operation.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP extractors (axum)                                       │
//! │  └── JSON shape (serde: required fields, types)                        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Handler boundary (Rust)                                      │
//! │  └── THIS MODULE: ids, dates, bounds, lengths, price precision         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  └── Foreign key constraints                                           │
//! │                                                                         │
//! │  Nothing reaches Layer 3 until Layer 2 has accepted it.                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use booktopia_core::validation::{parse_id, parse_price_bounds};
//!
//! assert_eq!(parse_id("42").unwrap(), 42);
//! assert!(parse_id("forty-two").is_err());
//!
//! assert!(parse_price_bounds("10", "20").is_ok());
//! assert!(parse_price_bounds("20", "10").is_err());
//! ```

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{NewCustomer, NewOrder, NewOrderDetail, TitleInput};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Column Limits
// =============================================================================

pub const TITLE_MAX_LEN: usize = 100;
pub const ISBN_MAX_LEN: usize = 13;
pub const AUTHOR_MAX_LEN: usize = 100;
pub const PUBLISHER_MAX_LEN: usize = 100;
pub const GENRE_MAX_LEN: usize = 50;
pub const ORDER_STATUS_MAX_LEN: usize = 20;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a required text column.
///
/// ## Rules
/// - Must not be empty or whitespace
/// - Must be at most `max` characters (characters, not bytes)
pub fn validate_required_text(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    validate_optional_text(field, value, max)
}

/// Validates the length of an optional text column.
pub fn validate_optional_text(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Validates a full Title payload before create or update.
///
/// ## Rules
/// - title, isbn, author, publisher required, within column limits
/// - genre optional, at most 50 characters
/// - price optional, non-negative, fits decimal(10, 2)
pub fn validate_title_input(input: &TitleInput) -> ValidationResult<()> {
    validate_required_text("title", &input.title, TITLE_MAX_LEN)?;
    validate_required_text("isbn", &input.isbn, ISBN_MAX_LEN)?;
    validate_required_text("author", &input.author, AUTHOR_MAX_LEN)?;
    validate_required_text("publisher", &input.publisher, PUBLISHER_MAX_LEN)?;

    if let Some(genre) = &input.genre {
        validate_optional_text("genre", genre, GENRE_MAX_LEN)?;
    }

    if let Some(price) = input.price {
        validate_price(price)?;
    }

    Ok(())
}

/// Validates a customer registration against the schema limits.
pub fn validate_new_customer(customer: &NewCustomer) -> ValidationResult<()> {
    validate_required_text("userName", &customer.user_name, 20)?;
    validate_required_text("password", &customer.password, 20)?;
    validate_required_text("email", &customer.email, 50)?;
    validate_required_text("province", &customer.province, 30)?;
    validate_required_text("city", &customer.city, 30)?;
    validate_required_text("address", &customer.address, 100)?;
    validate_required_text("zipCode", &customer.zip_code, 7)?;
    validate_required_text("phone", &customer.phone, 15)?;
    Ok(())
}

/// Validates an order header. A missing status takes the store default.
pub fn validate_new_order(order: &NewOrder) -> ValidationResult<()> {
    if let Some(status) = &order.status {
        validate_optional_text("status", status, ORDER_STATUS_MAX_LEN)?;
    }
    Ok(())
}

/// Validates a line item before it can feed the sales rankings.
pub fn validate_new_order_detail(detail: &NewOrderDetail) -> ValidationResult<()> {
    validate_count(detail.count)
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a title price.
///
/// ## Example
/// ```rust
/// use booktopia_core::money::Money;
/// use booktopia_core::validation::validate_price;
///
/// assert!(validate_price(Money::from_cents(1099)).is_ok());
/// assert!(validate_price(Money::from_cents(0)).is_ok());
/// assert!(validate_price(Money::from_cents(-100)).is_err());
/// ```
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::Negative {
            field: "price".to_string(),
        });
    }

    if !price.fits_decimal_10_2() {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: crate::MAX_PRICE_CENTS / 100,
        });
    }

    Ok(())
}

/// Validates a line-item quantity.
pub fn validate_count(count: i64) -> ValidationResult<()> {
    if count < 0 {
        return Err(ValidationError::Negative {
            field: "count".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Route Parameter Parsers
// =============================================================================

/// Parses an integer primary key from a route segment.
pub fn parse_id(raw: &str) -> ValidationResult<i64> {
    parse_integer("id", raw)
}

/// Parses the `count` segment of the ranking routes.
///
/// ## Rules
/// - Must be an integer
/// - Must not be negative (zero yields an empty report)
pub fn parse_limit(raw: &str) -> ValidationResult<u32> {
    let value = parse_integer("count", raw)?;

    if value < 0 {
        return Err(ValidationError::Negative {
            field: "count".to_string(),
        });
    }

    u32::try_from(value).map_err(|_| ValidationError::OutOfRange {
        field: "count".to_string(),
        min: 0,
        max: i64::from(u32::MAX),
    })
}

/// Parses a compact `YYYYMMDD` date from a route segment.
///
/// ## Example
/// ```rust
/// use booktopia_core::validation::parse_compact_date;
///
/// let date = parse_compact_date("start", "20180315").unwrap();
/// assert_eq!(date.to_string(), "2018-03-15");
///
/// assert!(parse_compact_date("start", "2018-03-15").is_err());
/// assert!(parse_compact_date("start", "20180230").is_err());
/// ```
pub fn parse_compact_date(field: &str, raw: &str) -> ValidationResult<NaiveDate> {
    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: reason.to_string(),
    };

    if raw.len() != 8 || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid("expected YYYYMMDD"));
    }

    // All ASCII digits, so the slices are on char boundaries.
    let year: i32 = raw[0..4].parse().map_err(|_| invalid("expected YYYYMMDD"))?;
    let month: u32 = raw[4..6].parse().map_err(|_| invalid("expected YYYYMMDD"))?;
    let day: u32 = raw[6..8].parse().map_err(|_| invalid("expected YYYYMMDD"))?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| invalid("not a calendar date"))
}

/// Checks that a date window is not reversed. Equal bounds are allowed.
pub fn validate_date_range(start: NaiveDate, end: NaiveDate) -> ValidationResult<()> {
    if start > end {
        return Err(ValidationError::ReversedRange {
            field: "date".to_string(),
            low: start.format("%Y%m%d").to_string(),
            high: end.format("%Y%m%d").to_string(),
        });
    }

    Ok(())
}

/// Parses both `YYYYMMDD` bounds of a date route and rejects reversed windows.
pub fn parse_date_window(start: &str, end: &str) -> ValidationResult<(NaiveDate, NaiveDate)> {
    let start = parse_compact_date("start", start)?;
    let end = parse_compact_date("end", end)?;
    validate_date_range(start, end)?;
    Ok((start, end))
}

/// Parses the integer bounds of the price route into `Money`.
pub fn parse_price_bounds(min: &str, max: &str) -> ValidationResult<(Money, Money)> {
    let min = parse_integer("min", min)?;
    let max = parse_integer("max", max)?;

    if min > max {
        return Err(ValidationError::ReversedRange {
            field: "price".to_string(),
            low: min.to_string(),
            high: max.to_string(),
        });
    }

    Ok((Money::from_units(min), Money::from_units(max)))
}

fn parse_integer(field: &str, raw: &str) -> ValidationResult<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must be an integer".to_string(),
        })
}

// =============================================================================
// Unit Tests
// =============================================================================
