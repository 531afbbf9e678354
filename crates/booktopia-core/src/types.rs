//! # Domain Types
//!
//! Core domain types used throughout Booktopia.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Customer     │   │      Order      │   │     Title       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  customer_id    │◄──│  customer_id FK │   │  title_id       │       │
//! │  │  user_name      │   │  order_date     │   │  isbn, author   │       │
//! │  │  email, ...     │   │  status         │   │  genre, price   │       │
//! │  └─────────────────┘   └────────▲────────┘   └────────▲────────┘       │
//! │                                 │                     │                 │
//! │                        ┌────────┴─────────────────────┴────────┐       │
//! │                        │             OrderDetail               │       │
//! │                        │   to_id, order_id FK, title_id FK,    │       │
//! │                        │   count                               │       │
//! │                        └───────────────────────────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Plain Foreign Keys
//! Entities only hold the ids of the rows they reference. Nothing keeps a
//! collection of dependents in memory; order history is joined at query time
//! by the database layer.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Title
// =============================================================================

/// A book record, the primary resource of the API.
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Title {
    /// Store-assigned primary key.
    pub title_id: i64,

    pub title: String,

    pub isbn: String,

    pub author: String,

    pub publisher: String,

    /// Defaults to "Misc" when created without one.
    pub genre: Option<String>,

    #[ts(as = "String")]
    pub pub_date: NaiveDate,

    /// decimal(10, 2), stored in cents.
    #[cfg_attr(feature = "sqlx", sqlx(rename = "price_cents"))]
    #[ts(type = "number | null")]
    pub price: Option<Money>,

    /// Incremented by every successful update.
    pub row_version: i64,
}

/// Title payload accepted by create and update.
///
/// ## Usage
/// ```text
/// POST /titles      titleId is ignored, the store assigns one
/// PUT  /titles/7    titleId must be 7
///                   rowVersion (optional) makes the update conditional
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TitleInput {
    #[serde(default)]
    pub title_id: Option<i64>,

    pub title: String,

    pub isbn: String,

    pub author: String,

    pub publisher: String,

    #[serde(default)]
    pub genre: Option<String>,

    /// Accepts `YYYY-MM-DD` or a full `YYYY-MM-DDTHH:MM:SS` timestamp.
    #[serde(deserialize_with = "date_format::deserialize")]
    #[ts(as = "String")]
    pub pub_date: NaiveDate,

    #[serde(default)]
    #[ts(type = "number | null")]
    pub price: Option<Money>,

    #[serde(default)]
    pub row_version: Option<i64>,
}

impl TitleInput {
    /// Builds the stored representation for a known primary key.
    pub fn into_title(self, title_id: i64, row_version: i64) -> Title {
        Title {
            title_id,
            title: self.title,
            isbn: self.isbn,
            author: self.author,
            publisher: self.publisher,
            genre: self.genre,
            pub_date: self.pub_date,
            price: self.price,
            row_version,
        }
    }
}

// =============================================================================
// Customer
// =============================================================================

/// A registered store customer.
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub customer_id: i64,
    pub user_name: String,
    /// Never echoed back to clients.
    #[serde(skip_serializing)]
    pub password: String,
    pub email: String,
    pub province: String,
    pub city: String,
    pub address: String,
    pub zip_code: String,
    pub phone: String,
}

/// Fields required to register a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewCustomer {
    pub user_name: String,
    pub password: String,
    pub email: String,
    pub province: String,
    pub city: String,
    pub address: String,
    pub zip_code: String,
    pub phone: String,
}

// =============================================================================
// Order
// =============================================================================

/// A customer purchase transaction.
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_id: i64,
    pub customer_id: i64,
    /// Defaults to the current date when the order is created without one.
    #[ts(as = "Option<String>")]
    pub order_date: Option<NaiveDate>,
    /// Defaults to "InProgress".
    pub status: Option<String>,
}

/// Fields for placing an order. Absent values take the store defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub customer_id: i64,
    #[ts(as = "Option<String>")]
    pub order_date: Option<NaiveDate>,
    pub status: Option<String>,
}

// =============================================================================
// Order Detail
// =============================================================================

/// A line item: one title within one order, with a quantity.
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail {
    pub to_id: i64,
    pub order_id: i64,
    pub title_id: i64,
    pub count: i64,
}

/// Fields for adding a line item to an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewOrderDetail {
    pub order_id: i64,
    pub title_id: i64,
    pub count: i64,
}

// =============================================================================
// Sales Rankings
// =============================================================================

/// One row of the "top titles" report.
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TitleSales {
    #[cfg_attr(feature = "sqlx", sqlx(flatten))]
    pub title: Title,
    /// Sum of line-item counts for this title inside the window.
    pub total_sold: i64,
}

/// One row of the "top genres" report.
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct GenreSales {
    pub genre: Option<String>,
    pub total_sold: i64,
}

/// One row of the "top authors" report.
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AuthorSales {
    pub author: String,
    pub total_sold: i64,
}

// =============================================================================
// Date Format
// =============================================================================

/// Lenient date deserializer for request bodies.
///
/// Clients written against datetime-typed APIs send `2018-05-01T00:00:00`;
/// only the calendar date is kept.
pub mod date_format {
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer};

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        let date_part = match raw.split_once('T') {
            Some((date, _time)) => date,
            None => raw.as_str(),
        };
        NaiveDate::parse_from_str(date_part, "%Y-%m-%d").map_err(de::Error::custom)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
