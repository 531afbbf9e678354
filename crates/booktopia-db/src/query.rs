//! # Query Engine
//!
//! Translates title lookups and sales reports into parameterized SQL.
//!
//! ## Shape of a Request
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Query Engine                                       │
//! │                                                                         │
//! │  TitleQuery                         SalesReport                         │
//! │  ├── filter: TitleFilter            ├── grouping: Title|Genre|Author    │
//! │  │   ├── All                        ├── window:   DateWindow (incl.)    │
//! │  │   ├── Equals(field, value)       ├── limit:    N                     │
//! │  │   ├── PubDateBetween(bounds)     └── policy:   RankingPolicy         │
//! │  │   └── PriceBetween(bounds)                                           │
//! │  └── sort: SortKey                                                      │
//! │        │                                    │                           │
//! │        ▼                                    ▼                           │
//! │  SELECT .. FROM titles            SELECT .., SUM(d.count)               │
//! │  WHERE ..  ORDER BY ..            FROM titles t                         │
//! │                                   JOIN order_details d                  │
//! │                                   JOIN orders o                         │
//! │                                   WHERE o.order_date in window          │
//! │                                   GROUP BY ..                           │
//! │        │                                    │                           │
//! │        └────────────► QueryBuilder<Sqlite> ◄┘                           │
//! │                      (all values bound, never spliced)                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The engine holds no state and touches no connection. Repositories build a
//! query here and execute it against the pool.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use sqlx::{QueryBuilder, Sqlite};
use thiserror::Error;

use booktopia_core::Money;

/// Column list producing a [`booktopia_core::Title`] row from `titles`.
pub const TITLE_COLUMNS: &str =
    "title_id, title, isbn, author, publisher, genre, pub_date, price_cents, row_version";

/// Same columns read through the `t` alias used by the sales joins.
const TITLE_COLUMNS_ALIASED: &str = "t.title_id AS title_id, t.title AS title, t.isbn AS isbn, \
     t.author AS author, t.publisher AS publisher, t.genre AS genre, \
     t.pub_date AS pub_date, t.price_cents AS price_cents, t.row_version AS row_version";

// =============================================================================
// Filters
// =============================================================================

/// String columns that support exact-match lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleField {
    Title,
    Isbn,
    Author,
    Publisher,
    Genre,
}

impl TitleField {
    pub fn column(self) -> &'static str {
        match self {
            TitleField::Title => "title",
            TitleField::Isbn => "isbn",
            TitleField::Author => "author",
            TitleField::Publisher => "publisher",
            TitleField::Genre => "genre",
        }
    }

    /// Ordering used by the lookup routes for this field.
    ///
    /// ```text
    /// title, author             → newest publication first
    /// isbn, publisher, genre    → alphabetical by title
    /// ```
    pub fn default_sort(self) -> SortKey {
        match self {
            TitleField::Title | TitleField::Author => SortKey::PubDateDesc,
            TitleField::Isbn | TitleField::Publisher | TitleField::Genre => SortKey::TitleAsc,
        }
    }
}

/// Whether the ends of a range filter match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bounds {
    Inclusive,
    Exclusive,
}

impl Bounds {
    fn lower_op(self) -> &'static str {
        match self {
            Bounds::Inclusive => " >= ",
            Bounds::Exclusive => " > ",
        }
    }

    fn upper_op(self) -> &'static str {
        match self {
            Bounds::Inclusive => " <= ",
            Bounds::Exclusive => " < ",
        }
    }
}

/// Row predicate of a [`TitleQuery`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TitleFilter {
    All,
    Equals { field: TitleField, value: String },
    PubDateBetween { start: NaiveDate, end: NaiveDate, bounds: Bounds },
    PriceBetween { min: Money, max: Money, bounds: Bounds },
}

/// Result ordering of a [`TitleQuery`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    TitleIdAsc,
    TitleAsc,
    PubDateDesc,
    PriceDesc,
}

impl SortKey {
    fn order_by(self) -> &'static str {
        // Ties fall back to title_id
        match self {
            SortKey::TitleIdAsc => " ORDER BY title_id ASC",
            SortKey::TitleAsc => " ORDER BY title ASC, title_id ASC",
            SortKey::PubDateDesc => " ORDER BY pub_date DESC, title_id ASC",
            SortKey::PriceDesc => " ORDER BY price_cents DESC, title_id ASC",
        }
    }
}

// =============================================================================
// Title Query
// =============================================================================

/// A filtered, sorted read of the `titles` table.
///
/// ## Example
/// ```rust,ignore
/// let mut qb = TitleQuery::by_field(TitleField::Genre, "Mystery").build();
/// let titles: Vec<Title> = qb.build_query_as().fetch_all(&pool).await?;
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleQuery {
    pub filter: TitleFilter,
    pub sort: SortKey,
}

impl TitleQuery {
    /// Every title, by ascending id.
    pub fn all() -> Self {
        TitleQuery {
            filter: TitleFilter::All,
            sort: SortKey::TitleIdAsc,
        }
    }

    /// Exact match on one string column, in that column's route ordering.
    pub fn by_field(field: TitleField, value: impl Into<String>) -> Self {
        TitleQuery {
            filter: TitleFilter::Equals {
                field,
                value: value.into(),
            },
            sort: field.default_sort(),
        }
    }

    /// Titles published strictly between `start` and `end`, newest first.
    pub fn pub_date_between(start: NaiveDate, end: NaiveDate) -> Self {
        TitleQuery {
            filter: TitleFilter::PubDateBetween {
                start,
                end,
                bounds: Bounds::Exclusive,
            },
            sort: SortKey::PubDateDesc,
        }
    }

    /// Titles priced within `[min, max]`, most expensive first.
    ///
    /// Unpriced titles never match.
    pub fn price_between(min: Money, max: Money) -> Self {
        TitleQuery {
            filter: TitleFilter::PriceBetween {
                min,
                max,
                bounds: Bounds::Inclusive,
            },
            sort: SortKey::PriceDesc,
        }
    }

    pub fn with_sort(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_bounds(mut self, new_bounds: Bounds) -> Self {
        match &mut self.filter {
            TitleFilter::PubDateBetween { bounds, .. }
            | TitleFilter::PriceBetween { bounds, .. } => *bounds = new_bounds,
            TitleFilter::All | TitleFilter::Equals { .. } => {}
        }
        self
    }

    /// Renders the query with every value bound as a parameter.
    pub fn build(&self) -> QueryBuilder<'static, Sqlite> {
        let mut qb = QueryBuilder::new("SELECT ");
        qb.push(TITLE_COLUMNS).push(" FROM titles");

        match &self.filter {
            TitleFilter::All => {}
            TitleFilter::Equals { field, value } => {
                qb.push(" WHERE ")
                    .push(field.column())
                    .push(" = ")
                    .push_bind(value.clone());
            }
            TitleFilter::PubDateBetween { start, end, bounds } => {
                qb.push(" WHERE pub_date")
                    .push(bounds.lower_op())
                    .push_bind(*start)
                    .push(" AND pub_date")
                    .push(bounds.upper_op())
                    .push_bind(*end);
            }
            TitleFilter::PriceBetween { min, max, bounds } => {
                qb.push(" WHERE price_cents")
                    .push(bounds.lower_op())
                    .push_bind(min.cents())
                    .push(" AND price_cents")
                    .push(bounds.upper_op())
                    .push_bind(max.cents());
            }
        }

        qb.push(self.sort.order_by());
        qb
    }
}

// =============================================================================
// Sales Reports
// =============================================================================

/// What a sales report groups line items by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SalesGrouping {
    Title,
    Genre,
    Author,
}

impl SalesGrouping {
    fn select_columns(self) -> &'static str {
        match self {
            SalesGrouping::Title => TITLE_COLUMNS_ALIASED,
            SalesGrouping::Genre => "t.genre AS genre",
            SalesGrouping::Author => "t.author AS author",
        }
    }

    fn group_by(self) -> &'static str {
        match self {
            SalesGrouping::Title => "t.title_id",
            SalesGrouping::Genre => "t.genre",
            SalesGrouping::Author => "t.author",
        }
    }

    /// Output column used to order groups with equal sums.
    fn tie_break(self) -> &'static str {
        match self {
            SalesGrouping::Title => "title_id",
            SalesGrouping::Genre => "genre",
            SalesGrouping::Author => "author",
        }
    }
}

/// Inclusive range of order dates counted by a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        DateWindow { start, end }
    }
}

/// How "top N" interacts with "sort by total".
///
/// ```text
/// SortThenLimit   rank every group, keep the best N
/// LimitThenSort   keep the first N groups in key order, rank those
/// ```
///
/// `LimitThenSort` picks groups by key, not by sales, so it can miss the
/// real best sellers. `SortThenLimit` is the default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RankingPolicy {
    #[default]
    SortThenLimit,
    LimitThenSort,
}

impl RankingPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            RankingPolicy::SortThenLimit => "sort_then_limit",
            RankingPolicy::LimitThenSort => "limit_then_sort",
        }
    }
}

impl fmt::Display for RankingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown ranking policy '{0}' (expected sort_then_limit or limit_then_sort)")]
pub struct ParseRankingPolicyError(pub String);

impl FromStr for RankingPolicy {
    type Err = ParseRankingPolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "sort_then_limit" => Ok(RankingPolicy::SortThenLimit),
            "limit_then_sort" => Ok(RankingPolicy::LimitThenSort),
            _ => Err(ParseRankingPolicyError(s.to_string())),
        }
    }
}

/// A "top N by units sold" report over orders in a date window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SalesReport {
    pub grouping: SalesGrouping,
    pub window: DateWindow,
    pub limit: u32,
    pub policy: RankingPolicy,
}

impl SalesReport {
    pub fn new(grouping: SalesGrouping, window: DateWindow, limit: u32) -> Self {
        SalesReport {
            grouping,
            window,
            limit,
            policy: RankingPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: RankingPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Renders the report. Each row carries the group columns plus
    /// `total_sold`.
    pub fn build(&self) -> QueryBuilder<'static, Sqlite> {
        let mut qb = QueryBuilder::new("");

        if self.policy == RankingPolicy::LimitThenSort {
            qb.push("SELECT * FROM (");
        }

        qb.push("SELECT ")
            .push(self.grouping.select_columns())
            .push(", SUM(d.count) AS total_sold")
            .push(" FROM titles t")
            .push(" INNER JOIN order_details d ON d.title_id = t.title_id")
            .push(" INNER JOIN orders o ON o.order_id = d.order_id")
            .push(" WHERE o.order_date >= ")
            .push_bind(self.window.start)
            .push(" AND o.order_date <= ")
            .push_bind(self.window.end)
            .push(" GROUP BY ")
            .push(self.grouping.group_by());

        match self.policy {
            RankingPolicy::SortThenLimit => {
                qb.push(" ORDER BY total_sold DESC, ")
                    .push(self.grouping.tie_break())
                    .push(" ASC LIMIT ")
                    .push_bind(i64::from(self.limit));
            }
            RankingPolicy::LimitThenSort => {
                qb.push(" ORDER BY ")
                    .push(self.grouping.group_by())
                    .push(" ASC LIMIT ")
                    .push_bind(i64::from(self.limit))
                    .push(") ORDER BY total_sold DESC, ")
                    .push(self.grouping.tie_break())
                    .push(" ASC");
            }
        }

        qb
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
