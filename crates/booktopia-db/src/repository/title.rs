//! # Title Repository
//!
//! Database operations for titles, the one resource the API exposes.
//!
//! ## Key Operations
//! - CRUD keyed by `title_id`
//! - Exact-match and range lookups (rendered by [`crate::query::TitleQuery`])
//! - Sales rankings joined against order history ([`crate::query::SalesReport`])
//!
//! ## Conditional Update
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    update(id, input)                                    │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │    UPDATE titles SET .., row_version = row_version + 1                  │
//! │    WHERE title_id = id                                                  │
//! │      AND (rowVersion IS NULL OR row_version = rowVersion)               │
//! │       │                                                                 │
//! │       ├── 1 row  ──► read back, COMMIT, Ok(title)                       │
//! │       │                                                                 │
//! │       └── 0 rows ──► row still there?                                   │
//! │                        ├── no  ──► ROLLBACK, NotFound                   │
//! │                        └── yes ──► ROLLBACK, Conflict                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Conflicts are never retried here.

use chrono::NaiveDate;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::query::{
    DateWindow, RankingPolicy, SalesGrouping, SalesReport, TitleField, TitleQuery, TITLE_COLUMNS,
};
use booktopia_core::{
    AuthorSales, GenreSales, Money, Title, TitleInput, TitleSales, DEFAULT_GENRE,
};

/// Repository for title database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = TitleRepository::new(pool);
///
/// let created = repo.insert(&input).await?;
/// let mysteries = repo.find_by_field(TitleField::Genre, "Mystery").await?;
/// ```
#[derive(Debug, Clone)]
pub struct TitleRepository {
    pool: SqlitePool,
}

impl TitleRepository {
    /// Creates a new TitleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        TitleRepository { pool }
    }

    async fn fetch(&self, query: TitleQuery) -> DbResult<Vec<Title>> {
        let mut qb = query.build();
        let titles = qb.build_query_as::<Title>().fetch_all(&self.pool).await?;

        debug!(count = titles.len(), "Title query returned rows");
        Ok(titles)
    }

    /// Lists every title by ascending id.
    pub async fn list(&self) -> DbResult<Vec<Title>> {
        debug!("Listing titles");
        self.fetch(TitleQuery::all()).await
    }

    /// Gets a title by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Title))` - Title found
    /// * `Ok(None)` - Title not found
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Title>> {
        debug!(id = %id, "Getting title by ID");

        let sql = format!("SELECT {TITLE_COLUMNS} FROM titles WHERE title_id = ?");
        let title = sqlx::query_as::<_, Title>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(title)
    }

    /// Checks whether a title row exists.
    pub async fn exists(&self, id: i64) -> DbResult<bool> {
        let found: Option<i64> =
            sqlx::query_scalar("SELECT title_id FROM titles WHERE title_id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(found.is_some())
    }

    /// Exact match on one string column.
    ///
    /// No match is an empty list, never an error.
    pub async fn find_by_field(&self, field: TitleField, value: &str) -> DbResult<Vec<Title>> {
        debug!(field = field.column(), value = %value, "Finding titles by field");
        self.fetch(TitleQuery::by_field(field, value)).await
    }

    /// Titles published strictly after `start` and strictly before `end`.
    pub async fn pub_date_between(&self, start: NaiveDate, end: NaiveDate) -> DbResult<Vec<Title>> {
        debug!(start = %start, end = %end, "Finding titles by publication date");
        self.fetch(TitleQuery::pub_date_between(start, end)).await
    }

    /// Priced titles with `min <= price <= max`.
    pub async fn price_between(&self, min: Money, max: Money) -> DbResult<Vec<Title>> {
        debug!(min = %min, max = %max, "Finding titles by price");
        self.fetch(TitleQuery::price_between(min, max)).await
    }

    // =========================================================================
    // Sales Rankings
    // =========================================================================

    /// Best-selling titles for orders placed inside `window`.
    pub async fn top_titles(
        &self,
        window: DateWindow,
        limit: u32,
        policy: RankingPolicy,
    ) -> DbResult<Vec<TitleSales>> {
        debug!(start = %window.start, end = %window.end, limit, %policy, "Ranking titles");

        let mut qb = SalesReport::new(SalesGrouping::Title, window, limit)
            .with_policy(policy)
            .build();
        let rows = qb.build_query_as::<TitleSales>().fetch_all(&self.pool).await?;

        Ok(rows)
    }

    /// Best-selling genres for orders placed inside `window`.
    pub async fn top_genres(
        &self,
        window: DateWindow,
        limit: u32,
        policy: RankingPolicy,
    ) -> DbResult<Vec<GenreSales>> {
        debug!(start = %window.start, end = %window.end, limit, %policy, "Ranking genres");

        let mut qb = SalesReport::new(SalesGrouping::Genre, window, limit)
            .with_policy(policy)
            .build();
        let rows = qb.build_query_as::<GenreSales>().fetch_all(&self.pool).await?;

        Ok(rows)
    }

    /// Best-selling authors for orders placed inside `window`.
    pub async fn top_authors(
        &self,
        window: DateWindow,
        limit: u32,
        policy: RankingPolicy,
    ) -> DbResult<Vec<AuthorSales>> {
        debug!(start = %window.start, end = %window.end, limit, %policy, "Ranking authors");

        let mut qb = SalesReport::new(SalesGrouping::Author, window, limit)
            .with_policy(policy)
            .build();
        let rows = qb.build_query_as::<AuthorSales>().fetch_all(&self.pool).await?;

        Ok(rows)
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Inserts a new title. The store assigns the id.
    ///
    /// Any `title_id` or `row_version` on the input is ignored. A missing
    /// genre is stored as "Misc".
    pub async fn insert(&self, input: &TitleInput) -> DbResult<Title> {
        debug!(title = %input.title, isbn = %input.isbn, "Inserting title");

        let sql = format!(
            "INSERT INTO titles (title, isbn, author, publisher, genre, pub_date, price_cents) \
             VALUES (?, ?, ?, ?, COALESCE(?, ?), ?, ?) \
             RETURNING {TITLE_COLUMNS}"
        );
        let title = sqlx::query_as::<_, Title>(&sql)
            .bind(&input.title)
            .bind(&input.isbn)
            .bind(&input.author)
            .bind(&input.publisher)
            .bind(&input.genre)
            .bind(DEFAULT_GENRE)
            .bind(input.pub_date)
            .bind(input.price)
            .fetch_one(&self.pool)
            .await?;

        debug!(id = title.title_id, "Title inserted");
        Ok(title)
    }

    /// Replaces every column of an existing title.
    ///
    /// ## Errors
    /// * `DbError::NotFound` - no row with this id
    /// * `DbError::Conflict` - the row exists but the write matched nothing
    ///   (stale `row_version`)
    pub async fn update(&self, id: i64, input: &TitleInput) -> DbResult<Title> {
        debug!(id = %id, row_version = ?input.row_version, "Updating title");

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let result = sqlx::query(
            "UPDATE titles SET \
                title = ?, isbn = ?, author = ?, publisher = ?, genre = ?, \
                pub_date = ?, price_cents = ?, row_version = row_version + 1 \
             WHERE title_id = ? AND (? IS NULL OR row_version = ?)",
        )
        .bind(&input.title)
        .bind(&input.isbn)
        .bind(&input.author)
        .bind(&input.publisher)
        .bind(&input.genre)
        .bind(input.pub_date)
        .bind(input.price)
        .bind(id)
        .bind(input.row_version)
        .bind(input.row_version)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            let still_there: Option<i64> =
                sqlx::query_scalar("SELECT title_id FROM titles WHERE title_id = ?")
                    .bind(id)
                    .fetch_optional(&mut *tx)
                    .await?;

            tx.rollback()
                .await
                .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

            return Err(match still_there {
                None => DbError::not_found("Title", id),
                Some(_) => DbError::conflict("Title", id),
            });
        }

        let sql = format!("SELECT {TITLE_COLUMNS} FROM titles WHERE title_id = ?");
        let updated = sqlx::query_as::<_, Title>(&sql)
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        debug!(id = %id, row_version = updated.row_version, "Title updated");
        Ok(updated)
    }

    /// Deletes a title and returns the removed row.
    ///
    /// ## Errors
    /// * `DbError::NotFound` - no row with this id
    /// * `DbError::ForeignKeyViolation` - order lines still reference it
    pub async fn delete(&self, id: i64) -> DbResult<Title> {
        debug!(id = %id, "Deleting title");

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let sql = format!("SELECT {TITLE_COLUMNS} FROM titles WHERE title_id = ?");
        let existing = sqlx::query_as::<_, Title>(&sql)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| DbError::not_found("Title", id))?;

        sqlx::query("DELETE FROM titles WHERE title_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        Ok(existing)
    }

    /// Returns the total count of titles.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM titles")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
