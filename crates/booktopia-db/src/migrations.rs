//! # Schema Migrations
//!
//! The SQL files under `migrations/sqlite/` are compiled into the binary and
//! applied on connect.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Database::new                                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  _sqlx_migrations  ◄── created on first run                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  001_initial_schema.sql   customers, orders, titles, order_details      │
//! │  00N_....sql              applied in order, each in its own transaction │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Applied files are checksummed: edit the schema by adding `NNN_name.sql`,
//! never by changing a file that has shipped.

use sqlx::migrate::Migrator;
use sqlx::SqlitePool;
use tracing::info;

use crate::error::DbResult;

static MIGRATOR: Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Applies every migration not yet recorded in `_sqlx_migrations`.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    let (total, applied_before) = migration_status(pool).await?;
    MIGRATOR.run(pool).await?;

    info!(
        total,
        newly_applied = total.saturating_sub(applied_before),
        "Schema up to date"
    );
    Ok(())
}

/// Returns (embedded, applied) migration counts.
pub async fn migration_status(pool: &SqlitePool) -> DbResult<(usize, usize)> {
    let embedded = MIGRATOR.iter().count();

    // Fresh databases have no bookkeeping table yet
    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations WHERE success = 1")
        .fetch_one(pool)
        .await
        .unwrap_or(0);

    Ok((embedded, usize::try_from(applied).unwrap_or(0)))
}
