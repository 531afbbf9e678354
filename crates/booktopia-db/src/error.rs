//! # Storage Errors
//!
//! Every repository call returns [`DbResult`]. Constraint failures reported by
//! SQLite are sorted into their own variants so the HTTP layer can log them
//! precisely while still answering with a generic message.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  sqlx::Error                                                            │
//! │     ├── Database(e) ── e.kind() ── UniqueViolation     ─► Unique...     │
//! │     │                           ├─ ForeignKeyViolation ─► ForeignKey... │
//! │     │                           ├─ Check / NotNull     ─► Check...      │
//! │     │                           └─ anything else       ─► QueryFailed   │
//! │     ├── RowNotFound    ─► NotFound                                      │
//! │     ├── PoolTimedOut   ─► PoolExhausted                                 │
//! │     ├── PoolClosed     ─► ConnectionFailed                              │
//! │     └── other          ─► Internal                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use booktopia_core::ValidationError;
use sqlx::error::{DatabaseError, ErrorKind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    /// No row with this key.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A guarded write touched nothing although the row is still there.
    ///
    /// Raised for a stale `rowVersion` on update, or when another writer got
    /// in between. Never retried.
    #[error("Concurrent modification of {entity} {id}")]
    Conflict { entity: String, id: String },

    #[error("Unique constraint failed: {constraint}")]
    UniqueViolation { constraint: String },

    /// The repository refused the row before sending it to SQLite.
    #[error("Rejected: {0}")]
    Invalid(#[from] ValidationError),

    /// A row is still referenced, or references something that is gone.
    ///
    /// Deleting a title or an order that has order lines lands here, as does
    /// adding a line for a missing order or title.
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// A column CHECK or NOT NULL rule rejected the row.
    #[error("Check constraint failed: {message}")]
    CheckViolation { message: String },

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// BEGIN or COMMIT did not go through.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    #[error("Connection pool exhausted")]
    PoolExhausted,

    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    pub fn conflict(entity: impl Into<String>, id: impl ToString) -> Self {
        DbError::Conflict {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    fn from_database(err: &dyn DatabaseError) -> Self {
        let message = err.message().to_string();
        match err.kind() {
            ErrorKind::UniqueViolation => {
                // "UNIQUE constraint failed: titles.isbn" -> "titles.isbn"
                let constraint = match message.rsplit_once(": ") {
                    Some((_, column)) => column.to_string(),
                    None => message.clone(),
                };
                DbError::UniqueViolation { constraint }
            }
            ErrorKind::ForeignKeyViolation => DbError::ForeignKeyViolation { message },
            ErrorKind::CheckViolation | ErrorKind::NotNullViolation => {
                DbError::CheckViolation { message }
            }
            _ => DbError::QueryFailed(message),
        }
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => DbError::from_database(&*db_err),
            sqlx::Error::RowNotFound => DbError::not_found("Record", "unknown"),
            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,
            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),
            other => DbError::Internal(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

pub type DbResult<T> = Result<T, DbError>;
