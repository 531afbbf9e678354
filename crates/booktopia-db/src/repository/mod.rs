//! # Repository Module
//!
//! Database repository implementations for Booktopia.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  HTTP handler                                                           │
//! │       │                                                                 │
//! │       │  db.titles().find_by_field(TitleField::Genre, "Mystery")        │
//! │       ▼                                                                 │
//! │  TitleRepository                                                        │
//! │  ├── list / get_by_id / find_by_field                                   │
//! │  ├── pub_date_between / price_between                                   │
//! │  ├── top_titles / top_genres / top_authors                              │
//! │  └── insert / update / delete                                           │
//! │       │                                                                 │
//! │       │  QueryBuilder<Sqlite> from crate::query                         │
//! │       ▼                                                                 │
//! │  SQLite Database                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`TitleRepository`](title::TitleRepository) - Title CRUD, lookups and sales rankings
//! - [`OrderRepository`](order::OrderRepository) - Orders and line items
//! - [`CustomerRepository`](customer::CustomerRepository) - Order owners

pub mod customer;
pub mod order;
pub mod title;
