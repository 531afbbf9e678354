//! # Routes
//!
//! The HTTP surface. Every title route is handled in [`titles`].
//!
//! ```text
//! GET    /titles                                   list
//! POST   /titles                                   create
//! GET    /titles/{id}                              get
//! PUT    /titles/{id}                              update
//! DELETE /titles/{id}                              delete
//! GET    /titles/title/{title}                     exact title
//! GET    /titles/isbn/{isbn}                       exact isbn
//! GET    /titles/author/{author}                   exact author
//! GET    /titles/publisher/{publisher}             exact publisher
//! GET    /titles/genre/{genre}                     exact genre
//! GET    /titles/pubdate/{start}/{end}             YYYYMMDD, exclusive
//! GET    /titles/price/{min}/{max}                 whole units, inclusive
//! GET    /titles/top/{start}/{end}/{count}         best-selling titles
//! GET    /titles/top/genres/{start}/{end}/{count}  best-selling genres
//! GET    /titles/top/authors/{start}/{end}/{count} best-selling authors
//! GET    /health                                   database liveness
//! ```

pub mod titles;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::AppState;

/// Builds the application router with request tracing.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/titles", get(titles::list).post(titles::create))
        .route(
            "/titles/{id}",
            get(titles::get_by_id)
                .put(titles::update)
                .delete(titles::delete),
        )
        .route("/titles/title/{title}", get(titles::by_title))
        .route("/titles/isbn/{isbn}", get(titles::by_isbn))
        .route("/titles/author/{author}", get(titles::by_author))
        .route("/titles/publisher/{publisher}", get(titles::by_publisher))
        .route("/titles/genre/{genre}", get(titles::by_genre))
        .route("/titles/pubdate/{start}/{end}", get(titles::by_pub_date))
        .route("/titles/price/{min}/{max}", get(titles::by_price))
        .route("/titles/top/{start}/{end}/{count}", get(titles::top_titles))
        .route(
            "/titles/top/genres/{start}/{end}/{count}",
            get(titles::top_genres),
        )
        .route(
            "/titles/top/authors/{start}/{end}/{count}",
            get(titles::top_authors),
        )
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Reports whether the database answers queries.
async fn health(State(state): State<AppState>) -> impl IntoResponse {
    if state.db.health_check().await {
        (StatusCode::OK, Json(json!({ "status": "ok" })))
    } else {
        warn!("Health check failed: database unreachable");
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "unavailable" })),
        )
    }
}
