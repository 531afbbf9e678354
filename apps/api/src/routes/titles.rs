//! # Title Handlers
//!
//! One handler per route. Each one validates its path segments and body
//! with `booktopia_core::validation`, makes a single repository call and
//! maps the outcome to a status code.
//!
//! ## Outcomes
//! ```text
//! reads          200 + JSON (lists may be empty)
//! get by id      200, or 404 when the row is missing
//! create         201 + Location: /titles/{id} + created row
//! update         204, 400 on id mismatch, 404 when missing,
//!                500 on a concurrent modification
//! delete         200 + removed row, 404 when missing,
//!                500 while order lines reference the title
//! ```

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use tracing::{debug, info};

use booktopia_core::validation::{
    parse_date_window, parse_id, parse_limit, parse_price_bounds, validate_title_input,
};
use booktopia_core::{AuthorSales, CoreError, GenreSales, Title, TitleInput, TitleSales};
use booktopia_db::{DateWindow, TitleField};

use crate::error::ApiResult;
use crate::AppState;

// =============================================================================
// Reads
// =============================================================================

pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Title>>> {
    Ok(Json(state.db.titles().list().await?))
}

pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Title>> {
    let id = parse_id(&id)?;

    let title = state
        .db
        .titles()
        .get_by_id(id)
        .await?
        .ok_or(CoreError::TitleNotFound(id))?;

    Ok(Json(title))
}

async fn find_by(state: &AppState, field: TitleField, value: &str) -> ApiResult<Json<Vec<Title>>> {
    Ok(Json(state.db.titles().find_by_field(field, value).await?))
}

pub async fn by_title(
    State(state): State<AppState>,
    Path(title): Path<String>,
) -> ApiResult<Json<Vec<Title>>> {
    find_by(&state, TitleField::Title, &title).await
}

pub async fn by_isbn(
    State(state): State<AppState>,
    Path(isbn): Path<String>,
) -> ApiResult<Json<Vec<Title>>> {
    find_by(&state, TitleField::Isbn, &isbn).await
}

pub async fn by_author(
    State(state): State<AppState>,
    Path(author): Path<String>,
) -> ApiResult<Json<Vec<Title>>> {
    find_by(&state, TitleField::Author, &author).await
}

pub async fn by_publisher(
    State(state): State<AppState>,
    Path(publisher): Path<String>,
) -> ApiResult<Json<Vec<Title>>> {
    find_by(&state, TitleField::Publisher, &publisher).await
}

pub async fn by_genre(
    State(state): State<AppState>,
    Path(genre): Path<String>,
) -> ApiResult<Json<Vec<Title>>> {
    find_by(&state, TitleField::Genre, &genre).await
}

/// `start` and `end` are `YYYYMMDD`; both ends are excluded.
pub async fn by_pub_date(
    State(state): State<AppState>,
    Path((start, end)): Path<(String, String)>,
) -> ApiResult<Json<Vec<Title>>> {
    let (start, end) = parse_date_window(&start, &end)?;
    Ok(Json(state.db.titles().pub_date_between(start, end).await?))
}

/// Whole currency units; both ends are included.
pub async fn by_price(
    State(state): State<AppState>,
    Path((min, max)): Path<(String, String)>,
) -> ApiResult<Json<Vec<Title>>> {
    let (min, max) = parse_price_bounds(&min, &max)?;
    Ok(Json(state.db.titles().price_between(min, max).await?))
}

// =============================================================================
// Sales Rankings
// =============================================================================

fn parse_report(start: &str, end: &str, count: &str) -> ApiResult<(DateWindow, u32)> {
    let (start, end) = parse_date_window(start, end)?;
    let limit = parse_limit(count)?;
    Ok((DateWindow::new(start, end), limit))
}

pub async fn top_titles(
    State(state): State<AppState>,
    Path((start, end, count)): Path<(String, String, String)>,
) -> ApiResult<Json<Vec<TitleSales>>> {
    let (window, limit) = parse_report(&start, &end, &count)?;
    let rows = state
        .db
        .titles()
        .top_titles(window, limit, state.ranking_policy)
        .await?;
    Ok(Json(rows))
}

pub async fn top_genres(
    State(state): State<AppState>,
    Path((start, end, count)): Path<(String, String, String)>,
) -> ApiResult<Json<Vec<GenreSales>>> {
    let (window, limit) = parse_report(&start, &end, &count)?;
    let rows = state
        .db
        .titles()
        .top_genres(window, limit, state.ranking_policy)
        .await?;
    Ok(Json(rows))
}

pub async fn top_authors(
    State(state): State<AppState>,
    Path((start, end, count)): Path<(String, String, String)>,
) -> ApiResult<Json<Vec<AuthorSales>>> {
    let (window, limit) = parse_report(&start, &end, &count)?;
    let rows = state
        .db
        .titles()
        .top_authors(window, limit, state.ranking_policy)
        .await?;
    Ok(Json(rows))
}

// =============================================================================
// Writes
// =============================================================================

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<TitleInput>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(input) = payload?;
    validate_title_input(&input)?;

    let title = state.db.titles().insert(&input).await?;
    info!(id = title.title_id, "Title created");

    let location = format!("/titles/{}", title.title_id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(title)))
}

/// Replaces a title. The body must repeat the route id as `titleId`.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<TitleInput>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let id = parse_id(&id)?;
    let Json(input) = payload?;

    if input.title_id != Some(id) {
        return Err(CoreError::IdMismatch {
            route: id,
            body: input.title_id,
        }
        .into());
    }
    validate_title_input(&input)?;

    let updated = state.db.titles().update(id, &input).await?;
    debug!(id, row_version = updated.row_version, "Title replaced");

    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Title>> {
    let id = parse_id(&id)?;

    let removed = state.db.titles().delete(id).await?;
    info!(id, "Title deleted");

    Ok(Json(removed))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use axum::Router;
    use chrono::NaiveDate;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use booktopia_core::{Money, NewCustomer, NewOrder, NewOrderDetail, TitleInput};
    use booktopia_db::{Database, DbConfig, RankingPolicy};

    use crate::{router, AppState};

    async fn setup(policy: RankingPolicy) -> (Router, Database) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        (router(AppState::new(db.clone(), policy)), db)
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
        send(app, Method::GET, uri, None).await
    }

    async fn put(app: &Router, id: i64, body: Value) -> (StatusCode, Value) {
        send(app, Method::PUT, &format!("/titles/{id}"), Some(body)).await
    }

    fn body(title: &str, genre: Option<&str>, pub_date: &str, price: Option<f64>) -> Value {
        json!({
            "title": title,
            "isbn": "9780000000000",
            "author": "Ursula K. Le Guin",
            "publisher": "Ace",
            "genre": genre,
            "pubDate": pub_date,
            "price": price,
        })
    }

    async fn insert(
        db: &Database,
        title: &str,
        genre: &str,
        pub_date: (i32, u32, u32),
        cents: i64,
    ) -> i64 {
        db.titles()
            .insert(&TitleInput {
                title_id: None,
                title: title.to_string(),
                isbn: "9780000000000".to_string(),
                author: "Ursula K. Le Guin".to_string(),
                publisher: "Ace".to_string(),
                genre: Some(genre.to_string()),
                pub_date: NaiveDate::from_ymd_opt(pub_date.0, pub_date.1, pub_date.2).unwrap(),
                price: Some(Money::from_cents(cents)),
                row_version: None,
            })
            .await
            .unwrap()
            .title_id
    }

    async fn sell(db: &Database, title_id: i64, count: i64, on: (i32, u32, u32)) {
        let customer = db
            .customers()
            .insert(&NewCustomer {
                user_name: "reader".to_string(),
                password: "pw".to_string(),
                email: "reader@example.com".to_string(),
                province: "ON".to_string(),
                city: "Ottawa".to_string(),
                address: "1 Wellington St".to_string(),
                zip_code: "K1A0A9".to_string(),
                phone: "6135550100".to_string(),
            })
            .await
            .unwrap();
        let order = db
            .orders()
            .insert(&NewOrder {
                customer_id: customer.customer_id,
                order_date: NaiveDate::from_ymd_opt(on.0, on.1, on.2),
                status: None,
            })
            .await
            .unwrap();
        db.orders()
            .add_detail(&NewOrderDetail {
                order_id: order.order_id,
                title_id,
                count,
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let (app, _db) = setup(RankingPolicy::default()).await;

        let request = Request::builder()
            .method(Method::POST)
            .uri("/titles")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                body("The Lathe of Heaven", None, "1971-03-01T00:00:00", Some(14.5)).to_string(),
            ))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let location = response.headers()[header::LOCATION].to_str().unwrap().to_string();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let created: Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(location, format!("/titles/{}", created["titleId"]));
        assert_eq!(created["genre"], "Misc");
        assert_eq!(created["pubDate"], "1971-03-01");
        assert_eq!(created["price"], 14.5);

        let (status, fetched) = get(&app, &location).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_payloads() {
        let (app, db) = setup(RankingPolicy::default()).await;

        let mut long_isbn = body("Title", None, "2000-01-01", None);
        long_isbn["isbn"] = json!("97800000000001234");
        let (status, err) = send(&app, Method::POST, "/titles", Some(long_isbn)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(err["code"], "VALIDATION_ERROR");

        let (status, _) = send(&app, Method::POST, "/titles", Some(json!({ "title": "x" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let too_precise = body("T", None, "2000-01-01", Some(1.999));
        let (status, _) = send(&app, Method::POST, "/titles", Some(too_precise)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        assert_eq!(db.titles().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_get_missing_and_malformed_id() {
        let (app, _db) = setup(RankingPolicy::default()).await;

        let (status, err) = get(&app, "/titles/41").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(err["code"], "NOT_FOUND");

        let (status, _) = get(&app, "/titles/forty-one").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_genre_lookup_orders_by_title() {
        let (app, db) = setup(RankingPolicy::default()).await;
        for name in ["C", "A", "B"] {
            insert(&db, name, "Mystery", (2000, 1, 1), 100).await;
        }

        let (status, found) = get(&app, "/titles/genre/Mystery").await;
        assert_eq!(status, StatusCode::OK);
        let names: Vec<_> = found.as_array().unwrap().iter().map(|t| t["title"].clone()).collect();
        assert_eq!(names, vec![json!("A"), json!("B"), json!("C")]);

        let (status, found) = get(&app, "/titles/genre/Romance").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(found, json!([]));
    }

    #[tokio::test]
    async fn test_title_lookup_decodes_path() {
        let (app, db) = setup(RankingPolicy::default()).await;
        insert(&db, "The Word for World Is Forest", "Science Fiction", (1972, 1, 1), 100).await;

        let (_, found) = get(&app, "/titles/title/The%20Word%20for%20World%20Is%20Forest").await;
        assert_eq!(found.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_pub_date_range() {
        let (app, db) = setup(RankingPolicy::default()).await;
        insert(&db, "edge", "Misc", (2000, 1, 1), 100).await;
        insert(&db, "inside", "Misc", (2000, 6, 1), 100).await;

        let (status, found) = get(&app, "/titles/pubdate/20000101/20010101").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(found.as_array().unwrap().len(), 1);
        assert_eq!(found[0]["title"], "inside");

        let (status, err) = get(&app, "/titles/pubdate/20010101/20000101").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(err["code"], "VALIDATION_ERROR");

        let (status, _) = get(&app, "/titles/pubdate/2000-01-01/20010101").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_price_range() {
        let (app, db) = setup(RankingPolicy::default()).await;
        insert(&db, "cheap", "Misc", (2000, 1, 1), 999).await;
        insert(&db, "exact", "Misc", (2000, 1, 1), 1000).await;
        insert(&db, "dear", "Misc", (2000, 1, 1), 2500).await;

        let (status, found) = get(&app, "/titles/price/10/25").await;
        assert_eq!(status, StatusCode::OK);
        let names: Vec<_> = found.as_array().unwrap().iter().map(|t| t["title"].clone()).collect();
        assert_eq!(names, vec![json!("dear"), json!("exact")]);

        let (status, _) = get(&app, "/titles/price/25/10").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = get(&app, "/titles/price/ten/25").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_update_flow() {
        let (app, db) = setup(RankingPolicy::default()).await;
        let id = insert(&db, "Draft", "Misc", (2000, 1, 1), 100).await;

        // Body id must match the route id
        let mut mismatched = body("Final", None, "2000-01-01", None);
        mismatched["titleId"] = json!(id + 1);
        let (status, err) = put(&app, id, mismatched).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(err["code"], "VALIDATION_ERROR");

        let mut replacement = body("Final", Some("Fantasy"), "2001-01-01", Some(5.0));
        replacement["titleId"] = json!(id);
        replacement["rowVersion"] = json!(1);
        let (status, _) = put(&app, id, replacement.clone()).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, fetched) = get(&app, &format!("/titles/{id}")).await;
        assert_eq!(fetched["title"], "Final");
        assert_eq!(fetched["rowVersion"], 2);

        // Same rowVersion again is stale now
        let (status, err) = put(&app, id, replacement).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err["code"], "CONFLICT");

        let mut missing = body("Ghost", None, "2000-01-01", None);
        missing["titleId"] = json!(999);
        let (status, _) = send(&app, Method::PUT, "/titles/999", Some(missing)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_flow() {
        let (app, db) = setup(RankingPolicy::default()).await;
        let free = insert(&db, "Unsold", "Misc", (2000, 1, 1), 100).await;
        let sold = insert(&db, "Sold", "Misc", (2000, 1, 1), 100).await;
        sell(&db, sold, 1, (2018, 1, 1)).await;

        let (status, removed) = send(&app, Method::DELETE, &format!("/titles/{free}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(removed["title"], "Unsold");

        let (status, _) = send(&app, Method::DELETE, &format!("/titles/{free}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, err) = send(&app, Method::DELETE, &format!("/titles/{sold}"), None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err["code"], "DATABASE_ERROR");
    }

    async fn ranked(policy: RankingPolicy) -> Router {
        let (app, db) = setup(policy).await;
        let one = insert(&db, "One", "Poetry", (2000, 1, 1), 100).await;
        let five = insert(&db, "Five", "Mystery", (2000, 1, 1), 100).await;
        let three = insert(&db, "Three", "Horror", (2000, 1, 1), 100).await;
        sell(&db, one, 1, (2018, 2, 1)).await;
        sell(&db, five, 5, (2018, 3, 1)).await;
        sell(&db, three, 3, (2018, 4, 1)).await;
        app
    }

    fn totals(rows: &Value) -> Vec<i64> {
        rows.as_array()
            .unwrap()
            .iter()
            .map(|r| r["totalSold"].as_i64().unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_top_titles_sort_then_limit() {
        let app = ranked(RankingPolicy::SortThenLimit).await;

        let (status, rows) = get(&app, "/titles/top/20180101/20181231/2").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(totals(&rows), vec![5, 3]);
        assert_eq!(rows[0]["title"]["title"], "Five");
    }

    #[tokio::test]
    async fn test_top_one_title() {
        let app = ranked(RankingPolicy::SortThenLimit).await;

        let (status, rows) = get(&app, "/titles/top/20180101/20181231/1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(totals(&rows), vec![5]);
        assert_eq!(rows[0]["title"]["title"], "Five");
    }

    #[tokio::test]
    async fn test_top_titles_limit_then_sort() {
        let app = ranked(RankingPolicy::LimitThenSort).await;

        // Only the first two titles by id are ranked
        let (status, rows) = get(&app, "/titles/top/20180101/20181231/2").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(totals(&rows), vec![5, 1]);
        assert_eq!(rows[0]["title"]["title"], "Five");
        assert_eq!(rows[1]["title"]["title"], "One");

        let (_, genres) = get(&app, "/titles/top/genres/20180101/20181231/1").await;
        assert_eq!(genres, json!([{ "genre": "Horror", "totalSold": 3 }]));
    }

    #[tokio::test]
    async fn test_top_genres_and_authors() {
        let app = ranked(RankingPolicy::SortThenLimit).await;

        let (_, genres) = get(&app, "/titles/top/genres/20180101/20181231/5").await;
        assert_eq!(genres[0], json!({ "genre": "Mystery", "totalSold": 5 }));
        assert_eq!(totals(&genres), vec![5, 3, 1]);

        let (_, authors) = get(&app, "/titles/top/authors/20180101/20181231/5").await;
        assert_eq!(authors, json!([{ "author": "Ursula K. Le Guin", "totalSold": 9 }]));
    }

    #[tokio::test]
    async fn test_top_rejects_bad_parameters() {
        let app = ranked(RankingPolicy::SortThenLimit).await;

        let (status, _) = get(&app, "/titles/top/20181231/20180101/2").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = get(&app, "/titles/top/20180101/20181231/-1").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = get(&app, "/titles/top/genres/20180101/20181231/two").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_health() {
        let (app, db) = setup(RankingPolicy::default()).await;

        let (status, body) = get(&app, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");

        db.close().await;
        let (status, _) = get(&app, "/health").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }
}
