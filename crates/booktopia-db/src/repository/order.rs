//! # Order Repository
//!
//! Orders and their line items. The sales rankings read this history; the
//! seed binary and tests write it.
//!
//! ## Store Defaults
//! ```text
//! NewOrder { order_date: None, status: None }
//!        │
//!        ▼
//! INSERT .. VALUES (?, COALESCE(?, date('now')), COALESCE(?, 'InProgress'))
//! ```

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use booktopia_core::validation::{validate_new_order, validate_new_order_detail};
use booktopia_core::{NewOrder, NewOrderDetail, Order, OrderDetail, DEFAULT_ORDER_STATUS};

/// Repository for orders and order details.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Places an order. Missing date and status take the store defaults.
    ///
    /// Fails with `DbError::ForeignKeyViolation` for an unknown customer.
    pub async fn insert(&self, order: &NewOrder) -> DbResult<Order> {
        debug!(customer_id = order.customer_id, "Inserting order");
        validate_new_order(order)?;

        let created = sqlx::query_as::<_, Order>(
            "INSERT INTO orders (customer_id, order_date, status) \
             VALUES (?, COALESCE(?, date('now')), COALESCE(?, ?)) \
             RETURNING order_id, customer_id, order_date, status",
        )
        .bind(order.customer_id)
        .bind(order.order_date)
        .bind(&order.status)
        .bind(DEFAULT_ORDER_STATUS)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Gets an order by its ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Order>> {
        let order = sqlx::query_as::<_, Order>(
            "SELECT order_id, customer_id, order_date, status FROM orders WHERE order_id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }

    /// Adds a line item to an order. Negative counts are refused with
    /// `DbError::Invalid` so they never reach the summed rankings.
    pub async fn add_detail(&self, detail: &NewOrderDetail) -> DbResult<OrderDetail> {
        debug!(
            order_id = detail.order_id,
            title_id = detail.title_id,
            count = detail.count,
            "Adding order detail"
        );
        validate_new_order_detail(detail)?;

        let created = sqlx::query_as::<_, OrderDetail>(
            "INSERT INTO order_details (order_id, title_id, count) VALUES (?, ?, ?) \
             RETURNING to_id, order_id, title_id, count",
        )
        .bind(detail.order_id)
        .bind(detail.title_id)
        .bind(detail.count)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Lists the line items of an order by ascending id.
    pub async fn get_details(&self, order_id: i64) -> DbResult<Vec<OrderDetail>> {
        let details = sqlx::query_as::<_, OrderDetail>(
            "SELECT to_id, order_id, title_id, count FROM order_details \
             WHERE order_id = ? ORDER BY to_id",
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(details)
    }

    /// Deletes an order. Fails while line items still reference it.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id = %id, "Deleting order");

        let result = sqlx::query("DELETE FROM orders WHERE order_id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Order", id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use booktopia_core::{Money, NewCustomer, TitleInput};
    use chrono::{NaiveDate, Utc};

    async fn db_with_customer() -> (Database, i64) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let customer = db
            .customers()
            .insert(&NewCustomer {
                user_name: "reader".to_string(),
                password: "pw".to_string(),
                email: "reader@example.com".to_string(),
                province: "QC".to_string(),
                city: "Montreal".to_string(),
                address: "5 Rue Peel".to_string(),
                zip_code: "H3A1A1".to_string(),
                phone: "5145550100".to_string(),
            })
            .await
            .unwrap();
        (db, customer.customer_id)
    }

    async fn dune(db: &Database) -> booktopia_core::Title {
        db.titles()
            .insert(&TitleInput {
                title_id: None,
                title: "Dune".to_string(),
                isbn: "9780441013593".to_string(),
                author: "Frank Herbert".to_string(),
                publisher: "Ace".to_string(),
                genre: None,
                pub_date: NaiveDate::from_ymd_opt(1965, 8, 1).unwrap(),
                price: Some(Money::from_cents(999)),
                row_version: None,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_insert_applies_defaults() {
        let (db, customer_id) = db_with_customer().await;

        let order = db
            .orders()
            .insert(&NewOrder {
                customer_id,
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(order.status.as_deref(), Some(DEFAULT_ORDER_STATUS));
        // date('now') is UTC
        assert_eq!(order.order_date, Some(Utc::now().date_naive()));
    }

    #[tokio::test]
    async fn test_unknown_customer_rejected() {
        let (db, customer_id) = db_with_customer().await;

        let err = db
            .orders()
            .insert(&NewOrder {
                customer_id: customer_id + 100,
                ..Default::default()
            })
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }

    #[tokio::test]
    async fn test_details_and_delete() {
        let (db, customer_id) = db_with_customer().await;
        let title = dune(&db).await;

        let order = db
            .orders()
            .insert(&NewOrder {
                customer_id,
                order_date: NaiveDate::from_ymd_opt(2018, 6, 1),
                status: Some("Shipped".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(order.status.as_deref(), Some("Shipped"));

        db.orders()
            .add_detail(&NewOrderDetail {
                order_id: order.order_id,
                title_id: title.title_id,
                count: 2,
            })
            .await
            .unwrap();

        let details = db.orders().get_details(order.order_id).await.unwrap();
        assert_eq!(details.len(), 1);
        assert_eq!(details[0].count, 2);

        // Line items block the delete
        let err = db.orders().delete(order.order_id).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
        assert!(db.orders().get_by_id(order.order_id).await.unwrap().is_some());

        let err = db.orders().delete(order.order_id + 1).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_negative_count_rejected() {
        let (db, customer_id) = db_with_customer().await;
        let title = dune(&db).await;
        let order = db
            .orders()
            .insert(&NewOrder {
                customer_id,
                ..Default::default()
            })
            .await
            .unwrap();

        let err = db
            .orders()
            .add_detail(&NewOrderDetail {
                order_id: order.order_id,
                title_id: title.title_id,
                count: -7,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Invalid(_)));
        assert!(db.orders().get_details(order.order_id).await.unwrap().is_empty());

        // The schema refuses it too
        let err: DbError = sqlx::query(
            "INSERT INTO order_details (order_id, title_id, count) VALUES (?, ?, -7)",
        )
        .bind(order.order_id)
        .bind(title.title_id)
        .execute(db.pool())
        .await
        .unwrap_err()
        .into();
        assert!(matches!(err, DbError::CheckViolation { .. }));
    }

    #[tokio::test]
    async fn test_long_status_rejected() {
        let (db, customer_id) = db_with_customer().await;

        let err = db
            .orders()
            .insert(&NewOrder {
                customer_id,
                order_date: None,
                status: Some("AwaitingSecondCourierPickup".to_string()),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Invalid(_)));
    }
}
