//! # Customer Repository
//!
//! Customers only exist so orders have an owner. The API never exposes them.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use booktopia_core::validation::validate_new_customer;
use booktopia_core::{Customer, NewCustomer};

const CUSTOMER_COLUMNS: &str =
    "customer_id, user_name, password, email, province, city, address, zip_code, phone";

/// Repository for customer database operations.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    /// Creates a new CustomerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    /// Registers a customer and returns the stored row. Fields over the
    /// column limits fail with `DbError::Invalid`.
    pub async fn insert(&self, customer: &NewCustomer) -> DbResult<Customer> {
        debug!(user_name = %customer.user_name, "Inserting customer");
        validate_new_customer(customer)?;

        let sql = format!(
            "INSERT INTO customers \
                (user_name, password, email, province, city, address, zip_code, phone) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?) \
             RETURNING {CUSTOMER_COLUMNS}"
        );
        let created = sqlx::query_as::<_, Customer>(&sql)
            .bind(&customer.user_name)
            .bind(&customer.password)
            .bind(&customer.email)
            .bind(&customer.province)
            .bind(&customer.city)
            .bind(&customer.address)
            .bind(&customer.zip_code)
            .bind(&customer.phone)
            .fetch_one(&self.pool)
            .await?;

        Ok(created)
    }

    /// Gets a customer by its ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Customer>> {
        debug!(id = %id, "Getting customer by ID");

        let sql = format!("SELECT {CUSTOMER_COLUMNS} FROM customers WHERE customer_id = ?");
        let customer = sqlx::query_as::<_, Customer>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(customer)
    }
}
