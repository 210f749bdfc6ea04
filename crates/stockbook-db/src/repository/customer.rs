//! # Customer Repository
//!
//! Store operations for customers. The interesting field is
//! `pending_cents`: the running balance across a customer's pending sales,
//! adjusted by the sale repository inside the sale/settle transactions.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use stockbook_core::Customer;

#[derive(Debug, sqlx::FromRow)]
struct CustomerRow {
    id: String,
    name: String,
    contact: String,
    pending_cents: i64,
    created_at: DateTime<Utc>,
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Customer {
            id: row.id,
            name: row.name,
            contact: row.contact,
            pending_cents: row.pending_cents,
            created_at: row.created_at,
        }
    }
}

/// Repository for customer operations.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    /// Creates a new CustomerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    /// Inserts a new customer with a zero pending balance.
    pub async fn insert(&self, name: &str, contact: &str) -> DbResult<Customer> {
        debug!(name = %name, "Inserting customer");

        let customer = Customer {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            contact: contact.to_string(),
            pending_cents: 0,
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO customers (id, name, contact, pending_cents, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&customer.id)
        .bind(&customer.name)
        .bind(&customer.contact)
        .bind(customer.pending_cents)
        .bind(customer.created_at)
        .execute(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Gets a customer by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Customer>> {
        let row = sqlx::query_as::<_, CustomerRow>(
            "SELECT id, name, contact, pending_cents, created_at FROM customers WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Customer::from))
    }

    /// Lists all customers, ordered by name.
    pub async fn list(&self) -> DbResult<Vec<Customer>> {
        let rows = sqlx::query_as::<_, CustomerRow>(
            "SELECT id, name, contact, pending_cents, created_at FROM customers ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Customer::from).collect())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    #[tokio::test]
    async fn test_customer_roundtrip() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let customer = db.customers().insert("John Doe", "0700-000000").await.unwrap();
        assert_eq!(customer.pending_cents, 0);

        let loaded = db.customers().get_by_id(&customer.id).await.unwrap().unwrap();
        assert_eq!(loaded.name, "John Doe");

        let all = db.customers().list().await.unwrap();
        assert_eq!(all.len(), 1);
    }
}
