//! # Sale Repository
//!
//! Store operations for the sales ledger.
//!
//! ## Recording a Sale
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                  Sale Recording (one transaction)                   │
//! │                                                                     │
//! │  BEGIN                                                              │
//! │    1. SELECT product            → NotFound if it no longer exists   │
//! │    2. UPDATE products                                               │
//! │       SET stock = stock - qty                                       │
//! │       WHERE id = ? AND stock >= qty                                 │
//! │          │                                                          │
//! │          ├── 0 rows → InsufficientStock (stock unchanged)           │
//! │          ▼                                                          │
//! │    3. INSERT INTO sales (name + unit price snapshotted)             │
//! │    4. pending + customer? UPDATE customers                          │
//! │       SET pending_cents += balance due                              │
//! │  COMMIT ← all of it or none of it                                   │
//! │                                                                     │
//! │  The stock guard lives in the SQL, so two concurrent sales can      │
//! │  never oversell the same product.                                   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use stockbook_core::Sale;

/// Input for recording a sale, as collected by the sales form.
#[derive(Debug, Clone)]
pub struct NewSale {
    pub product_id: String,
    pub quantity: i64,
    /// Payment received in cents.
    pub amount_cents: i64,
    pub is_pending: bool,
    pub employee_id: String,
    pub customer_id: Option<String>,
}

#[derive(Debug, sqlx::FromRow)]
struct SaleRow {
    id: String,
    product_id: String,
    product_name: String,
    unit_price_cents: i64,
    quantity: i64,
    amount_cents: i64,
    is_pending: bool,
    employee_id: String,
    customer_id: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<SaleRow> for Sale {
    fn from(row: SaleRow) -> Self {
        Sale {
            id: row.id,
            product_id: row.product_id,
            product_name: row.product_name,
            unit_price_cents: row.unit_price_cents,
            quantity: row.quantity,
            amount_cents: row.amount_cents,
            is_pending: row.is_pending,
            employee_id: row.employee_id,
            customer_id: row.customer_id,
            created_at: row.created_at,
        }
    }
}

/// Repository for sales ledger operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Records a sale: decrements the product's stock, snapshots the
    /// product onto the ledger row, and raises the customer's pending
    /// balance when payment is outstanding - all in one transaction.
    ///
    /// ## Errors
    /// * `NotFound` - product (or named customer) no longer exists
    /// * `InsufficientStock` - the sale would drive stock below zero;
    ///   stock is left unchanged
    pub async fn record(&self, new: &NewSale) -> DbResult<Sale> {
        debug!(product_id = %new.product_id, quantity = new.quantity, "Recording sale");

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        // Snapshot source: name + unit price at time of sale
        let product: Option<(String, i64, i64)> = sqlx::query_as(
            "SELECT name, price_cents, stock FROM products WHERE id = ?1",
        )
        .bind(&new.product_id)
        .fetch_optional(&mut *tx)
        .await?;

        let (product_name, unit_price_cents, available) = product
            .ok_or_else(|| DbError::not_found("Product", &new.product_id))?;

        // Conditional decrement: the guard holds under concurrent sales
        let result = sqlx::query(
            r#"
            UPDATE products SET
                stock = stock - ?2,
                revision = revision + 1
            WHERE id = ?1 AND stock >= ?2
            "#,
        )
        .bind(&new.product_id)
        .bind(new.quantity)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::InsufficientStock {
                product: product_name,
                available,
                requested: new.quantity,
            });
        }

        let sale = Sale {
            id: Uuid::new_v4().to_string(),
            product_id: new.product_id.clone(),
            product_name,
            unit_price_cents,
            quantity: new.quantity,
            amount_cents: new.amount_cents,
            is_pending: new.is_pending,
            employee_id: new.employee_id.clone(),
            customer_id: new.customer_id.clone(),
            created_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO sales (
                id, product_id, product_name, unit_price_cents,
                quantity, amount_cents, is_pending,
                employee_id, customer_id, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&sale.id)
        .bind(&sale.product_id)
        .bind(&sale.product_name)
        .bind(sale.unit_price_cents)
        .bind(sale.quantity)
        .bind(sale.amount_cents)
        .bind(sale.is_pending)
        .bind(&sale.employee_id)
        .bind(&sale.customer_id)
        .bind(sale.created_at)
        .execute(&mut *tx)
        .await?;

        if sale.is_pending {
            if let Some(customer_id) = &sale.customer_id {
                let balance = sale.balance_due_cents();
                let result = sqlx::query(
                    "UPDATE customers SET pending_cents = pending_cents + ?2 WHERE id = ?1",
                )
                .bind(customer_id)
                .bind(balance)
                .execute(&mut *tx)
                .await?;

                if result.rows_affected() == 0 {
                    return Err(DbError::not_found("Customer", customer_id));
                }
            }
        }

        tx.commit().await?;

        debug!(sale_id = %sale.id, "Sale recorded");
        Ok(sale)
    }

    /// Gets a sale by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Sale>> {
        let row = sqlx::query_as::<_, SaleRow>(
            r#"
            SELECT id, product_id, product_name, unit_price_cents,
                   quantity, amount_cents, is_pending,
                   employee_id, customer_id, created_at
            FROM sales
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Sale::from))
    }

    /// Lists sales, newest first.
    ///
    /// ## Arguments
    /// * `pending_only` - restrict to sales with outstanding payment
    ///   (the "Show Pending Only" toggle on the sales screen)
    pub async fn list(&self, pending_only: bool) -> DbResult<Vec<Sale>> {
        let sql = if pending_only {
            r#"
            SELECT id, product_id, product_name, unit_price_cents,
                   quantity, amount_cents, is_pending,
                   employee_id, customer_id, created_at
            FROM sales
            WHERE is_pending = 1
            ORDER BY created_at DESC
            "#
        } else {
            r#"
            SELECT id, product_id, product_name, unit_price_cents,
                   quantity, amount_cents, is_pending,
                   employee_id, customer_id, created_at
            FROM sales
            ORDER BY created_at DESC
            "#
        };

        let rows = sqlx::query_as::<_, SaleRow>(sql).fetch_all(&self.pool).await?;

        Ok(rows.into_iter().map(Sale::from).collect())
    }

    /// Settles a pending sale: marks it paid in full and clears its share
    /// of the customer's pending balance.
    ///
    /// ## Errors
    /// * `NotFound` - sale doesn't exist
    /// * `Conflict` - sale is not pending (already settled)
    pub async fn settle(&self, id: &str) -> DbResult<Sale> {
        debug!(sale_id = %id, "Settling sale");

        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, SaleRow>(
            r#"
            SELECT id, product_id, product_name, unit_price_cents,
                   quantity, amount_cents, is_pending,
                   employee_id, customer_id, created_at
            FROM sales
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| DbError::not_found("Sale", id))?;

        let sale = Sale::from(row);
        if !sale.is_pending {
            return Err(DbError::conflict("Sale", id));
        }

        let balance = sale.balance_due_cents();

        // Guarded on is_pending so a racing settle hits Conflict, not a
        // double balance adjustment
        let result = sqlx::query(
            r#"
            UPDATE sales SET
                is_pending = 0,
                amount_cents = unit_price_cents * quantity
            WHERE id = ?1 AND is_pending = 1
            "#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::conflict("Sale", id));
        }

        if let Some(customer_id) = &sale.customer_id {
            let result = sqlx::query(
                "UPDATE customers SET pending_cents = pending_cents - ?2 WHERE id = ?1",
            )
            .bind(customer_id)
            .bind(balance)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                // Customer rows are never deleted today, but a missing row
                // shouldn't block settling the sale itself
                warn!(customer_id = %customer_id, "Settled sale references missing customer");
            }
        }

        tx.commit().await?;

        let mut settled = sale;
        settled.is_pending = false;
        settled.amount_cents = settled.unit_price_cents * settled.quantity;

        debug!(sale_id = %id, "Sale settled");
        Ok(settled)
    }

    /// Counts sales with outstanding payment (for diagnostics).
    pub async fn count_pending(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales WHERE is_pending = 1")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
