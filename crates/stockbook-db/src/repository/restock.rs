//! # Restock Repository
//!
//! Read and review operations for the restock audit trail. Entries are
//! *written* by `ProductRepository::restock` in the same transaction as the
//! stock update; this repository covers the follow-up workflow:
//!
//! ```text
//! received (pending) ──verify──► verified
//!          │
//!          └────dispute──► disputed
//! ```

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use stockbook_core::{RestockEntry, RestockStatus};

#[derive(Debug, sqlx::FromRow)]
struct RestockRow {
    id: String,
    product_id: String,
    quantity: i64,
    received_by: String,
    verified_by: Option<String>,
    status: RestockStatus,
    created_at: DateTime<Utc>,
}

impl From<RestockRow> for RestockEntry {
    fn from(row: RestockRow) -> Self {
        RestockEntry {
            id: row.id,
            product_id: row.product_id,
            quantity: row.quantity,
            received_by: row.received_by,
            verified_by: row.verified_by,
            status: row.status,
            created_at: row.created_at,
        }
    }
}

/// Repository for the restock audit trail.
#[derive(Debug, Clone)]
pub struct RestockRepository {
    pool: SqlitePool,
}

impl RestockRepository {
    /// Creates a new RestockRepository.
    pub fn new(pool: SqlitePool) -> Self {
        RestockRepository { pool }
    }

    /// Lists restock entries, newest first, optionally for one product.
    pub async fn list(&self, product_id: Option<&str>) -> DbResult<Vec<RestockEntry>> {
        let rows = match product_id {
            Some(pid) => {
                sqlx::query_as::<_, RestockRow>(
                    r#"
                    SELECT id, product_id, quantity, received_by, verified_by, status, created_at
                    FROM restocks
                    WHERE product_id = ?1
                    ORDER BY created_at DESC
                    "#,
                )
                .bind(pid)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, RestockRow>(
                    r#"
                    SELECT id, product_id, quantity, received_by, verified_by, status, created_at
                    FROM restocks
                    ORDER BY created_at DESC
                    "#,
                )
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(rows.into_iter().map(RestockEntry::from).collect())
    }

    /// Gets a restock entry by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<RestockEntry>> {
        let row = sqlx::query_as::<_, RestockRow>(
            r#"
            SELECT id, product_id, quantity, received_by, verified_by, status, created_at
            FROM restocks
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(RestockEntry::from))
    }

    /// Marks a pending entry as verified by a second employee.
    ///
    /// ## Errors
    /// * `NotFound` - entry doesn't exist
    /// * `Conflict` - entry was already reviewed
    pub async fn verify(&self, id: &str, verified_by: &str) -> DbResult<RestockEntry> {
        self.review(id, verified_by, RestockStatus::Verified).await
    }

    /// Marks a pending entry as disputed (counts don't match).
    pub async fn dispute(&self, id: &str, disputed_by: &str) -> DbResult<RestockEntry> {
        self.review(id, disputed_by, RestockStatus::Disputed).await
    }

    async fn review(
        &self,
        id: &str,
        reviewer: &str,
        status: RestockStatus,
    ) -> DbResult<RestockEntry> {
        debug!(id = %id, ?status, "Reviewing restock entry");

        // Guarded on pending so a second reviewer hits Conflict
        let result = sqlx::query(
            r#"
            UPDATE restocks SET
                status = ?2,
                verified_by = ?3
            WHERE id = ?1 AND status = 'pending'
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(reviewer)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return match self.get_by_id(id).await? {
                Some(_) => Err(DbError::conflict("Restock entry", id)),
                None => Err(DbError::not_found("Restock entry", id)),
            };
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Restock entry", id))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::repository::product::generate_product_id;
    use std::collections::HashMap;
    use stockbook_core::{Product, Variant};

    async fn seeded_entry(db: &Database) -> RestockEntry {
        let now = Utc::now();
        let product = Product {
            id: generate_product_id(),
            name: "Football Jersey".to_string(),
            company: "vargo".to_string(),
            category: "jerseys".to_string(),
            price_cents: 60_000,
            stock: 0,
            min_stock: 0,
            variants: vec![Variant::new("S", 0)],
            last_restocked: now,
            created_at: now,
            revision: 0,
        };
        db.products().insert(&product).await.unwrap();

        let mut quantities = HashMap::new();
        quantities.insert("S".to_string(), 10);
        let (_, entry) = db
            .products()
            .restock(&product.id, &quantities, "jane")
            .await
            .unwrap();
        entry
    }

    #[tokio::test]
    async fn test_verify_pending_entry() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let entry = seeded_entry(&db).await;

        let verified = db.restocks().verify(&entry.id, "mike").await.unwrap();
        assert_eq!(verified.status, RestockStatus::Verified);
        assert_eq!(verified.verified_by.as_deref(), Some("mike"));

        // Already reviewed
        let err = db.restocks().dispute(&entry.id, "mike").await.unwrap_err();
        assert!(matches!(err, DbError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_dispute_pending_entry() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let entry = seeded_entry(&db).await;

        let disputed = db.restocks().dispute(&entry.id, "mike").await.unwrap();
        assert_eq!(disputed.status, RestockStatus::Disputed);
    }

    #[tokio::test]
    async fn test_verify_missing_entry() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let err = db.restocks().verify("nope", "mike").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
