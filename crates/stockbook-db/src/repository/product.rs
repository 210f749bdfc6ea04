//! # Product Repository
//!
//! Store operations for products.
//!
//! ## Document Mapping
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │              How a Product Row Becomes a Product                    │
//! │                                                                     │
//! │  products table                                                     │
//! │  ┌──────┬─────────┬───────┬───────────────────────────┬──────────┐ │
//! │  │ id   │ name    │ stock │ variants (JSON)           │ revision │ │
//! │  ├──────┼─────────┼───────┼───────────────────────────┼──────────┤ │
//! │  │ 7f.. │ Jersey  │ 15    │ [{"identifier":"S",       │ 3        │ │
//! │  │      │         │       │   "quantity":10}, ...]    │          │ │
//! │  └──────┴─────────┴───────┴───────────────────────────┴──────────┘ │
//! │                              │                                      │
//! │                              ▼ serde_json                           │
//! │  Product { stock: 15, variants: vec![Variant("S", 10), ...] }      │
//! │                                                                     │
//! │  Invariant restored on every mutation:                              │
//! │  stock == aggregate(variants) whenever variants is non-empty        │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Concurrency
//! Every write is conditional: full updates and restocks carry the row's
//! `revision` (compare-and-swap), so a stale read-modify-write fails with
//! `Conflict` instead of silently losing the other writer's update.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use stockbook_core::{Product, RestockEntry, RestockStatus, Variant};

/// Row shape of the products table; the JSON variants column is decoded
/// into [`Variant`]s on the way out.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: String,
    name: String,
    company: String,
    category: String,
    price_cents: i64,
    stock: i64,
    min_stock: i64,
    variants: String,
    last_restocked: DateTime<Utc>,
    created_at: DateTime<Utc>,
    revision: i64,
}

impl ProductRow {
    fn into_product(self) -> DbResult<Product> {
        let variants: Vec<Variant> =
            serde_json::from_str(&self.variants).map_err(|e| DbError::CorruptDocument {
                entity: "Product".to_string(),
                id: self.id.clone(),
                reason: e.to_string(),
            })?;

        Ok(Product {
            id: self.id,
            name: self.name,
            company: self.company,
            category: self.category,
            price_cents: self.price_cents,
            stock: self.stock,
            min_stock: self.min_stock,
            variants,
            last_restocked: self.last_restocked,
            created_at: self.created_at,
            revision: self.revision,
        })
    }
}

fn variants_json(variants: &[Variant]) -> DbResult<String> {
    serde_json::to_string(variants).map_err(|e| DbError::Internal(e.to_string()))
}

/// Repository for product store operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
///
/// let product = repo.get_by_id("uuid-here").await?;
/// let results = repo.search("jersey", 20).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Inserts a new product.
    ///
    /// ## Arguments
    /// * `product` - Product to insert (id generated beforehand, revision 0)
    ///
    /// ## Returns
    /// * `Ok(Product)` - The inserted product
    pub async fn insert(&self, product: &Product) -> DbResult<Product> {
        debug!(id = %product.id, name = %product.name, "Inserting product");

        let variants = variants_json(&product.variants)?;

        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, company, category,
                price_cents, stock, min_stock, variants,
                last_restocked, created_at, revision
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.company)
        .bind(&product.category)
        .bind(product.price_cents)
        .bind(product.stock)
        .bind(product.min_stock)
        .bind(&variants)
        .bind(product.last_restocked)
        .bind(product.created_at)
        .bind(product.revision)
        .execute(&self.pool)
        .await?;

        Ok(product.clone())
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, name, company, category,
                   price_cents, stock, min_stock, variants,
                   last_restocked, created_at, revision
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(ProductRow::into_product).transpose()
    }

    /// Lists all products, ordered by name.
    ///
    /// The inventory screen loads the full list once and filters
    /// client-side; the read-through cache in the app layer sits in front
    /// of this call.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, name, company, category,
                   price_cents, stock, min_stock, variants,
                   last_restocked, created_at, revision
            FROM products
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(ProductRow::into_product).collect()
    }

    /// Searches products by name (case-insensitive substring match).
    ///
    /// ## Arguments
    /// * `query` - Search term (can be partial)
    /// * `limit` - Maximum results to return
    pub async fn search(&self, query: &str, limit: u32) -> DbResult<Vec<Product>> {
        let query = query.trim();

        debug!(query = %query, limit = %limit, "Searching products");

        let pattern = format!("%{}%", query);

        let rows = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, name, company, category,
                   price_cents, stock, min_stock, variants,
                   last_restocked, created_at, revision
            FROM products
            WHERE name LIKE ?1
            ORDER BY name
            LIMIT ?2
            "#,
        )
        .bind(&pattern)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = rows.len(), "Search returned products");
        rows.into_iter().map(ProductRow::into_product).collect()
    }

    /// Replaces an existing product record (the store's "put").
    ///
    /// ## Optimistic Concurrency
    /// The update only applies if the stored `revision` still matches the
    /// one carried by `product`. A concurrent writer bumps the revision, so
    /// a stale put fails with `Conflict` and the caller must re-read.
    ///
    /// ## Returns
    /// The product with its new revision.
    pub async fn put(&self, product: &Product) -> DbResult<Product> {
        debug!(id = %product.id, revision = product.revision, "Updating product");

        let variants = variants_json(&product.variants)?;

        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = ?2,
                company = ?3,
                category = ?4,
                price_cents = ?5,
                stock = ?6,
                min_stock = ?7,
                variants = ?8,
                last_restocked = ?9,
                revision = revision + 1
            WHERE id = ?1 AND revision = ?10
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.company)
        .bind(&product.category)
        .bind(product.price_cents)
        .bind(product.stock)
        .bind(product.min_stock)
        .bind(&variants)
        .bind(product.last_restocked)
        .bind(product.revision)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            // Distinguish a stale revision from a deleted product
            return if self.exists(&product.id).await? {
                Err(DbError::conflict("Product", &product.id))
            } else {
                Err(DbError::not_found("Product", &product.id))
            };
        }

        let mut updated = product.clone();
        updated.revision += 1;
        Ok(updated)
    }

    /// Applies a restock and records the audit entry, atomically.
    ///
    /// ## What Happens
    /// ```text
    /// BEGIN
    ///   1. SELECT the product row                 → NotFound if gone
    ///   2. apply_restock (stockbook-core)         → variants + stock + stamp
    ///   3. UPDATE ... WHERE revision = <read one> → Conflict if raced
    ///   4. INSERT INTO restocks (audit entry)
    /// COMMIT
    /// ```
    ///
    /// ## Arguments
    /// * `id` - Product ID
    /// * `quantities` - identifier → additional units (see
    ///   `Product::apply_restock` for aggregate-only products)
    /// * `received_by` - Employee recording the shipment
    pub async fn restock(
        &self,
        id: &str,
        quantities: &HashMap<String, i64>,
        received_by: &str,
    ) -> DbResult<(Product, RestockEntry)> {
        debug!(id = %id, entries = quantities.len(), "Restocking product");

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, name, company, category,
                   price_cents, stock, min_stock, variants,
                   last_restocked, created_at, revision
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| DbError::not_found("Product", id))?;

        let read_revision = row.revision;
        let mut product = row.into_product()?;
        let added = product.apply_restock(quantities, now);
        product.revision = read_revision + 1;

        let variants = variants_json(&product.variants)?;

        let result = sqlx::query(
            r#"
            UPDATE products SET
                stock = ?2,
                variants = ?3,
                last_restocked = ?4,
                revision = revision + 1
            WHERE id = ?1 AND revision = ?5
            "#,
        )
        .bind(id)
        .bind(product.stock)
        .bind(&variants)
        .bind(now)
        .bind(read_revision)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::conflict("Product", id));
        }

        let entry = RestockEntry {
            id: Uuid::new_v4().to_string(),
            product_id: id.to_string(),
            quantity: added,
            received_by: received_by.to_string(),
            verified_by: None,
            status: RestockStatus::Pending,
            created_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO restocks (
                id, product_id, quantity, received_by, verified_by, status, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&entry.id)
        .bind(&entry.product_id)
        .bind(entry.quantity)
        .bind(&entry.received_by)
        .bind(&entry.verified_by)
        .bind(entry.status)
        .bind(entry.created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        debug!(id = %id, added = added, stock = product.stock, "Restock applied");
        Ok((product, entry))
    }

    /// Deletes a product.
    ///
    /// This is a hard delete: the row is removed entirely. Sales keep
    /// reading correctly because they snapshot the product name and price.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Counts total products (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn exists(&self, id: &str) -> DbResult<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE id = ?1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count > 0)
    }
}

/// Helper to generate a new product ID.
///
/// ## Usage
/// ```rust,ignore
/// let id = generate_product_id();
/// let product = Product { id, ... };
/// ```
pub fn generate_product_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================
