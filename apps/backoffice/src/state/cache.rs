//! # Product Cache
//!
//! Read-through cache for the product list.
//!
//! ## Cache Discipline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                  Read-Through Product Cache                         │
//! │                                                                     │
//! │  GET /products                                                      │
//! │       │                                                             │
//! │       ├── cache filled? ──yes──► serve cached list                  │
//! │       │                                                             │
//! │       └── no ──► db.products().list() ──► fill ──► serve            │
//! │                                                                     │
//! │  POST /products, PUT /products/:id, DELETE /products/:id,           │
//! │  POST /products/:id/restock, POST /sales (stock changed!)           │
//! │       │                                                             │
//! │       └──► invalidate() ── next read refills from the store         │
//! │                                                                     │
//! │  RULES                                                              │
//! │  • The cache only ever holds what the store returned.               │
//! │  • Handlers never write product data into the cache directly,      │
//! │    so it can never be the last writer.                              │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use stockbook_core::Product;

/// Shared in-process cache of the full product list.
///
/// ## Thread Safety
/// `Arc<RwLock<...>>`: many concurrent list reads, exclusive access only
/// for fill/invalidate. Cloning the handle is cheap and shares the cache.
#[derive(Debug, Clone, Default)]
pub struct ProductCache {
    inner: Arc<RwLock<Option<Vec<Product>>>>,
}

impl ProductCache {
    /// Creates a new, empty cache.
    pub fn new() -> Self {
        ProductCache {
            inner: Arc::new(RwLock::new(None)),
        }
    }

    /// Returns the cached list, if filled.
    pub async fn get(&self) -> Option<Vec<Product>> {
        self.inner.read().await.clone()
    }

    /// Fills the cache with a list freshly read from the store and returns
    /// it. Only store reads flow in here.
    pub async fn fill(&self, products: Vec<Product>) -> Vec<Product> {
        debug!(count = products.len(), "Filling product cache");
        let mut guard = self.inner.write().await;
        *guard = Some(products.clone());
        products
    }

    /// Drops the cached list. Called after every mutation that can change
    /// product data - including sales, which decrement stock.
    pub async fn invalidate(&self) {
        debug!("Invalidating product cache");
        let mut guard = self.inner.write().await;
        *guard = None;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn product(name: &str) -> Product {
        let now = Utc::now();
        Product {
            id: format!("p-{}", name.len()),
            name: name.to_string(),
            company: "vargo".to_string(),
            category: "jerseys".to_string(),
            price_cents: 60_000,
            stock: 1,
            min_stock: 0,
            variants: vec![],
            last_restocked: now,
            created_at: now,
            revision: 0,
        }
    }

    #[tokio::test]
    async fn test_empty_cache_misses() {
        let cache = ProductCache::new();
        assert!(cache.get().await.is_none());
    }

    #[tokio::test]
    async fn test_fill_then_get() {
        let cache = ProductCache::new();
        cache.fill(vec![product("Rugby Ball")]).await;

        let cached = cache.get().await.unwrap();
        assert_eq!(cached.len(), 1);
        assert_eq!(cached[0].name, "Rugby Ball");
    }

    #[tokio::test]
    async fn test_invalidate_empties_cache() {
        let cache = ProductCache::new();
        cache.fill(vec![product("Rugby Ball")]).await;
        cache.invalidate().await;
        assert!(cache.get().await.is_none());
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let cache = ProductCache::new();
        let clone = cache.clone();
        cache.fill(vec![product("Rugby Ball")]).await;
        assert!(clone.get().await.is_some());

        clone.invalidate().await;
        assert!(cache.get().await.is_none());
    }
}
