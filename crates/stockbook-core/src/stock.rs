//! # Stock Arithmetic
//!
//! The stock-reconciliation core: variant aggregation, restock and sale
//! mutations, and low-stock classification.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                   Stock Reconciliation                              │
//! │                                                                     │
//! │  Restock form {S: 10, M: 5}                                         │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  Product::apply_restock ──► each named variant += addition          │
//! │       │                     unnamed variants unchanged              │
//! │       ▼                                                             │
//! │  stock = aggregate(variants)   ◄── the invariant, restored here     │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  classify(stock, min_stock) ──► Low | Normal  (on every read)       │
//! │                                                                     │
//! │  Sale of qty Q                                                      │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  Product::deduct_sale ──► stock -= Q, rejected if it would go < 0   │
//! │                           (aggregate only; variants untouched)      │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every function here is pure; persistence of the results is the store's
//! job (stockbook-db), which also guards against concurrent writers.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::types::{Product, Variant};

// =============================================================================
// Variant Aggregator
// =============================================================================

/// Sums the quantities of a variant breakdown.
///
/// Returns 0 for an empty sequence. Quantities are assumed non-negative;
/// callers validate before mutation.
///
/// ## Example
/// ```rust
/// use stockbook_core::{aggregate, Variant};
///
/// let variants = vec![Variant::new("S", 10), Variant::new("M", 5)];
/// assert_eq!(aggregate(&variants), 15);
/// assert_eq!(aggregate(&[]), 0);
/// ```
#[inline]
pub fn aggregate(variants: &[Variant]) -> i64 {
    variants.iter().map(|v| v.quantity).sum()
}

// =============================================================================
// Status Classifier
// =============================================================================

/// Stock level relative to the product's configured minimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    /// Stock has fallen below the minimum threshold.
    Low,
    /// Stock is at or above the minimum threshold.
    Normal,
}

/// Classifies a stock level against a minimum threshold.
///
/// `Low` when `stock < min_stock`; equal counts as `Normal`. This is the
/// single place the comparison lives - screens and repositories derive the
/// badge from here on every read instead of persisting it.
///
/// ## Example
/// ```rust
/// use stockbook_core::{classify, StockStatus};
///
/// assert_eq!(classify(4, 5), StockStatus::Low);
/// assert_eq!(classify(5, 5), StockStatus::Normal);
/// ```
#[inline]
pub fn classify(stock: i64, min_stock: i64) -> StockStatus {
    if stock < min_stock {
        StockStatus::Low
    } else {
        StockStatus::Normal
    }
}

// =============================================================================
// Stock Mutator (pure half)
// =============================================================================

impl Product {
    /// Applies a restock to this product and returns the number of units
    /// added.
    ///
    /// ## Behavior
    /// - With variants: every variant whose identifier appears in
    ///   `quantities` gains that addition; variants not mentioned are
    ///   unchanged; identifiers that match no variant are ignored. The
    ///   aggregate `stock` is then recomputed as the variant sum.
    /// - Without variants: the sum of all mapped quantities is added to the
    ///   aggregate `stock` directly.
    ///
    /// `last_restocked` is refreshed either way.
    pub fn apply_restock(&mut self, quantities: &HashMap<String, i64>, now: DateTime<Utc>) -> i64 {
        let before = self.stock;

        if self.variants.is_empty() {
            self.stock += quantities.values().sum::<i64>();
        } else {
            for variant in &mut self.variants {
                if let Some(addition) = quantities.get(&variant.identifier) {
                    variant.quantity += addition;
                }
            }
            self.stock = aggregate(&self.variants);
        }

        self.last_restocked = now;
        self.stock - before
    }

    /// Deducts a sale quantity from the aggregate stock.
    ///
    /// Rejected with [`CoreError::InsufficientStock`] if the result would be
    /// negative, leaving the product unchanged. Variant quantities are not
    /// touched: the sales form does not say which size/color was sold, so
    /// the deduction applies to the aggregate only.
    pub fn deduct_sale(&mut self, quantity: i64) -> CoreResult<()> {
        if !self.can_sell(quantity) {
            return Err(CoreError::InsufficientStock {
                product: self.name.clone(),
                available: self.stock,
                requested: quantity,
            });
        }

        self.stock -= quantity;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product(stock: i64, min_stock: i64, variants: Vec<Variant>) -> Product {
        Product {
            id: "p-1".to_string(),
            name: "Football Jersey".to_string(),
            company: "vargo".to_string(),
            category: "c-1".to_string(),
            price_cents: 60_000,
            stock,
            min_stock,
            variants,
            last_restocked: Utc::now(),
            created_at: Utc::now(),
            revision: 0,
        }
    }

    #[test]
    fn test_aggregate_sums_quantities() {
        let variants = vec![
            Variant::new("S", 3),
            Variant::new("M", 7),
            Variant::new("Red", 2),
        ];
        assert_eq!(aggregate(&variants), 12);
    }

    #[test]
    fn test_aggregate_empty_is_zero() {
        assert_eq!(aggregate(&[]), 0);
    }

    #[test]
    fn test_classify_boundary() {
        assert_eq!(classify(4, 5), StockStatus::Low);
        assert_eq!(classify(5, 5), StockStatus::Normal);
        assert_eq!(classify(0, 0), StockStatus::Normal);
    }

    #[test]
    fn test_restock_named_variants() {
        // S: 3 → 8, M untouched, aggregate rises by exactly 5
        let mut p = product(10, 0, vec![Variant::new("S", 3), Variant::new("M", 7)]);
        let mut additions = HashMap::new();
        additions.insert("S".to_string(), 5);

        let added = p.apply_restock(&additions, Utc::now());

        assert_eq!(added, 5);
        assert_eq!(p.variants[0].quantity, 8);
        assert_eq!(p.variants[1].quantity, 7);
        assert_eq!(p.stock, 15);
    }

    #[test]
    fn test_restock_restores_invariant() {
        let mut p = product(0, 0, vec![Variant::new("S", 0), Variant::new("M", 0)]);
        let mut additions = HashMap::new();
        additions.insert("S".to_string(), 10);
        additions.insert("M".to_string(), 5);

        p.apply_restock(&additions, Utc::now());

        assert_eq!(p.stock, 15);
        assert_eq!(p.stock, aggregate(&p.variants));
        assert_eq!(p.variants[0].quantity, 10);
        assert_eq!(p.variants[1].quantity, 5);
    }

    #[test]
    fn test_restock_unknown_identifier_ignored() {
        let mut p = product(3, 0, vec![Variant::new("S", 3)]);
        let mut additions = HashMap::new();
        additions.insert("XXL".to_string(), 5);

        let added = p.apply_restock(&additions, Utc::now());

        assert_eq!(added, 0);
        assert_eq!(p.stock, 3);
    }

    #[test]
    fn test_restock_aggregate_only_product() {
        let mut p = product(4, 0, vec![]);
        let mut additions = HashMap::new();
        additions.insert("general".to_string(), 6);

        let added = p.apply_restock(&additions, Utc::now());

        assert_eq!(added, 6);
        assert_eq!(p.stock, 10);
        assert!(p.variants.is_empty());
    }

    #[test]
    fn test_restock_refreshes_last_restocked() {
        let mut p = product(0, 0, vec![Variant::new("S", 0)]);
        let stamp = Utc::now();
        p.apply_restock(&HashMap::new(), stamp);
        assert_eq!(p.last_restocked, stamp);
    }

    #[test]
    fn test_deduct_sale_ok() {
        let mut p = product(10, 2, vec![]);
        p.deduct_sale(4).unwrap();
        assert_eq!(p.stock, 6);
    }

    #[test]
    fn test_deduct_sale_insufficient_leaves_stock_unchanged() {
        let mut p = product(3, 0, vec![]);
        let err = p.deduct_sale(5).unwrap_err();

        assert!(matches!(
            err,
            CoreError::InsufficientStock {
                available: 3,
                requested: 5,
                ..
            }
        ));
        assert_eq!(p.stock, 3);
    }

    #[test]
    fn test_deduct_sale_exact_stock_allowed() {
        let mut p = product(5, 5, vec![]);
        p.deduct_sale(5).unwrap();
        assert_eq!(p.stock, 0);
        assert_eq!(p.stock_status(), StockStatus::Low);
    }

    #[test]
    fn test_status_recomputed_after_mutations() {
        let mut p = product(6, 5, vec![]);
        assert_eq!(p.stock_status(), StockStatus::Normal);

        p.deduct_sale(2).unwrap();
        assert_eq!(p.stock_status(), StockStatus::Low);

        let mut additions = HashMap::new();
        additions.insert("general".to_string(), 10);
        p.apply_restock(&additions, Utc::now());
        assert_eq!(p.stock_status(), StockStatus::Normal);
    }
}
