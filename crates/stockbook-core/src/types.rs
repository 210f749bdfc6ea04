//! # Domain Types
//!
//! Core domain types used throughout the Stockbook back office.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                │
//! │                                                                     │
//! │  ┌───────────────┐   ┌───────────────┐   ┌───────────────┐         │
//! │  │   Product     │   │     Sale      │   │   Customer    │         │
//! │  │ ───────────── │   │ ───────────── │   │ ───────────── │         │
//! │  │ id (UUID)     │   │ id (UUID)     │   │ id (UUID)     │         │
//! │  │ company/categ │   │ product_id    │   │ name/contact  │         │
//! │  │ stock+variants│   │ qty + amount  │   │ pending_cents │         │
//! │  │ min_stock     │   │ is_pending    │   └───────────────┘         │
//! │  └───────────────┘   └───────────────┘                             │
//! │                                                                     │
//! │  ┌───────────────┐   ┌───────────────┐   ┌───────────────┐         │
//! │  │   Company     │   │   Category    │   │ RestockEntry  │         │
//! │  │ name + code   │   │ name, company │   │ audit trail   │         │
//! │  └───────────────┘   └───────────────┘   └───────────────┘         │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Every entity carries a UUID v4 string id assigned at creation time.
//! Companies additionally have a human-entered `code` - the business
//! identifier products and categories reference.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::stock::{self, StockStatus};

// =============================================================================
// Variant
// =============================================================================

/// One entry of a product's stock breakdown: a size ("M", "XL") or a color
/// ("Red"), with the quantity currently on hand for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Variant {
    /// Size or color label shown on the inventory screen.
    pub identifier: String,

    /// Units on hand for this variant. Never negative.
    pub quantity: i64,
}

impl Variant {
    pub fn new(identifier: impl Into<String>, quantity: i64) -> Self {
        Variant {
            identifier: identifier.into(),
            quantity,
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product in the inventory.
///
/// ## The Stock Invariant
/// When `variants` is non-empty, `stock` always equals the sum of the
/// variants' quantities after any mutation. When `variants` is empty the
/// product is tracked in aggregate and `stock` is mutated directly.
///
/// ## Revision
/// `revision` increases on every write and is the token for conditional
/// updates in the store; it never reaches the front-end forms.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4), assigned on creation.
    pub id: String,

    /// Display name shown on the inventory and sales screens.
    pub name: String,

    /// Code of the company this product belongs to.
    pub company: String,

    /// Id of the category this product belongs to.
    pub category: String,

    /// Unit price in cents (smallest currency unit).
    pub price_cents: i64,

    /// Authoritative total quantity on hand.
    pub stock: i64,

    /// Threshold below which the product counts as low stock.
    pub min_stock: i64,

    /// Per-size/per-color breakdown; empty when tracked in aggregate.
    pub variants: Vec<Variant>,

    /// When stock was last received.
    #[ts(as = "String")]
    pub last_restocked: DateTime<Utc>,

    /// When the product was created.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// Optimistic concurrency token. Bumped by the store on every write.
    #[serde(default)]
    pub revision: i64,
}

impl Product {
    /// Returns the unit price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Derives the current stock status.
    ///
    /// Always computed from `stock` and `min_stock`; never stored, so it
    /// cannot drift.
    #[inline]
    pub fn stock_status(&self) -> StockStatus {
        stock::classify(self.stock, self.min_stock)
    }

    /// Checks whether a sale of `quantity` units can be recorded.
    pub fn can_sell(&self, quantity: i64) -> bool {
        self.stock >= quantity
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A recorded sale.
///
/// Uses the snapshot pattern: the product's name and unit price are frozen
/// onto the sale at recording time, so the ledger keeps reading correctly
/// even if the product is renamed, repriced, or deleted later.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Sale {
    pub id: String,

    /// Reference to the sold product; does not own it.
    pub product_id: String,

    /// Product name at time of sale (frozen).
    pub product_name: String,

    /// Unit price in cents at time of sale (frozen).
    pub unit_price_cents: i64,

    /// Units sold.
    pub quantity: i64,

    /// Payment received in cents. May be less than the line total when the
    /// sale is pending.
    pub amount_cents: i64,

    /// True while payment is outstanding.
    pub is_pending: bool,

    /// Who recorded the sale.
    pub employee_id: String,

    /// The customer owing the balance, when the sale is pending.
    pub customer_id: Option<String>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Sale {
    /// The full value of the sale line (unit price × quantity).
    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.unit_price_cents).saturating_mul(self.quantity)
    }

    /// Outstanding balance: `price × quantity - amount` while pending,
    /// zero once paid.
    pub fn balance_due(&self) -> Money {
        if self.is_pending {
            self.line_total() - Money::from_cents(self.amount_cents)
        } else {
            Money::zero()
        }
    }

    /// Outstanding balance in cents, for serialization.
    #[inline]
    pub fn balance_due_cents(&self) -> i64 {
        self.balance_due().cents()
    }
}

// =============================================================================
// Company
// =============================================================================

/// A company (brand/tenant) whose goods the back office manages.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Company {
    pub id: String,

    /// Display name ("Vargo Sports").
    pub name: String,

    /// Business identifier ("vargo"), unique across the store. Products and
    /// categories reference companies by this code.
    pub code: String,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Category
// =============================================================================

/// A product category within a company.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Category {
    pub id: String,

    /// Category name, unique across the store.
    pub name: String,

    /// Code of the owning company.
    pub company: String,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Customer
// =============================================================================

/// A customer, tracked for pending-payment sales.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Customer {
    pub id: String,

    pub name: String,

    /// Free-form contact info (phone number, usually).
    pub contact: String,

    /// Total outstanding balance across this customer's pending sales.
    /// Raised when a pending sale is recorded, reduced on settlement.
    pub pending_cents: i64,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Customer {
    /// Outstanding balance as Money.
    #[inline]
    pub fn pending(&self) -> Money {
        Money::from_cents(self.pending_cents)
    }
}

// =============================================================================
// Restock Entry
// =============================================================================

/// Verification state of a received shipment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum RestockStatus {
    /// Recorded, awaiting verification by a second employee.
    Pending,
    /// Counted and confirmed.
    Verified,
    /// Counts don't match what was recorded.
    Disputed,
}

impl Default for RestockStatus {
    fn default() -> Self {
        RestockStatus::Pending
    }
}

/// One restock operation: how many units were received for a product,
/// by whom, and whether the count has been verified.
///
/// Written in the same transaction as the product's stock update.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RestockEntry {
    pub id: String,

    pub product_id: String,

    /// Total units received across all variants in this operation.
    pub quantity: i64,

    /// Employee who received the shipment.
    pub received_by: String,

    /// Employee who verified the count, once verified.
    pub verified_by: Option<String>,

    pub status: RestockStatus,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sale(quantity: i64, amount_cents: i64, is_pending: bool) -> Sale {
        Sale {
            id: "s-1".to_string(),
            product_id: "p-1".to_string(),
            product_name: "Manchester United Jersey".to_string(),
            unit_price_cents: 60_000,
            quantity,
            amount_cents,
            is_pending,
            employee_id: "e-1".to_string(),
            customer_id: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_balance_due_pending() {
        // 2 × 60000 - 50000 = 70000 outstanding
        let s = sale(2, 50_000, true);
        assert_eq!(s.balance_due_cents(), 70_000);
    }

    #[test]
    fn test_balance_due_paid() {
        let s = sale(2, 50_000, false);
        assert_eq!(s.balance_due_cents(), 0);
    }

    #[test]
    fn test_line_total() {
        let s = sale(5, 0, true);
        assert_eq!(s.line_total().cents(), 300_000);
    }

    #[test]
    fn test_restock_status_default() {
        assert_eq!(RestockStatus::default(), RestockStatus::Pending);
    }

    #[test]
    fn test_money_accessors() {
        let p = Product {
            id: "p-1".to_string(),
            name: "Rugby Ball".to_string(),
            company: "sportcheck".to_string(),
            category: "balls".to_string(),
            price_cents: 50_000,
            stock: 5,
            min_stock: 1,
            variants: vec![],
            last_restocked: Utc::now(),
            created_at: Utc::now(),
            revision: 0,
        };
        assert_eq!(p.price().cents(), 50_000);

        let c = Customer {
            id: "c-1".to_string(),
            name: "John Doe".to_string(),
            contact: "0700-000000".to_string(),
            pending_cents: 70_000,
            created_at: Utc::now(),
        };
        assert_eq!(c.pending().cents(), 70_000);
    }
}
