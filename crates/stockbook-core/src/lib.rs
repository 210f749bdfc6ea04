//! # stockbook-core: Pure Business Logic for Stockbook
//!
//! This crate is the heart of the Stockbook back office. It contains all
//! business logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     Stockbook Architecture                          │
//! │                                                                     │
//! │  ┌─────────────────────────────────────────────────────────────┐   │
//! │  │                  Web Front-End (forms & tables)             │   │
//! │  └────────────────────────────┬────────────────────────────────┘   │
//! │                               │ HTTP/JSON                          │
//! │  ┌────────────────────────────▼────────────────────────────────┐   │
//! │  │                  apps/backoffice (axum routes)              │   │
//! │  └────────────────────────────┬────────────────────────────────┘   │
//! │                               │                                    │
//! │  ┌────────────────────────────▼────────────────────────────────┐   │
//! │  │              ★ stockbook-core (THIS CRATE) ★                │   │
//! │  │                                                             │   │
//! │  │   ┌──────────┐  ┌──────────┐  ┌──────────┐  ┌───────────┐  │   │
//! │  │   │  types   │  │  stock   │  │  money   │  │ validation│  │   │
//! │  │   │ Product  │  │aggregate │  │  Money   │  │   rules   │  │   │
//! │  │   │  Sale    │  │ classify │  │ balances │  │   checks  │  │   │
//! │  │   └──────────┘  └──────────┘  └──────────┘  └───────────┘  │   │
//! │  │                                                             │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS        │   │
//! │  └────────────────────────────┬────────────────────────────────┘   │
//! │                               │                                    │
//! │  ┌────────────────────────────▼────────────────────────────────┐   │
//! │  │               stockbook-db (Database Layer)                 │   │
//! │  │           SQLite queries, migrations, repositories          │   │
//! │  └─────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Sale, Company, Category, ...)
//! - [`stock`] - Variant aggregation, restock/sale arithmetic, stock status
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in minor units (i64)
//! 4. **Explicit Errors**: All errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod stock;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use stockbook_core::Money` instead of
// `use stockbook_core::money::Money`

pub use error::{CoreError, ValidationError};
pub use money::Money;
pub use stock::{aggregate, classify, StockStatus};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum quantity accepted for a single sale or restock line.
///
/// ## Business Reason
/// Prevents accidental over-entry (e.g., typing 1000 instead of 10).
/// Can be made configurable per-company in future versions.
pub const MAX_LINE_QUANTITY: i64 = 999;

/// Maximum number of variant entries (sizes/colors) on a single product.
///
/// ## Business Reason
/// The inventory form offers six sizes plus free-form colors; anything near
/// this limit indicates bad data entry rather than a real catalog.
pub const MAX_VARIANTS: usize = 50;
