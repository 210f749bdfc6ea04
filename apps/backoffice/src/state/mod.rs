//! # Application State
//!
//! Shared state for the HTTP handlers.
//!
//! ## State Pieces
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       AppState                                      │
//! │                                                                     │
//! │  ┌────────────────┐ ┌────────────────┐ ┌────────────────────────┐  │
//! │  │   Database     │ │  ProductCache  │ │     ConfigState        │  │
//! │  │                │ │                │ │                        │  │
//! │  │ • pool         │ │ • product list │ │ • bind address         │  │
//! │  │ • repositories │ │ • read-through │ │ • store name, currency │  │
//! │  └────────────────┘ └────────────────┘ └────────────────────────┘  │
//! │                                                                     │
//! │  Each handler takes the whole state and uses what it needs.         │
//! │  Everything inside is cheaply cloneable (pools and Arcs).           │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

pub mod cache;
pub mod config;

use std::sync::Arc;

pub use cache::ProductCache;
pub use config::ConfigState;
use stockbook_db::Database;

/// Shared application state handed to every handler by axum.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Database handle (wraps the connection pool).
    pub db: Database,

    /// Read-through cache of the product list.
    pub products: ProductCache,

    /// Read-only configuration.
    pub config: Arc<ConfigState>,
}

impl AppState {
    /// Creates the application state from an opened database and config.
    pub fn new(db: Database, config: ConfigState) -> Self {
        AppState {
            db,
            products: ProductCache::new(),
            config: Arc::new(config),
        }
    }
}
