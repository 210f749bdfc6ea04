//! # Stockbook Back-Office Library
//!
//! Core library for the Stockbook back-office HTTP API.
//!
//! ## Module Organization
//! ```text
//! backoffice/
//! ├── lib.rs            ◄─── You are here (bootstrap helpers)
//! ├── main.rs           ◄─── Binary entry point
//! ├── state/
//! │   ├── mod.rs        ◄─── AppState
//! │   ├── cache.rs      ◄─── Read-through product cache
//! │   └── config.rs     ◄─── Configuration state
//! ├── routes/
//! │   ├── mod.rs        ◄─── Router assembly, health, config
//! │   ├── inventory.rs  ◄─── Inventory screen routes
//! │   └── sales.rs      ◄─── Sales ledger routes
//! └── error.rs          ◄─── API error type for handlers
//! ```
//!
//! ## Startup Sequence
//! ```text
//! 1. Initialize tracing (env filter, RUST_LOG overridable)
//! 2. Load configuration (STOCKBOOK_* env vars over defaults)
//! 3. Resolve the database path (env override or platform data dir)
//! 4. Open the database (WAL mode, run migrations)
//! 5. Build AppState and serve the router
//! ```

pub mod error;
pub mod routes;
pub mod state;

use std::path::PathBuf;

use directories::ProjectDirs;
use tracing_subscriber::EnvFilter;

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=stockbook=trace` - Trace for stockbook crates only
/// - Default: INFO level, debug for our crates, warnings from sqlx
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,stockbook=debug,backoffice=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Determines the default database file path for the platform.
///
/// ## Platform-Specific Paths
/// - **macOS**: `~/Library/Application Support/com.stockbook.backoffice/stockbook.db`
/// - **Windows**: `%APPDATA%\stockbook\backoffice\stockbook.db`
/// - **Linux**: `~/.local/share/stockbook-backoffice/stockbook.db`
///
/// Use `STOCKBOOK_DB_PATH` to override (handled by `ConfigState::from_env`).
pub fn default_database_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let proj_dirs = ProjectDirs::from("com", "stockbook", "backoffice")
        .ok_or("Could not determine app data directory")?;

    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)?;

    Ok(data_dir.join("stockbook.db"))
}
