//! Binary entry point for the Stockbook back-office API.

use tracing::info;

use backoffice::state::{AppState, ConfigState};
use backoffice::{default_database_path, init_tracing, routes};
use stockbook_db::{Database, DbConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    info!("Starting Stockbook back office");

    let config = ConfigState::from_env();

    let db_path = match &config.database_path {
        Some(path) => path.clone(),
        None => default_database_path()?,
    };
    info!(path = %db_path.display(), "Database path determined");

    let db = Database::new(DbConfig::new(db_path)).await?;
    info!("Database connected and migrations applied");

    let bind_addr = config.bind_addr.clone();
    let state = AppState::new(db, config);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(addr = %bind_addr, "Listening");

    axum::serve(listener, routes::router(state)).await?;

    Ok(())
}
