//! # Routes
//!
//! Router assembly for the back-office API. Route modules mirror the
//! screens: [`inventory`] for the inventory page, [`sales`] for the sales
//! ledger page.

pub mod inventory;
pub mod sales;

use axum::extract::State;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::Serialize;

use crate::error::ApiError;
use crate::state::AppState;

/// Builds the full application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        // Diagnostics
        .route("/health", get(health))
        .route("/config", get(get_config))
        // Inventory screen
        .route(
            "/products",
            get(inventory::list_products).post(inventory::create_product),
        )
        .route(
            "/products/:id",
            get(inventory::get_product)
                .put(inventory::update_product)
                .delete(inventory::delete_product),
        )
        .route("/products/:id/restock", post(inventory::restock_product))
        .route(
            "/companies",
            get(inventory::list_companies).post(inventory::create_company),
        )
        .route("/companies/:id", delete(inventory::delete_company))
        .route(
            "/categories",
            get(inventory::list_categories).post(inventory::create_category),
        )
        .route("/categories/:id", delete(inventory::delete_category))
        .route("/restocks", get(inventory::list_restocks))
        .route("/restocks/:id/verify", post(inventory::verify_restock))
        .route("/restocks/:id/dispute", post(inventory::dispute_restock))
        // Sales screen
        .route("/sales", get(sales::list_sales).post(sales::create_sale))
        .route("/sales/:id/settle", post(sales::settle_sale))
        .route(
            "/customers",
            get(sales::list_customers).post(sales::create_customer),
        )
        .with_state(state)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    status: &'static str,
}

/// Liveness check: verifies the store answers a trivial query.
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let status = if state.db.health_check().await {
        "ok"
    } else {
        "degraded"
    };
    Json(HealthResponse { status })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ConfigResponse {
    store_name: String,
    currency_code: String,
    currency_symbol: String,
    currency_decimals: u8,
}

/// Returns the display configuration the front-end needs at boot.
async fn get_config(State(state): State<AppState>) -> Result<Json<ConfigResponse>, ApiError> {
    Ok(Json(ConfigResponse {
        store_name: state.config.store_name.clone(),
        currency_code: state.config.currency_code.clone(),
        currency_symbol: state.config.currency_symbol.clone(),
        currency_decimals: state.config.currency_decimals,
    }))
}
