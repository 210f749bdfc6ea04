//! # Sales Routes
//!
//! Handlers behind the sales ledger screen: recording sales, the pending
//! filter, settlement, and customers.
//!
//! ## Screen → Route Mapping
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  Sales Page                                                         │
//! │                                                                     │
//! │  "New Sale" dialog        ──► POST /sales                           │
//! │  Sales table              ──► GET  /sales                           │
//! │  "Show Pending Only"      ──► GET  /sales?pending=true              │
//! │  Settle pending payment   ──► POST /sales/:id/settle                │
//! │  Customer list            ──► GET  /customers, POST /customers      │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Recording a sale changes product stock, so it invalidates the product
//! cache too.

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::{AppState, ConfigState};
use stockbook_core::validation::{
    validate_amount_cents, validate_customer_name, validate_employee_id, validate_id,
    validate_quantity,
};
use stockbook_core::{Customer, Sale};
use stockbook_db::NewSale;

// =============================================================================
// DTOs
// =============================================================================

/// Sale DTO for the ledger table.
///
/// `balance_due_cents` is derived on every read from the snapshotted unit
/// price; `balance_due_display` is pre-formatted with the store currency.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleDto {
    pub id: String,
    pub product_id: String,
    pub product_name: String,
    pub unit_price_cents: i64,
    pub quantity: i64,
    pub amount_cents: i64,
    pub is_pending: bool,
    pub balance_due_cents: i64,
    pub balance_due_display: String,
    pub employee_id: String,
    pub customer_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl SaleDto {
    fn from_sale(sale: Sale, config: &ConfigState) -> Self {
        let balance_due_cents = sale.balance_due_cents();
        SaleDto {
            id: sale.id,
            product_id: sale.product_id,
            product_name: sale.product_name,
            unit_price_cents: sale.unit_price_cents,
            quantity: sale.quantity,
            amount_cents: sale.amount_cents,
            is_pending: sale.is_pending,
            balance_due_cents,
            balance_due_display: config.format_currency(balance_due_cents),
            employee_id: sale.employee_id,
            customer_id: sale.customer_id,
            created_at: sale.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDto {
    pub id: String,
    pub name: String,
    pub contact: String,
    pub pending_cents: i64,
    pub pending_display: String,
    pub created_at: DateTime<Utc>,
}

impl CustomerDto {
    fn from_customer(customer: Customer, config: &ConfigState) -> Self {
        CustomerDto {
            pending_display: config.format_currency(customer.pending_cents),
            id: customer.id,
            name: customer.name,
            contact: customer.contact,
            pending_cents: customer.pending_cents,
            created_at: customer.created_at,
        }
    }
}

// =============================================================================
// Sales
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSalesParams {
    /// The "Show Pending Only" toggle.
    pub pending: Option<bool>,
}

/// Lists sales, newest first.
pub async fn list_sales(
    State(state): State<AppState>,
    Query(params): Query<ListSalesParams>,
) -> Result<Json<Vec<SaleDto>>, ApiError> {
    let sales = state.db.sales().list(params.pending.unwrap_or(false)).await?;

    let dtos = sales
        .into_iter()
        .map(|s| SaleDto::from_sale(s, &state.config))
        .collect();

    Ok(Json(dtos))
}

/// Body of the "Record New Sale" dialog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSaleRequest {
    pub product_id: String,
    pub quantity: i64,
    /// Payment received in cents; may be below the line total for a
    /// pending sale.
    pub amount_cents: i64,
    #[serde(default)]
    pub is_pending: bool,
    pub employee_id: String,
    pub customer_id: Option<String>,
}

/// Records a sale.
///
/// Stock is decremented behind a conditional write, so overselling is
/// rejected with `INSUFFICIENT_STOCK` and stock is left unchanged.
pub async fn create_sale(
    State(state): State<AppState>,
    Json(req): Json<CreateSaleRequest>,
) -> Result<Json<SaleDto>, ApiError> {
    debug!(product_id = %req.product_id, quantity = req.quantity, "create_sale");

    validate_id(&req.product_id)?;
    validate_quantity(req.quantity)?;
    validate_amount_cents(req.amount_cents)?;
    validate_employee_id(&req.employee_id)?;
    if let Some(customer_id) = &req.customer_id {
        validate_id(customer_id)?;
    }

    let new = NewSale {
        product_id: req.product_id,
        quantity: req.quantity,
        amount_cents: req.amount_cents,
        is_pending: req.is_pending,
        employee_id: req.employee_id.trim().to_string(),
        customer_id: req.customer_id,
    };

    let sale = state.db.sales().record(&new).await?;
    // The sale changed product stock
    state.products.invalidate().await;

    info!(sale_id = %sale.id, product = %sale.product_name, quantity = sale.quantity, pending = sale.is_pending, "Sale recorded");
    Ok(Json(SaleDto::from_sale(sale, &state.config)))
}

/// Settles a pending sale: marks it paid in full and clears the
/// customer's share of the balance.
pub async fn settle_sale(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SaleDto>, ApiError> {
    let sale = state.db.sales().settle(&id).await?;

    info!(sale_id = %id, "Sale settled");
    Ok(Json(SaleDto::from_sale(sale, &state.config)))
}

// =============================================================================
// Customers
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomerRequest {
    pub name: String,
    pub contact: String,
}

/// Lists customers with their outstanding balances.
pub async fn list_customers(
    State(state): State<AppState>,
) -> Result<Json<Vec<CustomerDto>>, ApiError> {
    let customers = state.db.customers().list().await?;

    let dtos = customers
        .into_iter()
        .map(|c| CustomerDto::from_customer(c, &state.config))
        .collect();

    Ok(Json(dtos))
}

/// Creates a customer.
pub async fn create_customer(
    State(state): State<AppState>,
    Json(req): Json<CreateCustomerRequest>,
) -> Result<Json<CustomerDto>, ApiError> {
    validate_customer_name(&req.name)?;

    let customer = state
        .db
        .customers()
        .insert(req.name.trim(), req.contact.trim())
        .await?;

    info!(id = %customer.id, "Customer created");
    Ok(Json(CustomerDto::from_customer(customer, &state.config)))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::routes::inventory::{create_product, CreateProductRequest};
    use stockbook_db::{Database, DbConfig};

    async fn test_state() -> AppState {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        AppState::new(db, ConfigState::default())
    }

    async fn seed_product(state: &AppState, stock: i64, price_cents: i64) -> String {
        let Json(dto) = create_product(
            State(state.clone()),
            Json(CreateProductRequest {
                name: "Rugby Ball".to_string(),
                company: "sportcheck".to_string(),
                category: "balls".to_string(),
                min_stock: 0,
                price_cents,
                variants: vec![],
                stock: Some(stock),
            }),
        )
        .await
        .unwrap();
        dto.id
    }

    fn sale_request(product_id: &str, quantity: i64, amount_cents: i64, is_pending: bool) -> CreateSaleRequest {
        CreateSaleRequest {
            product_id: product_id.to_string(),
            quantity,
            amount_cents,
            is_pending,
            employee_id: "jane".to_string(),
            customer_id: None,
        }
    }

    #[tokio::test]
    async fn test_create_sale_decrements_stock() {
        let state = test_state().await;
        let product_id = seed_product(&state, 10, 50_000).await;

        let Json(sale) = create_sale(
            State(state.clone()),
            Json(sale_request(&product_id, 4, 200_000, false)),
        )
        .await
        .unwrap();

        assert_eq!(sale.quantity, 4);
        assert_eq!(sale.balance_due_cents, 0);

        let product = state
            .db
            .products()
            .get_by_id(&product_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(product.stock, 6);
        // Stock changed, so the product cache was dropped
        assert!(state.products.get().await.is_none());
    }

    #[tokio::test]
    async fn test_oversell_rejected() {
        let state = test_state().await;
        let product_id = seed_product(&state, 3, 50_000).await;

        let err = create_sale(
            State(state.clone()),
            Json(sale_request(&product_id, 5, 0, true)),
        )
        .await
        .unwrap_err();

        assert_eq!(err.code, ErrorCode::InsufficientStock);

        let product = state
            .db
            .products()
            .get_by_id(&product_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(product.stock, 3);
    }

    #[tokio::test]
    async fn test_pending_sale_and_settlement() {
        let state = test_state().await;
        let product_id = seed_product(&state, 10, 60_000).await;

        let Json(customer) = create_customer(
            State(state.clone()),
            Json(CreateCustomerRequest {
                name: "John Doe".to_string(),
                contact: "0700-000000".to_string(),
            }),
        )
        .await
        .unwrap();

        let mut req = sale_request(&product_id, 2, 50_000, true);
        req.customer_id = Some(customer.id.clone());
        let Json(sale) = create_sale(State(state.clone()), Json(req)).await.unwrap();

        assert!(sale.is_pending);
        assert_eq!(sale.balance_due_cents, 70_000);
        assert_eq!(sale.balance_due_display, "USh 70000");

        let Json(pending) = list_sales(
            State(state.clone()),
            Query(ListSalesParams { pending: Some(true) }),
        )
        .await
        .unwrap();
        assert_eq!(pending.len(), 1);

        let Json(settled) = settle_sale(State(state.clone()), Path(sale.id.clone()))
            .await
            .unwrap();
        assert!(!settled.is_pending);
        assert_eq!(settled.balance_due_cents, 0);

        let Json(customers) = list_customers(State(state.clone())).await.unwrap();
        assert_eq!(customers[0].pending_cents, 0);

        let Json(pending_after) = list_sales(
            State(state),
            Query(ListSalesParams { pending: Some(true) }),
        )
        .await
        .unwrap();
        assert!(pending_after.is_empty());
    }

    #[tokio::test]
    async fn test_create_sale_validation() {
        let state = test_state().await;
        let product_id = seed_product(&state, 10, 50_000).await;

        let err = create_sale(
            State(state.clone()),
            Json(sale_request(&product_id, 0, 0, false)),
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = create_sale(
            State(state),
            Json(sale_request("not-a-uuid", 1, 0, false)),
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_sale_against_missing_product() {
        let state = test_state().await;
        let err = create_sale(
            State(state),
            Json(sale_request(
                "550e8400-e29b-41d4-a716-446655440000",
                1,
                0,
                false,
            )),
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
