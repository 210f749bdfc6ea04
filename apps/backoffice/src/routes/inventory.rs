//! # Inventory Routes
//!
//! Handlers behind the inventory management screen: companies, categories,
//! products, restocking, and the restock audit trail.
//!
//! ## Screen → Route Mapping
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  Inventory Page                                                     │
//! │                                                                     │
//! │  "Add Company" dialog    ──► POST   /companies                      │
//! │  "Add Category" dialog   ──► POST   /categories                     │
//! │  "Add Product" dialog    ──► POST   /products                       │
//! │  Product table           ──► GET    /products?company=&category=&   │
//! │                                     q=&lowStock=true                │
//! │  "Restock" dialog        ──► POST   /products/:id/restock           │
//! │  "Delete" button         ──► DELETE /products/:id                   │
//! │  Shipment review         ──► GET    /restocks,                      │
//! │                              POST   /restocks/:id/verify | dispute  │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every mutation invalidates the product cache; the next list re-reads
//! from the store.

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::AppState;
use stockbook_core::validation::{
    validate_company_code, validate_company_name, validate_category_name, validate_employee_id,
    validate_min_stock, validate_price_cents, validate_product_name, validate_restock_quantities,
    validate_variants,
};
use stockbook_core::{aggregate, Category, Company, Product, RestockEntry, RestockStatus,
    StockStatus, Variant};
use stockbook_db::generate_product_id;

// =============================================================================
// DTOs
// =============================================================================

/// Product DTO for the front-end.
///
/// ## Why DTO?
/// - Decouples the domain model from the API contract
/// - Carries the derived `status` field, recomputed on every read
/// - serde renames to camelCase for JS consumption
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: String,
    pub name: String,
    pub company: String,
    pub category: String,
    pub price_cents: i64,
    pub stock: i64,
    pub min_stock: i64,
    pub variants: Vec<Variant>,
    /// Derived low-stock badge; never stored.
    pub status: StockStatus,
    pub last_restocked: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl From<Product> for ProductDto {
    fn from(p: Product) -> Self {
        let status = p.stock_status();
        ProductDto {
            id: p.id,
            name: p.name,
            company: p.company,
            category: p.category,
            price_cents: p.price_cents,
            stock: p.stock,
            min_stock: p.min_stock,
            variants: p.variants,
            status,
            last_restocked: p.last_restocked,
            created_at: p.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyDto {
    pub id: String,
    pub name: String,
    pub code: String,
    pub created_at: DateTime<Utc>,
}

impl From<Company> for CompanyDto {
    fn from(c: Company) -> Self {
        CompanyDto {
            id: c.id,
            name: c.name,
            code: c.code,
            created_at: c.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDto {
    pub id: String,
    pub name: String,
    pub company: String,
    pub created_at: DateTime<Utc>,
}

impl From<Category> for CategoryDto {
    fn from(c: Category) -> Self {
        CategoryDto {
            id: c.id,
            name: c.name,
            company: c.company,
            created_at: c.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestockEntryDto {
    pub id: String,
    pub product_id: String,
    pub quantity: i64,
    pub received_by: String,
    pub verified_by: Option<String>,
    pub status: RestockStatus,
    pub created_at: DateTime<Utc>,
}

impl From<RestockEntry> for RestockEntryDto {
    fn from(e: RestockEntry) -> Self {
        RestockEntryDto {
            id: e.id,
            product_id: e.product_id,
            quantity: e.quantity,
            received_by: e.received_by,
            verified_by: e.verified_by,
            status: e.status,
            created_at: e.created_at,
        }
    }
}

// =============================================================================
// Products
// =============================================================================

/// Filters for the product list, mirroring the screen's tabs and inputs.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListProductsParams {
    /// Company tab (company code).
    pub company: Option<String>,
    /// Category dropdown (category id).
    pub category: Option<String>,
    /// Search box (product name substring).
    pub q: Option<String>,
    /// "Low Stock" tab.
    pub low_stock: Option<bool>,
}

/// Lists products with the screen's filters applied.
///
/// ## Read Path
/// - With `q`: live name search against the store (search results should
///   not be a cache's eventual view of the world)
/// - Without `q`: read-through cache of the full list, filters applied
///   in-process the way the page applies them client-side
pub async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<ListProductsParams>,
) -> Result<Json<Vec<ProductDto>>, ApiError> {
    debug!(?params, "list_products");

    let products = if let Some(q) = params.q.as_deref().filter(|q| !q.trim().is_empty()) {
        state.db.products().search(q, 100).await?
    } else {
        match state.products.get().await {
            Some(cached) => cached,
            None => {
                let fresh = state.db.products().list().await?;
                state.products.fill(fresh).await
            }
        }
    };

    let dtos: Vec<ProductDto> = products
        .into_iter()
        .filter(|p| match params.company.as_deref() {
            Some(company) => p.company == company,
            None => true,
        })
        .filter(|p| match params.category.as_deref() {
            Some(category) => p.category == category,
            None => true,
        })
        .filter(|p| {
            // The one place the low-stock tab is decided: the classifier
            !params.low_stock.unwrap_or(false) || p.stock_status() == StockStatus::Low
        })
        .map(ProductDto::from)
        .collect();

    Ok(Json(dtos))
}

/// Body of the "Add Product" dialog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub name: String,
    /// Company code.
    pub company: String,
    /// Category id.
    pub category: String,
    pub min_stock: i64,
    pub price_cents: i64,
    /// Size/color breakdown; empty (or omitted) for aggregate-only products.
    #[serde(default)]
    pub variants: Vec<Variant>,
    /// Initial aggregate stock, only honored when `variants` is empty.
    pub stock: Option<i64>,
}

/// Creates a product.
///
/// With variants, the initial stock is their sum; without, the optional
/// `stock` field seeds the aggregate.
pub async fn create_product(
    State(state): State<AppState>,
    Json(req): Json<CreateProductRequest>,
) -> Result<Json<ProductDto>, ApiError> {
    validate_product_name(&req.name)?;
    if req.company.trim().is_empty() || req.category.trim().is_empty() {
        return Err(ApiError::validation("Please fill in all product details"));
    }
    validate_min_stock(req.min_stock)?;
    validate_price_cents(req.price_cents)?;
    validate_variants(&req.variants)?;

    let stock = if req.variants.is_empty() {
        let stock = req.stock.unwrap_or(0);
        validate_min_stock(stock).map_err(|_| ApiError::validation("stock must not be negative"))?;
        stock
    } else {
        aggregate(&req.variants)
    };

    let now = Utc::now();
    let product = Product {
        id: generate_product_id(),
        name: req.name.trim().to_string(),
        company: req.company.trim().to_string(),
        category: req.category.trim().to_string(),
        price_cents: req.price_cents,
        stock,
        min_stock: req.min_stock,
        variants: req.variants,
        last_restocked: now,
        created_at: now,
        revision: 0,
    };

    let inserted = state.db.products().insert(&product).await?;
    state.products.invalidate().await;

    info!(id = %inserted.id, name = %inserted.name, stock = inserted.stock, "Product created");
    Ok(Json(ProductDto::from(inserted)))
}

/// Gets a single product.
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProductDto>, ApiError> {
    let product = state
        .db
        .products()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product", &id))?;

    Ok(Json(ProductDto::from(product)))
}

/// Body of the product edit form. Stock and variants are deliberately
/// absent: they change only through restocks and sales.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    pub name: String,
    pub company: String,
    pub category: String,
    pub min_stock: i64,
    pub price_cents: i64,
}

/// Updates a product's descriptive fields via a guarded put.
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateProductRequest>,
) -> Result<Json<ProductDto>, ApiError> {
    validate_product_name(&req.name)?;
    if req.company.trim().is_empty() || req.category.trim().is_empty() {
        return Err(ApiError::validation("Please fill in all product details"));
    }
    validate_min_stock(req.min_stock)?;
    validate_price_cents(req.price_cents)?;

    let mut product = state
        .db
        .products()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product", &id))?;

    product.name = req.name.trim().to_string();
    product.company = req.company.trim().to_string();
    product.category = req.category.trim().to_string();
    product.min_stock = req.min_stock;
    product.price_cents = req.price_cents;

    let updated = state.db.products().put(&product).await?;
    state.products.invalidate().await;

    Ok(Json(ProductDto::from(updated)))
}

/// Deletes a product.
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.db.products().delete(&id).await?;
    state.products.invalidate().await;

    info!(id = %id, "Product deleted");
    Ok(Json(serde_json::json!({ "deleted": id })))
}

/// Body of the "Restock" dialog: additional units per variant identifier
/// (or any single entry for aggregate-only products).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestockRequest {
    pub quantities: HashMap<String, i64>,
    pub received_by: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestockResponse {
    pub product: ProductDto,
    pub entry: RestockEntryDto,
}

/// Restocks a product and records the audit entry.
pub async fn restock_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<RestockRequest>,
) -> Result<Json<RestockResponse>, ApiError> {
    validate_employee_id(&req.received_by)?;
    validate_restock_quantities(&req.quantities)?;

    let (product, entry) = state
        .db
        .products()
        .restock(&id, &req.quantities, req.received_by.trim())
        .await?;
    state.products.invalidate().await;

    info!(id = %id, added = entry.quantity, stock = product.stock, "Product restocked");
    Ok(Json(RestockResponse {
        product: ProductDto::from(product),
        entry: RestockEntryDto::from(entry),
    }))
}

// =============================================================================
// Companies
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCompanyRequest {
    pub name: String,
    pub code: String,
}

/// Lists companies (the screen's tabs).
pub async fn list_companies(
    State(state): State<AppState>,
) -> Result<Json<Vec<CompanyDto>>, ApiError> {
    let companies = state.db.companies().list().await?;
    Ok(Json(companies.into_iter().map(CompanyDto::from).collect()))
}

/// Creates a company. Duplicate codes are rejected with a conflict.
pub async fn create_company(
    State(state): State<AppState>,
    Json(req): Json<CreateCompanyRequest>,
) -> Result<Json<CompanyDto>, ApiError> {
    validate_company_name(&req.name)?;
    validate_company_code(req.code.trim())?;

    let company = state
        .db
        .companies()
        .insert(req.name.trim(), req.code.trim())
        .await?;

    info!(code = %company.code, "Company created");
    Ok(Json(CompanyDto::from(company)))
}

/// Deletes a company. Its products and categories are left untouched.
pub async fn delete_company(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.db.companies().delete(&id).await?;
    Ok(Json(serde_json::json!({ "deleted": id })))
}

// =============================================================================
// Categories
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryRequest {
    pub name: String,
    /// Owning company's code.
    pub company: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCategoriesParams {
    /// Restrict to one company (the product form's dropdown).
    pub company: Option<String>,
}

/// Lists categories, optionally for one company.
pub async fn list_categories(
    State(state): State<AppState>,
    Query(params): Query<ListCategoriesParams>,
) -> Result<Json<Vec<CategoryDto>>, ApiError> {
    let categories = state.db.categories().list(params.company.as_deref()).await?;
    Ok(Json(categories.into_iter().map(CategoryDto::from).collect()))
}

/// Creates a category. Duplicate names are rejected with a conflict.
pub async fn create_category(
    State(state): State<AppState>,
    Json(req): Json<CreateCategoryRequest>,
) -> Result<Json<CategoryDto>, ApiError> {
    validate_category_name(&req.name)?;
    if req.company.trim().is_empty() {
        return Err(ApiError::validation("Category name and company are required"));
    }

    let category = state
        .db
        .categories()
        .insert(req.name.trim(), req.company.trim())
        .await?;

    info!(name = %category.name, "Category created");
    Ok(Json(CategoryDto::from(category)))
}

/// Deletes a category.
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.db.categories().delete(&id).await?;
    Ok(Json(serde_json::json!({ "deleted": id })))
}

// =============================================================================
// Restock audit trail
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRestocksParams {
    pub product_id: Option<String>,
}

/// Lists restock entries, newest first.
pub async fn list_restocks(
    State(state): State<AppState>,
    Query(params): Query<ListRestocksParams>,
) -> Result<Json<Vec<RestockEntryDto>>, ApiError> {
    let entries = state
        .db
        .restocks()
        .list(params.product_id.as_deref())
        .await?;
    Ok(Json(entries.into_iter().map(RestockEntryDto::from).collect()))
}

/// Body for verifying or disputing a shipment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRestockRequest {
    pub employee_id: String,
}

/// Marks a pending restock entry as verified.
pub async fn verify_restock(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ReviewRestockRequest>,
) -> Result<Json<RestockEntryDto>, ApiError> {
    validate_employee_id(&req.employee_id)?;
    let entry = state.db.restocks().verify(&id, req.employee_id.trim()).await?;
    Ok(Json(RestockEntryDto::from(entry)))
}

/// Marks a pending restock entry as disputed.
pub async fn dispute_restock(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ReviewRestockRequest>,
) -> Result<Json<RestockEntryDto>, ApiError> {
    validate_employee_id(&req.employee_id)?;
    let entry = state.db.restocks().dispute(&id, req.employee_id.trim()).await?;
    Ok(Json(RestockEntryDto::from(entry)))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::state::ConfigState;
    use stockbook_db::{Database, DbConfig};

    async fn test_state() -> AppState {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        AppState::new(db, ConfigState::default())
    }

    fn jersey_request() -> CreateProductRequest {
        CreateProductRequest {
            name: "Football Jersey".to_string(),
            company: "vargo".to_string(),
            category: "jerseys".to_string(),
            min_stock: 5,
            price_cents: 60_000,
            variants: vec![Variant::new("S", 0), Variant::new("M", 0)],
            stock: None,
        }
    }

    #[tokio::test]
    async fn test_create_product_computes_stock_from_variants() {
        let state = test_state().await;

        let mut req = jersey_request();
        req.variants = vec![Variant::new("S", 4), Variant::new("M", 6)];
        let Json(dto) = create_product(State(state.clone()), Json(req)).await.unwrap();

        assert_eq!(dto.stock, 10);
        assert_eq!(dto.status, StockStatus::Normal);
    }

    #[tokio::test]
    async fn test_create_product_requires_details() {
        let state = test_state().await;

        let mut req = jersey_request();
        req.company = "".to_string();
        let err = create_product(State(state), Json(req)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_restock_end_to_end() {
        let state = test_state().await;

        let Json(created) = create_product(State(state.clone()), Json(jersey_request()))
            .await
            .unwrap();
        assert_eq!(created.stock, 0);
        assert_eq!(created.status, StockStatus::Low);

        let mut quantities = HashMap::new();
        quantities.insert("S".to_string(), 10);
        quantities.insert("M".to_string(), 5);
        let Json(response) = restock_product(
            State(state.clone()),
            Path(created.id.clone()),
            Json(RestockRequest {
                quantities,
                received_by: "jane".to_string(),
            }),
        )
        .await
        .unwrap();

        assert_eq!(response.product.stock, 15);
        assert_eq!(response.product.variants[0], Variant::new("S", 10));
        assert_eq!(response.product.variants[1], Variant::new("M", 5));
        assert_eq!(response.product.status, StockStatus::Normal);
        assert_eq!(response.entry.quantity, 15);
    }

    #[tokio::test]
    async fn test_list_products_low_stock_filter() {
        let state = test_state().await;

        let mut low = jersey_request();
        low.name = "Low Jersey".to_string();
        low.variants = vec![Variant::new("S", 2)];
        low.min_stock = 5;
        create_product(State(state.clone()), Json(low)).await.unwrap();

        let mut ok = jersey_request();
        ok.name = "Stocked Jersey".to_string();
        ok.variants = vec![Variant::new("S", 9)];
        ok.min_stock = 5;
        create_product(State(state.clone()), Json(ok)).await.unwrap();

        let Json(all) = list_products(State(state.clone()), Query(ListProductsParams::default()))
            .await
            .unwrap();
        assert_eq!(all.len(), 2);

        let Json(low_only) = list_products(
            State(state.clone()),
            Query(ListProductsParams {
                low_stock: Some(true),
                ..Default::default()
            }),
        )
        .await
        .unwrap();
        assert_eq!(low_only.len(), 1);
        assert_eq!(low_only[0].name, "Low Jersey");
    }

    #[tokio::test]
    async fn test_list_products_cache_invalidation() {
        let state = test_state().await;

        create_product(State(state.clone()), Json(jersey_request()))
            .await
            .unwrap();

        // First read fills the cache
        let Json(first) = list_products(State(state.clone()), Query(ListProductsParams::default()))
            .await
            .unwrap();
        assert_eq!(first.len(), 1);
        assert!(state.products.get().await.is_some());

        // A mutation invalidates; the next read sees the new product
        let mut second = jersey_request();
        second.name = "Rugby Ball".to_string();
        second.variants = vec![];
        second.stock = Some(5);
        create_product(State(state.clone()), Json(second)).await.unwrap();
        assert!(state.products.get().await.is_none());

        let Json(after) = list_products(State(state.clone()), Query(ListProductsParams::default()))
            .await
            .unwrap();
        assert_eq!(after.len(), 2);
    }

    #[tokio::test]
    async fn test_search_products() {
        let state = test_state().await;

        create_product(State(state.clone()), Json(jersey_request()))
            .await
            .unwrap();

        let Json(hits) = list_products(
            State(state.clone()),
            Query(ListProductsParams {
                q: Some("jersey".to_string()),
                ..Default::default()
            }),
        )
        .await
        .unwrap();
        assert_eq!(hits.len(), 1);

        let Json(misses) = list_products(
            State(state),
            Query(ListProductsParams {
                q: Some("boots".to_string()),
                ..Default::default()
            }),
        )
        .await
        .unwrap();
        assert!(misses.is_empty());
    }

    #[tokio::test]
    async fn test_update_product_keeps_stock() {
        let state = test_state().await;

        let mut req = jersey_request();
        req.variants = vec![Variant::new("S", 4)];
        let Json(created) = create_product(State(state.clone()), Json(req)).await.unwrap();

        let Json(updated) = update_product(
            State(state.clone()),
            Path(created.id.clone()),
            Json(UpdateProductRequest {
                name: "Home Jersey".to_string(),
                company: created.company.clone(),
                category: created.category.clone(),
                min_stock: 1,
                price_cents: 65_000,
            }),
        )
        .await
        .unwrap();

        assert_eq!(updated.name, "Home Jersey");
        assert_eq!(updated.stock, 4);
        assert_eq!(updated.variants.len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_company_conflict() {
        let state = test_state().await;

        let req = CreateCompanyRequest {
            name: "Vargo Sports".to_string(),
            code: "vargo".to_string(),
        };
        create_company(State(state.clone()), Json(req.clone())).await.unwrap();

        let err = create_company(State(state), Json(req)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn test_category_listing_by_company() {
        let state = test_state().await;

        create_category(
            State(state.clone()),
            Json(CreateCategoryRequest {
                name: "Jerseys".to_string(),
                company: "vargo".to_string(),
            }),
        )
        .await
        .unwrap();
        create_category(
            State(state.clone()),
            Json(CreateCategoryRequest {
                name: "Balls".to_string(),
                company: "sportcheck".to_string(),
            }),
        )
        .await
        .unwrap();

        let Json(vargo) = list_categories(
            State(state),
            Query(ListCategoriesParams {
                company: Some("vargo".to_string()),
            }),
        )
        .await
        .unwrap();
        assert_eq!(vargo.len(), 1);
        assert_eq!(vargo[0].name, "Jerseys");
    }

    #[tokio::test]
    async fn test_restock_review_flow() {
        let state = test_state().await;

        let Json(created) = create_product(State(state.clone()), Json(jersey_request()))
            .await
            .unwrap();

        let mut quantities = HashMap::new();
        quantities.insert("S".to_string(), 3);
        let Json(restock) = restock_product(
            State(state.clone()),
            Path(created.id.clone()),
            Json(RestockRequest {
                quantities,
                received_by: "jane".to_string(),
            }),
        )
        .await
        .unwrap();

        let Json(verified) = verify_restock(
            State(state.clone()),
            Path(restock.entry.id.clone()),
            Json(ReviewRestockRequest {
                employee_id: "mike".to_string(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(verified.status, RestockStatus::Verified);

        let err = dispute_restock(
            State(state),
            Path(restock.entry.id),
            Json(ReviewRestockRequest {
                employee_id: "mike".to_string(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::Conflict);
    }
}
