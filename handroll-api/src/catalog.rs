use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use handroll_catalog::{
    pricing, selection, CategorySelections, Ingredient, MissingSelection, PriceBreakdown, Product,
};
use serde::{Deserialize, Serialize};

use crate::{error::AppError, state::AppState};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    #[serde(default)]
    pub ingredient_ids: Vec<String>,
    #[serde(default)]
    pub category_selections: CategorySelections,
    pub quantity: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QuoteResponse {
    pub product_id: String,
    pub breakdown: PriceBreakdown,
    pub quantity: i32,
    pub total_price: i64,
    /// Whether the selection may be added to the cart.
    pub complete: bool,
    pub missing: Vec<MissingSelection>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/products", get(list_products))
        .route("/v1/products/{product_id}", get(get_product))
        .route("/v1/products/{product_id}/quote", post(quote_product))
}

// ============================================================================
// Helpers
// ============================================================================

pub(crate) fn find_product(state: &AppState, product_id: &str) -> Result<Product, AppError> {
    state
        .catalog
        .get(product_id)
        .cloned()
        .ok_or_else(|| AppError::NotFoundError(format!("Product not found: {}", product_id)))
}

/// Map requested add-on ids onto the product's own optional ingredients.
pub(crate) fn resolve_ingredients(product: &Product, ids: &[String]) -> Result<Vec<Ingredient>, AppError> {
    ids.iter()
        .map(|id| {
            product.optional_ingredient(id).cloned().ok_or_else(|| {
                AppError::ValidationError(format!("Unknown ingredient {} for {}", id, product.id))
            })
        })
        .collect()
}

/// Normalize the picks and check them against the product's own categories.
pub(crate) fn resolve_selections(
    product: &Product,
    selections: CategorySelections,
) -> Result<CategorySelections, AppError> {
    selection::resolve_selections(product, selections).map_err(|e| {
        tracing::warn!("Invalid selection for {}: {}", product.id, e);
        AppError::from(e)
    })
}

/// Reject selections that cannot be confirmed, naming what is missing.
pub(crate) fn require_complete(product: &Product, selections: &CategorySelections) -> Result<(), AppError> {
    let missing = selection::missing_selections(product, selections);
    if missing.is_empty() {
        return Ok(());
    }

    let detail = missing
        .iter()
        .map(|m| match m {
            MissingSelection::AnyCategory => "at least one ingredient".to_string(),
            MissingSelection::Category { title, required, selected, .. } => {
                format!("{} ({}/{})", title, selected, required)
            }
        })
        .collect::<Vec<_>>()
        .join(", ");

    tracing::warn!("Incomplete selection for {}: {}", product.id, detail);
    Err(AppError::ValidationError(format!("Incomplete selection: {}", detail)))
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /v1/products
async fn list_products(State(state): State<AppState>) -> Json<Vec<Product>> {
    Json(state.catalog.products().to_vec())
}

/// GET /v1/products/{product_id}
async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<Json<Product>, AppError> {
    Ok(Json(find_product(&state, &product_id)?))
}

/// POST /v1/products/{product_id}/quote
/// Price a selection without touching the cart
async fn quote_product(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    Json(req): Json<QuoteRequest>,
) -> Result<Json<QuoteResponse>, AppError> {
    let product = find_product(&state, &product_id)?;
    let ingredients = resolve_ingredients(&product, &req.ingredient_ids)?;

    let quantity = req.quantity.unwrap_or(1);
    if quantity <= 0 {
        return Err(AppError::ValidationError(format!("Quantity must be positive, got {}", quantity)));
    }

    let selections = resolve_selections(&product, req.category_selections)?;
    let breakdown = pricing::price_breakdown(&product, &ingredients, &selections);
    let missing = selection::missing_selections(&product, &selections);

    Ok(Json(QuoteResponse {
        product_id: product.id,
        total_price: breakdown.unit_price * i64::from(quantity),
        breakdown,
        quantity,
        complete: missing.is_empty(),
        missing,
    }))
}
