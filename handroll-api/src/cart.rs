use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use handroll_catalog::{CategorySelections, Ingredient, PriceBreakdown};
use handroll_order::{CartItem, CartItemUpdate};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::{
    catalog::{find_product, require_complete, resolve_ingredients, resolve_selections},
    error::AppError,
    state::AppState,
};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub product_id: String,
    #[serde(default)]
    pub ingredient_ids: Vec<String>,
    #[serde(default)]
    pub category_selections: CategorySelections,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
}

fn default_quantity() -> i32 {
    1
}

#[derive(Debug, Deserialize)]
pub struct UpdateItemRequest {
    pub ingredient_ids: Option<Vec<String>>,
    pub category_selections: Option<CategorySelections>,
    pub quantity: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CartItemResponse {
    pub id: Uuid,
    pub product_id: String,
    pub product_name: String,
    pub quantity: i32,
    pub selected_ingredients: Vec<Ingredient>,
    pub category_selections: CategorySelections,
    pub breakdown: PriceBreakdown,
    pub unit_price: i64,
    pub total_price: i64,
}

impl From<&CartItem> for CartItemResponse {
    fn from(item: &CartItem) -> Self {
        Self {
            id: item.id,
            product_id: item.product.id.clone(),
            product_name: item.product.name.clone(),
            quantity: item.quantity,
            selected_ingredients: item.selected_ingredients.clone(),
            category_selections: item.selected_category_options.clone(),
            breakdown: item.breakdown(),
            unit_price: item.unit_price(),
            total_price: item.total_price(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CartResponse {
    pub items: Vec<CartItemResponse>,
    pub item_count: usize,
    pub total: i64,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/cart", get(get_cart).delete(clear_cart))
        .route("/v1/cart/items", post(add_item))
        .route("/v1/cart/items/{item_id}", patch(update_item).delete(remove_item))
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /v1/cart
async fn get_cart(State(state): State<AppState>) -> Json<CartResponse> {
    let cart = state.cart.read().await;

    Json(CartResponse {
        items: cart.items().iter().map(CartItemResponse::from).collect(),
        item_count: cart.len(),
        total: cart.total(),
    })
}

/// POST /v1/cart/items
/// Add a configured product; the selection must pass the confirmation gate
async fn add_item(
    State(state): State<AppState>,
    Json(req): Json<AddItemRequest>,
) -> Result<(StatusCode, Json<CartItemResponse>), AppError> {
    let product = find_product(&state, &req.product_id)?;
    let ingredients = resolve_ingredients(&product, &req.ingredient_ids)?;
    let selections = resolve_selections(&product, req.category_selections)?;
    require_complete(&product, &selections)?;

    let mut cart = state.cart.write().await;
    let item_id = cart.add_item(product, ingredients, selections, req.quantity)?;
    let item = cart
        .get(&item_id)
        .ok_or_else(|| AppError::InternalServerError(format!("Cart item vanished: {}", item_id)))?;

    Ok((StatusCode::CREATED, Json(CartItemResponse::from(item))))
}

/// PATCH /v1/cart/items/{item_id}
/// Replace only the fields present in the body
async fn update_item(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
    Json(req): Json<UpdateItemRequest>,
) -> Result<Json<CartItemResponse>, AppError> {
    let mut cart = state.cart.write().await;

    let product = cart
        .get(&item_id)
        .map(|item| item.product.clone())
        .ok_or_else(|| AppError::NotFoundError(format!("Cart item not found: {}", item_id)))?;

    let ingredients = req
        .ingredient_ids
        .as_deref()
        .map(|ids| resolve_ingredients(&product, ids))
        .transpose()?;
    let selections = req
        .category_selections
        .map(|s| resolve_selections(&product, s))
        .transpose()?;
    if let Some(selections) = &selections {
        require_complete(&product, selections)?;
    }

    let update = CartItemUpdate {
        ingredients,
        category_selections: selections,
        quantity: req.quantity,
    };
    cart.update_item(&item_id, update)?;

    let item = cart
        .get(&item_id)
        .ok_or_else(|| AppError::InternalServerError(format!("Cart item vanished: {}", item_id)))?;
    Ok(Json(CartItemResponse::from(item)))
}

/// DELETE /v1/cart/items/{item_id}
/// Removing an unknown id is not an error
async fn remove_item(State(state): State<AppState>, Path(item_id): Path<Uuid>) -> StatusCode {
    let removed = state.cart.write().await.remove_item(&item_id);
    if !removed {
        info!("Cart item {} not present, nothing removed", item_id);
    }
    StatusCode::NO_CONTENT
}

/// DELETE /v1/cart
async fn clear_cart(State(state): State<AppState>) -> StatusCode {
    state.cart.write().await.clear();
    StatusCode::NO_CONTENT
}
