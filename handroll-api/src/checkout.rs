use axum::{extract::State, routing::post, Json, Router};
use handroll_order::{checkout, CustomerInfo, DispatchOrder, OrderDetails};
use serde::Deserialize;

use crate::{error::AppError, state::AppState};

#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub customer: Option<CustomerInfo>,
    pub delivery_method: Option<String>,
    pub address: Option<String>,
    pub schedule: Option<String>,
    pub notes: Option<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/checkout", post(checkout_cart))
}

/// POST /v1/checkout
/// Render the order message and chat link, then empty the cart.
/// Shipping and discount always come from the shop settings.
async fn checkout_cart(
    State(state): State<AppState>,
    Json(req): Json<CheckoutRequest>,
) -> Result<Json<DispatchOrder>, AppError> {
    let details = OrderDetails {
        customer: req.customer,
        delivery_method: req.delivery_method,
        address: req.address,
        schedule: req.schedule,
        notes: req.notes,
        shipping_cost: state.shop.shipping_cost,
        discount: state.shop.discount,
    };

    let mut cart = state.cart.write().await;
    let order = checkout::checkout(&mut cart, &state.shop, &details)?;

    Ok(Json(order))
}
