use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::cart::Cart;
use crate::dispatch::{chat_link, DispatchError, MessagingApp};
use crate::message::{build_order_message, MessageError, OrderTotals};
use crate::models::OrderDetails;

/// Shop-wide settings applied to every checkout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopSettings {
    pub business_name: String,
    /// Number that receives the orders.
    pub target_phone: String,
    #[serde(default)]
    pub messaging_app: MessagingApp,
    /// Added to every order; orders never choose their own adjustments.
    #[serde(default)]
    pub shipping_cost: i64,
    #[serde(default)]
    pub discount: i64,
}

/// Everything a client needs to hand the order over to the messaging app
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DispatchOrder {
    pub message: String,
    pub chat_link: String,
    pub store_link: String,
    pub store_web_link: String,
    pub totals: OrderTotals,
    pub item_count: usize,
}

/// Render the order for the cart and empty it.
///
/// The cart is only cleared once the message and links were built, so a
/// rejected checkout keeps every item in place.
pub fn checkout(cart: &mut Cart, shop: &ShopSettings, details: &OrderDetails) -> Result<DispatchOrder, CheckoutError> {
    let prepared = prepare(cart, shop, details).inspect_err(|e| warn!("Checkout rejected: {}", e))?;

    info!(
        "Order ready for dispatch: {} items, total {} (customer phone {:?})",
        prepared.item_count,
        prepared.totals.total,
        details.customer.as_ref().map(|c| &c.phone)
    );
    cart.clear();
    Ok(prepared)
}

fn prepare(cart: &Cart, shop: &ShopSettings, details: &OrderDetails) -> Result<DispatchOrder, CheckoutError> {
    let message = build_order_message(&shop.business_name, cart.items(), details)?;
    let totals = OrderTotals::compute(cart.items(), details.shipping_cost, details.discount)?;
    let link = chat_link(&shop.target_phone, &message)?;

    Ok(DispatchOrder {
        message,
        chat_link: link.to_string(),
        store_link: shop.messaging_app.store_listing_link(),
        store_web_link: shop.messaging_app.store_listing_web_link()?.to_string(),
        totals,
        item_count: cart.len(),
    })
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CheckoutError {
    #[error(transparent)]
    Message(#[from] MessageError),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}
