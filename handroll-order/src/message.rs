use chrono::{NaiveDateTime, NaiveTime};
use handroll_shared::{format_price, MoneyError};
use serde::{Deserialize, Serialize};

use crate::models::{CartItem, OrderDetails};

const DATE_TIME_INPUTS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"];
const TIME_INPUTS: [&str; 2] = ["%H:%M:%S", "%H:%M"];

/// Upper bound for shipping and discount amounts.
pub const MAX_ADJUSTMENT: i64 = 10_000_000;

/// Money summary printed at the bottom of the order message
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderTotals {
    pub subtotal: i64,
    pub shipping: i64,
    pub discount: i64,
    /// `subtotal + shipping - discount`, never below zero.
    pub total: i64,
}

impl OrderTotals {
    pub fn compute(items: &[CartItem], shipping: i64, discount: i64) -> Result<Self, MessageError> {
        check_adjustment("shipping", shipping)?;
        check_adjustment("discount", discount)?;

        let subtotal = items
            .iter()
            .try_fold(0i64, |sum, item| sum.checked_add(item.total_price()))
            .ok_or(MessageError::AmountTooLarge { field: "subtotal", amount: i64::MAX })?;
        let gross = subtotal
            .checked_add(shipping)
            .ok_or(MessageError::AmountTooLarge { field: "total", amount: subtotal })?;

        Ok(Self {
            subtotal,
            shipping,
            discount,
            // both sides are non-negative, so this cannot overflow
            total: (gross - discount).max(0),
        })
    }
}

fn check_adjustment(field: &'static str, amount: i64) -> Result<(), MessageError> {
    if amount < 0 {
        return Err(MessageError::NegativeAdjustment { field, amount });
    }
    if amount > MAX_ADJUSTMENT {
        return Err(MessageError::AmountTooLarge { field, amount });
    }
    Ok(())
}

/// Render the order text sent to the shop. Pure: same inputs, same text.
pub fn build_order_message(
    business_name: &str,
    items: &[CartItem],
    details: &OrderDetails,
) -> Result<String, MessageError> {
    if items.is_empty() {
        return Err(MessageError::EmptyCart);
    }

    let totals = OrderTotals::compute(items, details.shipping_cost, details.discount)?;
    let mut out = String::new();

    push_line(&mut out, &format!("🍣 **Pedido {}**", business_name.trim()));
    push_line(&mut out, "");

    let contact = contact_lines(details);
    for line in &contact {
        push_line(&mut out, line);
    }
    if !contact.is_empty() {
        push_line(&mut out, "");
    }

    push_line(&mut out, "🧾 **Detalle de pedido:**");
    for item in items {
        push_item(&mut out, item)?;
    }
    push_line(&mut out, "");

    if totals.shipping > 0 || totals.discount > 0 {
        push_line(&mut out, &format!("Subtotal: {}", format_price(totals.subtotal)?));
    }
    if totals.shipping > 0 {
        push_line(&mut out, &format!("Envío: {}", format_price(totals.shipping)?));
    }
    if totals.discount > 0 {
        push_line(&mut out, &format!("Descuento: -{}", format_price(totals.discount)?));
    }
    out.push_str(&format!("💵 **Total:** {}", format_price(totals.total)?));

    Ok(out.trim().to_string())
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push('\n');
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn contact_lines(details: &OrderDetails) -> Vec<String> {
    let customer = details.customer.as_ref();
    let name = customer.map(|c| c.customer_name()).filter(|n| !n.is_empty());
    let phone = non_blank(customer.map(|c| c.phone.expose().as_str()));
    let notes = non_blank(details.notes.as_deref())
        .or_else(|| non_blank(customer.and_then(|c| c.notes.as_deref())));

    let mut lines = Vec::new();
    if let Some(name) = name {
        lines.push(format!("👤 **Cliente:** {}", name));
    }
    if let Some(phone) = phone {
        lines.push(format!("📞 **Teléfono:** {}", phone));
    }
    if let Some(method) = non_blank(details.delivery_method.as_deref()) {
        lines.push(format!("🚚 **Entrega:** {}", method));
    }
    if let Some(address) = non_blank(details.address.as_deref()) {
        lines.push(format!("📍 **Dirección:** {}", address));
    }
    if let Some(schedule) = non_blank(details.schedule.as_deref()) {
        lines.push(format!("🕒 **Hora de Retiro:** {}", normalize_schedule(schedule)));
    }
    if let Some(notes) = notes {
        lines.push(format!("📝 **Notas:** {}", notes));
    }
    lines
}

fn push_item(out: &mut String, item: &CartItem) -> Result<(), MessageError> {
    push_line(
        out,
        &format!(
            "- x{} {} — {} c/u → {}",
            item.quantity,
            item.product.name,
            format_price(item.unit_price())?,
            format_price(item.total_price())?
        ),
    );

    for line in item.breakdown().categories {
        let mut parts = Vec::new();
        if !line.included.is_empty() {
            parts.push(line.included.join(", "));
        }
        if !line.extra.is_empty() {
            parts.push(format!("extra: {}", line.extra.join(", ")));
        }
        if !parts.is_empty() {
            push_line(out, &format!("  • {}: {}", line.title, parts.join(" + ")));
        }
    }

    for ingredient in &item.selected_ingredients {
        push_line(
            out,
            &format!("  • Extra: {} (+{})", ingredient.name, format_price(ingredient.extra_price)?),
        );
    }
    Ok(())
}

/// Pickup times arrive as typed by the customer; known shapes are reformatted,
/// anything else is kept verbatim.
pub fn normalize_schedule(raw: &str) -> String {
    let raw = raw.trim();

    for pattern in DATE_TIME_INPUTS {
        if let Ok(at) = NaiveDateTime::parse_from_str(raw, pattern) {
            return at.format("%d/%m/%Y %H:%M").to_string();
        }
    }
    for pattern in TIME_INPUTS {
        if let Ok(at) = NaiveTime::parse_from_str(raw, pattern) {
            return at.format("%H:%M").to_string();
        }
    }

    raw.to_string()
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MessageError {
    #[error("Cart must not be empty")]
    EmptyCart,

    #[error("Negative {field}: {amount}")]
    NegativeAdjustment {
        field: &'static str,
        amount: i64,
    },

    #[error("{field} too large: {amount}")]
    AmountTooLarge {
        field: &'static str,
        amount: i64,
    },

    #[error(transparent)]
    Money(#[from] MoneyError),
}
