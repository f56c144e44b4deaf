use chrono::{DateTime, Utc};
use handroll_catalog::{pricing, CategorySelections, Ingredient, PriceBreakdown, Product};
use handroll_shared::Masked;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A configured product sitting in the cart
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartItem {
    pub id: Uuid,
    pub product: Product,
    pub selected_ingredients: Vec<Ingredient>,
    pub selected_category_options: CategorySelections,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CartItem {
    /// Callers go through [`crate::Cart::add_item`], which sanitizes the inputs first.
    pub(crate) fn new(
        product: Product,
        selected_ingredients: Vec<Ingredient>,
        selected_category_options: CategorySelections,
        quantity: i32,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            product,
            selected_ingredients,
            selected_category_options,
            quantity,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn unit_price(&self) -> i64 {
        pricing::unit_price(&self.product, &self.selected_ingredients, &self.selected_category_options)
    }

    pub fn total_price(&self) -> i64 {
        self.unit_price().saturating_mul(i64::from(self.quantity))
    }

    /// Included/extra labels per category, for summaries.
    pub fn breakdown(&self) -> PriceBreakdown {
        pricing::price_breakdown(&self.product, &self.selected_ingredients, &self.selected_category_options)
    }
}

/// Partial edit of a cart entry; `None` keeps the current value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CartItemUpdate {
    pub ingredients: Option<Vec<Ingredient>>,
    pub category_selections: Option<CategorySelections>,
    pub quantity: Option<i32>,
}

/// Customer details collected before confirming an order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerInfo {
    pub name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: Option<Masked<String>>,
    pub phone: Masked<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl CustomerInfo {
    /// First and last name, trimmed, skipping empty parts.
    pub fn customer_name(&self) -> String {
        [self.name.trim(), self.last_name.trim()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Contact and delivery data that goes into the order message
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderDetails {
    #[serde(default)]
    pub customer: Option<CustomerInfo>,
    #[serde(default)]
    pub delivery_method: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub schedule: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub shipping_cost: i64,
    #[serde(default)]
    pub discount: i64,
}
