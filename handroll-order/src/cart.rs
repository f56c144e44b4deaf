use chrono::Utc;
use handroll_catalog::{
    selection, validate_product, CatalogError, CategorySelections, Ingredient, Product, SelectionError,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::{CartItem, CartItemUpdate};

/// Ordered in-memory cart.
///
/// Every mutation sanitizes its inputs before touching `items`, so a rejected
/// call leaves the cart exactly as it was.
#[derive(Debug, Clone, Default)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Append a new entry and return its fresh id.
    pub fn add_item(
        &mut self,
        product: Product,
        ingredients: Vec<Ingredient>,
        selections: CategorySelections,
        quantity: i32,
    ) -> Result<Uuid, CartError> {
        let (ingredients, selections) = sanitize_new_item(&product, ingredients, selections, quantity)
            .inspect_err(|e| warn!("Rejected cart addition for {}: {}", product.id, e))?;

        let item = CartItem::new(product, ingredients, selections, quantity);
        let item_id = item.id;
        info!(
            "Cart item added: {} x{} ({} c/u)",
            item.product.id,
            item.quantity,
            item.unit_price()
        );
        self.items.push(item);
        Ok(item_id)
    }

    /// Replace the supplied fields of an entry.
    ///
    /// Returns `Ok(false)` when no entry has that id.
    pub fn update_item(&mut self, item_id: &Uuid, update: CartItemUpdate) -> Result<bool, CartError> {
        let Some(index) = self.items.iter().position(|i| i.id == *item_id) else {
            return Ok(false);
        };

        let CartItemUpdate { ingredients, category_selections, quantity } = update;
        let product = &self.items[index].product;

        let ingredients = ingredients.map(|i| sanitize_ingredients(product, i)).transpose()?;
        let selections = category_selections
            .map(|s| selection::resolve_selections(product, s))
            .transpose()?;
        if let Some(quantity) = quantity {
            sanitize_quantity(quantity)?;
        }

        let item = &mut self.items[index];
        if let Some(ingredients) = ingredients {
            item.selected_ingredients = ingredients;
        }
        if let Some(selections) = selections {
            item.selected_category_options = selections;
        }
        if let Some(quantity) = quantity {
            item.quantity = quantity;
        }
        item.updated_at = Utc::now();

        info!("Cart item updated: {} ({} total)", item.id, item.total_price());
        Ok(true)
    }

    /// Remove at most one entry. Returns whether anything was removed.
    pub fn remove_item(&mut self, item_id: &Uuid) -> bool {
        match self.items.iter().position(|i| i.id == *item_id) {
            Some(index) => {
                let removed = self.items.remove(index);
                info!("Cart item removed: {}", removed.id);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, item_id: &Uuid) -> Option<&CartItem> {
        self.items.iter().find(|i| i.id == *item_id)
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn total(&self) -> i64 {
        self.items.iter().map(CartItem::total_price).fold(0, i64::saturating_add)
    }

    pub fn clear(&mut self) {
        if !self.items.is_empty() {
            info!("Cart cleared ({} items)", self.items.len());
        }
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

fn sanitize_quantity(quantity: i32) -> Result<(), CartError> {
    if quantity <= 0 {
        return Err(CartError::InvalidQuantity(quantity));
    }
    Ok(())
}

fn sanitize_new_item(
    product: &Product,
    ingredients: Vec<Ingredient>,
    selections: CategorySelections,
    quantity: i32,
) -> Result<(Vec<Ingredient>, CategorySelections), CartError> {
    validate_product(product)?;
    sanitize_quantity(quantity)?;
    Ok((
        sanitize_ingredients(product, ingredients)?,
        selection::resolve_selections(product, selections)?,
    ))
}

/// Add-ons must be the product's own, price included.
fn sanitize_ingredients(product: &Product, ingredients: Vec<Ingredient>) -> Result<Vec<Ingredient>, CartError> {
    for ingredient in &ingredients {
        if product.optional_ingredient(&ingredient.id) != Some(ingredient) {
            return Err(CartError::UnknownIngredient {
                product_id: product.id.clone(),
                ingredient_id: ingredient.id.clone(),
            });
        }
    }
    Ok(ingredients)
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CartError {
    #[error("Quantity must be positive, got {0}")]
    InvalidQuantity(i32),

    #[error("Invalid product: {0}")]
    InvalidProduct(#[from] CatalogError),

    #[error("Unknown ingredient {ingredient_id} for {product_id}")]
    UnknownIngredient {
        product_id: String,
        ingredient_id: String,
    },

    #[error(transparent)]
    Selection(#[from] SelectionError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use handroll_catalog::{IngredientCategory, IngredientOption, SelectionMode};

    fn category(id: &str, included_count: u32, extra_price: i64) -> IngredientCategory {
        IngredientCategory {
            id: id.to_string(),
            title: id.to_string(),
            description: String::new(),
            options: vec![
                IngredientOption { id: format!("{id}_a"), name: "A".to_string() },
                IngredientOption { id: format!("{id}_b"), name: "B".to_string() },
            ],
            included_count,
            extra_price,
        }
    }

    fn palta() -> Ingredient {
        Ingredient { id: "palta".to_string(), name: "Palta".to_string(), extra_price: 700 }
    }

    fn handroll() -> Product {
        Product {
            id: "handroll".to_string(),
            name: "Handroll".to_string(),
            base_price: 3500,
            base_included_description: String::new(),
            optional_ingredients: vec![palta()],
            ingredient_categories: vec![category("proteina", 1, 1000), category("vegetales", 1, 500)],
            selection_mode: SelectionMode::Structured,
        }
    }

    fn picks(entries: &[(&str, &[&str])]) -> CategorySelections {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.iter().map(|s| s.to_string()).collect()))
            .collect()
    }

    #[test]
    fn test_add_and_total() {
        let mut cart = Cart::new();
        let selections = picks(&[("proteina", &["proteina_a", "proteina_b"]), ("vegetales", &["vegetales_a"])]);

        let id = cart.add_item(handroll(), vec![], selections, 2).unwrap();
        let item = cart.get(&id).unwrap();
        assert_eq!(item.unit_price(), 4500);
        assert_eq!(item.total_price(), 9000);

        cart.add_item(handroll(), vec![palta()], CategorySelections::new(), 1).unwrap();
        assert_eq!(cart.len(), 2);
        assert_eq!(cart.total(), 13200);
    }

    #[test]
    fn test_ids_are_unique() {
        let mut cart = Cart::new();
        let first = cart.add_item(handroll(), vec![], CategorySelections::new(), 1).unwrap();
        let second = cart.add_item(handroll(), vec![], CategorySelections::new(), 1).unwrap();
        assert_ne!(first, second);
        assert_eq!(cart.items()[1].id, second);
    }

    #[test]
    fn test_rejects_non_positive_quantity() {
        let mut cart = Cart::new();

        assert_eq!(
            cart.add_item(handroll(), vec![], CategorySelections::new(), 0).unwrap_err(),
            CartError::InvalidQuantity(0)
        );
        assert_eq!(
            cart.add_item(handroll(), vec![], CategorySelections::new(), -3).unwrap_err(),
            CartError::InvalidQuantity(-3)
        );
        assert!(cart.is_empty());
    }

    #[test]
    fn test_rejects_invalid_products() {
        let mut cart = Cart::new();

        let mut nameless = handroll();
        nameless.id = String::new();
        assert_eq!(
            cart.add_item(nameless, vec![], CategorySelections::new(), 1).unwrap_err(),
            CartError::InvalidProduct(CatalogError::BlankId("product".to_string()))
        );

        let mut bad_addon = handroll();
        bad_addon.optional_ingredients[0].extra_price = -1;
        assert!(matches!(
            cart.add_item(bad_addon, vec![], CategorySelections::new(), 1),
            Err(CartError::InvalidProduct(CatalogError::NegativePrice { .. }))
        ));

        let mut repeated_option = handroll();
        repeated_option.ingredient_categories[0].options[1].id = "proteina_a".to_string();
        assert_eq!(
            cart.add_item(repeated_option, vec![], CategorySelections::new(), 1).unwrap_err(),
            CartError::InvalidProduct(CatalogError::DuplicateId("proteina_a".to_string()))
        );

        assert!(cart.is_empty());
    }

    #[test]
    fn test_rejects_foreign_ingredients_and_options() {
        let mut cart = Cart::new();

        let cheaper_palta = Ingredient { extra_price: 0, ..palta() };
        assert_eq!(
            cart.add_item(handroll(), vec![cheaper_palta], CategorySelections::new(), 1).unwrap_err(),
            CartError::UnknownIngredient { product_id: "handroll".to_string(), ingredient_id: "palta".to_string() }
        );

        let blank_option = picks(&[("proteina", &["  "])]);
        assert_eq!(
            cart.add_item(handroll(), vec![], blank_option, 1).unwrap_err(),
            CartError::Selection(SelectionError::BlankId("option"))
        );

        let made_up = picks(&[("proteina", &["caviar"])]);
        assert!(matches!(
            cart.add_item(handroll(), vec![], made_up, 1),
            Err(CartError::Selection(SelectionError::UnknownOption { .. }))
        ));

        let stray = picks(&[("postre", &["helado"])]);
        assert!(matches!(
            cart.add_item(handroll(), vec![], stray, 1),
            Err(CartError::Selection(SelectionError::UnknownCategory { .. }))
        ));

        assert!(cart.is_empty());
    }

    #[test]
    fn test_duplicate_options_collapse() {
        let mut cart = Cart::new();
        let selections = picks(&[("proteina", &["proteina_b", "proteina_a", "proteina_b"]), ("vegetales", &[])]);

        let id = cart.add_item(handroll(), vec![], selections, 1).unwrap();
        let item = cart.get(&id).unwrap();
        assert_eq!(item.selected_category_options["proteina"], vec!["proteina_b", "proteina_a"]);
        assert!(!item.selected_category_options.contains_key("vegetales"));
        assert_eq!(item.unit_price(), 4500);
    }

    #[test]
    fn test_partial_update() {
        let mut cart = Cart::new();
        let selections = picks(&[("proteina", &["proteina_a"])]);
        let id = cart.add_item(handroll(), vec![], selections.clone(), 1).unwrap();

        let updated = cart
            .update_item(&id, CartItemUpdate { quantity: Some(4), ..Default::default() })
            .unwrap();
        assert!(updated);

        let item = cart.get(&id).unwrap();
        assert_eq!(item.quantity, 4);
        assert_eq!(item.selected_category_options, selections);
        assert_eq!(cart.total(), 14000);
    }

    #[test]
    fn test_invalid_update_leaves_item_untouched() {
        let mut cart = Cart::new();
        let id = cart.add_item(handroll(), vec![], CategorySelections::new(), 2).unwrap();

        let result = cart.update_item(
            &id,
            CartItemUpdate {
                category_selections: Some(picks(&[("proteina", &["proteina_a", "proteina_b"])])),
                quantity: Some(0),
                ..Default::default()
            },
        );
        assert_eq!(result, Err(CartError::InvalidQuantity(0)));

        let result = cart.update_item(
            &id,
            CartItemUpdate {
                category_selections: Some(picks(&[("proteina", &["caviar"])])),
                ..Default::default()
            },
        );
        assert!(matches!(result, Err(CartError::Selection(_))));

        let item = cart.get(&id).unwrap();
        assert_eq!(item.quantity, 2);
        assert!(item.selected_category_options.is_empty());
    }

    #[test]
    fn test_update_and_remove_unknown_ids_are_noops() {
        let mut cart = Cart::new();
        cart.add_item(handroll(), vec![], CategorySelections::new(), 1).unwrap();

        let missing = Uuid::new_v4();
        assert_eq!(cart.update_item(&missing, CartItemUpdate::default()), Ok(false));
        assert!(!cart.remove_item(&missing));
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_remove_and_clear() {
        let mut cart = Cart::new();
        let first = cart.add_item(handroll(), vec![], CategorySelections::new(), 1).unwrap();
        cart.add_item(handroll(), vec![], CategorySelections::new(), 1).unwrap();

        assert!(cart.remove_item(&first));
        assert!(cart.get(&first).is_none());
        assert_eq!(cart.len(), 1);

        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total(), 0);
    }
}
