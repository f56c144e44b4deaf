use serde::{Deserialize, Serialize};

/// How the confirmation gate treats a product's categories
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SelectionMode {
    /// At least one selection anywhere among the categories.
    Flexible,
    /// Every category needs its included count filled.
    #[default]
    Structured,
}

/// Core product structure. Prices are whole pesos.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub base_price: i64,
    pub base_included_description: String,
    #[serde(default)]
    pub optional_ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub ingredient_categories: Vec<IngredientCategory>,
    #[serde(default)]
    pub selection_mode: SelectionMode,
}

impl Product {
    pub fn category(&self, category_id: &str) -> Option<&IngredientCategory> {
        self.ingredient_categories.iter().find(|c| c.id == category_id)
    }

    pub fn optional_ingredient(&self, ingredient_id: &str) -> Option<&Ingredient> {
        self.optional_ingredients.iter().find(|i| i.id == ingredient_id)
    }

    pub fn is_flexible(&self) -> bool {
        self.selection_mode == SelectionMode::Flexible
    }
}

/// A group of options where the first `included_count` picks are covered by
/// the base price and each further pick costs `extra_price`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IngredientCategory {
    pub id: String,
    pub title: String,
    pub description: String,
    pub options: Vec<IngredientOption>,
    pub included_count: u32,
    pub extra_price: i64,
}

impl IngredientCategory {
    pub fn option(&self, option_id: &str) -> Option<&IngredientOption> {
        self.options.iter().find(|o| o.id == option_id)
    }

    /// Display name for an option id, falling back to the raw id.
    pub fn option_name<'a>(&'a self, option_id: &'a str) -> &'a str {
        self.option(option_id).map(|o| o.name.as_str()).unwrap_or(option_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IngredientOption {
    pub id: String,
    pub name: String,
}

/// Flat add-on, priced on its own and not tied to any category
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Ingredient {
    pub id: String,
    pub name: String,
    pub extra_price: i64,
}
