use serde::{Deserialize, Serialize};

use crate::product::{Ingredient, IngredientCategory, Product};
use crate::selection::CategorySelections;

/// Per-category part of a price breakdown
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryLine {
    pub category_id: String,
    pub title: String,
    /// Picks covered by the base price, in pick order.
    pub included: Vec<String>,
    /// Picks beyond the included count, in pick order.
    pub extra: Vec<String>,
    pub extra_count: u32,
    pub charge: i64,
}

/// Full pricing result for one configured unit
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PriceBreakdown {
    pub base_price: i64,
    pub ingredients_total: i64,
    pub categories: Vec<CategoryLine>,
    pub categories_total: i64,
    pub unit_price: i64,
}

/// Charge for a category given how many options were picked in it.
pub fn category_extra_charge(category: &IngredientCategory, selected_count: usize) -> i64 {
    let included = usize::try_from(category.included_count).unwrap_or(usize::MAX);
    let extra = i64::try_from(selected_count.saturating_sub(included)).unwrap_or(i64::MAX);
    extra.saturating_mul(category.extra_price).max(0)
}

/// Sum of category charges. Only the product's own categories are priced.
pub fn category_extras(product: &Product, selections: &CategorySelections) -> i64 {
    product
        .ingredient_categories
        .iter()
        .map(|category| {
            let count = selections.get(&category.id).map(Vec::len).unwrap_or(0);
            category_extra_charge(category, count)
        })
        .fold(0, i64::saturating_add)
}

pub fn ingredients_total(ingredients: &[Ingredient]) -> i64 {
    ingredients.iter().map(|i| i.extra_price.max(0)).fold(0, i64::saturating_add)
}

/// Base price plus flat add-ons plus category extras. Saturates at `i64::MAX`.
pub fn unit_price(product: &Product, ingredients: &[Ingredient], selections: &CategorySelections) -> i64 {
    product
        .base_price
        .saturating_add(ingredients_total(ingredients))
        .saturating_add(category_extras(product, selections))
}

/// Itemised version of [`unit_price`] used for labels: within each category the
/// first `included_count` picks are "included" and the rest are "extra".
pub fn price_breakdown(
    product: &Product,
    ingredients: &[Ingredient],
    selections: &CategorySelections,
) -> PriceBreakdown {
    let categories: Vec<CategoryLine> = product
        .ingredient_categories
        .iter()
        .map(|category| {
            let picks = selections.get(&category.id).map(Vec::as_slice).unwrap_or(&[]);
            let split = picks.len().min(usize::try_from(category.included_count).unwrap_or(usize::MAX));
            let (included, extra) = picks.split_at(split);
            let name = |id: &String| category.option_name(id).to_string();

            CategoryLine {
                category_id: category.id.clone(),
                title: category.title.clone(),
                included: included.iter().map(name).collect(),
                extra: extra.iter().map(name).collect(),
                extra_count: u32::try_from(extra.len()).unwrap_or(u32::MAX),
                charge: category_extra_charge(category, picks.len()),
            }
        })
        .collect();

    let ingredients_total = ingredients_total(ingredients);
    let categories_total = categories.iter().map(|c| c.charge).fold(0, i64::saturating_add);

    PriceBreakdown {
        base_price: product.base_price,
        ingredients_total,
        categories,
        categories_total,
        unit_price: product.base_price.saturating_add(ingredients_total).saturating_add(categories_total),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::{IngredientOption, SelectionMode};

    fn category(id: &str, title: &str, included_count: u32, extra_price: i64) -> IngredientCategory {
        IngredientCategory {
            id: id.to_string(),
            title: title.to_string(),
            description: String::new(),
            options: vec![
                IngredientOption { id: format!("{id}_1"), name: format!("{title} 1") },
                IngredientOption { id: format!("{id}_2"), name: format!("{title} 2") },
                IngredientOption { id: format!("{id}_3"), name: format!("{title} 3") },
            ],
            included_count,
            extra_price,
        }
    }

    fn handroll() -> Product {
        Product {
            id: "handroll".to_string(),
            name: "Handroll".to_string(),
            base_price: 3500,
            base_included_description: String::new(),
            optional_ingredients: vec![],
            ingredient_categories: vec![
                category("proteina", "Proteína", 1, 1000),
                category("vegetales", "Vegetales", 1, 500),
            ],
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
    fn test_category_charge_never_negative() {
        let protein = category("proteina", "Proteína", 2, 1000);

        assert_eq!(category_extra_charge(&protein, 0), 0);
        assert_eq!(category_extra_charge(&protein, 2), 0);
        assert_eq!(category_extra_charge(&protein, 3), 1000);
        assert_eq!(category_extra_charge(&protein, 5), 3000);
    }

    #[test]
    fn test_zero_included_charges_every_pick() {
        let sauce = category("salsa", "Salsa", 0, 300);
        assert_eq!(category_extra_charge(&sauce, 1), 300);
        assert_eq!(category_extra_charge(&sauce, 3), 900);
    }

    #[test]
    fn test_unit_price_matches_reference_example() {
        let product = handroll();
        let selections = picks(&[
            ("proteina", &["proteina_1", "proteina_2"]),
            ("vegetales", &["vegetales_1"]),
        ]);

        assert_eq!(category_extras(&product, &selections), 1000);
        assert_eq!(unit_price(&product, &[], &selections), 4500);
    }

    #[test]
    fn test_flat_ingredients_are_added() {
        let product = handroll();
        let extras = vec![
            Ingredient { id: "extra_proteina".to_string(), name: "Extra proteína".to_string(), extra_price: 1000 },
            Ingredient { id: "extra_vegetal".to_string(), name: "Vegetal extra".to_string(), extra_price: 500 },
        ];

        assert_eq!(unit_price(&product, &extras, &CategorySelections::new()), 5000);
    }

    #[test]
    fn test_unknown_categories_are_ignored() {
        let product = handroll();
        let selections = picks(&[("postre", &["helado", "mochi", "flan"])]);

        assert_eq!(unit_price(&product, &[], &selections), 3500);
    }

    #[test]
    fn test_breakdown_labels_first_picks_as_included() {
        let product = handroll();
        let selections = picks(&[("proteina", &["proteina_3", "proteina_1", "kanikama"])]);

        let breakdown = price_breakdown(&product, &[], &selections);
        let protein = &breakdown.categories[0];

        assert_eq!(protein.included, vec!["Proteína 3"]);
        assert_eq!(protein.extra, vec!["Proteína 1", "kanikama"]);
        assert_eq!(protein.extra_count, 2);
        assert_eq!(protein.charge, 2000);

        let vegetables = &breakdown.categories[1];
        assert!(vegetables.included.is_empty());
        assert_eq!(vegetables.charge, 0);

        assert_eq!(breakdown.unit_price, unit_price(&product, &[], &selections));
        assert_eq!(breakdown.unit_price, 5500);
    }
}
