use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::product::{Product, SelectionMode};

/// Category id → option ids, in the order they were picked.
pub type CategorySelections = BTreeMap<String, Vec<String>>;

/// Why a selection cannot be confirmed yet
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MissingSelection {
    /// Flexible product with nothing picked at all.
    AnyCategory,
    /// Structured product with a category below its included count.
    Category {
        category_id: String,
        title: String,
        required: u32,
        selected: u32,
    },
}

/// Check or uncheck an option. Checking is idempotent and keeps pick order;
/// a category left with no picks is removed from the map.
pub fn toggle_option(
    selections: &mut CategorySelections,
    category_id: &str,
    option_id: &str,
    checked: bool,
) {
    if checked {
        let picks = selections.entry(category_id.to_string()).or_default();
        if !picks.iter().any(|p| p == option_id) {
            picks.push(option_id.to_string());
        }
        return;
    }

    if let Some(picks) = selections.get_mut(category_id) {
        picks.retain(|p| p != option_id);
        if picks.is_empty() {
            selections.remove(category_id);
        }
    }
}

fn selected_in(selections: &CategorySelections, category_id: &str) -> u32 {
    selections
        .get(category_id)
        .map(|picks| u32::try_from(picks.len()).unwrap_or(u32::MAX))
        .unwrap_or(0)
}

/// Everything still missing before the product can be confirmed.
/// Selections for categories the product does not have are ignored.
pub fn missing_selections(product: &Product, selections: &CategorySelections) -> Vec<MissingSelection> {
    match product.selection_mode {
        SelectionMode::Flexible => {
            if product.ingredient_categories.is_empty() {
                return Vec::new();
            }
            let total: u32 = product
                .ingredient_categories
                .iter()
                .map(|c| selected_in(selections, &c.id))
                .sum();
            if total == 0 {
                vec![MissingSelection::AnyCategory]
            } else {
                Vec::new()
            }
        }
        SelectionMode::Structured => product
            .ingredient_categories
            .iter()
            .filter_map(|category| {
                let selected = selected_in(selections, &category.id);
                (selected < category.included_count).then(|| MissingSelection::Category {
                    category_id: category.id.clone(),
                    title: category.title.clone(),
                    required: category.included_count,
                    selected,
                })
            })
            .collect(),
    }
}

/// Gate consumed by the confirm action.
pub fn is_selection_complete(product: &Product, selections: &CategorySelections) -> bool {
    missing_selections(product, selections).is_empty()
}

/// Trim ids, drop empty categories and collapse repeated options to their first pick.
pub fn normalize_selections(selections: CategorySelections) -> Result<CategorySelections, SelectionError> {
    let mut clean = CategorySelections::new();
    for (category_id, options) in selections {
        if category_id.trim().is_empty() {
            return Err(SelectionError::BlankId("category"));
        }

        let picks = clean.entry(category_id.trim().to_string()).or_default();
        for option_id in options {
            let option_id = option_id.trim();
            if option_id.is_empty() {
                return Err(SelectionError::BlankId("option"));
            }
            if !picks.iter().any(|p| p == option_id) {
                picks.push(option_id.to_string());
            }
        }
    }
    clean.retain(|_, picks| !picks.is_empty());
    Ok(clean)
}

/// Normalize, then require every category and option to belong to `product`.
///
/// Anything that goes into a cart passes through here, so pricing, the gate
/// and the order message all see the same picks.
pub fn resolve_selections(
    product: &Product,
    selections: CategorySelections,
) -> Result<CategorySelections, SelectionError> {
    let selections = normalize_selections(selections)?;

    for (category_id, picks) in &selections {
        let category = product.category(category_id).ok_or_else(|| SelectionError::UnknownCategory {
            product_id: product.id.clone(),
            category_id: category_id.clone(),
        })?;
        if let Some(unknown) = picks.iter().find(|id| category.option(id).is_none()) {
            return Err(SelectionError::UnknownOption {
                category_id: category_id.clone(),
                option_id: unknown.clone(),
            });
        }
    }

    Ok(selections)
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Blank {0} id")]
    BlankId(&'static str),

    #[error("Unknown category {category_id} for {product_id}")]
    UnknownCategory {
        product_id: String,
        category_id: String,
    },

    #[error("Unknown option {option_id} in {category_id}")]
    UnknownOption {
        category_id: String,
        option_id: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::{IngredientCategory, IngredientOption};

    fn category(id: &str, included_count: u32) -> IngredientCategory {
        IngredientCategory {
            id: id.to_string(),
            title: id.to_uppercase(),
            description: String::new(),
            options: vec![
                IngredientOption { id: format!("{id}_a"), name: "A".to_string() },
                IngredientOption { id: format!("{id}_b"), name: "B".to_string() },
            ],
            included_count,
            extra_price: 500,
        }
    }

    fn product(mode: SelectionMode) -> Product {
        Product {
            id: "roll".to_string(),
            name: "Roll".to_string(),
            base_price: 3500,
            base_included_description: String::new(),
            optional_ingredients: vec![],
            ingredient_categories: vec![category("proteina", 1), category("vegetal", 2)],
            selection_mode: mode,
        }
    }

    fn picks(entries: &[(&str, &[&str])]) -> CategorySelections {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.iter().map(|s| s.to_string()).collect()))
            .collect()
    }

    #[test]
    fn test_structured_requires_every_category() {
        let product = product(SelectionMode::Structured);

        let partial = picks(&[("proteina", &["proteina_a"]), ("vegetal", &["vegetal_a"])]);
        assert!(!is_selection_complete(&product, &partial));
        assert_eq!(
            missing_selections(&product, &partial),
            vec![MissingSelection::Category {
                category_id: "vegetal".to_string(),
                title: "VEGETAL".to_string(),
                required: 2,
                selected: 1,
            }]
        );

        let full = picks(&[("proteina", &["proteina_a"]), ("vegetal", &["vegetal_a", "vegetal_b"])]);
        assert!(is_selection_complete(&product, &full));
    }

    #[test]
    fn test_flexible_needs_one_pick_anywhere() {
        let product = product(SelectionMode::Flexible);

        assert_eq!(
            missing_selections(&product, &CategorySelections::new()),
            vec![MissingSelection::AnyCategory]
        );
        assert!(is_selection_complete(&product, &picks(&[("vegetal", &["vegetal_b"])])));
    }

    #[test]
    fn test_unknown_categories_do_not_count() {
        let product = product(SelectionMode::Flexible);
        let stray = picks(&[("postre", &["helado"])]);

        assert!(!is_selection_complete(&product, &stray));
    }

    #[test]
    fn test_product_without_categories_is_always_complete() {
        let mut product = product(SelectionMode::Structured);
        product.ingredient_categories.clear();
        assert!(is_selection_complete(&product, &CategorySelections::new()));

        product.selection_mode = SelectionMode::Flexible;
        assert!(is_selection_complete(&product, &CategorySelections::new()));
    }

    #[test]
    fn test_normalize_trims_and_collapses_repeats() {
        let raw = picks(&[
            (" vegetal ", &["vegetal_b", " vegetal_a", "vegetal_b "]),
            ("proteina", &[]),
        ]);

        let clean = normalize_selections(raw).unwrap();
        assert_eq!(clean, picks(&[("vegetal", &["vegetal_b", "vegetal_a"])]));

        assert_eq!(
            normalize_selections(picks(&[("vegetal", &[" "])])),
            Err(SelectionError::BlankId("option"))
        );
        assert_eq!(
            normalize_selections(picks(&[("", &["vegetal_a"])])),
            Err(SelectionError::BlankId("category"))
        );
    }

    #[test]
    fn test_repeated_pick_does_not_fill_a_category() {
        let product = product(SelectionMode::Structured);
        let repeated = picks(&[("proteina", &["proteina_a"]), ("vegetal", &["vegetal_a", "vegetal_a"])]);

        // raw, the repeat looks like two picks
        assert!(is_selection_complete(&product, &repeated));

        let resolved = resolve_selections(&product, repeated).unwrap();
        assert!(!is_selection_complete(&product, &resolved));
    }

    #[test]
    fn test_resolve_rejects_foreign_ids() {
        let product = product(SelectionMode::Structured);

        assert_eq!(
            resolve_selections(&product, picks(&[("postre", &["helado"])])),
            Err(SelectionError::UnknownCategory {
                product_id: "roll".to_string(),
                category_id: "postre".to_string(),
            })
        );
        assert_eq!(
            resolve_selections(&product, picks(&[("proteina", &["proteina_a", "caviar"])])),
            Err(SelectionError::UnknownOption {
                category_id: "proteina".to_string(),
                option_id: "caviar".to_string(),
            })
        );

        let valid = picks(&[("proteina", &[" proteina_b "])]);
        assert_eq!(resolve_selections(&product, valid).unwrap(), picks(&[("proteina", &["proteina_b"])]));
    }

    #[test]
    fn test_toggle_keeps_order_and_dedups() {
        let mut selections = CategorySelections::new();
        toggle_option(&mut selections, "proteina", "camaron", true);
        toggle_option(&mut selections, "proteina", "pollo", true);
        toggle_option(&mut selections, "proteina", "camaron", true);

        assert_eq!(selections["proteina"], vec!["camaron", "pollo"]);

        toggle_option(&mut selections, "proteina", "camaron", false);
        assert_eq!(selections["proteina"], vec!["pollo"]);

        toggle_option(&mut selections, "proteina", "pollo", false);
        assert!(!selections.contains_key("proteina"));

        // unchecking something never picked is harmless
        toggle_option(&mut selections, "vegetal", "choclo", false);
        assert!(selections.is_empty());
    }
}
