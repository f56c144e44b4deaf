pub mod product;
pub mod pricing;
pub mod selection;
pub mod catalog;

pub use product::{Product, Ingredient, IngredientCategory, IngredientOption, SelectionMode};
pub use pricing::{CategoryLine, PriceBreakdown};
pub use selection::{CategorySelections, MissingSelection, SelectionError};
pub use catalog::{validate_product, Catalog, CatalogError};
