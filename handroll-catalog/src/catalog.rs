use std::collections::HashSet;

use crate::product::{Ingredient, IngredientCategory, IngredientOption, Product, SelectionMode};

/// The shop's product list, validated once and read-only afterwards
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog, rejecting blank ids, negative prices and duplicate ids.
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut product_ids = HashSet::new();
        for product in &products {
            validate_product(product)?;
            if !product_ids.insert(product.id.as_str()) {
                return Err(CatalogError::DuplicateId(product.id.clone()));
            }
        }

        tracing::debug!("Catalog loaded with {} products", products.len());
        Ok(Self { products })
    }

    /// The compiled-in menu.
    pub fn menu() -> Result<Self, CatalogError> {
        Self::new(menu_products())
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn get(&self, product_id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == product_id)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

fn require_id(id: &str, what: &str) -> Result<(), CatalogError> {
    if id.trim().is_empty() {
        return Err(CatalogError::BlankId(what.to_string()));
    }
    Ok(())
}

fn require_price(id: &str, price: i64) -> Result<(), CatalogError> {
    if price < 0 {
        return Err(CatalogError::NegativePrice { id: id.to_string(), price });
    }
    Ok(())
}

/// Checks a single product against the same rules [`Catalog::new`] applies.
pub fn validate_product(product: &Product) -> Result<(), CatalogError> {
    require_id(&product.id, "product")?;
    require_price(&product.id, product.base_price)?;

    for ingredient in &product.optional_ingredients {
        require_id(&ingredient.id, "ingredient")?;
        require_price(&ingredient.id, ingredient.extra_price)?;
    }

    let mut category_ids = HashSet::new();
    for category in &product.ingredient_categories {
        require_id(&category.id, "category")?;
        require_price(&category.id, category.extra_price)?;
        if !category_ids.insert(category.id.as_str()) {
            return Err(CatalogError::DuplicateId(category.id.clone()));
        }

        let mut option_ids = HashSet::new();
        for option in &category.options {
            require_id(&option.id, "option")?;
            if !option_ids.insert(option.id.as_str()) {
                return Err(CatalogError::DuplicateId(option.id.clone()));
            }
        }
    }

    Ok(())
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Blank {0} id")]
    BlankId(String),

    #[error("Negative price {price} for {id}")]
    NegativePrice {
        id: String,
        price: i64,
    },

    #[error("Duplicate id: {0}")]
    DuplicateId(String),
}

fn option(id: &str, name: &str) -> IngredientOption {
    IngredientOption { id: id.to_string(), name: name.to_string() }
}

fn category(
    id: &str,
    title: &str,
    description: &str,
    options: Vec<IngredientOption>,
    included_count: u32,
    extra_price: i64,
) -> IngredientCategory {
    IngredientCategory {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        options,
        included_count,
        extra_price,
    }
}

fn product(id: &str, name: &str, base_price: i64, description: &str) -> Product {
    Product {
        id: id.to_string(),
        name: name.to_string(),
        base_price,
        base_included_description: description.to_string(),
        optional_ingredients: Vec::new(),
        ingredient_categories: Vec::new(),
        selection_mode: SelectionMode::Structured,
    }
}

fn menu_products() -> Vec<Product> {
    let handroll = Product {
        ingredient_categories: vec![
            category(
                "handroll_proteina",
                "Proteína",
                "Selecciona al menos 1 proteína para tu handroll. Cada proteína adicional suma $1.000.",
                vec![
                    option("handroll_proteina_pollo", "Pollo"),
                    option("handroll_proteina_camaron", "Camarón"),
                    option("handroll_proteina_carne", "Carne"),
                    option("handroll_proteina_kanikama", "Kanikama"),
                    option("handroll_proteina_palmito", "Palmito"),
                    option("handroll_proteina_champinon", "Champiñón"),
                ],
                1,
                1000,
            ),
            category(
                "handroll_base",
                "Base cremosa",
                "Incluye 1 base cremosa. Cada base extra suma $1.000.",
                vec![
                    option("handroll_base_queso", "Queso"),
                    option("handroll_base_palta", "Palta"),
                ],
                1,
                1000,
            ),
            category(
                "handroll_vegetal",
                "Vegetal fresco",
                "Escoge 1 vegetal para dar frescura. Cada vegetal adicional suma $500.",
                vec![
                    option("handroll_vegetal_cebollin", "Cebollín"),
                    option("handroll_vegetal_ciboulette", "Ciboulette"),
                    option("handroll_vegetal_choclo", "Choclo"),
                ],
                1,
                500,
            ),
        ],
        ..product(
            "handroll",
            "Handroll",
            3500,
            "Elige tu proteína favorita, acompáñala con una base cremosa y un vegetal fresco. \
             Si quieres más, puedes agregar proteínas o bases extra por $1.000 y vegetales extra por $500.",
        )
    };

    let sushiburger = Product {
        optional_ingredients: vec![
            Ingredient {
                id: "sushiburger_extra_proteina".to_string(),
                name: "Extra proteína".to_string(),
                extra_price: 1000,
            },
            Ingredient {
                id: "sushiburger_extra_vegetal".to_string(),
                name: "Vegetal extra".to_string(),
                extra_price: 500,
            },
        ],
        ..product(
            "sushiburger",
            "Sushiburger",
            5500,
            "Arroz y nori, elige tu proteína favorita, una base cremosa y vegetales frescos.",
        )
    };

    // Gohan: four free picks spread however the customer likes.
    let gohan = Product {
        ingredient_categories: vec![
            category(
                "gohan_proteina",
                "Proteína",
                "Incluye 2 proteínas. Cada proteína adicional suma $1.000.",
                vec![
                    option("gohan_proteina_pollo", "Pollo"),
                    option("gohan_proteina_camaron", "Camarón"),
                    option("gohan_proteina_kanikama", "Kanikama"),
                    option("gohan_proteina_palmito", "Palmito"),
                ],
                2,
                1000,
            ),
            category(
                "gohan_vegetal",
                "Vegetales y toppings",
                "Incluye 2 vegetales. Cada vegetal adicional suma $500.",
                vec![
                    option("gohan_vegetal_palta", "Palta"),
                    option("gohan_vegetal_choclo", "Choclo"),
                    option("gohan_vegetal_pepino", "Pepino"),
                    option("gohan_vegetal_queso", "Queso"),
                ],
                2,
                500,
            ),
        ],
        selection_mode: SelectionMode::Flexible,
        ..product(
            "gohan",
            "Gohan",
            6500,
            "Incluye base de arroz más cebollín, más 4 ingredientes a elección para crear tu combinación perfecta.",
        )
    };

    vec![
        handroll,
        sushiburger,
        product(
            "sushipleto",
            "Sushipleto",
            5000,
            "Base de arroz y nori, relleno con una proteína, una base cremosa y un vegetal fresco a tu elección.",
        ),
        product(
            "sushipleto_vegetariano",
            "Sushipleto Vegetariano",
            4500,
            "Deliciosa combinación de champiñón o palmito, queso, palta y un toque de cebollín o ciboulette.",
        ),
        gohan,
    ]
}
