use std::sync::Arc;

use handroll_catalog::Catalog;
use handroll_order::{Cart, ShopSettings};
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    /// The single cart this storefront serves; writers hold the lock for the whole mutation.
    pub cart: Arc<RwLock<Cart>>,
    pub shop: Arc<ShopSettings>,
}

impl AppState {
    pub fn new(catalog: Catalog, shop: ShopSettings) -> Self {
        Self {
            catalog: Arc::new(catalog),
            cart: Arc::new(RwLock::new(Cart::new())),
            shop: Arc::new(shop),
        }
    }
}
