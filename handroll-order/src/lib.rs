pub mod models;
pub mod cart;
pub mod message;
pub mod dispatch;
pub mod checkout;

pub use models::{CartItem, CartItemUpdate, CustomerInfo, OrderDetails};
pub use cart::{Cart, CartError};
pub use message::{build_order_message, MessageError, OrderTotals, MAX_ADJUSTMENT};
pub use dispatch::{DispatchError, MessagingApp};
pub use checkout::{CheckoutError, DispatchOrder, ShopSettings};
