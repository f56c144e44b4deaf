pub mod money;
pub mod pii;

pub use money::{format_price, MoneyError};
pub use pii::Masked;
