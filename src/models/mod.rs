pub mod category;
pub mod payment;

pub use category::{Category, NewCategory};
pub use payment::{NewPayment, Payment};
