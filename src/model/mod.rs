pub mod money;
mod order;
mod product;
mod state_tax;

pub use order::{Order, OrderBuilder};
pub use product::Product;
pub use state_tax::{PLACEHOLDER_STATE_NAME, StateTax};
