//! Orders

pub mod errors;
pub mod history;
pub mod models;
pub mod store;

pub use errors::OrdersStoreError;
pub use history::*;
pub use store::*;
