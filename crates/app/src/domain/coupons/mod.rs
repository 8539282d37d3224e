//! Coupons

pub mod errors;
pub mod models;
pub mod resolver;
pub mod store;

pub use errors::CouponsStoreError;
pub use resolver::*;
pub use store::*;
