//! Checkout
//!
//! The order-placement saga: the ordered sequence of row writes that turns a
//! validated cart into a durable order while holding the storefront's
//! multi-entity invariants together without a multi-row transaction.

pub mod errors;
pub mod models;
pub mod service;

pub use errors::CheckoutError;
pub use models::*;
pub use service::CheckoutService;
