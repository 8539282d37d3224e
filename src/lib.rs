//! Camber
//!
//! Camber is the pure storefront domain library behind the camber workspace: the
//! in-progress cart, resolved discounts, and the checkout price arithmetic. It
//! performs no I/O and is safe to call on every render; persistence and the
//! order-placement workflow live in `camber-app`.

pub mod cart;
pub mod discounts;
pub mod pricing;
