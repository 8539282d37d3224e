//! Camber application: storage interfaces, the coupon resolver, the order
//! placement saga, and cart session persistence.

pub mod checkout;
pub mod context;
pub mod database;
pub mod domain;
pub mod session;

#[cfg(test)]
mod test;

mod uuids;

pub use uuids::TypedUuid;
