//! Catalog

pub mod errors;
pub mod models;
pub mod store;

pub use errors::CatalogStoreError;
pub use store::*;
