//! Profiles

pub mod errors;
pub mod models;
pub mod store;

pub use errors::ProfilesStoreError;
pub use store::*;
