//! CLI command implementations.

pub mod orders;
pub mod products;
pub mod store;
