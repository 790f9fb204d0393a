//! Admin panel route handlers.
//!
//! Product, category and order management over the local store. Every
//! mutation is a plain form post that redirects back with a flash notice.

pub mod categories;
pub mod orders;
pub mod products;
