//! Product catalog: products, categories, seed data and listing queries.
//!
//! The catalog is held as a whole collection and persisted the same way.
//! Every mutation works on the in-memory list; callers save the result.

mod category;
mod product;
mod query;
pub mod seed;

pub use category::{ALL_CATEGORY, CategoryError, CategoryList};
pub use product::{Catalog, CatalogError, DEFAULT_IMAGE_URL, Product, ProductFields, ProductInput};
pub use query::{ProductQuery, SortOrder};
