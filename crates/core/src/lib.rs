//! Shopfront Core - Storefront domain library.
//!
//! This crate provides the domain model shared by all Shopfront components:
//! - `storefront` - Public storefront and admin panel
//! - `cli` - Command-line tools for seeding and inspecting the local store
//!
//! # Architecture
//!
//! The core crate contains only types and pure collection transformations - no
//! I/O, no HTTP, no persistence. Every mutation takes the current collection and
//! either changes it in place or returns a validation error, which keeps it
//! trivially testable.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, ratings, emails, and statuses
//! - [`catalog`] - Products, categories, seed data and the filter/sort pipeline
//! - [`cart`] - Shopping cart with stock-bounded quantities
//! - [`checkout`] - Checkout form validation
//! - [`order`] - Order snapshots and status transitions
//! - [`contact`] - Contact form validation
//! - [`validation`] - Field error collection shared by the forms

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod contact;
pub mod order;
pub mod types;
pub mod validation;

pub use cart::{AddOutcome, Cart, CartError, CartItem, Reconciliation};
pub use catalog::{
    ALL_CATEGORY, Catalog, CatalogError, CategoryError, CategoryList, Product, ProductInput,
    ProductQuery, SortOrder,
};
pub use checkout::CheckoutForm;
pub use contact::{ContactForm, ContactMessage};
pub use order::{CustomerDetails, Order, OrderError, OrderLine};
pub use types::*;
pub use validation::{FieldError, ValidationErrors};
