//! Session-backed models for the storefront.

pub mod session;

pub use session::keys as session_keys;
pub use session::{Flash, FlashKind, load_cart, save_cart};
