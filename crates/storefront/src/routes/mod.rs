//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                          - Home page
//! GET  /health                    - Liveness
//! GET  /health/ready              - Readiness (data directory readable)
//!
//! # Products
//! GET  /products                  - Listing (?category=&search=&sort=&featured=)
//! GET  /products/{id}             - Product detail
//!
//! # Cart
//! GET  /cart                      - Cart page
//! POST /cart/add                  - Add to cart, redirect back
//! POST /cart/update               - Set quantity
//! POST /cart/remove               - Remove line
//! POST /cart/clear                - Empty the cart
//! GET  /cart/count                - Cart count badge (fragment)
//!
//! # Checkout
//! GET  /checkout                  - Checkout form
//! POST /checkout                  - Place order
//! GET  /order-confirmation/{num}  - Confirmation page
//!
//! # Contact
//! GET  /contact                   - Contact form
//! POST /contact                   - Store message
//!
//! # Admin
//! GET  /admin                     - Redirect to /admin/products
//! GET  /admin/products            - Product table (?q=)
//! GET  /admin/products/new        - New product form
//! POST /admin/products            - Create product
//! GET  /admin/products/{id}/edit  - Edit product form
//! POST /admin/products/{id}       - Update product
//! POST /admin/products/{id}/delete - Delete product
//! GET  /admin/categories          - Category manager
//! POST /admin/categories          - Add category
//! POST /admin/categories/rename   - Rename category
//! POST /admin/categories/delete   - Delete category
//! GET  /admin/orders              - Order table
//! GET  /admin/orders/{number}     - Order detail
//! POST /admin/orders/{number}/status - Change order status
//! ```

pub mod admin;
pub mod cart;
pub mod checkout;
pub mod contact;
pub mod health;
pub mod home;
pub mod products;

use axum::{
    Router,
    response::Redirect,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
}

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { Redirect::to("/admin/products") }))
        .route(
            "/products",
            get(admin::products::index).post(admin::products::create),
        )
        .route("/products/new", get(admin::products::new_product))
        .route("/products/{id}", post(admin::products::update))
        .route("/products/{id}/edit", get(admin::products::edit))
        .route("/products/{id}/delete", post(admin::products::delete))
        .route(
            "/categories",
            get(admin::categories::index).post(admin::categories::add),
        )
        .route("/categories/rename", post(admin::categories::rename))
        .route("/categories/delete", post(admin::categories::delete))
        .route("/orders", get(admin::orders::index))
        .route("/orders/{number}", get(admin::orders::show))
        .route("/orders/{number}/status", post(admin::orders::set_status))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .route("/checkout", get(checkout::show).post(checkout::place_order))
        .route("/order-confirmation/{number}", get(checkout::confirmation))
        .route("/contact", get(contact::show).post(contact::submit))
        .nest("/admin", admin_routes())
}
