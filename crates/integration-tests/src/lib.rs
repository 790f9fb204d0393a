//! Integration tests for Shopfront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shopfront-integration-tests
//! ```
//!
//! Each test starts the real storefront router on an ephemeral local port
//! with its own temporary data directory, then drives it over HTTP the way
//! a browser would: cookies are kept so the session cart survives between
//! requests, and redirects are not followed so tests can assert on them.
//!
//! # Test Categories
//!
//! - `storefront` - Browsing, cart, checkout and contact flows
//! - `admin` - Product, category and order management

#![allow(clippy::missing_panics_doc)]

use std::net::SocketAddr;

use reqwest::{Client, Response, redirect::Policy};
use tempfile::TempDir;

use shopfront_storefront::config::StorefrontConfig;
use shopfront_storefront::state::AppState;

/// Valid checkout submission for a cash-on-delivery order.
pub const CHECKOUT_FORM: &[(&str, &str)] = &[
    ("first_name", "Ada"),
    ("last_name", "Lovelace"),
    ("email", "ada@example.com"),
    ("phone", "555-0100"),
    ("address", "12 Analytical Row"),
    ("city", "London"),
    ("state", "LDN"),
    ("zip", "10001"),
    ("same_address", "on"),
    ("payment_method", "cash_on_delivery"),
];

/// A running storefront bound to a private data directory.
pub struct TestContext {
    pub client: Client,
    pub state: AppState,
    addr: SocketAddr,
    // Held so the directory outlives the server.
    _data_dir: TempDir,
}

impl TestContext {
    /// Start a fresh storefront with the seed catalog.
    pub async fn new() -> Self {
        let data_dir = tempfile::tempdir().expect("create temp data dir");
        let config = StorefrontConfig {
            data_dir: data_dir.path().to_path_buf(),
            ..StorefrontConfig::default()
        };

        let state = AppState::new(config);
        state.store().init().await.expect("init store");

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().expect("local addr");

        let app = shopfront_storefront::app(state.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve storefront");
        });

        let client = Client::builder()
            .cookie_store(true)
            .redirect(Policy::none())
            .build()
            .expect("build client");

        Self {
            client,
            state,
            addr,
            _data_dir: data_dir,
        }
    }

    /// Absolute URL for a path on the test server.
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("GET request")
    }

    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> Response {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("POST request")
    }

    /// GET a page and return its status and body.
    pub async fn page(&self, path: &str) -> (u16, String) {
        let resp = self.get(path).await;
        let status = resp.status().as_u16();
        (status, resp.text().await.expect("read body"))
    }

    /// Add a product to the session cart.
    pub async fn add_to_cart(&self, product_id: u64, quantity: u32) -> Response {
        let id = product_id.to_string();
        let quantity = quantity.to_string();
        self.post_form(
            "/cart/add",
            &[
                ("product_id", id.as_str()),
                ("quantity", quantity.as_str()),
                ("return_to", "/cart"),
            ],
        )
        .await
    }

    /// Place an order for the current cart and return the confirmation path.
    pub async fn place_order(&self) -> String {
        let resp = self.post_form("/checkout", CHECKOUT_FORM).await;
        assert_eq!(resp.status().as_u16(), 303, "checkout should redirect");
        location(&resp)
    }
}

/// The `Location` header of a redirect.
pub fn location(resp: &Response) -> String {
    resp.headers()
        .get(reqwest::header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .expect("redirect location")
        .to_string()
}
