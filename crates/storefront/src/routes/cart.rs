//! Cart route handlers.
//!
//! The cart lives in the visitor's session. Every mutation re-reads the
//! product from the catalog so quantities are bounded by current stock,
//! then redirects with a flash notice.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use shopfront_core::{Cart, CartItem, ProductId};

use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::middleware::PageContext;
use crate::models::{Flash, load_cart, save_cart};
use crate::state::AppState;

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub product_id: u64,
    pub name: String,
    pub category: String,
    pub image: String,
    pub price: String,
    pub quantity: u32,
    pub max_quantity: u32,
    pub line_price: String,
}

impl From<&CartItem> for CartItemView {
    fn from(item: &CartItem) -> Self {
        Self {
            product_id: item.product.id.as_u64(),
            name: item.product.name.clone(),
            category: item.product.category.clone(),
            image: item.product.image.clone(),
            price: item.product.price.display(),
            quantity: item.quantity,
            max_quantity: item.product.stock,
            line_price: item.line_total().display(),
        }
    }
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub item_count: u32,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.items().iter().map(CartItemView::from).collect(),
            subtotal: cart.total().display(),
            item_count: cart.item_count(),
        }
    }
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: String,
    #[serde(default)]
    pub quantity: Option<String>,
    /// Local path to return to after adding.
    #[serde(default)]
    pub return_to: Option<String>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: String,
    #[serde(default)]
    pub quantity: String,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: String,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub page: PageContext,
    pub cart: CartView,
    pub notices: Vec<String>,
}

/// Cart count badge fragment template.
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

/// Parse a quantity field; anything unparseable counts as zero.
fn parse_quantity(value: &str) -> u32 {
    value.trim().parse().unwrap_or(0)
}

/// Only same-site absolute paths are followed.
fn safe_return_path(return_to: Option<&str>) -> &str {
    match return_to {
        Some(path) if path.starts_with('/') && !path.starts_with("//") => path,
        _ => "/cart",
    }
}

/// Display cart page.
///
/// The cart is reconciled against the catalog first, so deleted products
/// disappear and quantities never exceed current stock.
#[instrument(skip(state, session, page))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    page: PageContext,
) -> Result<impl IntoResponse> {
    let mut cart = load_cart(&session).await;
    let mut notices = Vec::new();

    if !cart.is_empty() {
        let catalog = state.products().catalog().await?;
        let changes = cart.reconcile(&catalog);
        if !changes.is_unchanged() {
            save_cart(&session, &cart).await?;
            notices = changes.notices();
        }
    }

    Ok(CartShowTemplate {
        page,
        cart: CartView::from(&cart),
        notices,
    })
}

/// Add item to cart, then redirect back where the visitor came from.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let back = safe_return_path(form.return_to.as_deref()).to_string();

    let product = match form.product_id.parse::<ProductId>() {
        Ok(id) => state.products().get(id).await?,
        Err(_) => None,
    };
    let Some(product) = product else {
        Flash::error("That product is no longer available").push(&session).await?;
        return Ok(Redirect::to(&back).into_response());
    };

    let quantity = form.quantity.as_deref().map_or(1, parse_quantity);
    let mut cart = load_cart(&session).await;

    let flash = match cart.add(&product, quantity) {
        Ok(outcome) => {
            save_cart(&session, &cart).await?;
            add_breadcrumb(
                "cart",
                "Added to cart",
                Some(&[("product_id", &product.id.to_string())]),
            );
            tracing::info!(
                product_id = %product.id,
                quantity = outcome.quantity,
                clamped = outcome.clamped,
                "Added to cart"
            );
            if outcome.clamped {
                Flash::error(format!(
                    "Only {} of {} available; your cart now holds {}",
                    product.stock, product.name, outcome.quantity
                ))
            } else {
                Flash::success(format!("{} added to cart", product.name))
            }
        }
        Err(e) => Flash::error(e.to_string()),
    };
    flash.push(&session).await?;

    Ok(Redirect::to(&back).into_response())
}

/// Update cart item quantity.
#[instrument(skip(state, session))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<UpdateCartForm>,
) -> Result<Redirect> {
    let mut cart = load_cart(&session).await;
    let Ok(id) = form.product_id.parse::<ProductId>() else {
        Flash::error("That item is not in your cart").push(&session).await?;
        return Ok(Redirect::to("/cart"));
    };

    // Refresh stock first so the bound is the live one.
    let catalog = state.products().catalog().await?;
    cart.reconcile(&catalog);

    match cart.update_quantity(id, parse_quantity(&form.quantity)) {
        Ok(()) => tracing::debug!(product_id = %id, "Updated cart quantity"),
        Err(e) => Flash::error(e.to_string()).push(&session).await?,
    }
    save_cart(&session, &cart).await?;

    Ok(Redirect::to("/cart"))
}

/// Remove item from cart.
#[instrument(skip(session))]
pub async fn remove(session: Session, Form(form): Form<RemoveFromCartForm>) -> Result<Redirect> {
    let mut cart = load_cart(&session).await;

    let removed = form
        .product_id
        .parse::<ProductId>()
        .ok()
        .and_then(|id| cart.remove(id).ok());

    match removed {
        Some(item) => {
            save_cart(&session, &cart).await?;
            Flash::success(format!("{} removed from cart", item.product.name))
                .push(&session)
                .await?;
        }
        None => {
            Flash::error("That item is not in your cart").push(&session).await?;
        }
    }

    Ok(Redirect::to("/cart"))
}

/// Empty the cart.
#[instrument(skip(session))]
pub async fn clear(session: Session) -> Result<Redirect> {
    let mut cart = load_cart(&session).await;
    cart.clear();
    save_cart(&session, &cart).await?;
    Flash::success("Cart cleared").push(&session).await?;

    Ok(Redirect::to("/cart"))
}

/// Get cart count badge.
#[instrument(skip(session))]
pub async fn count(session: Session) -> impl IntoResponse {
    CartCountTemplate {
        count: load_cart(&session).await.item_count(),
    }
}
