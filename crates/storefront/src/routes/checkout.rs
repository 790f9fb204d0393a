//! Checkout and order confirmation handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use shopfront_core::{CheckoutForm, Order, OrderError, OrderLine, OrderNumber, ValidationErrors};

use super::cart::CartView;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::middleware::PageContext;
use crate::models::{Flash, load_cart, save_cart};
use crate::state::AppState;
use crate::store::StoreError;

/// Order line display data for templates.
#[derive(Clone)]
pub struct OrderLineView {
    pub product_id: u64,
    pub name: String,
    pub image: String,
    pub unit_price: String,
    pub quantity: u32,
    pub line_total: String,
}

impl From<&OrderLine> for OrderLineView {
    fn from(line: &OrderLine) -> Self {
        Self {
            product_id: line.product_id.as_u64(),
            name: line.name.clone(),
            image: line.image.clone(),
            unit_price: line.unit_price.display(),
            quantity: line.quantity,
            line_total: line.line_total.display(),
        }
    }
}

/// Order display data, shared by the confirmation page and the admin panel.
#[derive(Clone)]
pub struct OrderView {
    pub number: String,
    pub placed_at: String,
    pub customer_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: String,
    pub same_address: bool,
    pub payment: &'static str,
    pub status: &'static str,
    pub status_param: String,
    pub is_final: bool,
    pub lines: Vec<OrderLineView>,
    pub item_count: u32,
    pub total: String,
}

impl From<&Order> for OrderView {
    fn from(order: &Order) -> Self {
        Self {
            number: order.number.to_string(),
            placed_at: order.placed_at.format("%B %-d, %Y %H:%M UTC").to_string(),
            customer_name: order.customer.full_name(),
            email: order.customer.email.to_string(),
            phone: order.customer.phone.clone(),
            address: order.customer.address_line(),
            same_address: order.customer.same_address,
            payment: order.payment.label(),
            status: order.status.label(),
            status_param: order.status.to_string(),
            is_final: order.status.is_terminal(),
            lines: order.lines.iter().map(OrderLineView::from).collect(),
            item_count: order.item_count(),
            total: order.total.display(),
        }
    }
}

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutTemplate {
    pub page: PageContext,
    pub cart: CartView,
    pub form: CheckoutForm,
    pub same_address: bool,
    pub card_selected: bool,
    pub errors: ValidationErrors,
}

impl CheckoutTemplate {
    fn new(page: PageContext, cart: CartView, form: CheckoutForm, errors: ValidationErrors) -> Self {
        Self {
            page,
            cart,
            same_address: form.same_address(),
            card_selected: form.payment_method.as_deref() == Some("card"),
            form,
            errors,
        }
    }
}

/// Order confirmation template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/confirmation.html")]
pub struct ConfirmationTemplate {
    pub page: PageContext,
    pub order: OrderView,
}

/// Display the checkout form. An empty cart has nothing to check out.
#[instrument(skip(session, page))]
pub async fn show(session: Session, page: PageContext) -> Result<Response> {
    let cart = load_cart(&session).await;
    if cart.is_empty() {
        return Ok(Redirect::to("/products").into_response());
    }

    Ok(CheckoutTemplate::new(
        page,
        CartView::from(&cart),
        CheckoutForm::default(),
        ValidationErrors::new(),
    )
    .into_response())
}

/// Validate the form and place the order.
#[instrument(skip(state, session, page, form))]
pub async fn place_order(
    State(state): State<AppState>,
    session: Session,
    page: PageContext,
    Form(form): Form<CheckoutForm>,
) -> Result<Response> {
    let mut cart = load_cart(&session).await;
    if cart.is_empty() {
        return Ok(Redirect::to("/products").into_response());
    }

    let (customer, payment) = match form.validate() {
        Ok(valid) => valid,
        Err(errors) => {
            tracing::debug!(errors = errors.len(), "Checkout form rejected");
            let template = CheckoutTemplate::new(page, CartView::from(&cart), form, errors);
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, template).into_response());
        }
    };

    match state.orders().place(&mut cart, customer, payment).await {
        Ok(order) => {
            save_cart(&session, &cart).await?;
            add_breadcrumb("checkout", "Order placed", Some(&[("order_number", order.number.as_str())]));
            Flash::success("Thank you! Your order has been placed.")
                .push(&session)
                .await?;
            Ok(Redirect::to(&format!("/order-confirmation/{}", order.number)).into_response())
        }
        Err(StoreError::Order(OrderError::CartChanged(changes))) => {
            // The reconciled cart is what the visitor should review.
            save_cart(&session, &cart).await?;
            let mut message = String::from("Your cart changed since you last viewed it. ");
            message.push_str(&changes.notices().join(". "));
            Flash::error(message).push(&session).await?;
            Ok(Redirect::to("/cart").into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Display the order confirmation page.
#[instrument(skip(state, page))]
pub async fn confirmation(
    State(state): State<AppState>,
    page: PageContext,
    Path(number): Path<String>,
) -> Result<impl IntoResponse> {
    let not_found = || AppError::NotFound("that order".to_string());

    let number = OrderNumber::parse(&number).map_err(|_| not_found())?;
    let order = state.orders().get(&number).await?.ok_or_else(not_found)?;

    Ok(ConfirmationTemplate {
        page,
        order: OrderView::from(&order),
    })
}
