//! Order management route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use shopfront_core::{OrderError, OrderNumber, OrderStatus};

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::PageContext;
use crate::models::Flash;
use crate::routes::checkout::OrderView;
use crate::state::AppState;
use crate::store::StoreError;

/// Status change form.
#[derive(Debug, Deserialize)]
pub struct StatusForm {
    pub status: String,
}

/// A status the order may move to.
#[derive(Clone)]
pub struct StatusOption {
    pub param: String,
    pub label: &'static str,
    /// Cancelling restocks, so the form asks for confirmation.
    pub is_cancel: bool,
}

/// Orders table template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/orders/index.html")]
pub struct OrdersIndexTemplate {
    pub page: PageContext,
    pub orders: Vec<OrderView>,
}

/// Order detail template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/orders/show.html")]
pub struct OrderShowTemplate {
    pub page: PageContext,
    pub order: OrderView,
    pub next_statuses: Vec<StatusOption>,
}

fn parse_number(number: &str) -> Result<OrderNumber> {
    OrderNumber::parse(number).map_err(|_| AppError::NotFound(format!("order {number}")))
}

/// Orders table handler, newest first.
#[instrument(skip(state, page))]
pub async fn index(State(state): State<AppState>, page: PageContext) -> Result<impl IntoResponse> {
    let orders = state.orders().newest_first().await?;
    Ok(OrdersIndexTemplate {
        page,
        orders: orders.iter().map(OrderView::from).collect(),
    })
}

/// Order detail handler.
#[instrument(skip(state, page))]
pub async fn show(
    State(state): State<AppState>,
    page: PageContext,
    Path(number): Path<String>,
) -> Result<impl IntoResponse> {
    let number = parse_number(&number)?;
    let order = state
        .orders()
        .get(&number)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("order {number}")))?;

    let next_statuses = OrderStatus::ALL
        .into_iter()
        .filter(|next| order.status.can_transition_to(*next))
        .map(|next| StatusOption {
            param: next.to_string(),
            label: next.label(),
            is_cancel: next == OrderStatus::Cancelled,
        })
        .collect();

    Ok(OrderShowTemplate {
        page,
        order: OrderView::from(&order),
        next_statuses,
    })
}

/// Status change handler.
///
/// A forbidden transition is reported as a flash on the order page.
#[instrument(skip(state, session))]
pub async fn set_status(
    State(state): State<AppState>,
    session: Session,
    Path(number): Path<String>,
    Form(form): Form<StatusForm>,
) -> Result<Redirect> {
    let number = parse_number(&number)?;
    let status: OrderStatus = form
        .status
        .parse()
        .map_err(|_| AppError::BadRequest(format!("Unknown order status: {}", form.status)))?;
    let back = format!("/admin/orders/{number}");

    match state.orders().set_status(&number, status).await {
        Ok(Some(order)) => {
            Flash::success(format!("Order {} is now {}", order.number, order.status.label()))
                .push(&session)
                .await?;
        }
        Ok(None) => return Err(AppError::NotFound(format!("order {number}"))),
        Err(StoreError::Order(e @ OrderError::InvalidTransition { .. })) => {
            Flash::error(e.to_string()).push(&session).await?;
        }
        Err(e) => return Err(e.into()),
    }

    Ok(Redirect::to(&back))
}
