//! Order listing and status commands.

use thiserror::Error;
use tracing::info;

use shopfront_core::{OrderNumber, OrderStatus};
use shopfront_storefront::store::{LocalStore, OrderRepository, StoreError};

/// Errors that can occur during order commands.
#[derive(Debug, Error)]
pub enum OrderCommandError {
    /// Malformed order number.
    #[error("Invalid order number: {0}")]
    InvalidNumber(String),

    /// Unknown status name.
    #[error("Invalid status: {0}. Valid statuses: pending, completed, cancelled")]
    InvalidStatus(String),

    /// No order with that number.
    #[error("Order not found: {0}")]
    NotFound(String),

    /// Store operation failed or the transition was refused.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Log one line per order, newest first.
///
/// # Errors
///
/// Returns a store error if the orders cannot be read.
pub async fn list(store: &LocalStore) -> Result<(), StoreError> {
    let orders = OrderRepository::new(store).newest_first().await?;

    for order in &orders {
        info!(
            number = %order.number,
            placed_at = %order.placed_at.format("%Y-%m-%d %H:%M"),
            customer = %order.customer.full_name(),
            items = order.item_count(),
            total = %order.total,
            status = %order.status,
            "Order"
        );
    }
    info!(total = orders.len(), "Orders listed");
    Ok(())
}

/// Move an order to a new status. Cancelling restocks its items.
///
/// # Errors
///
/// Returns an error for a malformed number or status, an unknown order, or a
/// forbidden transition.
pub async fn set_status(store: &LocalStore, number: &str, status: &str) -> Result<(), OrderCommandError> {
    let number =
        OrderNumber::parse(number).map_err(|_| OrderCommandError::InvalidNumber(number.to_string()))?;
    let status: OrderStatus = status
        .parse()
        .map_err(|_| OrderCommandError::InvalidStatus(status.to_string()))?;

    let order = OrderRepository::new(store)
        .set_status(&number, status)
        .await?
        .ok_or_else(|| OrderCommandError::NotFound(number.to_string()))?;

    info!(number = %order.number, status = %order.status, "Order status set");
    Ok(())
}
