//! Placed orders.
//!
//! An order is a frozen snapshot of the cart at checkout time plus the
//! customer's form details. Only its status changes afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cart::{Cart, CartItem, Reconciliation};
use crate::catalog::{Catalog, CatalogError};
use crate::types::{Email, OrderNumber, OrderStatus, PaymentMethod, Price, ProductId};

/// Errors from placing or updating orders.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OrderError {
    #[error("Your cart is empty")]
    EmptyCart,
    #[error("Your cart changed since you last viewed it; please review it before checking out")]
    CartChanged(Reconciliation),
    #[error("{0} payment is not available yet")]
    PaymentUnavailable(&'static str),
    #[error("Cannot change order status from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Customer details captured by the checkout form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    /// Billing address is the same as shipping.
    pub same_address: bool,
}

impl CustomerDetails {
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Single-line shipping address.
    #[must_use]
    pub fn address_line(&self) -> String {
        format!("{}, {}, {} {}", self.address, self.city, self.state, self.zip)
    }
}

/// One product line of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub name: String,
    pub image: String,
    pub unit_price: Price,
    pub quantity: u32,
    pub line_total: Price,
}

impl From<&CartItem> for OrderLine {
    fn from(item: &CartItem) -> Self {
        Self {
            product_id: item.product.id,
            name: item.product.name.clone(),
            image: item.product.image.clone(),
            unit_price: item.product.price,
            quantity: item.quantity,
            line_total: item.line_total(),
        }
    }
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub number: OrderNumber,
    pub placed_at: DateTime<Utc>,
    pub customer: CustomerDetails,
    pub lines: Vec<OrderLine>,
    pub total: Price,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub payment: PaymentMethod,
}

impl Order {
    /// Snapshot `cart` into a new pending order.
    ///
    /// # Errors
    ///
    /// Returns `EmptyCart` for an empty cart and `PaymentUnavailable` for a
    /// payment method that is not accepted.
    pub fn place(
        cart: &Cart,
        customer: CustomerDetails,
        payment: PaymentMethod,
        placed_at: DateTime<Utc>,
        number: OrderNumber,
    ) -> Result<Self, OrderError> {
        if cart.is_empty() {
            return Err(OrderError::EmptyCart);
        }
        if !payment.is_available() {
            return Err(OrderError::PaymentUnavailable(payment.label()));
        }

        let lines: Vec<OrderLine> = cart.items().iter().map(OrderLine::from).collect();
        let total = lines.iter().map(|line| line.line_total).sum();

        Ok(Self {
            number,
            placed_at,
            customer,
            lines,
            total,
            status: OrderStatus::Pending,
            payment,
        })
    }

    /// Total units ordered.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0u32, |acc, line| acc.saturating_add(line.quantity))
    }

    /// Move the order to `next`, returning whether anything changed.
    ///
    /// Setting the current status again is a no-op. Cancelling returns the
    /// ordered quantities to stock for products still in the catalog.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` when the status machine forbids the move.
    pub fn transition(&mut self, next: OrderStatus, catalog: &mut Catalog) -> Result<bool, OrderError> {
        if self.status == next {
            return Ok(false);
        }
        if !self.status.can_transition_to(next) {
            return Err(OrderError::InvalidTransition {
                from: self.status,
                to: next,
            });
        }
        if next == OrderStatus::Cancelled {
            for line in &self.lines {
                catalog.return_stock(line.product_id, line.quantity);
            }
        }
        self.status = next;
        Ok(true)
    }
}

/// Place an order from the visitor's cart against the live catalog.
///
/// The cart is reconciled first; any change rejects the checkout so the
/// visitor can review it. On success stock is taken for every line and the
/// cart is emptied. The catalog is untouched on error.
///
/// # Errors
///
/// Returns `CartChanged` when reconciliation altered the cart, plus any
/// error from [`Order::place`].
pub fn checkout(
    catalog: &mut Catalog,
    cart: &mut Cart,
    customer: CustomerDetails,
    payment: PaymentMethod,
    placed_at: DateTime<Utc>,
    number: OrderNumber,
) -> Result<Order, OrderError> {
    let report = cart.reconcile(catalog);
    if !report.is_unchanged() {
        return Err(OrderError::CartChanged(report));
    }

    let order = Order::place(cart, customer, payment, placed_at, number)?;

    let mut updated = catalog.clone();
    for line in &order.lines {
        updated.take_stock(line.product_id, line.quantity)?;
    }
    *catalog = updated;
    cart.clear();

    Ok(order)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::seed;
    use chrono::TimeZone;

    fn customer() -> CustomerDetails {
        CustomerDetails {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: Email::parse("ada@example.com").unwrap(),
            phone: None,
            address: "12 Analytical Way".to_string(),
            city: "London".to_string(),
            state: "LDN".to_string(),
            zip: "10001".to_string(),
            same_address: true,
        }
    }

    fn number() -> OrderNumber {
        OrderNumber::parse("ORD-ABC12345").unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn cart_with(catalog: &Catalog, lines: &[(u64, u32)]) -> Cart {
        let mut cart = Cart::new();
        for &(id, quantity) in lines {
            let product = catalog.get(ProductId::new(id)).unwrap();
            cart.add(product, quantity).unwrap();
        }
        cart
    }

    #[test]
    fn test_place_rejects_empty_cart() {
        let err = Order::place(&Cart::new(), customer(), PaymentMethod::CashOnDelivery, now(), number());
        assert_eq!(err.unwrap_err(), OrderError::EmptyCart);
    }

    #[test]
    fn test_place_rejects_card() {
        let catalog = seed::catalog();
        let cart = cart_with(&catalog, &[(1, 1)]);
        let err = Order::place(&cart, customer(), PaymentMethod::Card, now(), number()).unwrap_err();
        assert_eq!(err, OrderError::PaymentUnavailable("Credit Card"));
    }

    #[test]
    fn test_checkout_takes_stock_and_clears_cart() {
        let mut catalog = seed::catalog();
        let mut cart = cart_with(&catalog, &[(1, 2), (2, 3)]);

        let order = checkout(
            &mut catalog,
            &mut cart,
            customer(),
            PaymentMethod::CashOnDelivery,
            now(),
            number(),
        )
        .unwrap();

        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.lines.len(), 2);
        assert_eq!(order.item_count(), 5);
        assert_eq!(order.total, Price::from_cents(12999 * 2 + 2499 * 3));
        assert!(cart.is_empty());
        assert_eq!(catalog.get(ProductId::new(1)).unwrap().stock, 13);
        assert_eq!(catalog.get(ProductId::new(2)).unwrap().stock, 47);
    }

    #[test]
    fn test_checkout_rejects_changed_cart() {
        let mut catalog = seed::catalog();
        let mut cart = cart_with(&catalog, &[(3, 5)]);
        catalog.take_stock(ProductId::new(3), 6).unwrap();

        let err = checkout(
            &mut catalog,
            &mut cart,
            customer(),
            PaymentMethod::CashOnDelivery,
            now(),
            number(),
        )
        .unwrap_err();

        assert!(matches!(err, OrderError::CartChanged(ref r) if r.clamped == ["Smart Watch"]));
        assert_eq!(cart.quantity_of(ProductId::new(3)), 2);
        assert_eq!(catalog.get(ProductId::new(3)).unwrap().stock, 2);
    }

    #[test]
    fn test_cancel_restocks() {
        let mut catalog = seed::catalog();
        let mut cart = cart_with(&catalog, &[(8, 4)]);
        let mut order = checkout(
            &mut catalog,
            &mut cart,
            customer(),
            PaymentMethod::CashOnDelivery,
            now(),
            number(),
        )
        .unwrap();
        assert_eq!(catalog.get(ProductId::new(8)).unwrap().stock, 8);

        assert!(order.transition(OrderStatus::Cancelled, &mut catalog).unwrap());
        assert_eq!(catalog.get(ProductId::new(8)).unwrap().stock, 12);
    }

    #[test]
    fn test_terminal_status_rejects_transition() {
        let mut catalog = seed::catalog();
        let cart = cart_with(&catalog, &[(1, 1)]);
        let mut order = Order::place(&cart, customer(), PaymentMethod::CashOnDelivery, now(), number()).unwrap();

        assert!(!order.transition(OrderStatus::Pending, &mut catalog).unwrap());
        assert!(order.transition(OrderStatus::Completed, &mut catalog).unwrap());
        assert_eq!(
            order.transition(OrderStatus::Cancelled, &mut catalog).unwrap_err(),
            OrderError::InvalidTransition {
                from: OrderStatus::Completed,
                to: OrderStatus::Cancelled
            }
        );
        assert_eq!(catalog.get(ProductId::new(1)).unwrap().stock, 15);
    }
}
