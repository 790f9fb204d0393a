//! Shopping cart.
//!
//! The cart keeps a snapshot of each product it holds so the cart page can
//! render without a catalog lookup. Quantities are bounded by the snapshot's
//! stock; [`Cart::reconcile`] brings snapshots back in line with the catalog
//! before checkout.

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, Product};
use crate::types::{Price, ProductId};

/// Errors from cart mutations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CartError {
    #[error("Quantity must be at least 1")]
    InvalidQuantity,
    #[error("{0} is out of stock")]
    OutOfStock(String),
    #[error("Quantity must be between 1 and {max}")]
    QuantityOutOfRange { requested: u32, max: u32 },
    #[error("Item not found in cart: {0}")]
    ItemNotFound(ProductId),
}

/// One cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub product: Product,
    pub quantity: u32,
}

impl CartItem {
    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price.times(self.quantity)
    }
}

/// Result of [`Cart::add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddOutcome {
    /// Quantity of the line after the add.
    pub quantity: u32,
    /// Whether the requested quantity was cut down to the available stock.
    pub clamped: bool,
}

/// What [`Cart::reconcile`] changed, by product name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    /// Lines dropped because the product was deleted or sold out.
    pub removed: Vec<String>,
    /// Lines whose quantity was cut down to current stock.
    pub clamped: Vec<String>,
    /// Lines whose unit price changed.
    pub repriced: Vec<String>,
}

impl Reconciliation {
    /// Whether the cart is exactly as it was.
    #[must_use]
    pub fn is_unchanged(&self) -> bool {
        self.removed.is_empty() && self.clamped.is_empty() && self.repriced.is_empty()
    }

    /// Notices describing each change, for the cart page.
    #[must_use]
    pub fn notices(&self) -> Vec<String> {
        let removed = self
            .removed
            .iter()
            .map(|name| format!("{name} is no longer available and was removed"));
        let clamped = self
            .clamped
            .iter()
            .map(|name| format!("{name}: quantity reduced to available stock"));
        let repriced = self
            .repriced
            .iter()
            .map(|name| format!("{name}: price has changed"));
        removed.chain(clamped).chain(repriced).collect()
    }
}

/// The visitor's cart, persisted in the session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |acc, item| acc.saturating_add(item.quantity))
    }

    /// Sum of line totals. Shipping is free, so this is also the order total.
    #[must_use]
    pub fn total(&self) -> Price {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Quantity held for `id`, zero if absent.
    #[must_use]
    pub fn quantity_of(&self, id: ProductId) -> u32 {
        self.items
            .iter()
            .find(|item| item.product.id == id)
            .map_or(0, |item| item.quantity)
    }

    /// Add `quantity` units of `product`, merging with an existing line.
    ///
    /// The resulting line quantity is clamped to the product's stock.
    ///
    /// # Errors
    ///
    /// Returns `InvalidQuantity` for zero and `OutOfStock` when the product
    /// has no stock.
    pub fn add(&mut self, product: &Product, quantity: u32) -> Result<AddOutcome, CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity);
        }
        if !product.in_stock() {
            return Err(CartError::OutOfStock(product.name.clone()));
        }

        let wanted = self.quantity_of(product.id).saturating_add(quantity);
        let granted = wanted.min(product.stock);

        match self.items.iter_mut().find(|item| item.product.id == product.id) {
            Some(item) => {
                item.product = product.clone();
                item.quantity = granted;
            }
            None => self.items.push(CartItem {
                product: product.clone(),
                quantity: granted,
            }),
        }

        Ok(AddOutcome {
            quantity: granted,
            clamped: granted < wanted,
        })
    }

    /// Set the quantity of an existing line.
    ///
    /// # Errors
    ///
    /// Returns `ItemNotFound` for a product not in the cart and
    /// `QuantityOutOfRange` unless `1 <= quantity <= stock`. The cart is
    /// unchanged on error.
    pub fn update_quantity(&mut self, id: ProductId, quantity: u32) -> Result<(), CartError> {
        let item = self
            .items
            .iter_mut()
            .find(|item| item.product.id == id)
            .ok_or(CartError::ItemNotFound(id))?;
        let max = item.product.stock;
        if quantity == 0 || quantity > max {
            return Err(CartError::QuantityOutOfRange {
                requested: quantity,
                max,
            });
        }
        item.quantity = quantity;
        Ok(())
    }

    /// Remove a line and return it.
    ///
    /// # Errors
    ///
    /// Returns `ItemNotFound` for a product not in the cart.
    pub fn remove(&mut self, id: ProductId) -> Result<CartItem, CartError> {
        let index = self
            .items
            .iter()
            .position(|item| item.product.id == id)
            .ok_or(CartError::ItemNotFound(id))?;
        Ok(self.items.remove(index))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Refresh every snapshot from `catalog`.
    ///
    /// Lines for deleted or sold-out products are dropped and quantities
    /// above current stock are clamped.
    pub fn reconcile(&mut self, catalog: &Catalog) -> Reconciliation {
        let mut report = Reconciliation::default();

        self.items.retain_mut(|item| {
            let Some(current) = catalog.get(item.product.id).filter(|p| p.in_stock()) else {
                report.removed.push(item.product.name.clone());
                return false;
            };
            if current.price != item.product.price {
                report.repriced.push(current.name.clone());
            }
            if item.quantity > current.stock {
                report.clamped.push(current.name.clone());
                item.quantity = current.stock;
            }
            item.product = current.clone();
            true
        });

        report
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::seed;
    use crate::types::MAX_PRICE_CENTS;

    fn product(id: u64) -> Product {
        seed::catalog().get(ProductId::new(id)).unwrap().clone()
    }

    #[test]
    fn test_add_merges_lines() {
        let mut cart = Cart::new();
        let headphones = product(1);
        cart.add(&headphones, 2).unwrap();
        let outcome = cart.add(&headphones, 3).unwrap();
        assert_eq!(outcome, AddOutcome { quantity: 5, clamped: false });
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.item_count(), 5);
    }

    #[test]
    fn test_add_clamps_to_stock() {
        let mut cart = Cart::new();
        let watch = product(3);
        let outcome = cart.add(&watch, 20).unwrap();
        assert_eq!(outcome, AddOutcome { quantity: 8, clamped: true });
    }

    #[test]
    fn test_add_rejects_zero_and_sold_out() {
        let mut cart = Cart::new();
        let mut wallet = product(4);
        assert_eq!(cart.add(&wallet, 0), Err(CartError::InvalidQuantity));
        wallet.stock = 0;
        assert_eq!(
            cart.add(&wallet, 1),
            Err(CartError::OutOfStock("Leather Wallet".to_string()))
        );
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_quantity_bounds() {
        let mut cart = Cart::new();
        let watch = product(3);
        cart.add(&watch, 1).unwrap();

        cart.update_quantity(watch.id, 8).unwrap();
        assert_eq!(cart.quantity_of(watch.id), 8);

        assert_eq!(
            cart.update_quantity(watch.id, 9),
            Err(CartError::QuantityOutOfRange { requested: 9, max: 8 })
        );
        assert!(cart.update_quantity(watch.id, 0).is_err());
        assert_eq!(cart.quantity_of(watch.id), 8);
        assert_eq!(
            cart.update_quantity(ProductId::new(42), 1),
            Err(CartError::ItemNotFound(ProductId::new(42)))
        );
    }

    #[test]
    fn test_total_and_remove() {
        let mut cart = Cart::new();
        cart.add(&product(2), 2).unwrap();
        cart.add(&product(8), 1).unwrap();
        assert_eq!(cart.total(), Price::from_cents(2499 * 2 + 4999));

        cart.remove(ProductId::new(2)).unwrap();
        assert_eq!(cart.total(), Price::from_cents(4999));
        assert!(cart.remove(ProductId::new(2)).is_err());

        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Price::ZERO);
    }

    #[test]
    fn test_total_of_most_expensive_product_in_bulk() {
        let mut gold = product(4);
        gold.price = Price::from_cents(MAX_PRICE_CENTS);
        gold.stock = u32::MAX;

        let mut cart = Cart::new();
        cart.add(&gold, u32::MAX).unwrap();
        cart.add(&product(1), 1).unwrap();

        let expected = Price::from_cents(MAX_PRICE_CENTS)
            .times(u32::MAX)
            .saturating_add(Price::from_cents(12999));
        assert_eq!(cart.total(), expected);
        assert_eq!(
            cart.items().first().unwrap().line_total(),
            Price::from_cents(MAX_PRICE_CENTS).times(u32::MAX)
        );
    }

    #[test]
    fn test_reconcile_unchanged() {
        let catalog = seed::catalog();
        let mut cart = Cart::new();
        cart.add(&product(1), 1).unwrap();
        assert!(cart.reconcile(&catalog).is_unchanged());
    }

    #[test]
    fn test_reconcile_drops_clamps_and_reprices() {
        let mut catalog = seed::catalog();
        let mut cart = Cart::new();
        cart.add(&product(1), 10).unwrap();
        cart.add(&product(3), 2).unwrap();
        cart.add(&product(4), 1).unwrap();

        catalog.take_stock(ProductId::new(1), 12).unwrap();
        catalog.delete(ProductId::new(4)).unwrap();
        let mut fields = crate::catalog::ProductInput::from_product(&product(3))
            .validate(&seed::categories())
            .unwrap();
        fields.price = Price::from_cents(100);
        catalog.update(ProductId::new(3), fields).unwrap();

        let report = cart.reconcile(&catalog);
        assert_eq!(report.removed, ["Leather Wallet"]);
        assert_eq!(report.clamped, ["Wireless Bluetooth Headphones"]);
        assert_eq!(report.repriced, ["Smart Watch"]);
        assert_eq!(report.notices().len(), 3);

        assert_eq!(cart.quantity_of(ProductId::new(1)), 3);
        assert_eq!(cart.total(), Price::from_cents(12999 * 3 + 100 * 2));
    }
}
