//! Order repository.

use chrono::Utc;

use shopfront_core::order::{self, CustomerDetails, Order};
use shopfront_core::{Cart, OrderNumber, OrderStatus, PaymentMethod};

use super::{LocalStore, ProductRepository, StoreError, keys};

/// Repository for placed orders.
pub struct OrderRepository<'a> {
    store: &'a LocalStore,
}

impl<'a> OrderRepository<'a> {
    #[must_use]
    pub const fn new(store: &'a LocalStore) -> Self {
        Self { store }
    }

    /// All orders in placement order.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the document cannot be read.
    pub async fn list(&self) -> Result<Vec<Order>, StoreError> {
        Ok(self.store.load(keys::ORDERS).await?.unwrap_or_default())
    }

    /// All orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the document cannot be read.
    pub async fn newest_first(&self) -> Result<Vec<Order>, StoreError> {
        let mut orders = self.list().await?;
        orders.sort_by(|a, b| b.placed_at.cmp(&a.placed_at));
        Ok(orders)
    }

    /// Look up an order by number.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the document cannot be read.
    pub async fn get(&self, number: &OrderNumber) -> Result<Option<Order>, StoreError> {
        Ok(self
            .list()
            .await?
            .into_iter()
            .find(|order| &order.number == number))
    }

    /// Place an order from `cart`.
    ///
    /// Stock is taken from the catalog and the order appended in one locked
    /// step. The cart is emptied on success and reconciled on a
    /// `CartChanged` rejection.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Order` when the checkout is rejected, or a
    /// storage error.
    pub async fn place(
        &self,
        cart: &mut Cart,
        customer: CustomerDetails,
        payment: PaymentMethod,
    ) -> Result<Order, StoreError> {
        let _guard = self.store.lock().await;
        let products = ProductRepository::new(self.store);
        let mut catalog = products.catalog().await?;
        let before = catalog.clone();
        let mut orders = self.list().await?;

        let number = {
            let mut rng = rand::rng();
            loop {
                let candidate = OrderNumber::generate(&mut rng);
                if orders.iter().all(|o| o.number != candidate) {
                    break candidate;
                }
            }
        };

        let order = order::checkout(&mut catalog, cart, customer, payment, Utc::now(), number)?;
        orders.push(order.clone());

        products.save(&catalog).await?;
        if let Err(e) = self.store.save(keys::ORDERS, &orders).await {
            return Err(self.store.restore(keys::PRODUCTS, &before, e).await);
        }

        tracing::info!(
            order_number = %order.number,
            items = order.item_count(),
            total = %order.total,
            "Order placed"
        );
        Ok(order)
    }

    /// Move an order to `status`. Returns `None` for an unknown number.
    ///
    /// Cancelling puts the ordered quantities back in stock.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Order` for a forbidden transition, or a storage
    /// error.
    pub async fn set_status(
        &self,
        number: &OrderNumber,
        status: OrderStatus,
    ) -> Result<Option<Order>, StoreError> {
        let _guard = self.store.lock().await;
        let mut orders = self.list().await?;
        let Some(order) = orders.iter_mut().find(|o| &o.number == number) else {
            return Ok(None);
        };

        let products = ProductRepository::new(self.store);
        let mut catalog = products.catalog().await?;
        let before = catalog.clone();
        let previous = order.status;
        if !order.transition(status, &mut catalog)? {
            return Ok(Some(order.clone()));
        }
        let updated = order.clone();

        let restocked = status == OrderStatus::Cancelled;
        if restocked {
            products.save(&catalog).await?;
        }
        if let Err(e) = self.store.save(keys::ORDERS, &orders).await {
            if restocked {
                return Err(self.store.restore(keys::PRODUCTS, &before, e).await);
            }
            return Err(e);
        }

        tracing::info!(
            order_number = %number,
            from = %previous,
            to = %status,
            "Order status changed"
        );
        Ok(Some(updated))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use shopfront_core::{CheckoutForm, OrderError, ProductId};

    fn customer() -> CustomerDetails {
        CheckoutForm {
            first_name: "Mae".to_string(),
            last_name: "Jemison".to_string(),
            email: "mae@example.com".to_string(),
            address: "1 Orbit Rd".to_string(),
            city: "Houston".to_string(),
            state: "TX".to_string(),
            zip: "77058".to_string(),
            ..CheckoutForm::default()
        }
        .validate()
        .unwrap()
        .0
    }

    async fn cart_with(store: &LocalStore, id: u64, quantity: u32) -> Cart {
        let product = ProductRepository::new(store)
            .get(ProductId::new(id))
            .await
            .unwrap()
            .unwrap();
        let mut cart = Cart::new();
        cart.add(&product, quantity).unwrap();
        cart
    }

    #[tokio::test]
    async fn test_place_persists_order_and_stock() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());
        let repo = OrderRepository::new(&store);
        let mut cart = cart_with(&store, 3, 2).await;

        let order = repo
            .place(&mut cart, customer(), PaymentMethod::CashOnDelivery)
            .await
            .unwrap();

        assert!(cart.is_empty());
        assert!(order.number.as_str().starts_with("ORD-"));
        assert_eq!(repo.get(&order.number).await.unwrap().unwrap(), order);

        let watch = ProductRepository::new(&store)
            .get(ProductId::new(3))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(watch.stock, 6);
    }

    #[tokio::test]
    async fn test_place_rejects_empty_cart() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());
        let repo = OrderRepository::new(&store);

        let err = repo
            .place(&mut Cart::new(), customer(), PaymentMethod::CashOnDelivery)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Order(OrderError::EmptyCart)));
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cancel_restocks_and_is_terminal() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());
        let repo = OrderRepository::new(&store);
        let mut cart = cart_with(&store, 8, 5).await;
        let order = repo
            .place(&mut cart, customer(), PaymentMethod::CashOnDelivery)
            .await
            .unwrap();

        let cancelled = repo
            .set_status(&order.number, OrderStatus::Cancelled)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cancelled.status, OrderStatus::Cancelled);

        let maker = ProductRepository::new(&store)
            .get(ProductId::new(8))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(maker.stock, 12);

        assert!(matches!(
            repo.set_status(&order.number, OrderStatus::Completed)
                .await
                .unwrap_err(),
            StoreError::Order(OrderError::InvalidTransition { .. })
        ));
    }

    /// Make writes of `key` fail by occupying its temp path with a directory.
    fn block_writes(dir: &std::path::Path, key: &str) -> std::path::PathBuf {
        let blocker = dir.join(format!(".{key}.json.tmp"));
        std::fs::create_dir_all(blocker.join("x")).unwrap();
        blocker
    }

    async fn stock_of(store: &LocalStore, id: u64) -> u32 {
        ProductRepository::new(store)
            .get(ProductId::new(id))
            .await
            .unwrap()
            .unwrap()
            .stock
    }

    #[tokio::test]
    async fn test_place_keeps_stock_when_order_write_fails() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());
        let repo = OrderRepository::new(&store);
        let mut cart = cart_with(&store, 1, 3).await;
        block_writes(dir.path(), keys::ORDERS);

        let err = repo
            .place(&mut cart, customer(), PaymentMethod::CashOnDelivery)
            .await
            .unwrap_err();

        assert!(err.is_storage());
        assert_eq!(stock_of(&store, 1).await, 15);
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cancel_keeps_stock_when_order_write_fails() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());
        let repo = OrderRepository::new(&store);
        let mut cart = cart_with(&store, 8, 5).await;
        let order = repo
            .place(&mut cart, customer(), PaymentMethod::CashOnDelivery)
            .await
            .unwrap();
        let blocker = block_writes(dir.path(), keys::ORDERS);

        let err = repo
            .set_status(&order.number, OrderStatus::Cancelled)
            .await
            .unwrap_err();
        assert!(err.is_storage());
        assert_eq!(stock_of(&store, 8).await, 7);
        assert_eq!(
            repo.get(&order.number).await.unwrap().unwrap().status,
            OrderStatus::Pending
        );

        // Retrying once writes succeed restocks exactly once.
        std::fs::remove_dir_all(blocker).unwrap();
        repo.set_status(&order.number, OrderStatus::Cancelled)
            .await
            .unwrap();
        assert_eq!(stock_of(&store, 8).await, 12);
    }

    #[tokio::test]
    async fn test_unknown_order_number() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());
        let number = OrderNumber::parse("ORD-ZZZZZZZZ").unwrap();
        let result = OrderRepository::new(&store)
            .set_status(&number, OrderStatus::Completed)
            .await
            .unwrap();
        assert!(result.is_none());
    }
}
