//! Product catalog repository.

use shopfront_core::catalog::{ProductFields, seed};
use shopfront_core::{Catalog, Product, ProductId};

use super::{LocalStore, StoreError, keys};

/// Repository for the product catalog.
pub struct ProductRepository<'a> {
    store: &'a LocalStore,
}

impl<'a> ProductRepository<'a> {
    #[must_use]
    pub const fn new(store: &'a LocalStore) -> Self {
        Self { store }
    }

    /// The current catalog, or the seed catalog if none was ever saved.
    ///
    /// A saved empty catalog stays empty.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the document cannot be read.
    pub async fn catalog(&self) -> Result<Catalog, StoreError> {
        Ok(self
            .store
            .load(keys::PRODUCTS)
            .await?
            .unwrap_or_else(seed::catalog))
    }

    /// Look up one product.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the document cannot be read.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        Ok(self.catalog().await?.get(id).cloned())
    }

    /// Replace the whole catalog.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the document cannot be written.
    pub async fn save(&self, catalog: &Catalog) -> Result<(), StoreError> {
        self.store.save(keys::PRODUCTS, catalog).await
    }

    /// Add a product with the next free id.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the catalog cannot be read or written.
    pub async fn create(&self, fields: ProductFields) -> Result<Product, StoreError> {
        let _guard = self.store.lock().await;
        let mut catalog = self.catalog().await?;
        let product = catalog.create(fields);
        self.save(&catalog).await?;
        tracing::info!(product_id = %product.id, name = %product.name, "Product created");
        Ok(product)
    }

    /// Replace the fields of an existing product.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Catalog` for an unknown id, or a storage error.
    pub async fn update(&self, id: ProductId, fields: ProductFields) -> Result<Product, StoreError> {
        let _guard = self.store.lock().await;
        let mut catalog = self.catalog().await?;
        let product = catalog.update(id, fields)?.clone();
        self.save(&catalog).await?;
        tracing::info!(product_id = %id, "Product updated");
        Ok(product)
    }

    /// Remove a product.
    ///
    /// Carts and past orders keep their own snapshots.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Catalog` for an unknown id, or a storage error.
    pub async fn delete(&self, id: ProductId) -> Result<Product, StoreError> {
        let _guard = self.store.lock().await;
        let mut catalog = self.catalog().await?;
        let product = catalog.delete(id)?;
        self.save(&catalog).await?;
        tracing::info!(product_id = %id, name = %product.name, "Product deleted");
        Ok(product)
    }
}
