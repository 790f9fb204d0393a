//! Product listing command.

use tracing::info;

use shopfront_storefront::store::{LocalStore, ProductRepository, StoreError};

/// Log one line per product.
///
/// # Errors
///
/// Returns a store error if the catalog cannot be read.
pub async fn list(store: &LocalStore) -> Result<(), StoreError> {
    let catalog = ProductRepository::new(store).catalog().await?;

    for product in catalog.products() {
        info!(
            id = %product.id,
            category = %product.category,
            price = %product.price,
            stock = product.stock,
            featured = product.featured,
            "{}",
            product.name
        );
    }
    info!(total = catalog.len(), "Products listed");
    Ok(())
}
