//! Seeding and resetting the local store.
//!
//! # Usage
//!
//! ```bash
//! shopfront seed            # first run only
//! shopfront seed --force    # replace products and categories
//! shopfront reset           # delete everything, orders included
//! ```

use thiserror::Error;
use tracing::info;

use shopfront_core::catalog::seed as seed_data;
use shopfront_storefront::store::{
    CategoryRepository, LocalStore, ProductRepository, StoreError, keys,
};

/// Errors that can occur while seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    /// The store already holds products or categories.
    #[error("{0} already has data; pass --force to overwrite products and categories")]
    AlreadySeeded(String),

    /// Store operation failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Write the seed catalog and category list.
///
/// Orders and messages are left alone.
///
/// # Errors
///
/// Returns `AlreadySeeded` when data exists and `force` is off, or a store
/// error if a document cannot be written.
pub async fn seed(store: &LocalStore, force: bool) -> Result<(), SeedError> {
    let _guard = store.lock().await;

    let seeded = store.contains(keys::PRODUCTS).await? || store.contains(keys::CATEGORIES).await?;
    if seeded && !force {
        return Err(SeedError::AlreadySeeded(store.dir().display().to_string()));
    }

    let catalog = seed_data::catalog();
    let categories = seed_data::categories();
    ProductRepository::new(store).save(&catalog).await?;
    CategoryRepository::new(store).save(&categories).await?;

    info!(
        products = catalog.len(),
        categories = categories.display().count(),
        dir = %store.dir().display(),
        "Seed data written"
    );
    Ok(())
}

/// Delete every shop document.
///
/// # Errors
///
/// Returns a store error if a document cannot be deleted.
pub async fn reset(store: &LocalStore) -> Result<(), StoreError> {
    let removed = store.reset().await?;
    info!(removed, "Store reset; seed data loads on next start");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_seed_refuses_to_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());

        seed(&store, false).await.unwrap();
        assert!(store.contains(keys::PRODUCTS).await.unwrap());

        let err = seed(&store, false).await.unwrap_err();
        assert!(matches!(err, SeedError::AlreadySeeded(_)));

        seed(&store, true).await.unwrap();
    }

    #[tokio::test]
    async fn test_force_restores_seed_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());
        let products = ProductRepository::new(&store);
        products.save(&shopfront_core::Catalog::new(Vec::new())).await.unwrap();

        seed(&store, true).await.unwrap();
        assert_eq!(products.catalog().await.unwrap().len(), 8);
    }
}
