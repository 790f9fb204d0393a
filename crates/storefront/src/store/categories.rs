//! Category list repository.

use shopfront_core::CategoryList;
use shopfront_core::catalog::seed;

use super::{LocalStore, ProductRepository, StoreError, keys};

/// Repository for category labels.
pub struct CategoryRepository<'a> {
    store: &'a LocalStore,
}

impl<'a> CategoryRepository<'a> {
    #[must_use]
    pub const fn new(store: &'a LocalStore) -> Self {
        Self { store }
    }

    /// The current categories, or the seed list if none was ever saved.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the document cannot be read.
    pub async fn list(&self) -> Result<CategoryList, StoreError> {
        Ok(self
            .store
            .load(keys::CATEGORIES)
            .await?
            .unwrap_or_else(seed::categories))
    }

    /// Replace the whole list.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the document cannot be written.
    pub async fn save(&self, categories: &CategoryList) -> Result<(), StoreError> {
        self.store.save(keys::CATEGORIES, categories).await
    }

    /// Add a category and return its normalized label.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Category` for a blank or duplicate label.
    pub async fn add(&self, label: &str) -> Result<String, StoreError> {
        let _guard = self.store.lock().await;
        let mut categories = self.list().await?;
        let label = categories.add(label)?;
        self.save(&categories).await?;
        tracing::info!(category = %label, "Category added");
        Ok(label)
    }

    /// Rename a category and move its products to the new label.
    ///
    /// Returns the new label and how many products moved.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Category` when the rename is rejected.
    pub async fn rename(&self, old: &str, new: &str) -> Result<(String, usize), StoreError> {
        let _guard = self.store.lock().await;
        let mut categories = self.list().await?;
        let before = categories.clone();
        let label = categories.rename(old, new)?;

        let products = ProductRepository::new(self.store);
        let mut catalog = products.catalog().await?;
        let moved = catalog.relabel(old, &label);

        self.save(&categories).await?;
        if moved > 0 {
            if let Err(e) = products.save(&catalog).await {
                return Err(self.store.restore(keys::CATEGORIES, &before, e).await);
            }
        }
        tracing::info!(from = %old, to = %label, moved, "Category renamed");
        Ok((label, moved))
    }

    /// Remove a category. Its products keep their label.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Category` for the `All` sentinel or an unknown label.
    pub async fn remove(&self, label: &str) -> Result<(), StoreError> {
        let _guard = self.store.lock().await;
        let mut categories = self.list().await?;
        categories.remove(label)?;
        self.save(&categories).await?;
        tracing::info!(category = %label, "Category removed");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use shopfront_core::CategoryError;

    #[tokio::test]
    async fn test_add_persists() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());
        let repo = CategoryRepository::new(&store);

        assert_eq!(repo.add(" Garden ").await.unwrap(), "Garden");
        assert!(repo.list().await.unwrap().contains("Garden"));
        assert!(matches!(
            repo.add("Garden").await.unwrap_err(),
            StoreError::Category(CategoryError::Duplicate(_))
        ));
    }

    #[tokio::test]
    async fn test_rename_cascades_to_products() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());
        let repo = CategoryRepository::new(&store);

        let (label, moved) = repo.rename("Clothing", "Apparel").await.unwrap();
        assert_eq!(label, "Apparel");
        assert_eq!(moved, 2);

        let catalog = ProductRepository::new(&store).catalog().await.unwrap();
        assert_eq!(catalog.in_category("Apparel").count(), 2);
        assert_eq!(catalog.in_category("Clothing").count(), 0);
    }

    #[tokio::test]
    async fn test_rename_keeps_categories_when_product_write_fails() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());
        let repo = CategoryRepository::new(&store);
        std::fs::create_dir_all(dir.path().join(format!(".{}.json.tmp", keys::PRODUCTS)).join("x"))
            .unwrap();

        let err = repo.rename("Clothing", "Apparel").await.unwrap_err();
        assert!(err.is_storage());

        let categories = repo.list().await.unwrap();
        assert!(categories.contains("Clothing"));
        assert!(!categories.contains("Apparel"));

        let catalog = ProductRepository::new(&store).catalog().await.unwrap();
        assert_eq!(catalog.in_category("Clothing").count(), 2);
    }

    #[tokio::test]
    async fn test_remove_keeps_product_labels() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());
        let repo = CategoryRepository::new(&store);

        repo.remove("Accessories").await.unwrap();
        assert!(!repo.list().await.unwrap().contains("Accessories"));

        let catalog = ProductRepository::new(&store).catalog().await.unwrap();
        assert_eq!(catalog.in_category("Accessories").count(), 1);

        assert!(matches!(
            repo.remove("All").await.unwrap_err(),
            StoreError::Category(CategoryError::Reserved)
        ));
    }
}
