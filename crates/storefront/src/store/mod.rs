//! Local key/value persistence for the shop's collections.
//!
//! # Layout
//!
//! One JSON document per key under the data directory:
//!
//! ```text
//! data/
//!   ecommerceProducts.json     Catalog (array of products)
//!   ecommerceCategories.json   Category labels
//!   ecommerceOrders.json       Placed orders
//!   ecommerceMessages.json     Contact form messages
//! ```
//!
//! Every write replaces a whole collection: the document is written to a
//! temporary file next to the target and renamed over it. Mutations go
//! through the repositories, which hold the store's write lock for the whole
//! load-modify-save cycle so concurrent requests cannot lose updates.

mod categories;
mod messages;
mod orders;
mod products;

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::sync::{Mutex, MutexGuard};

use shopfront_core::{CatalogError, CategoryError, OrderError};

pub use categories::CategoryRepository;
pub use messages::MessageRepository;
pub use orders::OrderRepository;
pub use products::ProductRepository;

/// Storage keys.
pub mod keys {
    pub const PRODUCTS: &str = "ecommerceProducts";
    pub const CATEGORIES: &str = "ecommerceCategories";
    pub const ORDERS: &str = "ecommerceOrders";
    pub const MESSAGES: &str = "ecommerceMessages";

    /// Every key the shop writes.
    pub const ALL: [&str; 4] = [PRODUCTS, CATEGORIES, ORDERS, MESSAGES];
}

/// Errors from the local store and the repositories on top of it.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing a document failed.
    #[error("I/O error on {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// A document exists but is not valid JSON for its collection.
    #[error("corrupt document {key}: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// A collection could not be serialized.
    #[error("failed to serialize {key}: {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Category(#[from] CategoryError),

    #[error(transparent)]
    Order(#[from] OrderError),
}

impl StoreError {
    /// Whether this is a failure of the store itself rather than a rejected
    /// domain operation.
    #[must_use]
    pub const fn is_storage(&self) -> bool {
        matches!(
            self,
            Self::Io { .. } | Self::Corrupt { .. } | Self::Serialize { .. }
        )
    }
}

/// A directory of JSON documents with a single writer lock.
#[derive(Debug)]
pub struct LocalStore {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl LocalStore {
    /// Create a store rooted at `dir`. The directory is created on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Data directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the data directory if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the directory cannot be created.
    pub async fn init(&self) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| io_error(".", source))
    }

    /// Whether the data directory exists and can be listed.
    pub async fn is_ready(&self) -> bool {
        tokio::fs::read_dir(&self.dir).await.is_ok()
    }

    /// Take the writer lock. Hold it across a whole load-modify-save cycle.
    pub async fn lock(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().await
    }

    /// Whether a document was ever written under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the file system cannot be queried.
    pub async fn contains(&self, key: &str) -> Result<bool, StoreError> {
        tokio::fs::try_exists(self.path_for(key))
            .await
            .map_err(|source| io_error(key, source))
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// Load the collection stored under `key`; `None` if it was never written.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` on read failure and `StoreError::Corrupt`
    /// when the document does not parse.
    pub async fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let bytes = match tokio::fs::read(self.path_for(key)).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(io_error(key, source)),
        };

        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|source| StoreError::Corrupt {
                key: key.to_string(),
                source,
            })
    }

    /// Replace the collection stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Serialize` or `StoreError::Io`.
    pub async fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(value).map_err(|source| StoreError::Serialize {
            key: key.to_string(),
            source,
        })?;

        self.init().await?;
        let target = self.path_for(key);
        let tmp = self.dir.join(format!(".{key}.json.tmp"));

        tokio::fs::write(&tmp, &bytes)
            .await
            .map_err(|source| io_error(key, source))?;
        tokio::fs::rename(&tmp, &target)
            .await
            .map_err(|source| io_error(key, source))?;

        tracing::debug!(key, bytes = bytes.len(), "Collection saved");
        Ok(())
    }

    /// Write `previous` back under `key` after a later write of the same
    /// mutation failed, and return that failure.
    ///
    /// Used when one operation spans two documents, so the first is not
    /// left changed when the second cannot be written.
    pub async fn restore<T: Serialize + ?Sized>(
        &self,
        key: &str,
        previous: &T,
        cause: StoreError,
    ) -> StoreError {
        match self.save(key, previous).await {
            Ok(()) => tracing::warn!(key, error = %cause, "Write failed, restored previous document"),
            Err(e) => tracing::error!(
                key,
                error = %cause,
                restore_error = %e,
                "Write failed and previous document could not be restored"
            ),
        }
        cause
    }

    /// Delete the document under `key`. Returns whether it existed.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` for failures other than a missing file.
    pub async fn remove(&self, key: &str) -> Result<bool, StoreError> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(source) => Err(io_error(key, source)),
        }
    }

    /// Delete every shop document, so the next start loads seed data again.
    ///
    /// Returns how many documents were removed.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if a document cannot be deleted.
    pub async fn reset(&self) -> Result<usize, StoreError> {
        let _guard = self.lock().await;
        let mut removed = 0;
        for key in keys::ALL {
            if self.remove(key).await? {
                removed += 1;
            }
        }
        tracing::info!(removed, dir = %self.dir.display(), "Local store reset");
        Ok(removed)
    }
}

fn io_error(key: &str, source: std::io::Error) -> StoreError {
    StoreError::Io {
        key: key.to_string(),
        source,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_key_loads_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());
        let loaded: Option<Vec<String>> = store.load("nothing").await.unwrap();
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path().join("nested"));
        store.save("labels", &vec!["a", "b"]).await.unwrap();

        let loaded: Option<Vec<String>> = store.load("labels").await.unwrap();
        assert_eq!(loaded.unwrap(), ["a", "b"]);
        assert!(!dir.path().join("nested/.labels.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_corrupt_document() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("broken.json"), b"{not json").unwrap();
        let store = LocalStore::new(dir.path());

        let err = store.load::<Vec<String>>("broken").await.unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { ref key, .. } if key == "broken"));
        assert!(err.is_storage());
    }

    #[tokio::test]
    async fn test_reset_removes_shop_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());
        store.save(keys::ORDERS, &Vec::<u8>::new()).await.unwrap();
        store.save(keys::MESSAGES, &Vec::<u8>::new()).await.unwrap();

        assert!(store.contains(keys::ORDERS).await.unwrap());
        assert_eq!(store.reset().await.unwrap(), 2);
        assert_eq!(store.reset().await.unwrap(), 0);
        assert!(!store.contains(keys::ORDERS).await.unwrap());
    }

    #[tokio::test]
    async fn test_readiness_follows_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path().join("data"));
        assert!(!store.is_ready().await);
        store.init().await.unwrap();
        assert!(store.is_ready().await);
    }
}
