//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::store::{
    CategoryRepository, LocalStore, MessageRepository, OrderRepository, ProductRepository,
};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the configuration and the local store.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    store: LocalStore,
}

impl AppState {
    /// Create a new application state with a store in `config.data_dir`.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let store = LocalStore::new(config.data_dir.clone());
        Self {
            inner: Arc::new(AppStateInner { config, store }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the local store.
    #[must_use]
    pub fn store(&self) -> &LocalStore {
        &self.inner.store
    }

    #[must_use]
    pub fn products(&self) -> ProductRepository<'_> {
        ProductRepository::new(self.store())
    }

    #[must_use]
    pub fn categories(&self) -> CategoryRepository<'_> {
        CategoryRepository::new(self.store())
    }

    #[must_use]
    pub fn orders(&self) -> OrderRepository<'_> {
        OrderRepository::new(self.store())
    }

    #[must_use]
    pub fn messages(&self) -> MessageRepository<'_> {
        MessageRepository::new(self.store())
    }
}
