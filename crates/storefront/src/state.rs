//! Application state shared across handlers.

use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

use tiendita_core::{CampaignMode, CurrencyCode};

use crate::cart::CartStore;
use crate::catalog::{Catalog, CatalogError};
use crate::config::StorefrontConfig;
use crate::storage::{FileStore, KeyValueStore, StorageError};

/// Cart store over whichever backend the process was started with.
pub type SharedCartStore = CartStore<Box<dyn KeyValueStore>>;

/// Error building application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. The cart sits behind an async
/// mutex so each request performs its operation as the single actor.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    cart: Mutex<SharedCartStore>,
}

impl AppState {
    /// Create application state over an explicit catalog and store.
    ///
    /// The cart is hydrated from `store` here, once.
    #[must_use]
    pub fn new(config: StorefrontConfig, catalog: Catalog, store: Box<dyn KeyValueStore>) -> Self {
        let cart = CartStore::initialize(store);
        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                cart: Mutex::new(cart),
            }),
        }
    }

    /// Create application state from configuration: load the catalog and
    /// open the cart file.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog file is unusable or the storage file
    /// exists but cannot be read.
    pub fn from_config(config: StorefrontConfig) -> Result<Self, StateError> {
        let catalog = Catalog::from_config(&config)?;
        let store = FileStore::open(&config.data_path)?;
        tracing::info!(
            products = catalog.len(),
            data_path = %config.data_path.display(),
            "Application state ready"
        );
        Ok(Self::new(config, catalog, Box::new(store)))
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Active campaign labels.
    #[must_use]
    pub fn campaigns(&self) -> &CampaignMode {
        &self.inner.config.campaigns
    }

    /// Store currency.
    #[must_use]
    pub fn currency(&self) -> CurrencyCode {
        self.inner.config.currency
    }

    /// Lock the cart for one operation.
    pub async fn cart(&self) -> MutexGuard<'_, SharedCartStore> {
        self.inner.cart.lock().await
    }
}
