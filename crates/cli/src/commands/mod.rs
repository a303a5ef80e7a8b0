//! CLI subcommands.

use std::path::PathBuf;

use thiserror::Error;

use tiendita_core::{CurrencyCode, ProductId, ProductIdError};
use tiendita_storefront::cart::{CartError, CartStore};
use tiendita_storefront::catalog::{Catalog, CatalogError};
use tiendita_storefront::config::{ConfigError, StorefrontConfig};
use tiendita_storefront::storage::{FileStore, StorageError};

pub mod cart;
pub mod catalog;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("{0}")]
    Cart(#[from] CartError),

    #[error("Invalid product id: {0}")]
    InvalidId(#[from] ProductIdError),
}

/// Everything a command needs: catalog, cart and display currency.
pub struct Context {
    pub catalog: Catalog,
    pub cart: CartStore<FileStore>,
    pub currency: CurrencyCode,
}

impl Context {
    /// Resolve configuration from the environment, apply flag overrides and
    /// open the catalog and cart file.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration, the catalog or the cart file is
    /// unusable.
    pub fn load(data: Option<PathBuf>, catalog: Option<PathBuf>) -> Result<Self, CliError> {
        let mut config = StorefrontConfig::from_env()?;
        if let Some(path) = data {
            config.data_path = path;
        }
        if catalog.is_some() {
            config.catalog_path = catalog;
        }
        Self::from_config(&config)
    }

    /// Open the catalog and cart file named by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog or the cart file is unusable.
    pub fn from_config(config: &StorefrontConfig) -> Result<Self, CliError> {
        let catalog = Catalog::from_config(config)?;
        let store = FileStore::open(&config.data_path)?;
        Ok(Self {
            catalog,
            cart: CartStore::initialize(store),
            currency: config.currency,
        })
    }
}

fn parse_id(raw: &str) -> Result<ProductId, CliError> {
    Ok(ProductId::parse(raw)?)
}
