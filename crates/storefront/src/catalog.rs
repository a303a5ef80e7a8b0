//! Static product catalog.
//!
//! The catalog is read-only once loaded. It comes either from the list
//! compiled into the binary ([`Catalog::builtin`]) or from a JSON file of
//! products ([`Catalog::load`]).

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use thiserror::Error;

use tiendita_core::{Product, ProductId};

use crate::config::StorefrontConfig;

/// Errors loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("duplicate product id in catalog: {0}")]
    DuplicateId(ProductId),
}

/// An ordered, read-only list of products.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate ids.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateId`] if two products share an id.
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(products.len());
        for product in &products {
            if !seen.insert(&product.id) {
                return Err(CatalogError::DuplicateId(product.id.clone()));
            }
        }
        Ok(Self { products })
    }

    /// Parse a JSON array of products.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or ids repeat.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        Self::new(serde_json::from_str(json)?)
    }

    /// Load a JSON array of products from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json_str(&json)?;
        tracing::info!(path = %path.display(), products = catalog.len(), "Catalog loaded");
        Ok(catalog)
    }

    /// The catalog `config` selects: the file at `catalog_path` if set,
    /// otherwise the built-in list.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured file cannot be read or parsed.
    pub fn from_config(config: &StorefrontConfig) -> Result<Self, CatalogError> {
        match &config.catalog_path {
            Some(path) => Self::load(path),
            None => Ok(Self::builtin()),
        }
    }

    /// The product list shipped with the storefront.
    #[must_use]
    pub fn builtin() -> Self {
        const PRODUCTS: &[(&str, &str, i64, &str)] = &[
            ("p1", "Camiseta básica", 1000, "/static/img/camiseta.svg"),
            ("p2", "Sudadera con capucha", 3495, "/static/img/sudadera.svg"),
            ("p3", "Gorra de lona", 1250, "/static/img/gorra.svg"),
            ("p4", "Zapatillas urbanas", 5999, "/static/img/zapatillas.svg"),
            ("p5", "Calcetines de lana", 599, "/static/img/calcetines.svg"),
            ("p6", "Bufanda de punto", 1899, "/static/img/bufanda.svg"),
            ("p7", "Mochila de viaje", 4450, "/static/img/mochila.svg"),
            ("p8", "Gafas de sol", 2200, "/static/img/gafas.svg"),
        ];

        let products = PRODUCTS
            .iter()
            .filter_map(|&(id, title, cents, img)| {
                Some(Product {
                    id: ProductId::parse(id).ok()?,
                    title: title.to_owned(),
                    price: Decimal::new(cents, 2),
                    img: Some(img.to_owned()),
                })
            })
            .collect();

        Self { products }
    }

    /// Look up a product by exact id.
    #[must_use]
    pub fn find(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
