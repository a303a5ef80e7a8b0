//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `TIENDITA_DATA_PATH` - Cart storage file (default: data/cart.json)
//! - `TIENDITA_CATALOG_PATH` - JSON product list (default: built-in catalog)
//! - `TIENDITA_STATIC_DIR` - Directory served under `/static` (default: the
//!   storefront crate's `static/` directory)
//! - `TIENDITA_CURRENCY` - ISO 4217 code for prices (default: USD)
//! - `TIENDITA_CAMPAIGNS` - Active campaign labels as `key=label,...`
//!   (default: `rebajas=rebajas,navidad=navidad`)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use thiserror::Error;

use tiendita_core::{CampaignMode, CurrencyCode};

/// Default location of the cart storage file.
pub const DEFAULT_DATA_PATH: &str = "data/cart.json";

/// Default directory for static assets.
pub const DEFAULT_STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Cart storage file
    pub data_path: PathBuf,
    /// Product list file; `None` means the built-in catalog
    pub catalog_path: Option<PathBuf>,
    /// Static asset directory served under `/static`
    pub static_dir: PathBuf,
    /// Currency all catalog prices are in
    pub currency: CurrencyCode,
    /// Active campaign labels, fixed for the life of the process
    pub campaigns: CampaignMode,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            catalog_path: None,
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            currency: CurrencyCode::default(),
            campaigns: CampaignMode::default(),
            sentry_dsn: None,
            sentry_environment: None,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let invalid = |key: &str, msg: String| ConfigError::InvalidEnvVar(key.to_string(), msg);

        let host = match lookup("STOREFRONT_HOST") {
            Some(v) => v
                .parse::<IpAddr>()
                .map_err(|e| invalid("STOREFRONT_HOST", e.to_string()))?,
            None => defaults.host,
        };
        let port = match lookup("STOREFRONT_PORT") {
            Some(v) => v
                .parse::<u16>()
                .map_err(|e| invalid("STOREFRONT_PORT", e.to_string()))?,
            None => defaults.port,
        };
        let currency = match lookup("TIENDITA_CURRENCY") {
            Some(v) => CurrencyCode::from_code(&v)
                .ok_or_else(|| invalid("TIENDITA_CURRENCY", format!("unsupported currency {v:?}")))?,
            None => defaults.currency,
        };
        let campaigns = match lookup("TIENDITA_CAMPAIGNS") {
            Some(v) => CampaignMode::parse(&v)
                .map_err(|e| invalid("TIENDITA_CAMPAIGNS", e.to_string()))?,
            None => defaults.campaigns,
        };

        Ok(Self {
            host,
            port,
            data_path: lookup("TIENDITA_DATA_PATH").map_or(defaults.data_path, PathBuf::from),
            catalog_path: lookup("TIENDITA_CATALOG_PATH").map(PathBuf::from),
            static_dir: lookup("TIENDITA_STATIC_DIR").map_or(defaults.static_dir, PathBuf::from),
            currency,
            campaigns,
            sentry_dsn: lookup("SENTRY_DSN").filter(|v| !v.is_empty()),
            sentry_environment: lookup("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        StorefrontConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert_eq!(config.data_path, PathBuf::from(DEFAULT_DATA_PATH));
        assert!(config.catalog_path.is_none());
        assert!(config.static_dir.ends_with("static"));
        assert_eq!(config.currency, CurrencyCode::USD);
        assert_eq!(config.campaigns, CampaignMode::default());
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("STOREFRONT_HOST", "0.0.0.0"),
            ("STOREFRONT_PORT", "8080"),
            ("TIENDITA_DATA_PATH", "/tmp/cart.json"),
            ("TIENDITA_CATALOG_PATH", "catalog.json"),
            ("TIENDITA_STATIC_DIR", "/srv/static"),
            ("TIENDITA_CURRENCY", "eur"),
            ("TIENDITA_CAMPAIGNS", "verano=Verano"),
            ("SENTRY_DSN", ""),
        ])
        .unwrap();

        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8080");
        assert_eq!(config.data_path, PathBuf::from("/tmp/cart.json"));
        assert_eq!(config.catalog_path, Some(PathBuf::from("catalog.json")));
        assert_eq!(config.static_dir, PathBuf::from("/srv/static"));
        assert_eq!(config.currency, CurrencyCode::EUR);
        assert_eq!(config.campaigns.label("verano"), Some("Verano"));
        assert!(config.campaigns.label("rebajas").is_none());
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_invalid_port() {
        let err = config_from(&[("STOREFRONT_PORT", "not-a-port")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "STOREFRONT_PORT"));
    }

    #[test]
    fn test_invalid_currency() {
        let err = config_from(&[("TIENDITA_CURRENCY", "XYZ")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "TIENDITA_CURRENCY"));
    }

    #[test]
    fn test_invalid_campaigns() {
        let err = config_from(&[("TIENDITA_CAMPAIGNS", "rebajas")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "TIENDITA_CAMPAIGNS"));
    }
}
