//! Integration tests for Tiendita.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p tiendita-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `storefront_cart` - Cart flows through the HTTP router
//! - `storefront_pages` - Page rendering, health checks and JSON API
//!
//! Tests drive the axum router in-process with `tower::ServiceExt::oneshot`;
//! no server or network is involved.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, header};
use tower::ServiceExt;

use tiendita_core::CampaignMode;
use tiendita_storefront::app;
use tiendita_storefront::cart::STORAGE_KEY;
use tiendita_storefront::catalog::Catalog;
use tiendita_storefront::config::StorefrontConfig;
use tiendita_storefront::state::AppState;
use tiendita_storefront::storage::{KeyValueStore, MemoryStore};

/// Catalog used by every test.
pub const TEST_CATALOG: &str = r#"[
    {"id":"p1","title":"Shirt","price":10,"img":"/static/shirt.png"},
    {"id":"p2","title":"Hat","price":"4.50"}
]"#;

/// An in-process storefront.
pub struct TestApp {
    pub state: AppState,
    router: Router,
}

impl TestApp {
    /// A storefront over an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::with_store(MemoryStore::new())
    }

    /// A storefront whose store already holds `raw` under the cart key.
    #[must_use]
    pub fn with_stored_cart(raw: &str) -> Self {
        Self::with_store(MemoryStore::with_entry(STORAGE_KEY, raw))
    }

    /// A storefront over `store`.
    #[must_use]
    pub fn with_store(store: impl KeyValueStore + 'static) -> Self {
        let config = StorefrontConfig {
            campaigns: CampaignMode::from_pairs([("rebajas", "Rebajas")]),
            ..StorefrontConfig::default()
        };
        let catalog = Catalog::from_json_str(TEST_CATALOG).unwrap();
        let state = AppState::new(config, catalog, Box::new(store));
        let router = app::router(state.clone());
        Self { state, router }
    }

    /// Send a request through the router.
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// `GET path`.
    pub async fn get(&self, path: &str) -> Response<Body> {
        self.send(Request::get(path).body(Body::empty()).unwrap())
            .await
    }

    /// `POST path` with a urlencoded form body, optionally as an HTMX request.
    pub async fn post_form(&self, path: &str, form: &str, htmx: bool) -> Response<Body> {
        let mut builder = Request::post(path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if htmx {
            builder = builder.header("HX-Request", "true");
        }
        self.send(builder.body(Body::from(form.to_owned())).unwrap())
            .await
    }

    /// The raw value currently persisted under the cart key.
    pub async fn stored(&self) -> Option<String> {
        self.state.cart().await.storage().get(STORAGE_KEY).unwrap()
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Collect a response body as text.
pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_str(&body_text(response).await).unwrap()
}
