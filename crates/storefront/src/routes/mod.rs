//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Shop page (product grid + cart)
//! GET  /health                 - Health check
//! GET  /health/ready           - Readiness check (storage readable)
//!
//! # Cart (HTMX fragments, redirect for plain forms)
//! GET  /cart                   - Cart page
//! POST /cart/add               - Add to cart (returns cart_items fragment)
//! POST /cart/update            - Update quantity (returns cart_items fragment)
//! POST /cart/remove            - Remove item (returns cart_items fragment)
//! GET  /cart/count             - Cart count badge (fragment)
//!
//! # JSON API
//! GET  /api/cart               - Cart contents and totals
//! GET  /api/products           - Product catalog
//! GET  /api/campaigns          - Active campaign labels
//! ```

pub mod api;
pub mod cart;
pub mod home;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
}

/// Create the JSON API routes router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/cart", get(api::cart))
        .route("/products", get(api::products))
        .route("/campaigns", get(api::campaigns))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Shop page
        .route("/", get(home::home))
        // Cart routes
        .nest("/cart", cart_routes())
        // JSON API
        .nest("/api", api_routes())
}
