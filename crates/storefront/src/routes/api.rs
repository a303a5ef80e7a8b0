//! JSON API handlers.

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::instrument;

use tiendita_core::{CampaignMode, Product};

use crate::cart::CartLineItem;
use crate::state::AppState;

/// JSON view of the cart.
#[derive(Debug, Serialize)]
pub struct CartResponse {
    pub items: Vec<CartLineItem>,
    pub total_quantity: u32,
    pub subtotal: String,
    pub currency: &'static str,
}

/// Current cart contents.
#[instrument(skip(state))]
pub async fn cart(State(state): State<AppState>) -> Json<CartResponse> {
    let currency = state.currency();
    let store = state.cart().await;
    let cart = store.cart();

    Json(CartResponse {
        items: cart.items().to_vec(),
        total_quantity: cart.total_quantity(),
        subtotal: cart.subtotal(currency).amount.round_dp(2).to_string(),
        currency: currency.code(),
    })
}

/// The product catalog.
#[instrument(skip(state))]
pub async fn products(State(state): State<AppState>) -> Json<Vec<Product>> {
    Json(state.catalog().iter().cloned().collect())
}

/// Active campaign labels.
#[instrument(skip(state))]
pub async fn campaigns(State(state): State<AppState>) -> Json<CampaignMode> {
    Json(state.campaigns().clone())
}
