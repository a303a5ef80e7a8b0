//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! HTMX requests get the cart fragment back plus an `HX-Trigger` so the
//! header badge refreshes; plain form posts are redirected to the shop page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::HeaderMap,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use tiendita_core::{CurrencyCode, Price, ProductId};

use crate::cart::{Cart, CartLineItem, MAX_QUANTITY};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::state::AppState;

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub id: String,
    pub title: String,
    pub img: String,
    pub quantity: u32,
    pub quantity_options: Vec<QuantityOption>,
    pub price: String,
    pub line_price: String,
}

/// One entry of the quantity picker.
#[derive(Clone)]
pub struct QuantityOption {
    pub value: u32,
    pub selected: bool,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub item_count: u32,
}

/// Campaign label display data for templates.
#[derive(Clone)]
pub struct CampaignBadge {
    pub key: String,
    pub label: String,
}

// =============================================================================
// Type Conversions
// =============================================================================

impl CartItemView {
    fn new(line: &CartLineItem, currency: CurrencyCode) -> Self {
        Self {
            id: line.id.to_string(),
            title: line.title.clone(),
            img: line.img.clone().unwrap_or_default(),
            quantity: line.quantity,
            quantity_options: (1..=MAX_QUANTITY)
                .map(|value| QuantityOption {
                    value,
                    selected: value == line.quantity,
                })
                .collect(),
            price: Price::new(line.price, currency).display(),
            line_price: line.line_total(currency).display(),
        }
    }
}

impl CartView {
    /// Build the display view of `cart`.
    #[must_use]
    pub fn new(cart: &Cart, currency: CurrencyCode) -> Self {
        Self {
            items: cart
                .iter()
                .map(|line| CartItemView::new(line, currency))
                .collect(),
            subtotal: cart.subtotal(currency).display(),
            item_count: cart.total_quantity(),
        }
    }
}

/// Campaign badges for the page header.
#[must_use]
pub fn campaign_badges(state: &AppState) -> Vec<CampaignBadge> {
    state
        .campaigns()
        .iter()
        .map(|(key, label)| CampaignBadge {
            key: key.to_owned(),
            label: label.to_owned(),
        })
        .collect()
}

// =============================================================================
// Forms
// =============================================================================

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: String,
}

/// Update cart form data.
///
/// `quantity` is kept as the raw text the browser sent; the cart decides
/// whether it is acceptable.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: String,
    pub quantity: String,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: String,
}

fn parse_product_id(raw: &str) -> Result<ProductId> {
    ProductId::parse(raw).map_err(|e| AppError::BadRequest(e.to_string()))
}

// =============================================================================
// Templates
// =============================================================================

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
    pub count: u32,
    pub campaigns: Vec<CampaignBadge>,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

/// Response for a cart mutation: fragment for HTMX, redirect otherwise.
fn mutation_response(headers: &HeaderMap, cart: CartView) -> Response {
    if headers.contains_key("hx-request") {
        (
            AppendHeaders([("HX-Trigger", "cart-updated")]),
            CartItemsTemplate { cart },
        )
            .into_response()
    } else {
        Redirect::to("/").into_response()
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Display cart page.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> impl IntoResponse {
    let cart = CartView::new(state.cart().await.cart(), state.currency());
    CartShowTemplate {
        count: cart.item_count,
        cart,
        campaigns: campaign_badges(&state),
    }
}

/// Add one unit of a product to the cart.
///
/// Unknown products are rejected with 404 and leave the cart untouched.
#[instrument(skip(state, headers))]
pub async fn add(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let id = parse_product_id(&form.product_id)?;

    let view = {
        let mut store = state.cart().await;
        let cart = store.add_or_increment(&id, state.catalog())?;
        CartView::new(cart, state.currency())
    };

    add_breadcrumb("cart", "Added to cart", Some(&[("product_id", id.as_str())]));
    tracing::info!(product_id = %id, items = view.item_count, "Added to cart");
    Ok(mutation_response(&headers, view))
}

/// Update a line's quantity from the quantity picker.
#[instrument(skip(state, headers))]
pub async fn update(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<UpdateCartForm>,
) -> Result<Response> {
    let id = parse_product_id(&form.product_id)?;

    let view = {
        let mut store = state.cart().await;
        let cart = store.set_quantity(&id, &form.quantity)?;
        CartView::new(cart, state.currency())
    };

    tracing::info!(product_id = %id, quantity = %form.quantity, "Updated cart quantity");
    Ok(mutation_response(&headers, view))
}

/// Remove a line from the cart.
#[instrument(skip(state, headers))]
pub async fn remove(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Response> {
    let id = parse_product_id(&form.product_id)?;

    let view = {
        let mut store = state.cart().await;
        let cart = store.remove(&id)?;
        CartView::new(cart, state.currency())
    };

    add_breadcrumb("cart", "Removed from cart", Some(&[("product_id", id.as_str())]));
    tracing::info!(product_id = %id, "Removed from cart");
    Ok(mutation_response(&headers, view))
}

/// Get cart count badge (HTMX).
#[instrument(skip(state))]
pub async fn count(State(state): State<AppState>) -> impl IntoResponse {
    let count = state.cart().await.cart().total_quantity();
    CartCountTemplate { count }
}
