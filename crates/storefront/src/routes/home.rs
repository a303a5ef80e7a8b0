//! Home page route handler.
//!
//! The shop page is the product grid plus the cart panel.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use tiendita_core::{CurrencyCode, Price, Product};

use crate::routes::cart::{CampaignBadge, CartView, campaign_badges};
use crate::state::AppState;

/// Product card display data for templates.
#[derive(Clone)]
pub struct ProductCardView {
    pub id: String,
    pub title: String,
    pub price: String,
    pub img: String,
}

impl ProductCardView {
    fn new(product: &Product, currency: CurrencyCode) -> Self {
        Self {
            id: product.id.to_string(),
            title: product.title.clone(),
            price: Price::new(product.price, currency).display(),
            img: product.img.clone().unwrap_or_default(),
        }
    }
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub products: Vec<ProductCardView>,
    pub cart: CartView,
    pub count: u32,
    pub campaigns: Vec<CampaignBadge>,
}

/// Display the shop page.
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>) -> impl IntoResponse {
    let currency = state.currency();
    let products = state
        .catalog()
        .iter()
        .map(|product| ProductCardView::new(product, currency))
        .collect();
    let cart = CartView::new(state.cart().await.cart(), currency);

    HomeTemplate {
        products,
        count: cart.item_count,
        cart,
        campaigns: campaign_badges(&state),
    }
}
