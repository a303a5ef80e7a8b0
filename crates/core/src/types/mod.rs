//! Core types for Tiendita.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod campaign;
pub mod id;
pub mod price;
pub mod product;

pub use campaign::{CampaignMode, CampaignModeError};
pub use id::{ProductId, ProductIdError};
pub use price::{CurrencyCode, Price};
pub use product::Product;
