//! Tiendita Core - Shared types library.
//!
//! This crate provides common types used across all Tiendita components:
//! - `storefront` - Catalog, cart store and the HTTP storefront
//! - `cli` - Command-line access to the catalog and the persisted cart
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access,
//! no HTTP. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Product identifiers, prices, catalog records and campaign labels

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
