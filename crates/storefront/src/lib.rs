//! Tiendita Storefront library.
//!
//! This crate provides the catalog, the persisted cart and the HTTP
//! storefront as a library, allowing it to be tested and reused by the CLI.
//!
//! # Modules
//!
//! - [`catalog`] - Read-only product list
//! - [`storage`] - Key/value string stores (memory, JSON file)
//! - [`cart`] - Cart state, transitions and save-after-mutate store
//! - [`routes`] / [`app`] - Axum handlers and router

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod app;
pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod storage;
