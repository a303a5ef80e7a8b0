//! Catalog listing.

use std::fmt::Write;

use tiendita_core::Price;

use super::Context;

/// Render the catalog as one product per line.
pub fn list(context: &Context) -> String {
    let mut out = String::new();
    for product in context.catalog.iter() {
        let price = Price::new(product.price, context.currency).display();
        let _ = writeln!(out, "{:<8} {:<28} {:>10}", product.id, product.title, price);
    }
    out.trim_end().to_owned()
}
