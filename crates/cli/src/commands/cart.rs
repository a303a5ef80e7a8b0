//! Cart inspection and editing.
//!
//! Every editing command writes the cart file and then prints the new cart.

use std::fmt::Write;

use tiendita_core::CurrencyCode;
use tiendita_storefront::cart::Cart;

use super::{CliError, Context, parse_id};

/// Render a cart as a table with a total line.
pub fn render(cart: &Cart, currency: CurrencyCode) -> String {
    if cart.is_empty() {
        return "Cart is empty".to_owned();
    }

    let mut out = String::new();
    for line in cart.iter() {
        let _ = writeln!(
            out,
            "{:<8} {:<28} x{:<3} {:>10}",
            line.id,
            line.title,
            line.quantity,
            line.line_total(currency).display()
        );
    }
    let _ = write!(
        out,
        "{} item(s), total {}",
        cart.total_quantity(),
        cart.subtotal(currency).display()
    );
    out
}

pub fn show(context: &Context) -> String {
    render(context.cart.cart(), context.currency)
}

/// # Errors
///
/// Returns an error for an invalid or unknown id, or if the cart file
/// cannot be written.
pub fn add(context: &mut Context, id: &str) -> Result<String, CliError> {
    let id = parse_id(id)?;
    let cart = context.cart.add_or_increment(&id, &context.catalog)?;
    Ok(render(cart, context.currency))
}

/// # Errors
///
/// Returns an error for an invalid id or if the cart file cannot be written.
pub fn remove(context: &mut Context, id: &str) -> Result<String, CliError> {
    let id = parse_id(id)?;
    let cart = context.cart.remove(&id)?;
    Ok(render(cart, context.currency))
}

/// # Errors
///
/// Returns an error for an invalid id or quantity, or if the cart file
/// cannot be written.
pub fn set(context: &mut Context, id: &str, quantity: &str) -> Result<String, CliError> {
    let id = parse_id(id)?;
    let cart = context.cart.set_quantity(&id, quantity)?;
    Ok(render(cart, context.currency))
}
