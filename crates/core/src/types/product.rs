//! Catalog product record.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ProductId;

/// A purchasable product as supplied by the catalog.
///
/// Products are immutable once loaded. Cart line items copy these fields at
/// insertion time, so later catalog edits never change an existing line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    /// Unit price in the store currency.
    pub price: Decimal,
    /// Image reference (URL or static path).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub img: Option<String>,
}
