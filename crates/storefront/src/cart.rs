//! Shopping cart state and its persistence.
//!
//! # Model
//!
//! A [`Cart`] is an ordered list of [`CartLineItem`]s, unique by product id.
//! Insertion order is kept and removal never reorders the survivors. Every
//! transition on [`Cart`] is pure: it builds a new cart out of new line items
//! and leaves the receiver untouched.
//!
//! [`CartStore`] owns the current cart plus a [`KeyValueStore`]. It hydrates
//! once from the store and then writes the full cart back under
//! [`STORAGE_KEY`] after every mutation, including ones that change nothing.
//!
//! # Quantity rules
//!
//! - Adding a product already in the cart increments it, up to
//!   [`MAX_QUANTITY`]. Further adds leave it at the cap without error.
//! - Direct quantity edits must parse as an integer of at least 1 and are
//!   clamped to [`MAX_QUANTITY`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use tiendita_core::{CurrencyCode, Price, Product, ProductId};

use crate::catalog::Catalog;
use crate::storage::{KeyValueStore, StorageError};

/// Storage key the serialized cart lives under.
pub const STORAGE_KEY: &str = "products";

/// Highest quantity a line item can reach.
pub const MAX_QUANTITY: u32 = 10;

/// Errors from cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// The product id is not in the catalog.
    #[error("unknown product: {0}")]
    UnknownProduct(ProductId),

    /// A quantity edit was not a whole number of at least 1.
    #[error("invalid quantity {0:?}: expected a whole number from 1 to {max}", max = MAX_QUANTITY)]
    InvalidQuantity(String),

    /// Serializing the cart failed.
    #[error("failed to encode cart: {0}")]
    Encode(#[from] serde_json::Error),

    /// Writing the cart to storage failed.
    #[error("failed to persist cart: {0}")]
    Storage(#[from] StorageError),
}

// =============================================================================
// Line items
// =============================================================================

/// One product entry in the cart.
///
/// Product fields are copied at insertion time. When hydrating from storage
/// only `id` and `quantity` are required; missing product fields default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    pub id: ProductId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub img: Option<String>,
    pub quantity: u32,
}

impl CartLineItem {
    /// A new line for `product` with quantity 1.
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            title: product.title.clone(),
            price: product.price,
            img: product.img.clone(),
            quantity: 1,
        }
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self, currency: CurrencyCode) -> Price {
        Price::new(self.price, currency).times(self.quantity)
    }

    fn with_quantity(&self, quantity: u32) -> Self {
        Self {
            quantity,
            ..self.clone()
        }
    }
}

// =============================================================================
// Cart
// =============================================================================

/// An ordered list of line items, unique by id.
///
/// Serializes as a plain JSON array. Deserializing normalizes what it reads:
/// repeated ids collapse to their first kept occurrence, zero quantities and
/// prices too large to total are dropped, and quantities above
/// [`MAX_QUANTITY`] are clamped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<CartLineItem>", into = "Vec<CartLineItem>")]
pub struct Cart {
    items: Vec<CartLineItem>,
}

impl From<Vec<CartLineItem>> for Cart {
    fn from(items: Vec<CartLineItem>) -> Self {
        let mut unique: Vec<CartLineItem> = Vec::with_capacity(items.len());
        for item in items {
            if unique.iter().any(|kept| kept.id == item.id) {
                tracing::warn!(product_id = %item.id, "Dropping duplicate cart line");
            } else if item.quantity == 0 {
                tracing::warn!(product_id = %item.id, "Dropping cart line with zero quantity");
            } else if item.price.checked_mul(Decimal::from(MAX_QUANTITY)).is_none() {
                tracing::warn!(product_id = %item.id, price = %item.price, "Dropping cart line with out-of-range price");
            } else {
                if item.quantity > MAX_QUANTITY {
                    tracing::warn!(
                        product_id = %item.id,
                        quantity = item.quantity,
                        "Clamping stored cart quantity"
                    );
                }
                let quantity = item.quantity.min(MAX_QUANTITY);
                unique.push(CartLineItem { quantity, ..item });
            }
        }
        Self { items: unique }
    }
}

impl From<Cart> for Vec<CartLineItem> {
    fn from(cart: Cart) -> Self {
        cart.items
    }
}

impl Cart {
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Add `product`, or increment its line if already present.
    #[must_use]
    pub fn with_added(&self, product: &Product) -> Self {
        if self.contains(&product.id) {
            return self.with_incremented(&product.id);
        }
        let mut items = self.items.clone();
        items.push(CartLineItem::from_product(product));
        Self { items }
    }

    /// Increment the line for `id` by one unless it is at [`MAX_QUANTITY`].
    #[must_use]
    pub fn with_incremented(&self, id: &ProductId) -> Self {
        self.map_line(id, |item| {
            if item.quantity < MAX_QUANTITY {
                item.with_quantity(item.quantity + 1)
            } else {
                item.clone()
            }
        })
    }

    /// Every line except the one for `id`.
    #[must_use]
    pub fn without(&self, id: &ProductId) -> Self {
        Self {
            items: self
                .items
                .iter()
                .filter(|item| &item.id != id)
                .cloned()
                .collect(),
        }
    }

    /// Set the quantity on the line for `id`, kept within `1..=MAX_QUANTITY`.
    #[must_use]
    pub fn with_quantity(&self, id: &ProductId, quantity: u32) -> Self {
        let quantity = quantity.clamp(1, MAX_QUANTITY);
        self.map_line(id, |item| item.with_quantity(quantity))
    }

    fn map_line(&self, id: &ProductId, f: impl Fn(&CartLineItem) -> CartLineItem) -> Self {
        Self {
            items: self
                .items
                .iter()
                .map(|item| if &item.id == id { f(item) } else { item.clone() })
                .collect(),
        }
    }

    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&CartLineItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: &ProductId) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CartLineItem> {
        self.items.iter()
    }

    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of all line quantities.
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.items
            .iter()
            .fold(0, |total, item| total.saturating_add(item.quantity))
    }

    /// Sum of all line totals.
    #[must_use]
    pub fn subtotal(&self, currency: CurrencyCode) -> Price {
        self.items.iter().fold(Price::zero(currency), |total, item| {
            total.plus(item.line_total(currency).amount)
        })
    }
}

/// Parse user-entered quantity text.
///
/// # Errors
///
/// Returns [`CartError::InvalidQuantity`] unless the trimmed text is an
/// integer of at least 1. Values above [`MAX_QUANTITY`] are clamped.
pub fn parse_quantity(raw: &str) -> Result<u32, CartError> {
    let invalid = || CartError::InvalidQuantity(raw.to_owned());
    let value: i64 = raw.trim().parse().map_err(|_| invalid())?;
    if value < 1 {
        return Err(invalid());
    }
    Ok(u32::try_from(value).map_or(MAX_QUANTITY, |q| q.min(MAX_QUANTITY)))
}

// =============================================================================
// Store
// =============================================================================

/// The current cart plus the store it is mirrored to.
#[derive(Debug)]
pub struct CartStore<S> {
    store: S,
    cart: Cart,
}

impl<S: KeyValueStore> CartStore<S> {
    /// Hydrate from `store`.
    ///
    /// Never fails: an absent value, an unreadable store or a value that does
    /// not parse as a cart all yield an empty cart. Nothing is written back.
    pub fn initialize(store: S) -> Self {
        let cart = match store.get(STORAGE_KEY) {
            Ok(Some(raw)) => serde_json::from_str::<Cart>(&raw).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Stored cart is not parseable, starting empty");
                Cart::new()
            }),
            Ok(None) => Cart::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read stored cart, starting empty");
                Cart::new()
            }
        };

        tracing::debug!(lines = cart.len(), "Cart hydrated");
        Self { store, cart }
    }

    /// The current cart.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// The backing store.
    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.store
    }

    /// Add one unit of `id`, looked up in `catalog` when not yet in the cart.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::UnknownProduct`] (with nothing written) if `id`
    /// is neither in the cart nor in the catalog, or a storage error.
    pub fn add_or_increment(
        &mut self,
        id: &ProductId,
        catalog: &Catalog,
    ) -> Result<&Cart, CartError> {
        let next = if self.cart.contains(id) {
            self.cart.with_incremented(id)
        } else {
            let product = catalog
                .find(id)
                .ok_or_else(|| CartError::UnknownProduct(id.clone()))?;
            self.cart.with_added(product)
        };
        self.commit(next)
    }

    /// Remove the line for `id`. Removing an absent id still persists.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the cart cannot be written.
    pub fn remove(&mut self, id: &ProductId) -> Result<&Cart, CartError> {
        let next = self.cart.without(id);
        self.commit(next)
    }

    /// Set the quantity for `id` from raw user input.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidQuantity`] (with nothing written) if `raw`
    /// is not a whole number of at least 1, or a storage error.
    pub fn set_quantity(&mut self, id: &ProductId, raw: &str) -> Result<&Cart, CartError> {
        let quantity = parse_quantity(raw)?;
        let next = self.cart.with_quantity(id, quantity);
        self.commit(next)
    }

    /// Save-after-mutate: write `next`, then make it current.
    fn commit(&mut self, next: Cart) -> Result<&Cart, CartError> {
        let encoded = serde_json::to_string(&next)?;
        self.store.set(STORAGE_KEY, &encoded)?;
        tracing::debug!(
            lines = next.len(),
            total_quantity = next.total_quantity(),
            "Cart persisted"
        );
        self.cart = next;
        Ok(&self.cart)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn id(s: &str) -> ProductId {
        ProductId::parse(s).unwrap()
    }

    fn shirt_catalog() -> Catalog {
        Catalog::from_json_str(
            r#"[{"id":"p1","title":"Shirt","price":10},{"id":"p2","title":"Hat","price":"4.50"}]"#,
        )
        .unwrap()
    }

    fn stored_cart(store: &MemoryStore) -> Cart {
        serde_json::from_str(&store.get(STORAGE_KEY).unwrap().unwrap()).unwrap()
    }

    #[test]
    fn test_add_new_product_to_empty_cart() {
        let mut store = CartStore::initialize(MemoryStore::new());
        let cart = store.add_or_increment(&id("p1"), &shirt_catalog()).unwrap();

        assert_eq!(cart.len(), 1);
        let line = &cart.items()[0];
        assert_eq!(line.id.as_str(), "p1");
        assert_eq!(line.title, "Shirt");
        assert_eq!(line.price, Decimal::new(10, 0));
        assert_eq!(line.quantity, 1);
    }

    #[test]
    fn test_add_appends_in_order() {
        let catalog = shirt_catalog();
        let mut store = CartStore::initialize(MemoryStore::new());
        store.add_or_increment(&id("p2"), &catalog).unwrap();
        store.add_or_increment(&id("p1"), &catalog).unwrap();
        store.add_or_increment(&id("p2"), &catalog).unwrap();

        let ids: Vec<_> = store.cart().iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["p2", "p1"]);
        assert_eq!(store.cart().get(&id("p2")).unwrap().quantity, 2);
    }

    #[test]
    fn test_increment_stops_at_cap() {
        let seeded = r#"[{"id":"p1","title":"Shirt","price":10,"quantity":9}]"#;
        let mut store = CartStore::initialize(MemoryStore::with_entry(STORAGE_KEY, seeded));
        let catalog = shirt_catalog();

        let cart = store.add_or_increment(&id("p1"), &catalog).unwrap();
        assert_eq!(cart.get(&id("p1")).unwrap().quantity, 10);

        let cart = store.add_or_increment(&id("p1"), &catalog).unwrap();
        assert_eq!(cart.get(&id("p1")).unwrap().quantity, 10);
    }

    #[test]
    fn test_increment_existing_line_ignores_catalog() {
        // Line survives even after the product left the catalog.
        let seeded = r#"[{"id":"gone","title":"Old","price":1,"quantity":1}]"#;
        let mut store = CartStore::initialize(MemoryStore::with_entry(STORAGE_KEY, seeded));
        let cart = store.add_or_increment(&id("gone"), &shirt_catalog()).unwrap();
        assert_eq!(cart.get(&id("gone")).unwrap().quantity, 2);
    }

    #[test]
    fn test_add_unknown_product_is_rejected_without_write() {
        let mut store = CartStore::initialize(MemoryStore::new());
        let err = store
            .add_or_increment(&id("p404"), &shirt_catalog())
            .unwrap_err();

        assert!(matches!(err, CartError::UnknownProduct(ref missing) if missing.as_str() == "p404"));
        assert!(store.cart().is_empty());
        assert_eq!(store.storage().get(STORAGE_KEY).unwrap(), None);
    }

    #[test]
    fn test_remove_keeps_survivor_order() {
        let seeded = r#"[{"id":"p1","quantity":1},{"id":"p2","quantity":3},{"id":"p3","quantity":2}]"#;
        let mut store = CartStore::initialize(MemoryStore::with_entry(STORAGE_KEY, seeded));
        let cart = store.remove(&id("p2")).unwrap();

        let ids: Vec<_> = cart.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p3"]);
        assert_eq!(stored_cart(store.storage()), *store.cart());
    }

    #[test]
    fn test_remove_absent_id_still_persists() {
        let mut store = CartStore::initialize(MemoryStore::new());
        store.remove(&id("p1")).unwrap();
        assert_eq!(store.storage().get(STORAGE_KEY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_set_quantity_from_text() {
        let seeded = r#"[{"id":"p1","quantity":1}]"#;
        let mut store = CartStore::initialize(MemoryStore::with_entry(STORAGE_KEY, seeded));
        let cart = store.set_quantity(&id("p1"), "7").unwrap();
        assert_eq!(cart.get(&id("p1")).unwrap().quantity, 7);
        assert_eq!(stored_cart(store.storage()).get(&id("p1")).unwrap().quantity, 7);
    }

    #[test]
    fn test_set_quantity_clamps_to_cap() {
        let seeded = r#"[{"id":"p1","quantity":1}]"#;
        let mut store = CartStore::initialize(MemoryStore::with_entry(STORAGE_KEY, seeded));
        let cart = store.set_quantity(&id("p1"), " 250 ").unwrap();
        assert_eq!(cart.get(&id("p1")).unwrap().quantity, MAX_QUANTITY);
    }

    #[test]
    fn test_set_quantity_rejects_bad_input() {
        let seeded = r#"[{"id":"p1","quantity":4}]"#;
        let mut store = CartStore::initialize(MemoryStore::with_entry(STORAGE_KEY, seeded));

        for raw in ["abc", "", "0", "-3", "2.5"] {
            let err = store.set_quantity(&id("p1"), raw).unwrap_err();
            assert!(matches!(err, CartError::InvalidQuantity(_)), "{raw:?}");
        }
        assert_eq!(store.cart().get(&id("p1")).unwrap().quantity, 4);
        // Hydration never writes, and rejected edits don't either.
        assert_eq!(
            store.storage().get(STORAGE_KEY).unwrap().as_deref(),
            Some(seeded)
        );
    }

    #[test]
    fn test_initialize_recovers_from_garbage() {
        let garbage = [
            "",
            "{",
            "null",
            r#"{"id":"p1"}"#,
            r#"[{"id":"p1"}]"#,
            r#"[{"id":"p1","quantity":-1}]"#,
        ];
        for raw in garbage {
            let store = CartStore::initialize(MemoryStore::with_entry(STORAGE_KEY, raw));
            assert!(store.cart().is_empty(), "{raw:?}");
        }
    }

    #[test]
    fn test_initialize_clamps_oversized_quantities() {
        let seeded = r#"[{"id":"a","quantity":3000000000},{"id":"b","quantity":4294967295},{"id":"c","quantity":0}]"#;
        let store = CartStore::initialize(MemoryStore::with_entry(STORAGE_KEY, seeded));
        let cart = store.cart();

        assert_eq!(cart.len(), 2);
        assert!(!cart.contains(&id("c")));
        assert!(cart.iter().all(|line| line.quantity == MAX_QUANTITY));
        assert_eq!(cart.total_quantity(), 2 * MAX_QUANTITY);
    }

    #[test]
    fn test_initialize_drops_untotalable_prices() {
        let seeded = r#"[{"id":"a","price":"79228162514264337593543950335","quantity":2},{"id":"b","price":"1.25","quantity":2}]"#;
        let store = CartStore::initialize(MemoryStore::with_entry(STORAGE_KEY, seeded));
        let cart = store.cart();

        assert_eq!(cart.len(), 1);
        assert!(cart.contains(&id("b")));
        assert_eq!(cart.subtotal(CurrencyCode::USD).display(), "$2.50");
    }

    #[test]
    fn test_totals_saturate() {
        let half_max = Decimal::MAX / Decimal::from(2 * MAX_QUANTITY);
        let cart: Cart = ["a", "b", "c"]
            .into_iter()
            .map(|raw| CartLineItem {
                id: id(raw),
                title: String::new(),
                price: half_max,
                img: None,
                quantity: MAX_QUANTITY,
            })
            .collect::<Vec<_>>()
            .into();

        assert_eq!(cart.len(), 3);
        assert_eq!(cart.subtotal(CurrencyCode::USD).amount, Decimal::MAX);
    }

    #[test]
    fn test_with_quantity_stays_in_range() {
        let catalog = shirt_catalog();
        let cart = Cart::new().with_added(catalog.find(&id("p1")).unwrap());
        assert_eq!(cart.with_quantity(&id("p1"), 0).get(&id("p1")).unwrap().quantity, 1);
        assert_eq!(
            cart.with_quantity(&id("p1"), u32::MAX).get(&id("p1")).unwrap().quantity,
            MAX_QUANTITY
        );
    }

    #[test]
    fn test_initialize_collapses_duplicates() {
        let seeded = r#"[{"id":"p1","quantity":2},{"id":"p2","quantity":1},{"id":"p1","quantity":5}]"#;
        let store = CartStore::initialize(MemoryStore::with_entry(STORAGE_KEY, seeded));
        assert_eq!(store.cart().len(), 2);
        assert_eq!(store.cart().get(&id("p1")).unwrap().quantity, 2);
    }

    #[test]
    fn test_transitions_do_not_touch_receiver() {
        let catalog = shirt_catalog();
        let before = Cart::new().with_added(catalog.find(&id("p1")).unwrap());
        let snapshot = before.clone();

        let _ = before.with_incremented(&id("p1"));
        let _ = before.with_quantity(&id("p1"), 9);
        let _ = before.without(&id("p1"));

        assert_eq!(before, snapshot);
    }

    #[test]
    fn test_totals() {
        let catalog = shirt_catalog();
        let cart = Cart::new()
            .with_added(catalog.find(&id("p1")).unwrap())
            .with_added(catalog.find(&id("p2")).unwrap())
            .with_quantity(&id("p2"), 3);

        assert_eq!(cart.total_quantity(), 4);
        assert_eq!(
            cart.subtotal(CurrencyCode::USD).amount,
            Decimal::new(2350, 2)
        );
        assert_eq!(cart.subtotal(CurrencyCode::EUR).display(), "€23.50");
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("1").unwrap(), 1);
        assert_eq!(parse_quantity(" 10 ").unwrap(), 10);
        assert_eq!(parse_quantity("11").unwrap(), MAX_QUANTITY);
        assert_eq!(parse_quantity("99999999999").unwrap(), MAX_QUANTITY);
        assert!(parse_quantity("NaN").is_err());
    }
}
