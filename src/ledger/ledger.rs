use crate::domain::{Product, ProductId, UserId};
use crate::error::MarketError;

/// Input for a farmer's add-produce action. Matched against existing listings
/// by name + bazar; see [`StockLedger::upsert`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub category: String,
    pub price: u32,
    pub stock: u32,
    pub bazar: String,
    pub farmer_id: Option<UserId>,
    pub savings: Option<i32>,
    pub competitor_price: Option<u32>,
    pub image: Option<String>,
}

/// Exclusive owner of every product's available quantity.
///
/// `reserve` is the one concurrency-safety primitive the core depends on:
/// an atomic "decrement by N only if current stock ≥ N" scoped to a single
/// product. Implementations must guarantee no reader ever observes negative
/// stock and no two reservations both pass on the same last units.
pub trait StockLedger: Send + Sync {
    fn get(&self, id: &ProductId) -> Result<Option<Product>, MarketError>;

    /// All listings, most recently updated first.
    fn list(&self) -> Result<Vec<Product>, MarketError>;

    /// Create or refresh a listing keyed by name + bazar. On conflict the
    /// display fields are replaced and `stock` is incremented, so repeated
    /// farmer submissions top up quantity instead of duplicating produce.
    fn upsert(&self, listing: NewProduct) -> Result<Product, MarketError>;

    /// Unconditional stock top-up. Rejects a zero quantity.
    fn restock(&self, id: &ProductId, quantity: u32) -> Result<Product, MarketError>;

    /// Atomic conditional decrement. Fails with `StockConflict` when the
    /// product holds fewer than `quantity` units, leaving stock untouched.
    fn reserve(&self, id: &ProductId, quantity: u32) -> Result<(), MarketError>;

    /// Increment stock back; the compensation half of `reserve`.
    fn release(&self, id: &ProductId, quantity: u32) -> Result<(), MarketError>;

    /// Explicit farmer delete.
    fn remove(&self, id: &ProductId) -> Result<(), MarketError>;
}
