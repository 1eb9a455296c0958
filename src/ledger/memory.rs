use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use tracing::debug;

use super::ledger::{NewProduct, StockLedger};
use crate::domain::{Product, ProductId};
use crate::error::MarketError;

/// In-memory stock ledger. Every conditional check-and-mutate runs under a
/// single write-lock acquisition, which is what makes `reserve` atomic per
/// product document.
#[derive(Clone, Default)]
pub struct MemoryStockLedger {
    products: Arc<RwLock<HashMap<ProductId, Product>>>,
}

impl MemoryStockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(
        &self,
        operation: &'static str,
    ) -> Result<RwLockReadGuard<'_, HashMap<ProductId, Product>>, MarketError> {
        self.products
            .read()
            .map_err(|_| MarketError::PersistenceFailure { operation })
    }

    fn write(
        &self,
        operation: &'static str,
    ) -> Result<RwLockWriteGuard<'_, HashMap<ProductId, Product>>, MarketError> {
        self.products
            .write()
            .map_err(|_| MarketError::PersistenceFailure { operation })
    }

    fn next_id() -> ProductId {
        ProductId(format!("prod-{:016x}", rand::random::<u64>()))
    }
}

impl StockLedger for MemoryStockLedger {
    fn get(&self, id: &ProductId) -> Result<Option<Product>, MarketError> {
        Ok(self.read("product get")?.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<Product>, MarketError> {
        let mut products: Vec<Product> = self.read("product list")?.values().cloned().collect();
        products.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(products)
    }

    fn upsert(&self, listing: NewProduct) -> Result<Product, MarketError> {
        let mut products = self.write("product upsert")?;

        let existing = products
            .values_mut()
            .find(|p| p.name == listing.name && p.bazar == listing.bazar);

        let product = match existing {
            Some(product) => {
                product.category = listing.category;
                product.price = listing.price;
                product.stock = product.stock.saturating_add(listing.stock);
                product.savings = listing.savings;
                product.competitor_price = listing.competitor_price;
                if let Some(image) = listing.image {
                    product.image = Some(image);
                }
                product.updated_at = Utc::now();
                product.clone()
            }
            None => {
                let product = Product {
                    id: Self::next_id(),
                    name: listing.name,
                    category: listing.category,
                    price: listing.price,
                    stock: listing.stock,
                    item_unit: "kg".into(),
                    farmer_id: listing.farmer_id,
                    bazar: listing.bazar,
                    savings: listing.savings,
                    competitor_price: listing.competitor_price,
                    image: listing.image.or_else(|| Some("✨".into())),
                    updated_at: Utc::now(),
                };
                products.insert(product.id.clone(), product.clone());
                product
            }
        };

        Ok(product)
    }

    fn restock(&self, id: &ProductId, quantity: u32) -> Result<Product, MarketError> {
        if quantity == 0 {
            return Err(MarketError::validation("restock quantity must be positive"));
        }

        let mut products = self.write("stock restock")?;
        let product = products
            .get_mut(id)
            .ok_or_else(|| MarketError::ProductNotFound { id: id.to_string() })?;
        product.stock = product.stock.saturating_add(quantity);
        product.updated_at = Utc::now();
        Ok(product.clone())
    }

    fn reserve(&self, id: &ProductId, quantity: u32) -> Result<(), MarketError> {
        let mut products = self.write("stock reserve")?;
        let product = products
            .get_mut(id)
            .ok_or_else(|| MarketError::ProductNotFound { id: id.to_string() })?;

        if product.stock < quantity {
            debug!(
                product = %id,
                requested = quantity,
                available = product.stock,
                "stock reservation refused"
            );
            return Err(MarketError::StockConflict {
                name: product.name.clone(),
            });
        }

        product.stock -= quantity;
        product.updated_at = Utc::now();
        debug!(product = %id, quantity, remaining = product.stock, "stock reserved");
        Ok(())
    }

    fn release(&self, id: &ProductId, quantity: u32) -> Result<(), MarketError> {
        let mut products = self.write("stock release")?;
        let product = products
            .get_mut(id)
            .ok_or_else(|| MarketError::ProductNotFound { id: id.to_string() })?;
        product.stock = product.stock.saturating_add(quantity);
        product.updated_at = Utc::now();
        debug!(product = %id, quantity, stock = product.stock, "stock released");
        Ok(())
    }

    fn remove(&self, id: &ProductId) -> Result<(), MarketError> {
        let mut products = self.write("product remove")?;
        products
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| MarketError::ProductNotFound { id: id.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tomato(stock: u32) -> NewProduct {
        NewProduct {
            name: "Tomato (Local)".into(),
            category: "Vegetables".into(),
            price: 24,
            stock,
            bazar: "MVP Colony Rythu Bazar".into(),
            farmer_id: None,
            savings: Some(24),
            competitor_price: Some(48),
            image: None,
        }
    }

    #[test]
    fn reserve_decrements_within_stock() {
        let ledger = MemoryStockLedger::new();
        let product = ledger.upsert(tomato(5)).unwrap();

        ledger.reserve(&product.id, 5).unwrap();
        assert_eq!(ledger.get(&product.id).unwrap().unwrap().stock, 0);
    }

    #[test]
    fn reserve_refuses_overdraw() {
        let ledger = MemoryStockLedger::new();
        let product = ledger.upsert(tomato(3)).unwrap();

        let err = ledger.reserve(&product.id, 5).unwrap_err();
        assert!(matches!(err, MarketError::StockConflict { .. }));
        // stock untouched by the failed attempt
        assert_eq!(ledger.get(&product.id).unwrap().unwrap().stock, 3);
    }

    #[test]
    fn reserve_unknown_product() {
        let ledger = MemoryStockLedger::new();
        let err = ledger.reserve(&ProductId::from("nope"), 1).unwrap_err();
        assert!(matches!(err, MarketError::ProductNotFound { .. }));
    }

    #[test]
    fn release_restores_reserved_stock() {
        let ledger = MemoryStockLedger::new();
        let product = ledger.upsert(tomato(10)).unwrap();

        ledger.reserve(&product.id, 4).unwrap();
        ledger.release(&product.id, 4).unwrap();
        assert_eq!(ledger.get(&product.id).unwrap().unwrap().stock, 10);
    }

    #[test]
    fn upsert_same_name_and_bazar_tops_up_stock() {
        let ledger = MemoryStockLedger::new();
        let first = ledger.upsert(tomato(50)).unwrap();

        let mut again = tomato(30);
        again.price = 26;
        let second = ledger.upsert(again).unwrap();

        assert_eq!(second.id, first.id);
        assert_eq!(second.stock, 80);
        assert_eq!(second.price, 26);
    }

    #[test]
    fn upsert_different_bazar_creates_new_listing() {
        let ledger = MemoryStockLedger::new();
        let first = ledger.upsert(tomato(50)).unwrap();

        let mut elsewhere = tomato(20);
        elsewhere.bazar = "Eluru Rythu Bazar".into();
        let second = ledger.upsert(elsewhere).unwrap();

        assert_ne!(second.id, first.id);
        assert_eq!(ledger.list().unwrap().len(), 2);
    }

    #[test]
    fn restock_rejects_zero() {
        let ledger = MemoryStockLedger::new();
        let product = ledger.upsert(tomato(5)).unwrap();
        let err = ledger.restock(&product.id, 0).unwrap_err();
        assert!(matches!(err, MarketError::Validation { .. }));
    }

    #[test]
    fn remove_deletes_listing() {
        let ledger = MemoryStockLedger::new();
        let product = ledger.upsert(tomato(5)).unwrap();
        ledger.remove(&product.id).unwrap();
        assert!(ledger.get(&product.id).unwrap().is_none());
    }
}
