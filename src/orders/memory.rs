use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::store::OrderStore;
use crate::domain::{Order, OrderId};
use crate::error::MarketError;

/// In-memory order store. One write-lock acquisition per `update` call gives
/// the compare-and-swap guarantee the assignment path relies on.
#[derive(Clone, Default)]
pub struct MemoryOrderStore {
    orders: Arc<RwLock<HashMap<OrderId, Order>>>,
}

impl MemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(
        &self,
        operation: &'static str,
    ) -> Result<RwLockReadGuard<'_, HashMap<OrderId, Order>>, MarketError> {
        self.orders
            .read()
            .map_err(|_| MarketError::PersistenceFailure { operation })
    }

    fn write(
        &self,
        operation: &'static str,
    ) -> Result<RwLockWriteGuard<'_, HashMap<OrderId, Order>>, MarketError> {
        self.orders
            .write()
            .map_err(|_| MarketError::PersistenceFailure { operation })
    }
}

impl OrderStore for MemoryOrderStore {
    fn insert(&self, order: Order) -> Result<Order, MarketError> {
        let mut orders = self.write("order insert")?;
        if orders.contains_key(&order.id) {
            return Err(MarketError::validation(format!(
                "duplicate order id: {}",
                order.id
            )));
        }
        orders.insert(order.id.clone(), order.clone());
        Ok(order)
    }

    fn get(&self, id: &OrderId) -> Result<Option<Order>, MarketError> {
        Ok(self.read("order get")?.get(id).cloned())
    }

    fn update<F>(&self, id: &OrderId, apply: F) -> Result<Order, MarketError>
    where
        F: FnOnce(&mut Order) -> Result<(), MarketError>,
    {
        let mut orders = self.write("order update")?;
        let stored = orders
            .get_mut(id)
            .ok_or_else(|| MarketError::OrderNotFound { id: id.to_string() })?;

        // Mutate a draft so a rejected transition leaves the document as-is.
        let mut draft = stored.clone();
        apply(&mut draft)?;
        *stored = draft.clone();
        Ok(draft)
    }

    fn find<F>(&self, predicate: F) -> Result<Vec<Order>, MarketError>
    where
        F: Fn(&Order) -> bool,
    {
        Ok(self
            .read("order find")?
            .values()
            .filter(|order| predicate(order))
            .cloned()
            .collect())
    }
}
