use crate::domain::{Order, OrderId, UserId};
use crate::error::MarketError;

/// Owner of order documents and their status field.
///
/// `update` is the store's atomicity primitive: the closure runs against the
/// current document under the store's single-document lock, so a
/// read-check-write inside it (accept's "set partner only if absent") cannot
/// interleave with another writer. A closure error leaves the stored document
/// untouched.
pub trait OrderStore: Send + Sync {
    fn insert(&self, order: Order) -> Result<Order, MarketError>;

    fn get(&self, id: &OrderId) -> Result<Option<Order>, MarketError>;

    fn update<F>(&self, id: &OrderId, apply: F) -> Result<Order, MarketError>
    where
        F: FnOnce(&mut Order) -> Result<(), MarketError>;

    fn find<F>(&self, predicate: F) -> Result<Vec<Order>, MarketError>
    where
        F: Fn(&Order) -> bool;

    /// A customer's orders, newest first.
    fn for_customer(&self, customer: &UserId) -> Result<Vec<Order>, MarketError> {
        let mut orders = self.find(|order| order.customer_id.as_ref() == Some(customer))?;
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    /// A partner's orders regardless of status, newest first. Callers split
    /// active vs history views themselves.
    fn for_partner(&self, partner: &UserId) -> Result<Vec<Order>, MarketError> {
        let mut orders = self.find(|order| order.is_claimed_by(partner))?;
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }
}
