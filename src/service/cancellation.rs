use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};

use crate::domain::{Order, OrderId};
use crate::error::MarketError;
use crate::ledger::StockLedger;
use crate::orders::OrderStore;

const DEFAULT_WINDOW_SECS: i64 = 180;

/// Consumer-initiated cancellation, time-boxed to a short window from order
/// creation. Distinct from the partner-side cancel, which has no time bound:
/// customers may only abort before meaningful processing has begun.
pub struct CancellationService<O, L> {
    orders: O,
    ledger: L,
    window: Duration,
}

impl<O, L> CancellationService<O, L>
where
    O: OrderStore,
    L: StockLedger,
{
    pub fn new(orders: O, ledger: L) -> Self {
        CancellationService {
            orders,
            ledger,
            window: Duration::seconds(DEFAULT_WINDOW_SECS),
        }
    }

    pub fn with_window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }

    pub fn cancel_order(&self, order_id: &OrderId) -> Result<Order, MarketError> {
        self.cancel_order_at(order_id, Utc::now())
    }

    /// The window is evaluated against `now` at call time; there is no stored
    /// expiry timer. On success every line item's stock is restored one
    /// update at a time, best-effort: a failure mid-loop is logged and the
    /// remaining items are still attempted.
    pub fn cancel_order_at(
        &self,
        order_id: &OrderId,
        now: DateTime<Utc>,
    ) -> Result<Order, MarketError> {
        let window = self.window;
        let order = self
            .orders
            .update(order_id, |order| order.cancel_within(now, window))?;

        for item in &order.items {
            if let Err(err) = self.ledger.release(&item.product_id, item.quantity) {
                warn!(
                    order = %order.id,
                    product = %item.product_id,
                    quantity = item.quantity,
                    %err,
                    "failed to restore stock for cancelled order"
                );
            }
        }

        info!(order = %order.id, "order cancelled and stock restored");
        Ok(order)
    }
}
