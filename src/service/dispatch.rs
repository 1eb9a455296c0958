use std::cmp::Ordering;

use tracing::debug;

use crate::domain::{DeliveryType, Order, OrderStatus, UserId};
use crate::error::MarketError;
use crate::geo::GeoPoint;
use crate::orders::OrderStore;

const DEFAULT_RADIUS_KM: f64 = 20.0;
const DEFAULT_FALLBACK_LIMIT: usize = 10;

/// What a polling partner sees: their own orders plus the claimable pool.
#[derive(Debug, Clone)]
pub struct DispatchListing {
    /// Orders assigned to the caller, newest first, terminal ones included.
    pub my_orders: Vec<Order>,
    /// Unassigned delivery orders the caller could claim.
    pub available_orders: Vec<Order>,
}

/// The pull-model matching surface. Partners poll this; nothing is pushed.
///
/// The claimable pool is narrowed by exactly one signal. A service-area name
/// wins over device coordinates when both are supplied: bazar naming is the
/// durable source of truth, while geolocation is noisy or absent on some
/// clients.
pub struct DispatchPool<O> {
    orders: O,
    radius_km: f64,
    fallback_limit: usize,
}

impl<O: OrderStore> DispatchPool<O> {
    pub fn new(orders: O) -> Self {
        DispatchPool {
            orders,
            radius_km: DEFAULT_RADIUS_KM,
            fallback_limit: DEFAULT_FALLBACK_LIMIT,
        }
    }

    pub fn with_radius_km(mut self, radius_km: f64) -> Self {
        self.radius_km = radius_km;
        self
    }

    pub fn with_fallback_limit(mut self, limit: usize) -> Self {
        self.fallback_limit = limit;
        self
    }

    pub fn list_orders(
        &self,
        partner: &UserId,
        service_area: Option<&str>,
        position: Option<GeoPoint>,
    ) -> Result<DispatchListing, MarketError> {
        let my_orders = self.orders.for_partner(partner)?;

        let service_area = service_area.map(str::trim).filter(|area| !area.is_empty());
        let available_orders = if let Some(area) = service_area {
            // FIFO within the bazar so the oldest order is claimed first.
            let mut matches = self
                .orders
                .find(|order| is_claimable(order) && order.bazar.eq_ignore_ascii_case(area))?;
            matches.sort_by(|a, b| a.created_at.cmp(&b.created_at));
            matches
        } else if let Some(at) = position {
            let mut nearby: Vec<(f64, Order)> = self
                .orders
                .find(is_claimable)?
                .into_iter()
                .map(|order| (order.pickup_location.distance_km(&at), order))
                .filter(|(distance, _)| *distance <= self.radius_km)
                .collect();
            nearby.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));
            nearby.into_iter().map(|(_, order)| order).collect()
        } else {
            // No signal at all: surface a bounded sample so the pool is
            // never empty just because a client lacks GPS.
            self.orders
                .find(is_claimable)?
                .into_iter()
                .take(self.fallback_limit)
                .collect()
        };

        debug!(
            partner = %partner,
            mine = my_orders.len(),
            available = available_orders.len(),
            "dispatch pool listed"
        );

        Ok(DispatchListing {
            my_orders,
            available_orders,
        })
    }
}

fn is_claimable(order: &Order) -> bool {
    order.delivery_type == DeliveryType::Delivery
        && order.status == OrderStatus::PendingAssignment
        && order.delivery_partner_id.is_none()
}
