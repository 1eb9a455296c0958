use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::generate_otp;
use crate::domain::{
    DeliveryType, Order, OrderId, OrderItem, OrderStatus, PlacementRequest, Product, UserId,
};
use crate::error::MarketError;
use crate::geo::GeoPoint;
use crate::ledger::StockLedger;
use crate::orders::OrderStore;
use crate::users::UserDirectory;

/// Fallback pickup point when the first item's farmer has no known location.
const DEFAULT_PICKUP: [f64; 2] = [78.4867, 17.3850];
const DEFAULT_FEE_BASE: u32 = 20;
const DEFAULT_FEE_PER_KM: u32 = 5;

/// Validates a cart against the stock ledger, reserves stock, derives the
/// pickup point, and creates the order in its initial state.
///
/// No partner is assigned here: delivery orders wait in `PENDING_ASSIGNMENT`
/// for a partner to claim them (pull model).
pub struct PlacementService<L, O, U> {
    ledger: L,
    orders: O,
    users: U,
    default_pickup: GeoPoint,
    fee_base: u32,
    fee_per_km: u32,
}

impl<L, O, U> PlacementService<L, O, U>
where
    L: StockLedger,
    O: OrderStore,
    U: UserDirectory,
{
    pub fn new(ledger: L, orders: O, users: U) -> Self {
        PlacementService {
            ledger,
            orders,
            users,
            default_pickup: GeoPoint::from_lng_lat(DEFAULT_PICKUP),
            fee_base: DEFAULT_FEE_BASE,
            fee_per_km: DEFAULT_FEE_PER_KM,
        }
    }

    pub fn with_default_pickup(mut self, point: GeoPoint) -> Self {
        self.default_pickup = point;
        self
    }

    pub fn with_fee_schedule(mut self, base: u32, per_km: u32) -> Self {
        self.fee_base = base;
        self.fee_per_km = per_km;
        self
    }

    /// Home-delivery fee for a given trip distance: a flat base or a per-km
    /// charge, whichever is higher.
    pub fn quote_delivery_fee(&self, distance_km: f64) -> u32 {
        self.fee_base.max((distance_km * f64::from(self.fee_per_km)).ceil() as u32)
    }

    pub fn place_order(&self, request: PlacementRequest) -> Result<Order, MarketError> {
        self.place_order_at(request, Utc::now())
    }

    /// Same as [`place_order`](Self::place_order) with an explicit creation
    /// time, which the cancellation window is later measured from.
    pub fn place_order_at(
        &self,
        request: PlacementRequest,
        now: DateTime<Utc>,
    ) -> Result<Order, MarketError> {
        if request.items.is_empty() {
            return Err(MarketError::validation("order must contain at least one item"));
        }
        if request.delivery_type == DeliveryType::Delivery
            && request
                .address
                .as_deref()
                .map_or(true, |address| address.trim().is_empty())
        {
            return Err(MarketError::validation("address is required for home delivery"));
        }

        // Pass 1: every line must be satisfiable before anything mutates.
        let mut resolved: Vec<(Product, u32)> = Vec::with_capacity(request.items.len());
        for line in &request.items {
            if line.quantity == 0 {
                return Err(MarketError::validation("item quantity must be positive"));
            }
            let product = self.ledger.get(&line.product_id)?.ok_or_else(|| {
                MarketError::ProductNotFound {
                    id: line.product_id.to_string(),
                }
            })?;
            if product.stock < line.quantity {
                return Err(MarketError::OutOfStock {
                    name: product.name,
                    available: product.stock,
                });
            }
            resolved.push((product, line.quantity));
        }

        // Pass 2: reserve item by item; a lost race rolls back everything
        // reserved so far before surfacing the conflict.
        let mut reserved: Vec<(Product, u32)> = Vec::with_capacity(resolved.len());
        for (product, quantity) in resolved {
            match self.ledger.reserve(&product.id, quantity) {
                Ok(()) => reserved.push((product, quantity)),
                Err(err) => {
                    warn!(product = %product.id, %err, "reservation failed, rolling back");
                    self.roll_back(&reserved);
                    return Err(err);
                }
            }
        }

        let pickup_location = self.derive_pickup(&reserved[0].0);

        let items: Vec<OrderItem> = reserved
            .iter()
            .map(|(product, quantity)| OrderItem {
                product_id: product.id.clone(),
                name: product.name.clone(),
                price: product.price,
                quantity: *quantity,
                total: product.price * quantity,
            })
            .collect();
        let subtotal: u32 = items.iter().map(|item| item.total).sum();

        let (status, otp, delivery_fee, drop_location) = match request.delivery_type {
            DeliveryType::Delivery => (
                OrderStatus::PendingAssignment,
                Some(generate_otp()),
                request.delivery_fee.unwrap_or(self.fee_base),
                request.drop_location.map(GeoPoint::from),
            ),
            DeliveryType::Pickup => (OrderStatus::Placed, None, 0, None),
        };

        let order = Order {
            id: OrderId(format!("ord-{:016x}", rand::random::<u64>())),
            customer_id: request.customer_id,
            items,
            total_amount: subtotal + delivery_fee,
            delivery_type: request.delivery_type,
            address: request.address,
            pickup_location,
            drop_location,
            delivery_fee,
            status,
            delivery_partner_id: None,
            otp,
            bazar: request.bazar,
            created_at: now,
        };

        match self.orders.insert(order) {
            Ok(order) => {
                info!(
                    order = %order.id,
                    status = %order.status,
                    total = order.total_amount,
                    bazar = %order.bazar,
                    "order placed"
                );
                Ok(order)
            }
            Err(err) => {
                warn!(%err, "order persistence failed, rolling back reservations");
                self.roll_back(&reserved);
                Err(MarketError::OrderCreateFailed {
                    reason: err.to_string(),
                })
            }
        }
    }

    /// A customer's order history, newest first.
    pub fn orders_for_customer(&self, customer: &UserId) -> Result<Vec<Order>, MarketError> {
        self.orders.for_customer(customer)
    }

    fn derive_pickup(&self, first_item: &Product) -> GeoPoint {
        let Some(farmer) = first_item.farmer_id.as_ref() else {
            return self.default_pickup;
        };
        match self.users.farmer_location(farmer) {
            Ok(Some(point)) => point,
            Ok(None) => self.default_pickup,
            Err(err) => {
                warn!(farmer = %farmer, %err, "farmer location lookup failed, using default pickup");
                self.default_pickup
            }
        }
    }

    /// Compensation for partially reserved carts. Best-effort: a failure here
    /// leaves stock under-reserved and is only logged.
    fn roll_back(&self, reserved: &[(Product, u32)]) {
        for (product, quantity) in reserved {
            if let Err(err) = self.ledger.release(&product.id, *quantity) {
                warn!(
                    product = %product.id,
                    quantity,
                    %err,
                    "failed to roll back stock reservation"
                );
            }
        }
    }
}
