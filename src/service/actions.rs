use std::str::FromStr;

use tracing::{info, warn};

use super::generate_otp;
use crate::domain::{Availability, Order, OrderId, UserId};
use crate::error::MarketError;
use crate::orders::OrderStore;
use crate::users::UserDirectory;

/// Wire-level action names a partner's client may send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryAction {
    Accept,
    PickedUp,
    Delivered,
    Cancel,
}

impl FromStr for DeliveryAction {
    type Err = MarketError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "accept" => Ok(DeliveryAction::Accept),
            "picked_up" => Ok(DeliveryAction::PickedUp),
            "delivered" => Ok(DeliveryAction::Delivered),
            "cancel" => Ok(DeliveryAction::Cancel),
            other => Err(MarketError::InvalidAction {
                action: other.to_string(),
            }),
        }
    }
}

/// State-transition engine for the delivery path. Every transition runs as a
/// single atomic update on the order document; partner availability is
/// adjusted after the transition commits.
pub struct DeliveryActionProcessor<O, U> {
    orders: O,
    users: U,
}

impl<O, U> DeliveryActionProcessor<O, U>
where
    O: OrderStore,
    U: UserDirectory,
{
    pub fn new(orders: O, users: U) -> Self {
        DeliveryActionProcessor { orders, users }
    }

    /// Claim an unassigned order. The no-partner guard runs inside the
    /// store's atomic update, so of two concurrent claims exactly one wins
    /// and the other sees `AlreadyAssigned`.
    pub fn accept(&self, order_id: &OrderId, partner: &UserId) -> Result<Order, MarketError> {
        let order = self.orders.update(order_id, |order| {
            order.assign_partner(partner.clone(), generate_otp)
        })?;

        // Without this flip a partner could hold several live orders at
        // once; terminal transitions set them available again.
        self.set_availability(partner, Availability::Busy);

        info!(order = %order.id, partner = %partner, "order accepted");
        Ok(order)
    }

    pub fn picked_up(&self, order_id: &OrderId, partner: &UserId) -> Result<Order, MarketError> {
        let order = self
            .orders
            .update(order_id, |order| order.mark_picked_up(partner))?;
        info!(order = %order.id, partner = %partner, "order picked up");
        Ok(order)
    }

    /// OTP-gated handoff. A mismatch fails with `InvalidOtp` and the order
    /// stays `PickedUp`.
    pub fn delivered(
        &self,
        order_id: &OrderId,
        partner: &UserId,
        otp: &str,
    ) -> Result<Order, MarketError> {
        let order = self
            .orders
            .update(order_id, |order| order.mark_delivered(partner, otp))?;

        self.set_availability(partner, Availability::Available);
        info!(order = %order.id, partner = %partner, "order delivered");
        Ok(order)
    }

    /// Partner-initiated cancel: any pre-delivery stage, no time bound
    /// (vehicle breakdown and the like). Stock is not restored on this path.
    pub fn cancel(&self, order_id: &OrderId, partner: &UserId) -> Result<Order, MarketError> {
        let order = self
            .orders
            .update(order_id, |order| order.cancel_by_partner(partner))?;

        if order.is_claimed_by(partner) {
            self.set_availability(partner, Availability::Available);
        }
        info!(order = %order.id, partner = %partner, "order cancelled by partner");
        Ok(order)
    }

    /// Dispatch by wire action name; unknown names fail with `InvalidAction`.
    /// A missing OTP on `delivered` is treated as a mismatch.
    pub fn apply(
        &self,
        order_id: &OrderId,
        partner: &UserId,
        action: &str,
        otp: Option<&str>,
    ) -> Result<Order, MarketError> {
        match action.parse::<DeliveryAction>()? {
            DeliveryAction::Accept => self.accept(order_id, partner),
            DeliveryAction::PickedUp => self.picked_up(order_id, partner),
            DeliveryAction::Delivered => self.delivered(order_id, partner, otp.unwrap_or("")),
            DeliveryAction::Cancel => self.cancel(order_id, partner),
        }
    }

    /// Availability flips ride along with a successful transition; a missing
    /// or failing partner record must not undo the delivery itself.
    fn set_availability(&self, partner: &UserId, availability: Availability) {
        if let Err(err) = self.users.set_availability(partner, availability) {
            warn!(partner = %partner, %err, "failed to update partner availability");
        }
    }
}
