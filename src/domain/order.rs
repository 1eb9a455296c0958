use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::product::ProductId;
use super::user::UserId;
use crate::error::MarketError;
use crate::geo::GeoPoint;

/// Unique order identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OrderId(pub String);

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OrderId {
    fn from(value: &str) -> Self {
        OrderId(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryType {
    Pickup,
    Delivery,
}

/// Monotonic order status. The only backward-looking edge is cancellation,
/// and nothing leaves `Delivered` or `Cancelled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    Placed,
    #[serde(rename = "PENDING_ASSIGNMENT")]
    PendingAssignment,
    Assigned,
    PickedUp,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Returns true if transitioning from self to `next` is valid.
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (OrderStatus::PendingAssignment, OrderStatus::Assigned)
                | (OrderStatus::Assigned, OrderStatus::PickedUp)
                | (OrderStatus::PickedUp, OrderStatus::Delivered)
                | (OrderStatus::Placed, OrderStatus::Cancelled)
                | (OrderStatus::PendingAssignment, OrderStatus::Cancelled)
                | (OrderStatus::Assigned, OrderStatus::Cancelled)
                | (OrderStatus::PickedUp, OrderStatus::Cancelled)
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            OrderStatus::Placed => "Placed",
            OrderStatus::PendingAssignment => "PENDING_ASSIGNMENT",
            OrderStatus::Assigned => "Assigned",
            OrderStatus::PickedUp => "PickedUp",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        };
        f.write_str(label)
    }
}

/// A priced line of an order. `total` is `price * quantity`, computed at
/// placement from the ledger's product record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: ProductId,
    pub name: String,
    pub price: u32,
    pub quantity: u32,
    pub total: u32,
}

/// The aggregate root of the workflow. All status mutations go through the
/// guarded methods below; stores run them under their single-document lock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<UserId>,
    pub items: Vec<OrderItem>,
    pub total_amount: u32,
    pub delivery_type: DeliveryType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub pickup_location: GeoPoint,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drop_location: Option<GeoPoint>,
    pub delivery_fee: u32,
    pub status: OrderStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_partner_id: Option<UserId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub otp: Option<String>,
    pub bazar: String,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Claim the order for a partner. Guard: no partner set yet, so two
    /// concurrent claims can never both pass when run under the store's
    /// single-document update.
    ///
    /// The passcode is generated at most once; `fresh_otp` is only invoked
    /// when the order does not already carry one.
    pub fn assign_partner(
        &mut self,
        partner: UserId,
        fresh_otp: impl FnOnce() -> String,
    ) -> Result<(), MarketError> {
        if self.delivery_partner_id.is_some() {
            return Err(MarketError::AlreadyAssigned);
        }
        if !self.status.can_transition_to(OrderStatus::Assigned) {
            return Err(MarketError::InvalidAction {
                action: "accept".into(),
            });
        }
        self.delivery_partner_id = Some(partner);
        self.status = OrderStatus::Assigned;
        if self.otp.is_none() {
            self.otp = Some(fresh_otp());
        }
        Ok(())
    }

    pub fn mark_picked_up(&mut self, caller: &UserId) -> Result<(), MarketError> {
        self.authorize(caller)?;
        if !self.status.can_transition_to(OrderStatus::PickedUp) {
            return Err(MarketError::InvalidAction {
                action: "picked_up".into(),
            });
        }
        self.status = OrderStatus::PickedUp;
        Ok(())
    }

    /// OTP-gated handoff. A mismatch leaves the order untouched at `PickedUp`.
    pub fn mark_delivered(&mut self, caller: &UserId, otp: &str) -> Result<(), MarketError> {
        self.authorize(caller)?;
        if !self.status.can_transition_to(OrderStatus::Delivered) {
            return Err(MarketError::InvalidAction {
                action: "delivered".into(),
            });
        }
        if self.otp.as_deref() != Some(otp) {
            return Err(MarketError::InvalidOtp);
        }
        self.status = OrderStatus::Delivered;
        Ok(())
    }

    /// Partner-initiated cancel: any pre-delivery stage, no time bound.
    /// An unassigned order may be cancelled by any caller.
    pub fn cancel_by_partner(&mut self, caller: &UserId) -> Result<(), MarketError> {
        if let Some(partner) = &self.delivery_partner_id {
            if partner != caller {
                return Err(MarketError::Unauthorized);
            }
        }
        if self.status == OrderStatus::Cancelled {
            return Err(MarketError::AlreadyCancelled);
        }
        if !self.status.can_transition_to(OrderStatus::Cancelled) {
            return Err(MarketError::InvalidAction {
                action: "cancel".into(),
            });
        }
        self.status = OrderStatus::Cancelled;
        Ok(())
    }

    /// Customer-initiated cancel, time-boxed from `created_at`. The window
    /// check comes first: once it has lapsed the caller always sees
    /// `CancellationWindowExpired`, whatever state the order reached.
    pub fn cancel_within(
        &mut self,
        now: DateTime<Utc>,
        window: Duration,
    ) -> Result<(), MarketError> {
        if now.signed_duration_since(self.created_at) > window {
            return Err(MarketError::CancellationWindowExpired);
        }
        if self.status == OrderStatus::Cancelled {
            return Err(MarketError::AlreadyCancelled);
        }
        if !self.status.can_transition_to(OrderStatus::Cancelled) {
            return Err(MarketError::InvalidAction {
                action: "cancel".into(),
            });
        }
        self.status = OrderStatus::Cancelled;
        Ok(())
    }

    pub fn is_claimed_by(&self, partner: &UserId) -> bool {
        self.delivery_partner_id.as_ref() == Some(partner)
    }

    fn authorize(&self, caller: &UserId) -> Result<(), MarketError> {
        if self.is_claimed_by(caller) {
            Ok(())
        } else {
            Err(MarketError::Unauthorized)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delivery_order() -> Order {
        Order {
            id: OrderId::from("o1"),
            customer_id: Some(UserId::from("c1")),
            items: vec![OrderItem {
                product_id: ProductId::from("p1"),
                name: "Tomato (Local)".into(),
                price: 24,
                quantity: 2,
                total: 48,
            }],
            total_amount: 68,
            delivery_type: DeliveryType::Delivery,
            address: Some("12-3 Main Rd".into()),
            pickup_location: GeoPoint::new(17.3850, 78.4867),
            drop_location: Some(GeoPoint::new(17.40, 78.50)),
            delivery_fee: 20,
            status: OrderStatus::PendingAssignment,
            delivery_partner_id: None,
            otp: Some("4821".into()),
            bazar: "MVP Colony Rythu Bazar".into(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn status_transitions() {
        use OrderStatus::*;
        assert!(PendingAssignment.can_transition_to(Assigned));
        assert!(Assigned.can_transition_to(PickedUp));
        assert!(PickedUp.can_transition_to(Delivered));
        assert!(PendingAssignment.can_transition_to(Cancelled));
        assert!(Placed.can_transition_to(Cancelled));

        assert!(!Delivered.can_transition_to(Cancelled));
        assert!(!Cancelled.can_transition_to(Assigned));
        assert!(!PendingAssignment.can_transition_to(PickedUp));
        assert!(!Assigned.can_transition_to(Delivered));
    }

    #[test]
    fn accept_sets_partner_once() {
        let mut order = delivery_order();
        order
            .assign_partner(UserId::from("d1"), || "0000".into())
            .unwrap();
        assert_eq!(order.status, OrderStatus::Assigned);
        // passcode existed already, so it is not regenerated
        assert_eq!(order.otp.as_deref(), Some("4821"));

        let second = order.assign_partner(UserId::from("d2"), || "0000".into());
        assert_eq!(second, Err(MarketError::AlreadyAssigned));
        assert!(order.is_claimed_by(&UserId::from("d1")));
    }

    #[test]
    fn accept_generates_missing_passcode() {
        let mut order = delivery_order();
        order.otp = None;
        order
            .assign_partner(UserId::from("d1"), || "7713".into())
            .unwrap();
        assert_eq!(order.otp.as_deref(), Some("7713"));
    }

    #[test]
    fn otp_gate() {
        let mut order = delivery_order();
        let partner = UserId::from("d1");
        order.assign_partner(partner.clone(), || "0000".into()).unwrap();
        order.mark_picked_up(&partner).unwrap();

        assert_eq!(
            order.mark_delivered(&partner, "0000"),
            Err(MarketError::InvalidOtp)
        );
        assert_eq!(order.status, OrderStatus::PickedUp);

        order.mark_delivered(&partner, "4821").unwrap();
        assert_eq!(order.status, OrderStatus::Delivered);
    }

    #[test]
    fn only_assigned_partner_may_act() {
        let mut order = delivery_order();
        let partner = UserId::from("d1");
        order.assign_partner(partner.clone(), || "0000".into()).unwrap();

        let stranger = UserId::from("d2");
        assert_eq!(
            order.mark_picked_up(&stranger),
            Err(MarketError::Unauthorized)
        );
        assert_eq!(
            order.cancel_by_partner(&stranger),
            Err(MarketError::Unauthorized)
        );
    }

    #[test]
    fn cancel_window_is_inclusive() {
        let mut order = delivery_order();
        let window = Duration::seconds(180);

        let at_limit = order.created_at + Duration::seconds(180);
        order.clone().cancel_within(at_limit, window).unwrap();

        let past_limit = order.created_at + Duration::seconds(181);
        assert_eq!(
            order.cancel_within(past_limit, window),
            Err(MarketError::CancellationWindowExpired)
        );
        assert_eq!(order.status, OrderStatus::PendingAssignment);
    }

    #[test]
    fn expired_window_wins_over_already_cancelled() {
        let mut order = delivery_order();
        let window = Duration::seconds(180);
        order
            .cancel_within(order.created_at + Duration::seconds(60), window)
            .unwrap();

        let late = order.created_at + Duration::seconds(200);
        assert_eq!(
            order.cancel_within(late, window),
            Err(MarketError::CancellationWindowExpired)
        );
    }

    #[test]
    fn wire_shape_matches_persisted_representation() {
        let order = delivery_order();
        let value = serde_json::to_value(&order).unwrap();
        assert_eq!(value["status"], "PENDING_ASSIGNMENT");
        assert_eq!(value["deliveryType"], "delivery");
        assert_eq!(value["totalAmount"], 68);
        assert_eq!(value["items"][0]["productId"], "p1");
        assert_eq!(value["pickupLocation"]["type"], "Point");
        assert!(value.get("deliveryPartnerId").is_none());
        assert_eq!(value["otp"], "4821");
    }
}
