use serde::{Deserialize, Serialize};

use super::order::DeliveryType;
use super::product::ProductId;
use super::user::UserId;
use crate::geo::LatLng;

/// One line of a customer's cart. Pricing is resolved against the ledger at
/// placement time, never trusted from the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: ProductId,
    pub quantity: u32,
}

impl CartLine {
    pub fn new(product_id: ProductId, quantity: u32) -> Self {
        CartLine {
            product_id,
            quantity,
        }
    }
}

/// Everything the placement service needs for one order. Session state
/// (current user, selected bazar, cart) is passed in explicitly; the core
/// never reads ambient session storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementRequest {
    pub items: Vec<CartLine>,
    pub delivery_type: DeliveryType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Client-supplied drop pin; recorded only for delivery orders.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drop_location: Option<LatLng>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_fee: Option<u32>,
    pub bazar: String,
    /// Absent for guest checkout.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<UserId>,
}

impl PlacementRequest {
    pub fn pickup(items: Vec<CartLine>, bazar: impl Into<String>) -> Self {
        PlacementRequest {
            items,
            delivery_type: DeliveryType::Pickup,
            address: None,
            drop_location: None,
            delivery_fee: None,
            bazar: bazar.into(),
            customer_id: None,
        }
    }

    pub fn delivery(
        items: Vec<CartLine>,
        address: impl Into<String>,
        bazar: impl Into<String>,
    ) -> Self {
        PlacementRequest {
            items,
            delivery_type: DeliveryType::Delivery,
            address: Some(address.into()),
            drop_location: None,
            delivery_fee: None,
            bazar: bazar.into(),
            customer_id: None,
        }
    }

    pub fn with_customer(mut self, customer: UserId) -> Self {
        self.customer_id = Some(customer);
        self
    }

    pub fn with_drop(mut self, drop: LatLng) -> Self {
        self.drop_location = Some(drop);
        self
    }

    pub fn with_fee(mut self, fee: u32) -> Self {
        self.delivery_fee = Some(fee);
        self
    }
}
