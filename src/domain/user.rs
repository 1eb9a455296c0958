use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;

/// Unique user identifier (customers, farmers, delivery partners).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        UserId(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Customer,
    Farmer,
    Delivery,
}

/// A partner is `Available` between deliveries. It flips to `Busy` on accept
/// and back to `Available` when their order reaches a terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Availability {
    Available,
    Busy,
}

/// Last reported position of a user, with the report time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedLocation {
    #[serde(flatten)]
    pub point: GeoPoint,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: UserId,
    pub name: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Farmers: the bazar they sell at.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bazar: Option<String>,
    /// Delivery partners: bike/scooter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_type: Option<String>,
    /// Delivery partners: preferred bazar, the primary dispatch-matching key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_area: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_location: Option<TrackedLocation>,
    pub status: Availability,
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    fn base(id: UserId, name: impl Into<String>, role: Role) -> Self {
        UserRecord {
            id,
            name: name.into(),
            role,
            address: None,
            bazar: None,
            vehicle_type: None,
            service_area: None,
            current_location: None,
            status: Availability::Available,
            created_at: Utc::now(),
        }
    }

    pub fn customer(id: UserId, name: impl Into<String>) -> Self {
        UserRecord::base(id, name, Role::Customer)
    }

    pub fn farmer(id: UserId, name: impl Into<String>, bazar: impl Into<String>) -> Self {
        let mut user = UserRecord::base(id, name, Role::Farmer);
        user.bazar = Some(bazar.into());
        user
    }

    pub fn delivery_partner(
        id: UserId,
        name: impl Into<String>,
        service_area: impl Into<String>,
    ) -> Self {
        let mut user = UserRecord::base(id, name, Role::Delivery);
        user.service_area = Some(service_area.into());
        user
    }

    pub fn with_location(mut self, point: GeoPoint, at: DateTime<Utc>) -> Self {
        self.current_location = Some(TrackedLocation { point, updated_at: at });
        self
    }

    pub fn with_vehicle(mut self, vehicle_type: impl Into<String>) -> Self {
        self.vehicle_type = Some(vehicle_type.into());
        self
    }

    pub fn location(&self) -> Option<GeoPoint> {
        self.current_location.map(|tracked| tracked.point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_set_role() {
        let farmer = UserRecord::farmer(UserId::from("f1"), "Raju", "Eluru Rythu Bazar");
        assert_eq!(farmer.role, Role::Farmer);
        assert_eq!(farmer.bazar.as_deref(), Some("Eluru Rythu Bazar"));

        let partner =
            UserRecord::delivery_partner(UserId::from("d1"), "Sai", "Eluru Rythu Bazar")
                .with_vehicle("bike");
        assert_eq!(partner.role, Role::Delivery);
        assert_eq!(partner.status, Availability::Available);
        assert_eq!(partner.vehicle_type.as_deref(), Some("bike"));
    }

    #[test]
    fn tracked_location_wire_shape() {
        let user = UserRecord::delivery_partner(UserId::from("d1"), "Sai", "Eluru")
            .with_location(GeoPoint::new(16.71, 81.1), Utc::now());
        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(value["currentLocation"]["type"], "Point");
        assert_eq!(value["currentLocation"]["coordinates"][0], 81.1);
        assert!(value["currentLocation"]["updatedAt"].is_string());
        assert_eq!(value["status"], "available");
    }
}
