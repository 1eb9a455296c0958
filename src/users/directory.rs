use chrono::{DateTime, Utc};

use crate::domain::{Availability, UserId, UserRecord};
use crate::error::MarketError;
use crate::geo::GeoPoint;

/// Profile store for customers, farmers, and delivery partners. The order
/// workflow touches it for three things: farmer locations (pickup
/// derivation), partner availability flips, and partner matching.
pub trait UserDirectory: Send + Sync {
    fn get(&self, id: &UserId) -> Result<Option<UserRecord>, MarketError>;

    fn insert(&self, user: UserRecord) -> Result<(), MarketError>;

    fn set_availability(&self, id: &UserId, availability: Availability)
        -> Result<(), MarketError>;

    /// Record a partner's location ping.
    fn update_location(
        &self,
        id: &UserId,
        point: GeoPoint,
        at: DateTime<Utc>,
    ) -> Result<(), MarketError>;

    fn find<F>(&self, predicate: F) -> Result<Vec<UserRecord>, MarketError>
    where
        F: Fn(&UserRecord) -> bool;

    /// A farmer's last known location, if any.
    fn farmer_location(&self, id: &UserId) -> Result<Option<GeoPoint>, MarketError>
    where
        Self: Sized,
    {
        Ok(self.get(id)?.and_then(|user| user.location()))
    }
}
