use tracing::{debug, warn};

use super::directory::UserDirectory;
use crate::domain::{Availability, Role, UserRecord};
use crate::geo::GeoPoint;

/// Geo candidates beyond this distance from the pickup point are ignored.
const MATCH_RADIUS_KM: f64 = 10.0;

/// Best-effort matcher for an available partner in a service area: nearest
/// located partner within 10 km of the pickup point, else any available
/// partner registered for the area.
///
/// Lookup failures degrade to `None` instead of propagating. Assignment is
/// pull-based, so a missed match only means the order stays visible for the
/// next poll.
pub fn find_available_partner<U: UserDirectory>(
    users: &U,
    pickup: &GeoPoint,
    service_area: &str,
) -> Option<UserRecord> {
    let candidates = users.find(|user| {
        user.role == Role::Delivery
            && user.status == Availability::Available
            && user.service_area.as_deref() == Some(service_area)
    });

    let candidates = match candidates {
        Ok(candidates) => candidates,
        Err(err) => {
            warn!(%err, service_area, "partner lookup failed; treating as no partner found");
            return None;
        }
    };

    let mut located: Vec<(f64, UserRecord)> = candidates
        .iter()
        .filter_map(|partner| {
            partner
                .location()
                .map(|at| (at.distance_km(pickup), partner.clone()))
        })
        .filter(|(distance, _)| *distance <= MATCH_RADIUS_KM)
        .collect();

    if !located.is_empty() {
        located.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
        let (distance, partner) = located.swap_remove(0);
        debug!(partner = %partner.id, distance_km = distance, "matched partner by proximity");
        return Some(partner);
    }

    // No located candidate nearby; fall back to a plain service-area match.
    let fallback = candidates.into_iter().next();
    match &fallback {
        Some(partner) => debug!(partner = %partner.id, service_area, "matched partner by service area"),
        None => debug!(service_area, "no delivery partner available"),
    }
    fallback
}
