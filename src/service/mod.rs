mod actions;
mod cancellation;
mod dispatch;
mod placement;

pub use actions::{DeliveryAction, DeliveryActionProcessor};
pub use cancellation::CancellationService;
pub use dispatch::{DispatchListing, DispatchPool};
pub use placement::PlacementService;

use rand::Rng;

/// Four-digit numeric passcode in 1000..=9999, shared with the customer at
/// handoff. Not globally unique; collisions across orders are tolerated.
pub(crate) fn generate_otp() -> String {
    rand::thread_rng().gen_range(1000..10000).to_string()
}
