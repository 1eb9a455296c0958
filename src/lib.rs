mod domain;
mod error;
mod geo;
mod ledger;
mod orders;
mod service;
mod users;

pub use domain::{
    Availability, CartLine, DeliveryType, Order, OrderId, OrderItem, OrderStatus,
    PlacementRequest, Product, ProductId, Role, TrackedLocation, UserId, UserRecord,
};
pub use error::{ErrorClass, MarketError};
pub use geo::{GeoPoint, LatLng};
pub use ledger::{MemoryStockLedger, NewProduct, StockLedger};
pub use orders::{MemoryOrderStore, OrderStore};
pub use service::{
    CancellationService, DeliveryAction, DeliveryActionProcessor, DispatchListing, DispatchPool,
    PlacementService,
};
pub use users::{find_available_partner, MemoryUserDirectory, UserDirectory};
