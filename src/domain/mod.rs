mod cart;
mod order;
mod product;
mod user;

pub use cart::{CartLine, PlacementRequest};
pub use order::{DeliveryType, Order, OrderId, OrderItem, OrderStatus};
pub use product::{Product, ProductId};
pub use user::{Availability, Role, TrackedLocation, UserId, UserRecord};
