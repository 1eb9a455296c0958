#![allow(dead_code)]

use chrono::{Duration, Utc};
use rythu_market::{
    CancellationService, DeliveryActionProcessor, DeliveryType, DispatchPool, GeoPoint,
    MemoryOrderStore, MemoryStockLedger, MemoryUserDirectory, NewProduct, Order, OrderId,
    OrderStatus, OrderStore, PlacementService, Product, StockLedger, UserDirectory, UserId,
    UserRecord,
};

/// All core services wired over one shared set of in-memory stores.
pub struct Market {
    pub ledger: MemoryStockLedger,
    pub orders: MemoryOrderStore,
    pub users: MemoryUserDirectory,
    pub placement: PlacementService<MemoryStockLedger, MemoryOrderStore, MemoryUserDirectory>,
    pub pool: DispatchPool<MemoryOrderStore>,
    pub actions: DeliveryActionProcessor<MemoryOrderStore, MemoryUserDirectory>,
    pub cancellation: CancellationService<MemoryOrderStore, MemoryStockLedger>,
}

pub fn market() -> Market {
    let ledger = MemoryStockLedger::new();
    let orders = MemoryOrderStore::new();
    let users = MemoryUserDirectory::new();

    Market {
        placement: PlacementService::new(ledger.clone(), orders.clone(), users.clone()),
        pool: DispatchPool::new(orders.clone()),
        actions: DeliveryActionProcessor::new(orders.clone(), users.clone()),
        cancellation: CancellationService::new(orders.clone(), ledger.clone()),
        ledger,
        orders,
        users,
    }
}

pub fn seed_product(
    ledger: &MemoryStockLedger,
    name: &str,
    bazar: &str,
    price: u32,
    stock: u32,
) -> Product {
    ledger
        .upsert(NewProduct {
            name: name.into(),
            category: "Vegetables".into(),
            price,
            stock,
            bazar: bazar.into(),
            farmer_id: None,
            savings: None,
            competitor_price: None,
            image: None,
        })
        .unwrap()
}

pub fn seed_product_for_farmer(
    ledger: &MemoryStockLedger,
    farmer: &UserId,
    name: &str,
    bazar: &str,
    price: u32,
    stock: u32,
) -> Product {
    ledger
        .upsert(NewProduct {
            name: name.into(),
            category: "Vegetables".into(),
            price,
            stock,
            bazar: bazar.into(),
            farmer_id: Some(farmer.clone()),
            savings: None,
            competitor_price: None,
            image: None,
        })
        .unwrap()
}

pub fn seed_partner(users: &MemoryUserDirectory, id: &str, service_area: &str) -> UserId {
    let partner_id = UserId::from(id);
    users
        .insert(UserRecord::delivery_partner(
            partner_id.clone(),
            id.to_string(),
            service_area,
        ))
        .unwrap();
    partner_id
}

/// Insert a claimable delivery order directly, bypassing placement, with a
/// controlled pickup point and age.
pub fn seed_pending_delivery(
    orders: &MemoryOrderStore,
    id: &str,
    bazar: &str,
    pickup: GeoPoint,
    age: Duration,
) -> Order {
    let order = Order {
        id: OrderId::from(id),
        customer_id: Some(UserId::from("c1")),
        items: Vec::new(),
        total_amount: 120,
        delivery_type: DeliveryType::Delivery,
        address: Some("4-21 Canal Rd".into()),
        pickup_location: pickup,
        drop_location: None,
        delivery_fee: 20,
        status: OrderStatus::PendingAssignment,
        delivery_partner_id: None,
        otp: Some("4821".into()),
        bazar: bazar.into(),
        created_at: Utc::now() - age,
    };
    orders.insert(order).unwrap()
}
