use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::user::UserId;

/// Unique product identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProductId(pub String);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(value: &str) -> Self {
        ProductId(value.to_string())
    }
}

/// A sellable unit of produce at a specific bazar.
///
/// `stock` can never go negative: the only decrement path is the ledger's
/// conditional reserve, which rejects a decrement that would overdraw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category: String,
    /// Price per unit in whole rupees.
    pub price: u32,
    pub stock: u32,
    pub item_unit: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub farmer_id: Option<UserId>,
    pub bazar: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub savings: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub competitor_price: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_shape_uses_camel_case() {
        let product = Product {
            id: ProductId::from("p1"),
            name: "Tomato (Local)".into(),
            category: "Vegetables".into(),
            price: 24,
            stock: 150,
            item_unit: "kg".into(),
            farmer_id: Some(UserId::from("f1")),
            bazar: "MVP Colony Rythu Bazar".into(),
            savings: Some(24),
            competitor_price: Some(48),
            image: None,
            updated_at: Utc::now(),
        };
        let value = serde_json::to_value(&product).unwrap();
        assert_eq!(value["itemUnit"], "kg");
        assert_eq!(value["farmerId"], "f1");
        assert_eq!(value["competitorPrice"], 48);
        assert!(value.get("image").is_none());
    }
}
