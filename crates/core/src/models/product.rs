use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One purchasable line within a trip (historically called an "item").
///
/// Prices are per unit: `abroad_price` is tax-exclusive and in the trip's
/// abroad currency, `local_price` is in the trip's local currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier
    pub id: Uuid,

    /// Display name (e.g., "iPhone 15 Pro 256gb")
    pub name: String,

    /// How many units the traveler intends to buy.
    /// Zero is a valid wishlist row and contributes nothing to totals.
    pub quantity: u32,

    /// Unit price in the abroad currency, before sales tax
    pub abroad_price: f64,

    /// Unit price in the local currency
    pub local_price: f64,

    /// When this line was added
    pub created_at: DateTime<Utc>,

    /// Last time any field on this line changed
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn new(
        name: impl Into<String>,
        quantity: u32,
        abroad_price: f64,
        local_price: f64,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            quantity,
            abroad_price,
            local_price,
            created_at: now,
            updated_at: now,
        }
    }
}

/// The `(abroad_price, local_price)` pair carried by the sparse patch path.
/// Only these two fields can be updated that way — quantity and name are
/// deliberately out of reach.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProductPrices {
    pub abroad_price: f64,
    pub local_price: f64,
}
