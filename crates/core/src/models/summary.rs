use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A product line with its derived pricing fields filled in.
///
/// Purely computed — never persisted. Lives for one computation and is
/// rebuilt from source fields on every read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub id: Uuid,
    pub name: String,
    pub quantity: u32,

    /// Unit price abroad, before tax (as stored)
    pub abroad_price: f64,

    /// Unit price at home (as stored)
    pub local_price: f64,

    /// Unit price abroad including sales tax, abroad currency
    pub abroad_price_with_tax: f64,

    /// Unit price abroad including tax, expressed in the local currency
    pub abroad_price_converted: f64,

    /// Unit price at home, expressed in the abroad currency
    pub local_price_converted: f64,

    /// What the whole line saves by buying abroad, in the local currency.
    /// Negative when buying abroad is the worse deal.
    pub savings: f64,

    /// The same saving expressed in the abroad currency
    pub savings_converted: f64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A trip with every product summarized and trip-level totals folded in.
///
/// The ticket cost participates once, at the trip level: it seeds the
/// abroad-side totals (a round-trip ticket is an abroad-side expense) and
/// offsets both savings totals. It never appears in the local-side totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripSummary {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub ticket_cost: f64,
    pub local_currency: String,
    pub abroad_currency: String,
    pub abroad_tax_percentage: f64,
    pub abroad_conversion_rate: f64,

    /// Every product mapped through the per-product calculation
    pub products: Vec<ProductSummary>,

    /// Total number of units across all lines (sum of quantities)
    pub products_count: u32,

    /// Σ abroad_price_with_tax × quantity, plus the ticket cost expressed
    /// in the abroad currency. Abroad currency.
    pub total_abroad: f64,

    /// Σ abroad_price_converted × quantity, plus the ticket cost.
    /// Local currency.
    pub total_abroad_converted: f64,

    /// Σ local_price × quantity (no ticket cost). Local currency.
    pub total_local: f64,

    /// Σ local_price_converted × quantity (no ticket cost). Abroad currency.
    pub total_local_converted: f64,

    /// Σ per-product savings − ticket_cost. Local currency.
    pub total_savings: f64,

    /// Σ per-product savings_converted − ticket_cost / rate. Abroad currency.
    pub total_savings_converted: f64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
