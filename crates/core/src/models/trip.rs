use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::product::{Product, ProductPrices};

/// A single international-purchase scenario: one destination, one pair of
/// currencies, one conversion rate, and the products under consideration.
///
/// `abroad_conversion_rate` is local-currency-per-unit-of-abroad-currency.
/// The whole crate follows one convention: abroad amounts are multiplied by
/// the rate to become local amounts, local amounts are divided by it to
/// become abroad amounts. The two are never mixed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    /// Unique identifier
    pub id: Uuid,

    /// The user this trip belongs to. Every read path filters on it.
    pub owner_id: Uuid,

    /// Display name (e.g., "Florida US x BR")
    pub name: String,

    /// Round-trip ticket cost, in the local currency
    pub ticket_cost: f64,

    /// ISO-4217-style code of the currency at home (e.g., "BRL")
    pub local_currency: String,

    /// ISO-4217-style code of the currency at the destination (e.g., "USD")
    pub abroad_currency: String,

    /// Sales tax added on top of abroad prices, as a percentage
    /// (6.38 means 6.38%)
    pub abroad_tax_percentage: f64,

    /// Local currency units per one unit of abroad currency
    pub abroad_conversion_rate: f64,

    /// The shopping list for this trip
    #[serde(default)]
    pub products: Vec<Product>,

    /// When the trip was created
    pub created_at: DateTime<Utc>,

    /// Last time the trip or any of its products changed
    pub updated_at: DateTime<Utc>,
}

impl Trip {
    /// Build a trip for `owner_id` from a draft. Currency codes are
    /// uppercased here; validation happens in the trip service.
    pub fn new(owner_id: Uuid, draft: TripDraft) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            owner_id,
            name: draft.name,
            ticket_cost: draft.ticket_cost,
            local_currency: draft.local_currency.trim().to_uppercase(),
            abroad_currency: draft.abroad_currency.trim().to_uppercase(),
            abroad_tax_percentage: draft.abroad_tax_percentage,
            abroad_conversion_rate: draft.abroad_conversion_rate,
            products: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Find a product line by id.
    #[must_use]
    pub fn product(&self, product_id: Uuid) -> Option<&Product> {
        self.products.iter().find(|p| p.id == product_id)
    }

    pub(crate) fn product_mut(&mut self, product_id: Uuid) -> Option<&mut Product> {
        self.products.iter_mut().find(|p| p.id == product_id)
    }

    /// Record that something on this trip changed.
    pub(crate) fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Input record for creating a trip. Same fields a user fills in on the
/// trip form; ids and timestamps are assigned by the library.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripDraft {
    pub name: String,
    pub ticket_cost: f64,
    pub local_currency: String,
    pub abroad_currency: String,
    pub abroad_tax_percentage: f64,
    pub abroad_conversion_rate: f64,
}

/// Sparse update for a trip: trip-scalar fields that are `None` and products
/// not named in `product_prices` stay exactly as stored.
///
/// Patches never touch a product's quantity or name, and they never carry
/// derived values — after applying one, callers re-read the trip and
/// recompute its summary from source fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TripPatch {
    pub name: Option<String>,
    pub ticket_cost: Option<f64>,
    pub local_currency: Option<String>,
    pub abroad_currency: Option<String>,
    pub abroad_tax_percentage: Option<f64>,
    pub abroad_conversion_rate: Option<f64>,

    /// Per-product price updates, keyed by product id
    #[serde(default)]
    pub product_prices: HashMap<Uuid, ProductPrices>,
}

impl TripPatch {
    /// `true` when applying this patch would change nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.ticket_cost.is_none()
            && self.local_currency.is_none()
            && self.abroad_currency.is_none()
            && self.abroad_tax_percentage.is_none()
            && self.abroad_conversion_rate.is_none()
            && self.product_prices.is_empty()
    }
}
