use crate::models::product::Product;
use crate::models::summary::{ProductSummary, TripSummary};
use crate::models::trip::Trip;

/// The trip pricing calculator.
///
/// Pure arithmetic over source fields — no I/O and no validation.
/// Summaries are recomputed from scratch on every call, never patched
/// incrementally; a stored trip and its displayed numbers cannot drift.
///
/// The calculator is total over f64 input: a zero conversion rate divides
/// to infinity rather than erroring. Input sanity is the trip service's
/// job, enforced before a trip ever reaches this point.
pub struct PricingService;

impl PricingService {
    pub fn new() -> Self {
        Self
    }

    /// Derive the priced view of one product line.
    ///
    /// Unit prices first: tax goes on top of the abroad price, then the
    /// taxed price converts to local currency (multiply by rate) and the
    /// local price converts to abroad currency (divide by rate). Savings
    /// are for the whole line: quantity × (local unit price − converted
    /// abroad unit price).
    #[must_use]
    pub fn calculate_product(&self, trip: &Trip, product: &Product) -> ProductSummary {
        let quantity = f64::from(product.quantity);

        let abroad_price_with_tax =
            product.abroad_price * (1.0 + trip.abroad_tax_percentage / 100.0);
        let abroad_price_converted = abroad_price_with_tax * trip.abroad_conversion_rate;
        let local_price_converted = product.local_price / trip.abroad_conversion_rate;

        let savings = quantity * product.local_price - quantity * abroad_price_converted;
        let savings_converted = savings / trip.abroad_conversion_rate;

        ProductSummary {
            id: product.id,
            name: product.name.clone(),
            quantity: product.quantity,
            abroad_price: product.abroad_price,
            local_price: product.local_price,
            abroad_price_with_tax,
            abroad_price_converted,
            local_price_converted,
            savings,
            savings_converted,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }

    /// Summarize a whole trip: map every product through
    /// [`calculate_product`](Self::calculate_product), then fold into
    /// trip-level totals.
    ///
    /// The ticket cost is a trip-wide sunk cost. It seeds both abroad-side
    /// totals (a round-trip ticket is an abroad-side expense — expressed in
    /// abroad currency for `total_abroad`, taken as-is for
    /// `total_abroad_converted`), stays out of both local-side totals, and
    /// offsets each savings total exactly once.
    #[must_use]
    pub fn calculate_trip_summary(&self, trip: &Trip) -> TripSummary {
        let products: Vec<ProductSummary> = trip
            .products
            .iter()
            .map(|product| self.calculate_product(trip, product))
            .collect();

        let ticket_cost_abroad = trip.ticket_cost / trip.abroad_conversion_rate;

        let mut products_count: u32 = 0;
        let mut total_abroad = ticket_cost_abroad;
        let mut total_abroad_converted = trip.ticket_cost;
        let mut total_local = 0.0;
        let mut total_local_converted = 0.0;
        let mut savings_sum = 0.0;
        let mut savings_converted_sum = 0.0;

        for product in &products {
            let quantity = f64::from(product.quantity);
            products_count += product.quantity;
            total_abroad += product.abroad_price_with_tax * quantity;
            total_abroad_converted += product.abroad_price_converted * quantity;
            total_local += product.local_price * quantity;
            total_local_converted += product.local_price_converted * quantity;
            savings_sum += product.savings;
            savings_converted_sum += product.savings_converted;
        }

        TripSummary {
            id: trip.id,
            owner_id: trip.owner_id,
            name: trip.name.clone(),
            ticket_cost: trip.ticket_cost,
            local_currency: trip.local_currency.clone(),
            abroad_currency: trip.abroad_currency.clone(),
            abroad_tax_percentage: trip.abroad_tax_percentage,
            abroad_conversion_rate: trip.abroad_conversion_rate,
            products,
            products_count,
            total_abroad,
            total_abroad_converted,
            total_local,
            total_local_converted,
            total_savings: savings_sum - trip.ticket_cost,
            total_savings_converted: savings_converted_sum - ticket_cost_abroad,
            created_at: trip.created_at,
            updated_at: trip.updated_at,
        }
    }
}

impl Default for PricingService {
    fn default() -> Self {
        Self::new()
    }
}
