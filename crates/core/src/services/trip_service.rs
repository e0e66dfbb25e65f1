use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::book::TripBook;
use crate::models::product::Product;
use crate::models::trip::{Trip, TripDraft, TripPatch};

/// Manages the trips in a book: creation, sparse updates, deletion, and
/// product line management.
///
/// Pure business logic — no I/O. All input checking for the crate happens
/// here, at the mutation boundary; the pricing calculator downstream
/// assumes stored fields are already sane.
pub struct TripService;

impl TripService {
    pub fn new() -> Self {
        Self
    }

    // ── Trips ───────────────────────────────────────────────────────

    /// Create a trip for `owner_id` from a draft. Returns the new trip's id.
    pub fn create_trip(
        &self,
        book: &mut TripBook,
        owner_id: Uuid,
        draft: TripDraft,
    ) -> Result<Uuid, CoreError> {
        let trip = Trip::new(owner_id, draft);
        self.validate_trip(&trip)?;
        let id = trip.id;
        book.trips.push(trip);
        Ok(id)
    }

    /// Fetch a trip by id, scoped to its owner. An absent trip and a trip
    /// owned by someone else both come back as `TripNotFound`.
    pub fn get_trip<'a>(
        &self,
        book: &'a TripBook,
        trip_id: Uuid,
        owner_id: Uuid,
    ) -> Result<&'a Trip, CoreError> {
        book.find(trip_id, owner_id)
            .ok_or_else(|| CoreError::TripNotFound(trip_id.to_string()))
    }

    /// All trips belonging to `owner_id`, in creation order.
    pub fn list_trips<'a>(&self, book: &'a TripBook, owner_id: Uuid) -> Vec<&'a Trip> {
        book.trips_for(owner_id)
    }

    /// Remove a trip and, by containment, all of its products.
    /// Returns the removed trip.
    pub fn delete_trip(
        &self,
        book: &mut TripBook,
        trip_id: Uuid,
        owner_id: Uuid,
    ) -> Result<Trip, CoreError> {
        let idx = book
            .trips
            .iter()
            .position(|t| t.id == trip_id && t.owner_id == owner_id)
            .ok_or_else(|| CoreError::TripNotFound(trip_id.to_string()))?;
        Ok(book.trips.remove(idx))
    }

    /// Apply a sparse patch: present trip-scalar fields plus the named
    /// products' price pairs. Patched products keep their quantity and name.
    ///
    /// All-or-nothing: the patch is staged on a copy and validated as a
    /// whole; a bad rate or an unknown product id leaves the stored trip
    /// untouched.
    pub fn update_trip(
        &self,
        book: &mut TripBook,
        trip_id: Uuid,
        owner_id: Uuid,
        patch: TripPatch,
    ) -> Result<(), CoreError> {
        let trip = book
            .find_mut(trip_id, owner_id)
            .ok_or_else(|| CoreError::TripNotFound(trip_id.to_string()))?;

        let mut updated = trip.clone();

        if let Some(name) = patch.name {
            updated.name = name;
        }
        if let Some(ticket_cost) = patch.ticket_cost {
            updated.ticket_cost = ticket_cost;
        }
        if let Some(local_currency) = patch.local_currency {
            updated.local_currency = local_currency.trim().to_uppercase();
        }
        if let Some(abroad_currency) = patch.abroad_currency {
            updated.abroad_currency = abroad_currency.trim().to_uppercase();
        }
        if let Some(tax) = patch.abroad_tax_percentage {
            updated.abroad_tax_percentage = tax;
        }
        if let Some(rate) = patch.abroad_conversion_rate {
            updated.abroad_conversion_rate = rate;
        }

        for (product_id, prices) in &patch.product_prices {
            let product = updated
                .product_mut(*product_id)
                .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))?;
            product.abroad_price = prices.abroad_price;
            product.local_price = prices.local_price;
            product.updated_at = chrono::Utc::now();
        }

        self.validate_trip(&updated)?;
        for product in &updated.products {
            self.validate_product(product)?;
        }

        updated.touch();
        *trip = updated;
        Ok(())
    }

    // ── Products ────────────────────────────────────────────────────

    /// Add a product line to a trip. Returns the new product's id.
    pub fn add_product(
        &self,
        book: &mut TripBook,
        trip_id: Uuid,
        owner_id: Uuid,
        name: impl Into<String>,
        quantity: u32,
        abroad_price: f64,
        local_price: f64,
    ) -> Result<Uuid, CoreError> {
        let trip = book
            .find_mut(trip_id, owner_id)
            .ok_or_else(|| CoreError::TripNotFound(trip_id.to_string()))?;

        let product = Product::new(name, quantity, abroad_price, local_price);
        self.validate_product(&product)?;

        let id = product.id;
        trip.products.push(product);
        trip.touch();
        Ok(id)
    }

    /// Replace every editable field of an existing product line.
    pub fn update_product(
        &self,
        book: &mut TripBook,
        trip_id: Uuid,
        owner_id: Uuid,
        product_id: Uuid,
        name: impl Into<String>,
        quantity: u32,
        abroad_price: f64,
        local_price: f64,
    ) -> Result<(), CoreError> {
        let trip = book
            .find_mut(trip_id, owner_id)
            .ok_or_else(|| CoreError::TripNotFound(trip_id.to_string()))?;

        let product = trip
            .product_mut(product_id)
            .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))?;

        let mut updated = product.clone();
        updated.name = name.into();
        updated.quantity = quantity;
        updated.abroad_price = abroad_price;
        updated.local_price = local_price;
        self.validate_product(&updated)?;

        updated.updated_at = chrono::Utc::now();
        *product = updated;
        trip.touch();
        Ok(())
    }

    /// Remove a product line. Returns the removed product.
    pub fn remove_product(
        &self,
        book: &mut TripBook,
        trip_id: Uuid,
        owner_id: Uuid,
        product_id: Uuid,
    ) -> Result<Product, CoreError> {
        let trip = book
            .find_mut(trip_id, owner_id)
            .ok_or_else(|| CoreError::TripNotFound(trip_id.to_string()))?;

        let idx = trip
            .products
            .iter()
            .position(|p| p.id == product_id)
            .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))?;

        let removed = trip.products.remove(idx);
        trip.touch();
        Ok(removed)
    }

    // ── Validation ──────────────────────────────────────────────────

    /// Validate the trip-scalar fields.
    ///
    /// Rules:
    /// - name must not be blank
    /// - currency codes must be exactly 3 ASCII letters
    /// - the conversion rate must be finite and positive — the calculator
    ///   divides by it
    /// - tax percentage and ticket cost must be finite and non-negative
    fn validate_trip(&self, trip: &Trip) -> Result<(), CoreError> {
        if trip.name.trim().is_empty() {
            return Err(CoreError::ValidationError(
                "Trip name must not be blank".into(),
            ));
        }

        Self::validate_currency(&trip.local_currency)?;
        Self::validate_currency(&trip.abroad_currency)?;

        if !(trip.abroad_conversion_rate.is_finite() && trip.abroad_conversion_rate > 0.0) {
            return Err(CoreError::ValidationError(format!(
                "Conversion rate must be a positive number, got {}",
                trip.abroad_conversion_rate
            )));
        }

        Self::validate_amount("Tax percentage", trip.abroad_tax_percentage)?;
        Self::validate_amount("Ticket cost", trip.ticket_cost)?;

        Ok(())
    }

    /// Validate a product line: non-blank name, finite non-negative prices.
    /// Quantity is `u32`, so a negative quantity is unrepresentable;
    /// zero is a legal wishlist row.
    fn validate_product(&self, product: &Product) -> Result<(), CoreError> {
        if product.name.trim().is_empty() {
            return Err(CoreError::ValidationError(
                "Product name must not be blank".into(),
            ));
        }

        Self::validate_amount("Abroad price", product.abroad_price)?;
        Self::validate_amount("Local price", product.local_price)?;

        Ok(())
    }

    fn validate_currency(code: &str) -> Result<(), CoreError> {
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(CoreError::ValidationError(format!(
                "Invalid currency code '{code}': must be exactly 3 ASCII letters (e.g., USD, EUR, BRL)"
            )));
        }
        Ok(())
    }

    fn validate_amount(label: &str, value: f64) -> Result<(), CoreError> {
        if !(value.is_finite() && value >= 0.0) {
            return Err(CoreError::ValidationError(format!(
                "{label} must be a non-negative number, got {value}"
            )));
        }
        Ok(())
    }
}

impl Default for TripService {
    fn default() -> Self {
        Self::new()
    }
}
