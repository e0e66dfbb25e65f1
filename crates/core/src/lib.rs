pub mod errors;
pub mod format;
pub mod models;
pub mod services;
pub mod storage;

use std::collections::HashMap;

use uuid::Uuid;

use errors::CoreError;
use models::book::TripBook;
use models::product::{Product, ProductPrices};
use models::summary::TripSummary;
use models::trip::{Trip, TripDraft, TripPatch};
use services::pricing_service::PricingService;
use services::trip_service::TripService;
use storage::manager::StorageManager;

/// Main entry point for the Trip Savings core library.
/// Holds the trip book and the services needed to operate on it.
///
/// All trip access is owner-scoped: the caller resolves an owner id (how is
/// its business — this crate does no authentication) and passes it with
/// every call. Summaries are always computed fresh from stored fields.
#[must_use]
pub struct TripSavings {
    book: TripBook,
    trip_service: TripService,
    pricing_service: PricingService,
    /// Tracks whether any mutation has occurred since the last save/load.
    dirty: bool,
}

impl std::fmt::Debug for TripSavings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TripSavings")
            .field("trips", &self.book.trip_count())
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl TripSavings {
    /// Create a brand new empty trip book.
    pub fn create_new() -> Self {
        Self::build(TripBook::default())
    }

    /// Wrap an existing book, e.g. one handed over by a store.
    pub fn from_book(book: TripBook) -> Self {
        Self::build(book)
    }

    /// Load an existing book from encrypted bytes (password required).
    /// Use this for WASM / embedded frontends that handle file I/O
    /// themselves.
    pub fn load_from_bytes(encrypted: &[u8], password: &str) -> Result<Self, CoreError> {
        let book = StorageManager::load_from_bytes(encrypted, password)?;
        Ok(Self::build(book))
    }

    /// Save the current book to encrypted bytes.
    /// Clears the unsaved-changes flag on success.
    pub fn save_to_bytes(&mut self, password: &str) -> Result<Vec<u8>, CoreError> {
        let bytes = StorageManager::save_to_bytes(&self.book, password)?;
        self.dirty = false;
        Ok(bytes)
    }

    /// Load from an encrypted file on disk (native only, not WASM).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_file(path: &str, password: &str) -> Result<Self, CoreError> {
        let book = StorageManager::load_from_file(path, password)?;
        Ok(Self::build(book))
    }

    /// Save to an encrypted file on disk (native only).
    /// Clears the unsaved-changes flag on success.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_file(&mut self, path: &str, password: &str) -> Result<(), CoreError> {
        StorageManager::save_to_file(&self.book, path, password)?;
        self.dirty = false;
        Ok(())
    }

    // ── Trip Management ─────────────────────────────────────────────

    /// Create a trip for an owner. Returns the new trip's id.
    pub fn create_trip(&mut self, owner_id: Uuid, draft: TripDraft) -> Result<Uuid, CoreError> {
        let id = self.trip_service.create_trip(&mut self.book, owner_id, draft)?;
        self.dirty = true;
        Ok(id)
    }

    /// Get a single trip by id, scoped to its owner.
    #[must_use]
    pub fn get_trip(&self, trip_id: Uuid, owner_id: Uuid) -> Option<&Trip> {
        self.book.find(trip_id, owner_id)
    }

    /// All trips belonging to an owner, in creation order.
    #[must_use]
    pub fn list_trips(&self, owner_id: Uuid) -> Vec<&Trip> {
        self.trip_service.list_trips(&self.book, owner_id)
    }

    /// Apply a sparse patch to a trip (trip scalars plus per-product price
    /// pairs). All-or-nothing; see [`TripPatch`].
    pub fn update_trip(
        &mut self,
        trip_id: Uuid,
        owner_id: Uuid,
        patch: TripPatch,
    ) -> Result<(), CoreError> {
        self.trip_service
            .update_trip(&mut self.book, trip_id, owner_id, patch)?;
        self.dirty = true;
        Ok(())
    }

    /// Delete a trip and all of its products. Returns the removed trip.
    pub fn delete_trip(&mut self, trip_id: Uuid, owner_id: Uuid) -> Result<Trip, CoreError> {
        let removed = self.trip_service.delete_trip(&mut self.book, trip_id, owner_id)?;
        self.dirty = true;
        Ok(removed)
    }

    /// Number of trips an owner has.
    #[must_use]
    pub fn trip_count(&self, owner_id: Uuid) -> usize {
        self.book.trips_for(owner_id).len()
    }

    // ── Products ────────────────────────────────────────────────────

    /// Add a product line to a trip. Returns the new product's id.
    pub fn add_product(
        &mut self,
        trip_id: Uuid,
        owner_id: Uuid,
        name: impl Into<String>,
        quantity: u32,
        abroad_price: f64,
        local_price: f64,
    ) -> Result<Uuid, CoreError> {
        let id = self.trip_service.add_product(
            &mut self.book,
            trip_id,
            owner_id,
            name,
            quantity,
            abroad_price,
            local_price,
        )?;
        self.dirty = true;
        Ok(id)
    }

    /// Replace every editable field of a product line.
    pub fn update_product(
        &mut self,
        trip_id: Uuid,
        owner_id: Uuid,
        product_id: Uuid,
        name: impl Into<String>,
        quantity: u32,
        abroad_price: f64,
        local_price: f64,
    ) -> Result<(), CoreError> {
        self.trip_service.update_product(
            &mut self.book,
            trip_id,
            owner_id,
            product_id,
            name,
            quantity,
            abroad_price,
            local_price,
        )?;
        self.dirty = true;
        Ok(())
    }

    /// Remove a product line. Returns the removed product.
    pub fn remove_product(
        &mut self,
        trip_id: Uuid,
        owner_id: Uuid,
        product_id: Uuid,
    ) -> Result<Product, CoreError> {
        let removed =
            self.trip_service
                .remove_product(&mut self.book, trip_id, owner_id, product_id)?;
        self.dirty = true;
        Ok(removed)
    }

    /// Update only the price pair of the named products, leaving their
    /// quantity and name untouched. Convenience wrapper over the patch
    /// path — equivalent to `update_trip` with nothing but
    /// `product_prices` set.
    pub fn set_product_prices(
        &mut self,
        trip_id: Uuid,
        owner_id: Uuid,
        prices: HashMap<Uuid, ProductPrices>,
    ) -> Result<(), CoreError> {
        self.update_trip(
            trip_id,
            owner_id,
            TripPatch {
                product_prices: prices,
                ..TripPatch::default()
            },
        )
    }

    // ── Summaries ───────────────────────────────────────────────────

    /// Compute the full summary of one trip: every product priced, totals
    /// folded, ticket cost applied once at the trip level.
    pub fn trip_summary(&self, trip_id: Uuid, owner_id: Uuid) -> Result<TripSummary, CoreError> {
        let trip = self.trip_service.get_trip(&self.book, trip_id, owner_id)?;
        Ok(self.pricing_service.calculate_trip_summary(trip))
    }

    /// Summaries for every trip of an owner, in creation order.
    #[must_use]
    pub fn trips_with_summary(&self, owner_id: Uuid) -> Vec<TripSummary> {
        self.book
            .trips_for(owner_id)
            .into_iter()
            .map(|trip| self.pricing_service.calculate_trip_summary(trip))
            .collect()
    }

    // ── Dirty State ─────────────────────────────────────────────────

    /// Returns `true` if the book has been modified since the last save
    /// or load.
    #[must_use]
    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty
    }

    // ── Export / Import ─────────────────────────────────────────────

    /// Export all of an owner's trips (with products) as a JSON string.
    pub fn export_trips_to_json(&self, owner_id: Uuid) -> Result<String, CoreError> {
        let trips = self.book.trips_for(owner_id);
        serde_json::to_string_pretty(&trips)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize trips: {e}")))
    }

    /// Import trips from a JSON string previously produced by
    /// [`export_trips_to_json`](Self::export_trips_to_json).
    ///
    /// Imported trips are re-owned by `owner_id` regardless of the owner
    /// recorded in the JSON. All trips are validated first; if any fails,
    /// or an id already exists in the book, none are imported
    /// (all-or-nothing). Returns the number of trips imported.
    pub fn import_trips_from_json(
        &mut self,
        owner_id: Uuid,
        json: &str,
    ) -> Result<usize, CoreError> {
        let mut trips: Vec<Trip> = serde_json::from_str(json)?;
        let count = trips.len();

        // Phase 1: validate everything against a staged copy of the book
        let mut staged = self.book.clone();
        let mut seen = std::collections::HashSet::new();
        for trip in &mut trips {
            trip.owner_id = owner_id;
            if self.book.trips.iter().any(|t| t.id == trip.id) || !seen.insert(trip.id) {
                return Err(CoreError::ValidationError(format!(
                    "Trip id {} already exists in the book",
                    trip.id
                )));
            }
            let draft = TripDraft {
                name: trip.name.clone(),
                ticket_cost: trip.ticket_cost,
                local_currency: trip.local_currency.clone(),
                abroad_currency: trip.abroad_currency.clone(),
                abroad_tax_percentage: trip.abroad_tax_percentage,
                abroad_conversion_rate: trip.abroad_conversion_rate,
            };
            let probe_id = self.trip_service.create_trip(&mut staged, owner_id, draft)?;
            for product in &trip.products {
                self.trip_service.add_product(
                    &mut staged,
                    probe_id,
                    owner_id,
                    product.name.clone(),
                    product.quantity,
                    product.abroad_price,
                    product.local_price,
                )?;
            }
        }

        // Phase 2: all valid — append the imported trips as-is
        // (ids and timestamps preserved) to the real book
        self.book.trips.extend(trips);
        self.dirty = true;
        Ok(count)
    }

    /// Export one trip's product summaries as a CSV string.
    /// Columns: id, name, quantity, abroad_price, abroad_price_with_tax,
    /// abroad_price_converted, local_price, local_price_converted,
    /// savings, savings_converted
    pub fn export_trip_to_csv(&self, trip_id: Uuid, owner_id: Uuid) -> Result<String, CoreError> {
        let summary = self.trip_summary(trip_id, owner_id)?;

        let mut csv = String::from(
            "id,name,quantity,abroad_price,abroad_price_with_tax,abroad_price_converted,\
             local_price,local_price_converted,savings,savings_converted\n",
        );
        for product in &summary.products {
            // Escape CSV: quote names containing commas, quotes, or newlines
            let name = &product.name;
            let escaped_name = if name.contains(',') || name.contains('"') || name.contains('\n') {
                format!("\"{}\"", name.replace('"', "\"\""))
            } else {
                name.clone()
            };
            csv.push_str(&format!(
                "{},{},{},{},{},{},{},{},{},{}\n",
                product.id,
                escaped_name,
                product.quantity,
                product.abroad_price,
                product.abroad_price_with_tax,
                product.abroad_price_converted,
                product.local_price,
                product.local_price_converted,
                product.savings,
                product.savings_converted,
            ));
        }
        Ok(csv)
    }

    /// Export the full book as JSON (unencrypted snapshot for
    /// debugging/display).
    pub fn to_json(&self) -> Result<String, CoreError> {
        serde_json::to_string_pretty(&self.book)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize trip book: {e}")))
    }

    // ── Internal ────────────────────────────────────────────────────

    fn build(book: TripBook) -> Self {
        Self {
            book,
            trip_service: TripService::new(),
            pricing_service: PricingService::new(),
            dirty: false,
        }
    }
}
