use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::book::TripBook;
use crate::models::trip::{Trip, TripDraft, TripPatch};
use crate::services::trip_service::TripService;

/// Trait abstraction for wherever trips are kept (dependency inversion).
///
/// The pricing calculator only ever exchanges plain data with this
/// boundary: it reads a `Trip`, computes, and hands plain values back. All
/// I/O — and all of its concurrency — belongs to the backend behind this
/// trait, never to the calculator.
///
/// Every operation is owner-scoped. A trip stored under a different owner
/// is indistinguishable from one that does not exist: both surface
/// `CoreError::TripNotFound`.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait TripStore: Send + Sync {
    /// Read one trip with its products.
    async fn get_trip(&self, trip_id: Uuid, owner_id: Uuid) -> Result<Trip, CoreError>;

    /// All trips belonging to an owner, with products, in creation order.
    async fn list_trips(&self, owner_id: Uuid) -> Result<Vec<Trip>, CoreError>;

    /// Create a trip from a draft and return it.
    async fn create_trip(&self, owner_id: Uuid, draft: TripDraft) -> Result<Trip, CoreError>;

    /// Apply a sparse patch — trip scalars plus per-product price pairs —
    /// persist it, and return the updated trip with its products.
    async fn update_trip(
        &self,
        trip_id: Uuid,
        owner_id: Uuid,
        patch: TripPatch,
    ) -> Result<Trip, CoreError>;

    /// Delete a trip, cascading to its products.
    async fn delete_trip(&self, trip_id: Uuid, owner_id: Uuid) -> Result<(), CoreError>;
}

/// In-memory [`TripStore`] backed by an `RwLock<TripBook>`.
///
/// Mutation rules are delegated to [`TripService`]; the store enforces
/// exactly the same validation as the facade. Useful as the test double for
/// anything speaking to the store boundary, and as the working store for a
/// single-process frontend.
pub struct MemoryTripStore {
    book: RwLock<TripBook>,
    service: TripService,
}

impl MemoryTripStore {
    pub fn new() -> Self {
        Self::with_book(TripBook::default())
    }

    /// Start from an existing book (e.g., one loaded from a book file).
    pub fn with_book(book: TripBook) -> Self {
        Self {
            book: RwLock::new(book),
            service: TripService::new(),
        }
    }

    /// Clone out the current book, e.g. to hand to the storage manager.
    #[must_use]
    pub fn snapshot(&self) -> TripBook {
        self.book
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Default for MemoryTripStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl TripStore for MemoryTripStore {
    async fn get_trip(&self, trip_id: Uuid, owner_id: Uuid) -> Result<Trip, CoreError> {
        let book = self.book.read().unwrap_or_else(PoisonError::into_inner);
        self.service.get_trip(&book, trip_id, owner_id).cloned()
    }

    async fn list_trips(&self, owner_id: Uuid) -> Result<Vec<Trip>, CoreError> {
        let book = self.book.read().unwrap_or_else(PoisonError::into_inner);
        Ok(self
            .service
            .list_trips(&book, owner_id)
            .into_iter()
            .cloned()
            .collect())
    }

    async fn create_trip(&self, owner_id: Uuid, draft: TripDraft) -> Result<Trip, CoreError> {
        let mut book = self.book.write().unwrap_or_else(PoisonError::into_inner);
        let id = self.service.create_trip(&mut book, owner_id, draft)?;
        self.service.get_trip(&book, id, owner_id).cloned()
    }

    async fn update_trip(
        &self,
        trip_id: Uuid,
        owner_id: Uuid,
        patch: TripPatch,
    ) -> Result<Trip, CoreError> {
        let mut book = self.book.write().unwrap_or_else(PoisonError::into_inner);
        self.service.update_trip(&mut book, trip_id, owner_id, patch)?;
        self.service.get_trip(&book, trip_id, owner_id).cloned()
    }

    async fn delete_trip(&self, trip_id: Uuid, owner_id: Uuid) -> Result<(), CoreError> {
        let mut book = self.book.write().unwrap_or_else(PoisonError::into_inner);
        self.service.delete_trip(&mut book, trip_id, owner_id)?;
        Ok(())
    }
}
