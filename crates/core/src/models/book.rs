use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::trip::Trip;

/// The main data container. Everything in here gets serialized, encrypted,
/// and saved to the portable book file.
///
/// Trips from any number of owners can share one book; every read path
/// filters by `owner_id`, and a trip is invisible to anyone but its owner.
/// Insertion order is creation order and is preserved.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TripBook {
    /// All trips, in creation order
    pub trips: Vec<Trip>,
}

impl TripBook {
    /// All trips belonging to `owner_id`, in creation order.
    #[must_use]
    pub fn trips_for(&self, owner_id: Uuid) -> Vec<&Trip> {
        self.trips.iter().filter(|t| t.owner_id == owner_id).collect()
    }

    /// Find a trip by id, scoped to its owner. A trip that exists but
    /// belongs to someone else is as good as absent.
    #[must_use]
    pub fn find(&self, trip_id: Uuid, owner_id: Uuid) -> Option<&Trip> {
        self.trips
            .iter()
            .find(|t| t.id == trip_id && t.owner_id == owner_id)
    }

    pub(crate) fn find_mut(&mut self, trip_id: Uuid, owner_id: Uuid) -> Option<&mut Trip> {
        self.trips
            .iter_mut()
            .find(|t| t.id == trip_id && t.owner_id == owner_id)
    }

    /// Total number of trips across all owners.
    #[must_use]
    pub fn trip_count(&self) -> usize {
        self.trips.len()
    }
}
