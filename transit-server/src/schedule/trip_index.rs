//! The trip index.
//!
//! For one valid-trip set, holds each trip's stop-times in sequence order
//! plus a reverse index from stops to the trips that call there. Both maps
//! are immutable after construction and shared read-only across a query.

use std::collections::BTreeMap;

use crate::domain::{StopId, StopTime, TripId};
use crate::feed::FeedStore;

use super::service_day::{TripMeta, ValidTrips};

/// Trip-ordered stop-time data for one service day.
#[derive(Debug, Clone, PartialEq)]
pub struct TripIndex {
    /// Stop-times per valid trip, sorted by `stop_sequence`.
    by_trip: BTreeMap<TripId, Vec<StopTime>>,
    /// For each stop, the valid trips calling there with the position of the
    /// call inside the trip's stop-time list.
    by_stop: BTreeMap<StopId, Vec<(TripId, usize)>>,
    /// `(route_id, headsign)` per valid trip.
    meta: BTreeMap<TripId, TripMeta>,
}

impl TripIndex {
    /// Build the index for a valid-trip set.
    pub fn build(store: &FeedStore, valid: &ValidTrips) -> Self {
        let mut by_trip = BTreeMap::new();
        let mut by_stop: BTreeMap<StopId, Vec<(TripId, usize)>> = BTreeMap::new();
        let mut meta = BTreeMap::new();

        for (trip_id, trip_meta) in valid.iter() {
            let Some(times) = store.stop_times_for(trip_id) else {
                continue; // Trip with no stop-times: nothing to index.
            };

            for (position, stop_time) in times.iter().enumerate() {
                by_stop
                    .entry(stop_time.stop_id.clone())
                    .or_default()
                    .push((trip_id.clone(), position));
            }
            by_trip.insert(trip_id.clone(), times.to_vec());
            meta.insert(trip_id.clone(), trip_meta.clone());
        }

        Self {
            by_trip,
            by_stop,
            meta,
        }
    }

    /// The ordered stop-times of a valid trip.
    pub fn stop_times(&self, trip_id: &TripId) -> Option<&[StopTime]> {
        self.by_trip.get(trip_id).map(Vec::as_slice)
    }

    /// The valid trips calling at a stop, as `(trip, position)` pairs in
    /// trip-id order.
    pub fn trips_through(&self, stop_id: &StopId) -> &[(TripId, usize)] {
        self.by_stop.get(stop_id).map_or(&[], Vec::as_slice)
    }

    /// The `(route_id, headsign)` lookup for a valid trip.
    pub fn meta(&self, trip_id: &TripId) -> Option<&TripMeta> {
        self.meta.get(trip_id)
    }

    /// Number of indexed trips.
    pub fn trip_count(&self) -> usize {
        self.by_trip.len()
    }

    /// True when no trip is indexed (no service that day).
    pub fn is_empty(&self) -> bool {
        self.by_trip.is_empty()
    }
}
