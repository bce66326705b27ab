//! The in-memory feed store.
//!
//! Holds the parsed GTFS tables as immutable collections, validated for
//! duplicate keys and referential integrity at construction. Ordered maps
//! keep every iteration deterministic, which the search layer depends on.

use std::collections::{BTreeMap, BTreeSet};

use crate::domain::{
    ExceptionType, Route, RouteId, Service, ServiceException, ServiceId, Stop, StopId, StopTime,
    Trip, TripId,
};

use super::error::FeedError;

/// Immutable, validated GTFS data.
///
/// Parsing the same feed twice yields equal stores.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedStore {
    stops: BTreeMap<StopId, Stop>,
    routes: BTreeMap<RouteId, Route>,
    services: BTreeMap<ServiceId, Service>,
    exceptions: BTreeMap<(ServiceId, u32), ExceptionType>,
    trips: BTreeMap<TripId, Trip>,
    /// Stop-times grouped by trip, each group sorted by `stop_sequence`.
    stop_times: BTreeMap<TripId, Vec<StopTime>>,
}

impl FeedStore {
    /// Assemble and validate a store from parsed entities.
    ///
    /// # Errors
    ///
    /// Returns `FeedError::Malformed` for empty or duplicate primary keys,
    /// duplicate `(trip, stop_sequence)` pairs, and references to unknown
    /// stops, routes, services or trips. Structural errors report line 0.
    pub fn new(
        stops: Vec<Stop>,
        routes: Vec<Route>,
        services: Vec<Service>,
        exceptions: Vec<ServiceException>,
        trips: Vec<Trip>,
        stop_times: Vec<StopTime>,
    ) -> Result<Self, FeedError> {
        let mut stop_map = BTreeMap::new();
        for stop in stops {
            if stop.id.is_empty() {
                return Err(FeedError::malformed("stops.txt", 0, "empty stop_id"));
            }
            let id = stop.id.clone();
            if stop_map.insert(id.clone(), stop).is_some() {
                return Err(FeedError::malformed(
                    "stops.txt",
                    0,
                    format!("duplicate stop_id {id:?}", id = id.as_str()),
                ));
            }
        }

        let mut route_map = BTreeMap::new();
        for route in routes {
            if route.id.is_empty() {
                return Err(FeedError::malformed("routes.txt", 0, "empty route_id"));
            }
            let id = route.id.clone();
            if route_map.insert(id.clone(), route).is_some() {
                return Err(FeedError::malformed(
                    "routes.txt",
                    0,
                    format!("duplicate route_id {id:?}", id = id.as_str()),
                ));
            }
        }

        let mut service_map = BTreeMap::new();
        for service in services {
            if service.id.is_empty() {
                return Err(FeedError::malformed("calendar.txt", 0, "empty service_id"));
            }
            let id = service.id.clone();
            if service_map.insert(id.clone(), service).is_some() {
                return Err(FeedError::malformed(
                    "calendar.txt",
                    0,
                    format!("duplicate service_id {id:?}", id = id.as_str()),
                ));
            }
        }

        let mut exception_map = BTreeMap::new();
        for exception in exceptions {
            if !service_map.contains_key(&exception.service_id) {
                return Err(FeedError::malformed(
                    "calendar_dates.txt",
                    0,
                    format!(
                        "exception references unknown service_id {:?}",
                        exception.service_id.as_str()
                    ),
                ));
            }
            let key = (exception.service_id.clone(), exception.date);
            if exception_map
                .insert(key, exception.exception_type)
                .is_some()
            {
                return Err(FeedError::malformed(
                    "calendar_dates.txt",
                    0,
                    format!(
                        "duplicate exception for service_id {:?} date {}",
                        exception.service_id.as_str(),
                        exception.date
                    ),
                ));
            }
        }

        let mut trip_map = BTreeMap::new();
        for trip in trips {
            if trip.id.is_empty() {
                return Err(FeedError::malformed("trips.txt", 0, "empty trip_id"));
            }
            if !route_map.contains_key(&trip.route_id) {
                return Err(FeedError::malformed(
                    "trips.txt",
                    0,
                    format!(
                        "trip {:?} references unknown route_id {:?}",
                        trip.id.as_str(),
                        trip.route_id.as_str()
                    ),
                ));
            }
            if !service_map.contains_key(&trip.service_id) {
                return Err(FeedError::malformed(
                    "trips.txt",
                    0,
                    format!(
                        "trip {:?} references unknown service_id {:?}",
                        trip.id.as_str(),
                        trip.service_id.as_str()
                    ),
                ));
            }
            let id = trip.id.clone();
            if trip_map.insert(id.clone(), trip).is_some() {
                return Err(FeedError::malformed(
                    "trips.txt",
                    0,
                    format!("duplicate trip_id {id:?}", id = id.as_str()),
                ));
            }
        }

        let mut grouped: BTreeMap<TripId, Vec<StopTime>> = BTreeMap::new();
        let mut seen_sequences: BTreeSet<(TripId, u32)> = BTreeSet::new();
        for stop_time in stop_times {
            if !trip_map.contains_key(&stop_time.trip_id) {
                return Err(FeedError::malformed(
                    "stop_times.txt",
                    0,
                    format!(
                        "stop-time references unknown trip_id {:?}",
                        stop_time.trip_id.as_str()
                    ),
                ));
            }
            if !stop_map.contains_key(&stop_time.stop_id) {
                return Err(FeedError::malformed(
                    "stop_times.txt",
                    0,
                    format!(
                        "stop-time references unknown stop_id {:?}",
                        stop_time.stop_id.as_str()
                    ),
                ));
            }
            if !seen_sequences.insert((stop_time.trip_id.clone(), stop_time.stop_sequence)) {
                return Err(FeedError::malformed(
                    "stop_times.txt",
                    0,
                    format!(
                        "duplicate stop_sequence {} on trip {:?}",
                        stop_time.stop_sequence,
                        stop_time.trip_id.as_str()
                    ),
                ));
            }
            grouped
                .entry(stop_time.trip_id.clone())
                .or_default()
                .push(stop_time);
        }
        for times in grouped.values_mut() {
            times.sort_by_key(|st| st.stop_sequence);
        }

        Ok(Self {
            stops: stop_map,
            routes: route_map,
            services: service_map,
            exceptions: exception_map,
            trips: trip_map,
            stop_times: grouped,
        })
    }

    /// All stops, ordered by id.
    pub fn stops(&self) -> impl Iterator<Item = &Stop> {
        self.stops.values()
    }

    /// Look up a stop.
    pub fn stop(&self, id: &StopId) -> Option<&Stop> {
        self.stops.get(id)
    }

    /// Look up a route.
    pub fn route(&self, id: &RouteId) -> Option<&Route> {
        self.routes.get(id)
    }

    /// Look up a service calendar entry.
    pub fn service(&self, id: &ServiceId) -> Option<&Service> {
        self.services.get(id)
    }

    /// The exception recorded for a service on a `YYYYMMDD` date, if any.
    pub fn exception_on(&self, service_id: &ServiceId, date: u32) -> Option<ExceptionType> {
        self.exceptions
            .get(&(service_id.clone(), date))
            .copied()
    }

    /// All trips, ordered by id.
    pub fn trips(&self) -> impl Iterator<Item = &Trip> {
        self.trips.values()
    }

    /// Look up a trip.
    pub fn trip(&self, id: &TripId) -> Option<&Trip> {
        self.trips.get(id)
    }

    /// The ordered stop-times of a trip.
    pub fn stop_times_for(&self, trip_id: &TripId) -> Option<&[StopTime]> {
        self.stop_times.get(trip_id).map(Vec::as_slice)
    }

    /// Number of stops in the feed.
    pub fn stop_count(&self) -> usize {
        self.stops.len()
    }

    /// Number of trips in the feed.
    pub fn trip_count(&self) -> usize {
        self.trips.len()
    }
}
