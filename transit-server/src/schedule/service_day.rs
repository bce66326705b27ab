//! The service-day filter.
//!
//! Maps a query date (and optional route-type filter) to the set of trips
//! that actually run. An empty result is valid; the planner surfaces it as
//! "no service on date".

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::debug;

use crate::domain::{date_to_yyyymmdd, ExceptionType, RouteId, RouteType, ServiceId, TripId};
use crate::feed::FeedStore;

/// Per-trip lookup data carried alongside the valid-trip set.
#[derive(Debug, Clone, PartialEq)]
pub struct TripMeta {
    pub route_id: RouteId,
    pub headsign: String,
}

/// The trips that run on one service day under one route-type filter.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValidTrips {
    trips: BTreeMap<TripId, TripMeta>,
}

impl ValidTrips {
    /// True when no trip runs.
    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }

    /// Number of valid trips.
    pub fn len(&self) -> usize {
        self.trips.len()
    }

    /// Whether a trip is valid.
    pub fn contains(&self, trip_id: &TripId) -> bool {
        self.trips.contains_key(trip_id)
    }

    /// The `(route_id, headsign)` lookup for a valid trip.
    pub fn meta(&self, trip_id: &TripId) -> Option<&TripMeta> {
        self.trips.get(trip_id)
    }

    /// Iterate valid trips in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&TripId, &TripMeta)> {
        self.trips.iter()
    }
}

/// Whether a service runs on `date`, combining the weekly calendar with any
/// `calendar_dates` exception for that date.
pub fn service_active(store: &FeedStore, service_id: &ServiceId, date: NaiveDate) -> bool {
    match store.exception_on(service_id, date_to_yyyymmdd(date)) {
        Some(ExceptionType::Added) => true,
        Some(ExceptionType::Removed) => false,
        None => store
            .service(service_id)
            .is_some_and(|svc| svc.active_on(date)),
    }
}

/// Compute the valid trips for a date and optional route-type filter.
///
/// Linear in the number of trips. Never fails: an empty set is a valid
/// answer.
pub fn valid_trips(
    store: &FeedStore,
    date: NaiveDate,
    route_type: Option<RouteType>,
) -> ValidTrips {
    let mut trips = BTreeMap::new();

    for trip in store.trips() {
        if let Some(wanted) = route_type {
            let matches = store
                .route(&trip.route_id)
                .is_some_and(|r| r.route_type == wanted);
            if !matches {
                continue;
            }
        }
        if !service_active(store, &trip.service_id, date) {
            continue;
        }
        trips.insert(
            trip.id.clone(),
            TripMeta {
                route_id: trip.route_id.clone(),
                headsign: trip.headsign.clone(),
            },
        );
    }

    debug!(
        date = %date,
        route_type = ?route_type,
        valid = trips.len(),
        "Service-day filter"
    );

    ValidTrips { trips }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        Coord, Route, Service, ServiceException, ServiceTime, Stop, StopId, StopTime, Trip,
    };

    fn time(s: &str) -> ServiceTime {
        ServiceTime::parse(s).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Two routes (bus R1, metro R2), one weekday-only service, one trip each.
    fn store(exceptions: Vec<ServiceException>) -> FeedStore {
        FeedStore::new(
            vec![
                Stop::new(StopId::new("S1"), "First", Some(Coord::new(0.0, 0.0))),
                Stop::new(StopId::new("S2"), "Second", Some(Coord::new(0.0, 0.01))),
            ],
            vec![
                Route::new(RouteId::new("R1"), RouteType::Bus, "1", ""),
                Route::new(RouteId::new("R2"), RouteType::Metro, "M", ""),
            ],
            vec![Service::new(
                ServiceId::new("WD"),
                [true, true, true, true, true, false, false],
                20240101,
                20241231,
            )],
            exceptions,
            vec![
                Trip::new(TripId::new("T1"), RouteId::new("R1"), ServiceId::new("WD"), "A"),
                Trip::new(TripId::new("T2"), RouteId::new("R2"), ServiceId::new("WD"), "B"),
            ],
            vec![
                StopTime::new(TripId::new("T1"), StopId::new("S1"), 1, time("08:00:00"), time("08:00:00")).unwrap(),
                StopTime::new(TripId::new("T1"), StopId::new("S2"), 2, time("08:10:00"), time("08:10:00")).unwrap(),
                StopTime::new(TripId::new("T2"), StopId::new("S1"), 1, time("09:00:00"), time("09:00:00")).unwrap(),
                StopTime::new(TripId::new("T2"), StopId::new("S2"), 2, time("09:10:00"), time("09:10:00")).unwrap(),
            ],
        )
        .unwrap()
    }

    #[test]
    fn weekday_has_both_trips() {
        // 2024-03-04 is a Monday.
        let valid = valid_trips(&store(vec![]), date(2024, 3, 4), None);
        assert_eq!(valid.len(), 2);
        assert!(valid.contains(&TripId::new("T1")));
        assert!(valid.contains(&TripId::new("T2")));
    }

    #[test]
    fn weekend_has_none() {
        // 2024-03-09 is a Saturday.
        let valid = valid_trips(&store(vec![]), date(2024, 3, 9), None);
        assert!(valid.is_empty());
    }

    #[test]
    fn route_type_filter_restricts() {
        let valid = valid_trips(&store(vec![]), date(2024, 3, 4), Some(RouteType::Bus));
        assert_eq!(valid.len(), 1);
        assert!(valid.contains(&TripId::new("T1")));
        assert!(!valid.contains(&TripId::new("T2")));

        let valid = valid_trips(&store(vec![]), date(2024, 3, 4), Some(RouteType::Ferry));
        assert!(valid.is_empty());
    }

    #[test]
    fn meta_lookup() {
        let valid = valid_trips(&store(vec![]), date(2024, 3, 4), None);
        let meta = valid.meta(&TripId::new("T1")).unwrap();
        assert_eq!(meta.route_id.as_str(), "R1");
        assert_eq!(meta.headsign, "A");
    }

    #[test]
    fn removed_exception_disables_a_weekday() {
        let exceptions = vec![ServiceException {
            service_id: ServiceId::new("WD"),
            date: 20240304,
            exception_type: ExceptionType::Removed,
        }];
        let store = store(exceptions);

        assert!(valid_trips(&store, date(2024, 3, 4), None).is_empty());
        // The following Monday is unaffected.
        assert_eq!(valid_trips(&store, date(2024, 3, 11), None).len(), 2);
    }

    #[test]
    fn added_exception_enables_a_weekend_day() {
        let exceptions = vec![ServiceException {
            service_id: ServiceId::new("WD"),
            date: 20240309,
            exception_type: ExceptionType::Added,
        }];
        let store = store(exceptions);

        // Saturday, normally inactive.
        assert_eq!(valid_trips(&store, date(2024, 3, 9), None).len(), 2);
        // Other Saturdays stay inactive.
        assert!(valid_trips(&store, date(2024, 3, 16), None).is_empty());
    }
}
