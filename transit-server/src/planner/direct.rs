//! The direct-trip finder.
//!
//! Finds the best single-trip connection from a source stop to any stop of a
//! target set: no transfers, no walking. Used where only a same-trip answer
//! is wanted; the best-first search subsumes it for full queries.

use tracing::debug;

use crate::domain::{Leg, ServiceTime, StopId};
use crate::schedule::TripIndex;

use super::search::TargetStop;

/// The best direct leg from `source` to any target, or `None`.
///
/// A leg is eligible when its trip departs `source` strictly after
/// `earliest` and calls at a target with a greater `stop_sequence`. Among
/// eligible legs the selection is lexicographic: smallest target distance to
/// the destination first, then earliest departure. Never fails.
pub fn best_direct(
    index: &TripIndex,
    source: &StopId,
    targets: &[TargetStop],
    earliest: ServiceTime,
) -> Option<Leg> {
    let mut best: Option<(f64, ServiceTime, Leg)> = None;

    for (trip_id, position) in index.trips_through(source) {
        let Some(times) = index.stop_times(trip_id) else {
            continue;
        };
        let boarding = &times[*position];
        if boarding.departure <= earliest {
            continue;
        }
        let Some(meta) = index.meta(trip_id) else {
            continue;
        };

        for later in &times[position + 1..] {
            let Some(target) = targets.iter().find(|t| t.stop_id == later.stop_id) else {
                continue;
            };

            let leg = match Leg::new(
                trip_id.clone(),
                meta.route_id.clone(),
                meta.headsign.clone(),
                source.clone(),
                later.stop_id.clone(),
                boarding.stop_sequence,
                later.stop_sequence,
                boarding.departure,
                later.arrival,
            ) {
                Ok(leg) => leg,
                Err(_) => continue, // Feed validation makes this unreachable.
            };

            let better = match &best {
                None => true,
                Some((dist, dep, _)) => {
                    target.distance_km < *dist
                        || (target.distance_km == *dist && boarding.departure < *dep)
                }
            };
            if better {
                best = Some((target.distance_km, boarding.departure, leg));
            }
        }
    }

    let found = best.map(|(_, _, leg)| leg);
    debug!(
        source = %source,
        found = found.is_some(),
        "Direct-trip finder"
    );
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        Coord, Route, RouteId, RouteType, Service, ServiceId, Stop, StopTime, Trip, TripId,
    };
    use crate::feed::FeedStore;
    use crate::schedule::{valid_trips, TripIndex};
    use chrono::NaiveDate;

    fn time(s: &str) -> ServiceTime {
        ServiceTime::parse(s).unwrap()
    }

    fn target(id: &str, distance_km: f64) -> TargetStop {
        TargetStop {
            stop_id: StopId::new(id),
            distance_km,
        }
    }

    /// T1: S1 08:00 -> S2 08:10 -> S3 08:20.
    /// T2: S1 08:30 -> S3 08:45 (later but same stops).
    fn index() -> TripIndex {
        let store = FeedStore::new(
            vec![
                Stop::new(StopId::new("S1"), "First", Some(Coord::new(0.0, 0.0))),
                Stop::new(StopId::new("S2"), "Second", Some(Coord::new(0.0, 0.01))),
                Stop::new(StopId::new("S3"), "Third", Some(Coord::new(0.0, 0.02))),
            ],
            vec![Route::new(RouteId::new("R"), RouteType::Bus, "1", "")],
            vec![Service::new(ServiceId::new("C"), [true; 7], 20240101, 20241231)],
            vec![],
            vec![
                Trip::new(TripId::new("T1"), RouteId::new("R"), ServiceId::new("C"), "Third"),
                Trip::new(TripId::new("T2"), RouteId::new("R"), ServiceId::new("C"), "Third"),
            ],
            vec![
                StopTime::new(TripId::new("T1"), StopId::new("S1"), 1, time("08:00:00"), time("08:00:00")).unwrap(),
                StopTime::new(TripId::new("T1"), StopId::new("S2"), 2, time("08:10:00"), time("08:10:00")).unwrap(),
                StopTime::new(TripId::new("T1"), StopId::new("S3"), 3, time("08:20:00"), time("08:20:00")).unwrap(),
                StopTime::new(TripId::new("T2"), StopId::new("S1"), 1, time("08:30:00"), time("08:30:00")).unwrap(),
                StopTime::new(TripId::new("T2"), StopId::new("S3"), 2, time("08:45:00"), time("08:45:00")).unwrap(),
            ],
        )
        .unwrap();
        let valid = valid_trips(&store, NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(), None);
        TripIndex::build(&store, &valid)
    }

    #[test]
    fn finds_earliest_leg_to_closest_target() {
        let targets = vec![target("S3", 0.11)];
        let leg = best_direct(&index(), &StopId::new("S1"), &targets, time("07:30:00")).unwrap();

        assert_eq!(leg.trip_id.as_str(), "T1");
        assert_eq!(leg.to_stop.as_str(), "S3");
        assert_eq!(leg.departure, time("08:00:00"));
        assert_eq!(leg.arrival, time("08:20:00"));
    }

    #[test]
    fn closer_target_beats_earlier_departure() {
        // S2 is reachable at 08:10, S3 only at 08:20, but S3 is closer to
        // the destination, so the S3 leg wins.
        let targets = vec![target("S2", 1.22), target("S3", 0.11)];
        let leg = best_direct(&index(), &StopId::new("S1"), &targets, time("07:30:00")).unwrap();

        assert_eq!(leg.to_stop.as_str(), "S3");
    }

    #[test]
    fn equal_distance_takes_earlier_departure() {
        let targets = vec![target("S3", 0.11)];
        // Both T1 (08:00) and T2 (08:30) reach S3; T1 departs first.
        let leg = best_direct(&index(), &StopId::new("S1"), &targets, time("07:30:00")).unwrap();
        assert_eq!(leg.trip_id.as_str(), "T1");
    }

    #[test]
    fn departure_must_be_strictly_after() {
        let targets = vec![target("S3", 0.11)];

        // 08:00 exactly: T1 is gone, T2 (08:30) remains.
        let leg = best_direct(&index(), &StopId::new("S1"), &targets, time("08:00:00")).unwrap();
        assert_eq!(leg.trip_id.as_str(), "T2");

        // After both departures: nothing.
        assert!(best_direct(&index(), &StopId::new("S1"), &targets, time("08:30:00")).is_none());
    }

    #[test]
    fn target_must_follow_source_in_sequence() {
        // From S3 nothing goes back to S1.
        let targets = vec![target("S1", 0.05)];
        assert!(best_direct(&index(), &StopId::new("S3"), &targets, time("07:00:00")).is_none());
    }

    #[test]
    fn no_targets_means_none() {
        assert!(best_direct(&index(), &StopId::new("S1"), &[], time("07:00:00")).is_none());
    }
}
