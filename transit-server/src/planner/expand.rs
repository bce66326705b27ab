//! The connection expander.
//!
//! Given a stop and an earliest boarding time, yields every stop reachable
//! on a valid trip without transferring: for each trip departing the stop
//! strictly after the given time, one connection per later stop on that
//! trip. No deduplication across trips; the search's visited set handles
//! revisits.

use crate::domain::{RouteId, ServiceTime, StopId, TripId};
use crate::schedule::TripIndex;

/// One boardable ride from a stop to a later stop on the same trip.
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    /// The reached stop.
    pub stop_id: StopId,
    /// Arrival at the reached stop.
    pub arrival: ServiceTime,
    /// Departure from the origin stop.
    pub departure: ServiceTime,
    pub trip_id: TripId,
    pub route_id: RouteId,
    pub headsign: String,
    /// `stop_sequence` of the boarding stop-time.
    pub from_seq: u32,
    /// `stop_sequence` of the reached stop-time.
    pub to_seq: u32,
}

/// All onward connections from `stop` boardable strictly after `after`.
///
/// Trips are visited in id order and their stops in sequence order, so the
/// output is deterministic. Never fails; an empty list means nothing is
/// boardable.
pub fn connections(index: &TripIndex, stop: &StopId, after: ServiceTime) -> Vec<Connection> {
    let mut out = Vec::new();

    for (trip_id, position) in index.trips_through(stop) {
        let Some(times) = index.stop_times(trip_id) else {
            continue;
        };
        let boarding = &times[*position];
        if boarding.departure <= after {
            continue;
        }
        let Some(meta) = index.meta(trip_id) else {
            continue;
        };

        for later in &times[position + 1..] {
            out.push(Connection {
                stop_id: later.stop_id.clone(),
                arrival: later.arrival,
                departure: boarding.departure,
                trip_id: trip_id.clone(),
                route_id: meta.route_id.clone(),
                headsign: meta.headsign.clone(),
                from_seq: boarding.stop_sequence,
                to_seq: later.stop_sequence,
            });
        }
    }

    out
}
