//! Best-first journey search.
//!
//! Explores journeys from a source stop toward a set of target stops near
//! the destination, allowing up to a bounded number of transfers. States are
//! expanded in lexicographic priority order: fewer transfers first, then
//! smaller distance to the destination. Expansion order is deterministic
//! given the feed, so identical queries return identical journeys.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::time::Instant;

use tracing::{debug, instrument, trace, warn};

use crate::domain::{Coord, Leg, ServiceTime, StopId};
use crate::geo::{haversine_km, GeoIndex};
use crate::schedule::TripIndex;

use super::config::SearchConfig;
use super::expand::connections;

/// A stop standing in for "arriving at the destination", tagged with its
/// distance to the geocoded destination coordinate.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetStop {
    pub stop_id: StopId,
    pub distance_km: f64,
}

/// How a search run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchFlag {
    /// The frontier was exhausted or a terminating candidate was found.
    Complete,
    /// The iteration safety cap was hit; the result is best-so-far.
    IterationCap,
    /// The wall-clock deadline passed; the result is best-so-far.
    TimedOut,
}

/// A journey candidate produced by the search.
///
/// `legs` is empty when the source stop itself is a target.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateJourney {
    pub legs: Vec<Leg>,
    pub transfers: usize,
    pub final_stop: StopId,
    /// Distance from the final stop to the destination, km.
    pub final_distance_km: f64,
}

/// Result of one search run.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    /// The best candidate found, if any.
    pub best: Option<CandidateJourney>,
    pub flag: SearchFlag,
    /// Number of states expanded.
    pub iterations: usize,
}

/// A frontier entry.
#[derive(Debug, Clone)]
struct SearchState {
    stop: StopId,
    /// Arrival time at `stop` (the query time for the initial state).
    time: ServiceTime,
    legs: Vec<Leg>,
    transfers: usize,
    /// Distance from `stop` to the destination, km (infinite when the stop
    /// has no coordinates).
    distance_km: f64,
}

/// Strict priority order: true when `a` expands after `b`.
fn expands_after(a: &SearchState, b: &SearchState) -> bool {
    match a.transfers.cmp(&b.transfers) {
        Ordering::Greater => true,
        Ordering::Less => false,
        Ordering::Equal => a.distance_km.total_cmp(&b.distance_km) == Ordering::Greater,
    }
}

/// The frontier: a list kept sorted worst-first, popped from the back.
///
/// A new state is inserted before all states of equal priority, so states of
/// equal priority expand in insertion order.
fn push_ordered(frontier: &mut Vec<SearchState>, state: SearchState) {
    let at = frontier.partition_point(|queued| expands_after(queued, &state));
    frontier.insert(at, state);
}

fn find_target<'t>(targets: &'t [TargetStop], stop: &StopId) -> Option<&'t TargetStop> {
    targets.iter().find(|t| &t.stop_id == stop)
}

fn is_better(candidate: &CandidateJourney, best: &Option<CandidateJourney>) -> bool {
    match best {
        None => true,
        Some(best) => {
            candidate.transfers < best.transfers
                || (candidate.transfers == best.transfers
                    && candidate.final_distance_km < best.final_distance_km)
        }
    }
}

/// Search for the best journey from `source` to any target stop.
///
/// Returns best-so-far with a non-`Complete` flag when the iteration cap or
/// the deadline cuts the search short. An absent `best` means no target is
/// reachable within the transfer bound.
#[allow(clippy::too_many_arguments)]
#[instrument(skip_all, fields(source = %source, earliest = %earliest))]
pub fn best_first_search(
    index: &TripIndex,
    geo: &GeoIndex,
    source: &StopId,
    targets: &[TargetStop],
    destination: Coord,
    earliest: ServiceTime,
    config: &SearchConfig,
    deadline: Instant,
) -> SearchOutcome {
    let mut best: Option<CandidateJourney> = None;
    let mut flag = SearchFlag::Complete;
    let mut iterations = 0usize;

    // Fewest transfers seen per stop; re-entry with fewer transfers
    // supersedes the earlier visit.
    let mut visited: BTreeMap<StopId, usize> = BTreeMap::new();

    let initial_distance = geo
        .coord(source)
        .map_or(f64::INFINITY, |c| haversine_km(c, destination));
    let mut frontier = vec![SearchState {
        stop: source.clone(),
        time: earliest,
        legs: Vec::new(),
        transfers: 0,
        distance_km: initial_distance,
    }];

    loop {
        if Instant::now() >= deadline {
            warn!(iterations, "Search deadline passed, returning best-so-far");
            flag = SearchFlag::TimedOut;
            break;
        }
        if iterations >= config.iteration_cap {
            warn!(
                cap = config.iteration_cap,
                "Search iteration cap hit, returning best-so-far"
            );
            flag = SearchFlag::IterationCap;
            break;
        }
        let Some(state) = frontier.pop() else {
            break;
        };
        iterations += 1;

        // A popped state on a target records a candidate and is not expanded
        // further. Only the initial state can land here: connections onto
        // targets are evaluated at expansion time below.
        if let Some(target) = find_target(targets, &state.stop) {
            let candidate = CandidateJourney {
                legs: state.legs,
                transfers: state.transfers,
                final_stop: state.stop,
                final_distance_km: target.distance_km,
            };
            let terminal =
                candidate.transfers == 0 || candidate.final_distance_km < config.good_enough_km;
            if is_better(&candidate, &best) {
                best = Some(candidate);
            }
            if terminal {
                debug!(iterations, "Terminal candidate popped");
                return SearchOutcome {
                    best,
                    flag: SearchFlag::Complete,
                    iterations,
                };
            }
            continue;
        }

        // A 0-transfer journey cannot be beaten; stop exploring others.
        if best.as_ref().is_some_and(|b| b.transfers == 0) {
            continue;
        }

        match visited.get(&state.stop) {
            Some(&seen) if state.transfers >= seen => {
                trace!(stop = %state.stop, "Pruned: visited with fewer transfers");
                continue;
            }
            _ => {
                visited.insert(state.stop.clone(), state.transfers);
            }
        }

        // From the second leg on, boarding requires the transfer buffer.
        let boardable_after = if state.legs.is_empty() {
            state.time
        } else {
            state.time.plus_minutes(config.transfer_buffer_mins)
        };

        for conn in connections(index, &state.stop, boardable_after) {
            let is_transfer = state
                .legs
                .last()
                .is_some_and(|last| last.trip_id != conn.trip_id || last.route_id != conn.route_id);
            let transfers = state.transfers + usize::from(is_transfer);
            if transfers > config.max_transfers {
                continue;
            }

            let leg = match Leg::new(
                conn.trip_id,
                conn.route_id,
                conn.headsign,
                state.stop.clone(),
                conn.stop_id.clone(),
                conn.from_seq,
                conn.to_seq,
                conn.departure,
                conn.arrival,
            ) {
                Ok(leg) => leg,
                Err(_) => continue, // Feed validation makes this unreachable.
            };
            let mut legs = state.legs.clone();
            legs.push(leg);

            if let Some(target) = find_target(targets, &conn.stop_id) {
                let candidate = CandidateJourney {
                    legs,
                    transfers,
                    final_stop: conn.stop_id,
                    final_distance_km: target.distance_km,
                };
                let terminal =
                    transfers == 0 || candidate.final_distance_km < config.good_enough_km;
                if is_better(&candidate, &best) {
                    best = Some(candidate);
                }
                if terminal {
                    debug!(iterations, transfers, "Terminal candidate reached");
                    return SearchOutcome {
                        best,
                        flag: SearchFlag::Complete,
                        iterations,
                    };
                }
            } else {
                let distance_km = geo
                    .coord(&conn.stop_id)
                    .map_or(f64::INFINITY, |c| haversine_km(c, destination));
                push_ordered(
                    &mut frontier,
                    SearchState {
                        stop: conn.stop_id,
                        time: conn.arrival,
                        legs,
                        transfers,
                        distance_km,
                    },
                );
            }
        }
    }

    debug!(
        iterations,
        found = best.is_some(),
        ?flag,
        "Search finished"
    );
    SearchOutcome {
        best,
        flag,
        iterations,
    }
}
