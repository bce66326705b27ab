//! The walk-fallback orchestrator.
//!
//! Runs the best-first search from the source stop and, when that yields no
//! transfer-free journey, retries from every stop within a short walking
//! radius of the source. Candidates are scored by total minutes plus a
//! per-transfer penalty; the smallest score wins.

use std::time::Instant;

use tracing::{debug, info, instrument, warn};

use crate::domain::{Coord, Journey, ServiceTime, StopId, Walk};
use crate::geo::GeoIndex;
use crate::schedule::TripIndex;

use super::config::SearchConfig;
use super::search::{best_first_search, CandidateJourney, SearchFlag, TargetStop};

/// Why a query produced no journey.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoJourneyReason {
    /// The service-day filter yielded no valid trips.
    NoServiceOnDate,
    /// The search completed but found no path within the transfer bound and
    /// the walking radius.
    NoPath,
    /// The wall-clock budget expired before anything was found.
    Timeout,
    /// The search iteration cap cut exploration short with nothing found.
    IterationCap,
}

/// A successfully planned journey with its scoring breakdown.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedJourney {
    pub journey: Journey,
    pub transfers: usize,
    /// The target stop the journey ends at (the source itself for an empty
    /// journey).
    pub final_stop: StopId,
    /// Distance from the final stop to the destination, km.
    pub final_distance_km: f64,
    /// Walk minutes plus transit span minutes.
    pub total_minutes: i64,
    /// `total_minutes + transfer_penalty * transfers`.
    pub score: i64,
    /// True when a cap or deadline cut the underlying search short, so a
    /// better journey may exist.
    pub partial: bool,
}

/// Outcome of one planning query.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanResult {
    Found(PlannedJourney),
    NoJourney(NoJourneyReason),
}

impl PlanResult {
    /// The planned journey, if one was found.
    pub fn journey(&self) -> Option<&PlannedJourney> {
        match self {
            Self::Found(planned) => Some(planned),
            Self::NoJourney(_) => None,
        }
    }
}

/// One fan-out candidate: its selection key and the journey it produced.
struct Candidate {
    score: i64,
    /// `None` for the source run; the walk target for fallback runs. Orders
    /// the source run ahead of walk runs on score ties.
    walk_target: Option<StopId>,
    planned: PlannedJourney,
}

/// The journey planner: search plus walk fallback over shared indices.
pub struct Planner<'a> {
    index: &'a TripIndex,
    geo: &'a GeoIndex,
    config: &'a SearchConfig,
}

impl<'a> Planner<'a> {
    /// Create a planner over a trip index built for the query's service day.
    pub fn new(index: &'a TripIndex, geo: &'a GeoIndex, config: &'a SearchConfig) -> Self {
        Self { index, geo, config }
    }

    /// Plan the best journey from `source` toward `destination`, departing
    /// no earlier than `earliest`.
    #[instrument(skip_all, fields(source = %source, earliest = %earliest))]
    pub fn plan(&self, source: &StopId, destination: Coord, earliest: ServiceTime) -> PlanResult {
        if self.index.is_empty() {
            info!("No valid trips on the query date");
            return PlanResult::NoJourney(NoJourneyReason::NoServiceOnDate);
        }

        let targets = self.resolve_targets(destination);
        if targets.is_empty() {
            info!("No stops near the destination");
            return PlanResult::NoJourney(NoJourneyReason::NoPath);
        }

        let deadline = Instant::now() + self.config.budget();
        let mut saw_timeout = false;
        let mut saw_cap = false;
        let mut candidates: Vec<Candidate> = Vec::new();

        // Run from the source itself first.
        let outcome = best_first_search(
            self.index,
            self.geo,
            source,
            &targets,
            destination,
            earliest,
            self.config,
            deadline,
        );
        saw_timeout |= outcome.flag == SearchFlag::TimedOut;
        saw_cap |= outcome.flag == SearchFlag::IterationCap;
        let partial = outcome.flag != SearchFlag::Complete;
        if let Some(candidate) = outcome.best {
            // A transfer-free journey from the source cannot be beaten by
            // any fallback variant.
            if candidate.transfers == 0 {
                debug!("Source yields a transfer-free journey");
                if let Some(found) = self.to_candidate(None, candidate, partial) {
                    return PlanResult::Found(found.planned);
                }
            } else if let Some(found) = self.to_candidate(None, candidate, partial) {
                candidates.push(found);
            }
        }

        // Retry from each walkable stop, nearest first.
        if let Some(source_coord) = self.geo.coord(source) {
            let mut walkables =
                self.geo
                    .within(source_coord, self.config.walk_radius_km, Some(source));
            walkables.truncate(self.config.walk_candidates);
            debug!(walkables = walkables.len(), "Walk fan-out");

            for nearby in walkables {
                if Instant::now() >= deadline {
                    warn!("Query budget spent during walk fan-out");
                    saw_timeout = true;
                    break;
                }

                let walk = Walk::new(
                    source.clone(),
                    nearby.stop_id.clone(),
                    nearby.distance_km * 1000.0,
                );
                let walk_earliest = earliest.plus_minutes(walk.duration_mins as u32);

                let outcome = best_first_search(
                    self.index,
                    self.geo,
                    &nearby.stop_id,
                    &targets,
                    destination,
                    walk_earliest,
                    self.config,
                    deadline,
                );
                saw_timeout |= outcome.flag == SearchFlag::TimedOut;
                saw_cap |= outcome.flag == SearchFlag::IterationCap;
                let partial = outcome.flag != SearchFlag::Complete;
                if let Some(candidate) = outcome.best {
                    if let Some(found) =
                        self.to_candidate(Some(walk), candidate, partial)
                    {
                        candidates.push(found);
                    }
                }
            }
        }

        let best = candidates.into_iter().min_by(|a, b| {
            a.score
                .cmp(&b.score)
                .then_with(|| a.walk_target.cmp(&b.walk_target))
        });

        match best {
            Some(candidate) => {
                info!(
                    score = candidate.score,
                    transfers = candidate.planned.transfers,
                    walked = candidate.walk_target.is_some(),
                    "Journey planned"
                );
                PlanResult::Found(candidate.planned)
            }
            None => {
                let reason = if saw_timeout {
                    NoJourneyReason::Timeout
                } else if saw_cap {
                    NoJourneyReason::IterationCap
                } else {
                    NoJourneyReason::NoPath
                };
                info!(?reason, "No journey");
                PlanResult::NoJourney(reason)
            }
        }
    }

    /// The target stop set: the nearest stops to the destination, restricted
    /// to those genuinely near it.
    fn resolve_targets(&self, destination: Coord) -> Vec<TargetStop> {
        self.geo
            .nearest(destination, self.config.target_count)
            .into_iter()
            .filter(|nearby| nearby.distance_km <= self.config.target_radius_km)
            .map(|nearby| TargetStop {
                stop_id: nearby.stop_id,
                distance_km: nearby.distance_km,
            })
            .collect()
    }

    /// Assemble a scored candidate from a search result.
    fn to_candidate(
        &self,
        walk: Option<Walk>,
        candidate: CandidateJourney,
        partial: bool,
    ) -> Option<Candidate> {
        let walk_target = walk.as_ref().map(|w| w.to_stop.clone());
        let journey = match Journey::new(walk, candidate.legs) {
            Ok(journey) => journey,
            Err(e) => {
                // The search only emits buffer-respecting, connected legs.
                warn!(error = %e, "Discarding inconsistent candidate");
                return None;
            }
        };

        let total_minutes = journey.total_minutes();
        let score = total_minutes + self.config.transfer_penalty_mins * candidate.transfers as i64;
        Some(Candidate {
            score,
            walk_target,
            planned: PlannedJourney {
                journey,
                transfers: candidate.transfers,
                final_stop: candidate.final_stop,
                final_distance_km: candidate.final_distance_km,
                total_minutes,
                score,
                partial,
            },
        })
    }
}
