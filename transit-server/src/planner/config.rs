//! Search configuration for the journey planner.

use std::time::Duration;

use crate::domain::TRANSFER_BUFFER_MINS;

/// Configuration parameters for journey search.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Maximum number of transfers allowed (0-2 in default operation).
    pub max_transfers: usize,

    /// Minimum wait when changing trips, in minutes.
    pub transfer_buffer_mins: u32,

    /// Safety cap on frontier expansions per search.
    pub iteration_cap: usize,

    /// A target closer than this to the destination ends the search
    /// immediately, in kilometres.
    pub good_enough_km: f64,

    /// How many stops near the destination form the target set.
    pub target_count: usize,

    /// Targets farther than this from the destination are dropped, in
    /// kilometres. Keeps a distant source from counting as "arrived" in
    /// sparse networks.
    pub target_radius_km: f64,

    /// Walk-fallback search radius around the source, in kilometres.
    pub walk_radius_km: f64,

    /// Maximum number of walkable stops tried by the fallback.
    pub walk_candidates: usize,

    /// Scoring penalty per transfer, in minutes.
    pub transfer_penalty_mins: i64,

    /// Wall-clock budget for one query, in seconds.
    pub budget_secs: u64,
}

impl SearchConfig {
    /// The per-query wall-clock budget as a `Duration`.
    pub fn budget(&self) -> Duration {
        Duration::from_secs(self.budget_secs)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_transfers: 2,
            transfer_buffer_mins: TRANSFER_BUFFER_MINS,
            iteration_cap: 20_000,
            good_enough_km: 0.35,
            target_count: 20,
            target_radius_km: 1.0,
            walk_radius_km: 0.5,
            walk_candidates: 20,
            transfer_penalty_mins: 30,
            budget_secs: 120,
        }
    }
}
