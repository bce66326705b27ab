//! Domain error types.
//!
//! These errors represent validation failures in the domain layer: they are
//! raised when an entity or journey would violate its invariants at
//! construction time. They are distinct from feed ingestion and network
//! errors.

use super::{StopId, TripId};

/// Domain-level validation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DomainError {
    /// A stop-time violates its internal ordering
    #[error("invalid stop time: {0}")]
    InvalidStopTime(&'static str),

    /// A leg violates its internal ordering
    #[error("invalid leg: {0}")]
    InvalidLeg(&'static str),

    /// Consecutive legs do not share a stop
    #[error("legs are not connected: arrival at {0} followed by boarding at {1}")]
    LegsNotConnected(StopId, StopId),

    /// Consecutive legs stay on the same trip
    #[error("consecutive legs share trip {0}")]
    SameTripLegs(TripId),

    /// A transfer is tighter than the required buffer
    #[error("transfer at {0} is shorter than the transfer buffer")]
    TransferTooTight(StopId),

    /// The leading walk does not end at the first boarding stop
    #[error("walk ends at {walk_end} but the first leg boards at {boarding}")]
    WalkDisconnected { walk_end: StopId, boarding: StopId },
}
