//! Stop-time type.

use super::{DomainError, ServiceTime, StopId, TripId};

/// One scheduled call of a trip at a stop, from `stop_times.txt`.
///
/// # Invariants
///
/// - `departure >= arrival` (a vehicle cannot leave before it arrives)
///
/// Strict `stop_sequence` ordering within a trip is a property of the whole
/// trip, enforced by the feed store.
#[derive(Debug, Clone, PartialEq)]
pub struct StopTime {
    pub trip_id: TripId,
    pub stop_id: StopId,
    /// Position within the trip; increasing but not necessarily contiguous.
    pub stop_sequence: u32,
    pub arrival: ServiceTime,
    pub departure: ServiceTime,
}

impl StopTime {
    /// Create a stop-time, validating the arrival/departure ordering.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `departure < arrival`.
    pub fn new(
        trip_id: TripId,
        stop_id: StopId,
        stop_sequence: u32,
        arrival: ServiceTime,
        departure: ServiceTime,
    ) -> Result<Self, DomainError> {
        if departure < arrival {
            return Err(DomainError::InvalidStopTime(
                "departure is before arrival",
            ));
        }
        Ok(Self {
            trip_id,
            stop_id,
            stop_sequence,
            arrival,
            departure,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn time(s: &str) -> ServiceTime {
        ServiceTime::parse(s).unwrap()
    }

    #[test]
    fn valid_stop_time() {
        let st = StopTime::new(
            TripId::new("T1"),
            StopId::new("S1"),
            1,
            time("08:10:00"),
            time("08:10:30"),
        )
        .unwrap();
        assert_eq!(st.stop_sequence, 1);
    }

    #[test]
    fn equal_arrival_and_departure_is_valid() {
        assert!(StopTime::new(
            TripId::new("T1"),
            StopId::new("S1"),
            1,
            time("08:10:00"),
            time("08:10:00"),
        )
        .is_ok());
    }

    #[test]
    fn departure_before_arrival_rejected() {
        let result = StopTime::new(
            TripId::new("T1"),
            StopId::new("S1"),
            1,
            time("08:10:30"),
            time("08:10:00"),
        );
        assert!(matches!(result, Err(DomainError::InvalidStopTime(_))));
    }
}
