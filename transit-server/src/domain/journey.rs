//! Journey result types.
//!
//! A `Journey` is the planner's answer: an optional leading `Walk` from the
//! queried source stop, followed by zero or more on-vehicle `Leg`s. All
//! structural invariants (leg ordering, connectivity, distinct trips, the
//! transfer buffer) are checked at construction so downstream code can trust
//! any `Journey` it holds.

use super::{DomainError, RouteId, ServiceTime, StopId, TripId};

/// Minimum wait between alighting one trip and boarding the next, minutes.
pub const TRANSFER_BUFFER_MINS: u32 = 5;

/// Assumed walking speed, metres per minute.
pub const WALK_SPEED_M_PER_MIN: f64 = 80.0;

/// A single on-vehicle segment: one trip, boarded at one stop-time and left
/// at a later one.
///
/// # Invariants
///
/// - `to_seq > from_seq` (travel forward along the trip)
/// - `arrival >= departure`
#[derive(Debug, Clone, PartialEq)]
pub struct Leg {
    pub trip_id: TripId,
    pub route_id: RouteId,
    pub headsign: String,
    pub from_stop: StopId,
    pub to_stop: StopId,
    /// `stop_sequence` of the boarding stop-time.
    pub from_seq: u32,
    /// `stop_sequence` of the alighting stop-time.
    pub to_seq: u32,
    /// Departure from the boarding stop.
    pub departure: ServiceTime,
    /// Arrival at the alighting stop.
    pub arrival: ServiceTime,
}

impl Leg {
    /// Construct a leg, validating ordering.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the alighting sequence does not exceed the boarding
    /// sequence, or if the leg arrives before it departs.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        trip_id: TripId,
        route_id: RouteId,
        headsign: impl Into<String>,
        from_stop: StopId,
        to_stop: StopId,
        from_seq: u32,
        to_seq: u32,
        departure: ServiceTime,
        arrival: ServiceTime,
    ) -> Result<Self, DomainError> {
        if to_seq <= from_seq {
            return Err(DomainError::InvalidLeg(
                "alighting sequence must exceed boarding sequence",
            ));
        }
        if arrival < departure {
            return Err(DomainError::InvalidLeg("arrival is before departure"));
        }
        Ok(Self {
            trip_id,
            route_id,
            headsign: headsign.into(),
            from_stop,
            to_stop,
            from_seq,
            to_seq,
            departure,
            arrival,
        })
    }

    /// On-vehicle minutes for this leg.
    pub fn duration_mins(&self) -> i64 {
        self.arrival.minutes_since(self.departure)
    }
}

/// A walk from one stop to a nearby stop, preceding the first leg.
#[derive(Debug, Clone, PartialEq)]
pub struct Walk {
    pub from_stop: StopId,
    pub to_stop: StopId,
    /// Great-circle distance in metres.
    pub distance_m: f64,
    /// Walking time: `ceil(distance_m / 80)` minutes.
    pub duration_mins: i64,
}

impl Walk {
    /// Create a walk; the duration is derived from the distance at
    /// [`WALK_SPEED_M_PER_MIN`].
    pub fn new(from_stop: StopId, to_stop: StopId, distance_m: f64) -> Self {
        let duration_mins = (distance_m / WALK_SPEED_M_PER_MIN).ceil() as i64;
        Self {
            from_stop,
            to_stop,
            distance_m,
            duration_mins,
        }
    }
}

/// A complete journey: an optional leading walk plus ordered legs.
///
/// An empty journey (no walk, no legs) is valid and means the source stop
/// already counts as arrival.
///
/// # Invariants
///
/// - If a walk and legs are both present, the walk ends where the first leg
///   boards.
/// - Consecutive legs connect (`to_stop` equals the next `from_stop`).
/// - Consecutive legs are on different trips.
/// - Every transfer waits at least [`TRANSFER_BUFFER_MINS`].
#[derive(Debug, Clone, PartialEq)]
pub struct Journey {
    walk: Option<Walk>,
    legs: Vec<Leg>,
}

impl Journey {
    /// Construct a journey from its parts, validating the invariants above.
    ///
    /// # Examples
    ///
    /// ```
    /// use transit_server::domain::{Journey, Leg, ServiceTime};
    ///
    /// let leg = Leg::new(
    ///     "T1".into(),
    ///     "R".into(),
    ///     "Harbour",
    ///     "S1".into(),
    ///     "S3".into(),
    ///     1,
    ///     3,
    ///     ServiceTime::parse("08:00:00").unwrap(),
    ///     ServiceTime::parse("08:20:00").unwrap(),
    /// )
    /// .unwrap();
    ///
    /// let journey = Journey::new(None, vec![leg]).unwrap();
    /// assert_eq!(journey.transfers(), 0);
    /// assert_eq!(journey.total_minutes(), 20);
    /// ```
    pub fn new(walk: Option<Walk>, legs: Vec<Leg>) -> Result<Self, DomainError> {
        if let (Some(walk), Some(first)) = (&walk, legs.first()) {
            if walk.to_stop != first.from_stop {
                return Err(DomainError::WalkDisconnected {
                    walk_end: walk.to_stop.clone(),
                    boarding: first.from_stop.clone(),
                });
            }
        }

        for pair in legs.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            if prev.to_stop != next.from_stop {
                return Err(DomainError::LegsNotConnected(
                    prev.to_stop.clone(),
                    next.from_stop.clone(),
                ));
            }
            if prev.trip_id == next.trip_id {
                return Err(DomainError::SameTripLegs(prev.trip_id.clone()));
            }
            let buffer = prev.arrival.plus_minutes(TRANSFER_BUFFER_MINS);
            if next.departure < buffer {
                return Err(DomainError::TransferTooTight(prev.to_stop.clone()));
            }
        }

        Ok(Self { walk, legs })
    }

    /// An empty journey: the source already counts as arrival.
    pub fn empty() -> Self {
        Self {
            walk: None,
            legs: Vec::new(),
        }
    }

    /// The leading walk, if any.
    pub fn walk(&self) -> Option<&Walk> {
        self.walk.as_ref()
    }

    /// The on-vehicle legs in order.
    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    /// True if the journey has neither walk nor legs.
    pub fn is_empty(&self) -> bool {
        self.walk.is_none() && self.legs.is_empty()
    }

    /// Number of transfers: leg boundaries, each between distinct trips.
    pub fn transfers(&self) -> usize {
        self.legs.len().saturating_sub(1)
    }

    /// Departure time of the first leg, if any.
    pub fn departure_time(&self) -> Option<ServiceTime> {
        self.legs.first().map(|l| l.departure)
    }

    /// Arrival time of the last leg, if any.
    pub fn arrival_time(&self) -> Option<ServiceTime> {
        self.legs.last().map(|l| l.arrival)
    }

    /// Minutes spent on transit: last arrival minus first departure
    /// (includes transfer waits), zero for a leg-less journey.
    pub fn transit_minutes(&self) -> i64 {
        match (self.departure_time(), self.arrival_time()) {
            (Some(dep), Some(arr)) => arr.minutes_since(dep),
            _ => 0,
        }
    }

    /// Minutes spent walking.
    pub fn walk_minutes(&self) -> i64 {
        self.walk.as_ref().map_or(0, |w| w.duration_mins)
    }

    /// Total journey minutes: walk plus transit span.
    pub fn total_minutes(&self) -> i64 {
        self.walk_minutes() + self.transit_minutes()
    }

    /// The stop the journey ends at: the last leg's alighting stop, the
    /// walk's end for a walk-only journey, or `None` when empty.
    pub fn final_stop(&self) -> Option<&StopId> {
        self.legs
            .last()
            .map(|l| &l.to_stop)
            .or(self.walk.as_ref().map(|w| &w.to_stop))
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    prop_compose! {
        /// A chain of leg parameters: per-leg travel minutes and per-transfer
        /// wait minutes (always at least the buffer).
        fn chain_params()(
            legs in prop::collection::vec(
                (5u32..90, TRANSFER_BUFFER_MINS..60),
                1..5,
            ),
            start in 300u32..1200,
        ) -> (u32, Vec<(u32, u32)>) {
            (start, legs)
        }
    }

    fn build_chain(start_mins: u32, params: &[(u32, u32)]) -> Journey {
        let mut legs = Vec::new();
        let mut clock = ServiceTime::from_hms(0, 0, 0).unwrap().plus_minutes(start_mins);

        for (i, &(travel, wait)) in params.iter().enumerate() {
            let dep = clock;
            let arr = dep.plus_minutes(travel);
            legs.push(
                Leg::new(
                    TripId::new(format!("T{i}")),
                    RouteId::new("R"),
                    "",
                    StopId::new(format!("S{i}")),
                    StopId::new(format!("S{}", i + 1)),
                    1,
                    2,
                    dep,
                    arr,
                )
                .unwrap(),
            );
            clock = arr.plus_minutes(wait);
        }

        Journey::new(None, legs).expect("chain respects all invariants")
    }

    proptest! {
        /// Transfers are always one fewer than the legs.
        #[test]
        fn transfers_is_legs_minus_one((start, params) in chain_params()) {
            let journey = build_chain(start, &params);
            prop_assert_eq!(journey.transfers(), journey.legs().len() - 1);
        }

        /// The transit span equals last arrival minus first departure.
        #[test]
        fn transit_span_consistent((start, params) in chain_params()) {
            let journey = build_chain(start, &params);
            let dep = journey.departure_time().unwrap();
            let arr = journey.arrival_time().unwrap();
            prop_assert_eq!(journey.transit_minutes(), arr.minutes_since(dep));
            prop_assert!(journey.transit_minutes() >= 0);
        }

        /// Every constructed journey respects the transfer buffer.
        #[test]
        fn buffer_respected((start, params) in chain_params()) {
            let journey = build_chain(start, &params);
            for pair in journey.legs().windows(2) {
                let wait = pair[1].departure.minutes_since(pair[0].arrival);
                prop_assert!(wait >= TRANSFER_BUFFER_MINS as i64);
            }
        }

        /// Walk durations always satisfy duration = ceil(distance / 80).
        #[test]
        fn walk_duration_formula(distance in 0.0f64..5000.0) {
            let walk = Walk::new(StopId::new("A"), StopId::new("B"), distance);
            prop_assert_eq!(
                walk.duration_mins,
                (distance / WALK_SPEED_M_PER_MIN).ceil() as i64
            );
        }
    }
}
