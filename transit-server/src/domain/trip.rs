//! Trip type.

use super::{RouteId, ServiceId, TripId};

/// A trip from `trips.txt`: one scheduled run of a vehicle along a route.
#[derive(Debug, Clone, PartialEq)]
pub struct Trip {
    pub id: TripId,
    pub route_id: RouteId,
    pub service_id: ServiceId,
    /// Destination sign text shown on the vehicle (may be empty).
    pub headsign: String,
}

impl Trip {
    /// Create a trip.
    pub fn new(
        id: TripId,
        route_id: RouteId,
        service_id: ServiceId,
        headsign: impl Into<String>,
    ) -> Self {
        Self {
            id,
            route_id,
            service_id,
            headsign: headsign.into(),
        }
    }
}
