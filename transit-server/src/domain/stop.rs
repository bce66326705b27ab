//! Stop and coordinate types.

use super::StopId;

/// A WGS84 coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coord {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
}

impl Coord {
    /// Create a coordinate from latitude and longitude degrees.
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// A transit stop from `stops.txt`.
///
/// Coordinates are optional: GTFS permits stops without a position (e.g.
/// generic station entrances), and such stops are simply absent from the
/// geographic index.
#[derive(Debug, Clone, PartialEq)]
pub struct Stop {
    /// Stable feed identifier.
    pub id: StopId,
    /// Human-readable name.
    pub name: String,
    /// Position, if the feed provides one.
    pub coord: Option<Coord>,
}

impl Stop {
    /// Create a stop.
    pub fn new(id: StopId, name: impl Into<String>, coord: Option<Coord>) -> Self {
        Self {
            id,
            name: name.into(),
            coord,
        }
    }
}
