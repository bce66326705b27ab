//! Geographic stop index.
//!
//! Supports nearest-stop and within-radius queries by great-circle distance.
//! A linear scan over all positioned stops is fast enough at feed scale
//! (thousands of stops); a spatial tree could be substituted without
//! changing any semantics.

use std::collections::BTreeMap;

use crate::domain::{Coord, StopId};
use crate::feed::FeedStore;

/// Mean Earth radius used for great-circle distances.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two coordinates, in kilometres (Haversine).
pub fn haversine_km(a: Coord, b: Coord) -> f64 {
    let lat_a = a.lat.to_radians();
    let lat_b = b.lat.to_radians();
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);

    // Float error can push h past 1 for near-antipodal points.
    2.0 * EARTH_RADIUS_KM * h.min(1.0).sqrt().asin()
}

/// A stop together with its distance from a query point.
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyStop {
    pub stop_id: StopId,
    pub distance_km: f64,
}

/// Index of all stops that have coordinates.
#[derive(Debug, Clone)]
pub struct GeoIndex {
    /// Positioned stops in id order, for deterministic scans.
    stops: Vec<(StopId, Coord)>,
    coords: BTreeMap<StopId, Coord>,
}

impl GeoIndex {
    /// Build the index from a feed store. Stops without coordinates are
    /// excluded.
    pub fn build(store: &FeedStore) -> Self {
        let mut stops = Vec::new();
        let mut coords = BTreeMap::new();
        for stop in store.stops() {
            if let Some(coord) = stop.coord {
                stops.push((stop.id.clone(), coord));
                coords.insert(stop.id.clone(), coord);
            }
        }
        Self { stops, coords }
    }

    /// The coordinate of a stop, if it has one.
    pub fn coord(&self, stop_id: &StopId) -> Option<Coord> {
        self.coords.get(stop_id).copied()
    }

    /// The `n` stops closest to `point`, ordered by distance (ties by stop
    /// id ascending).
    pub fn nearest(&self, point: Coord, n: usize) -> Vec<NearbyStop> {
        let mut all: Vec<NearbyStop> = self
            .stops
            .iter()
            .map(|(id, coord)| NearbyStop {
                stop_id: id.clone(),
                distance_km: haversine_km(point, *coord),
            })
            .collect();

        all.sort_by(|a, b| {
            a.distance_km
                .total_cmp(&b.distance_km)
                .then_with(|| a.stop_id.cmp(&b.stop_id))
        });
        all.truncate(n);
        all
    }

    /// All stops within `radius_km` of `point`, ordered by distance (ties by
    /// stop id ascending), excluding `exclude` if given.
    pub fn within(
        &self,
        point: Coord,
        radius_km: f64,
        exclude: Option<&StopId>,
    ) -> Vec<NearbyStop> {
        let mut matches: Vec<NearbyStop> = self
            .stops
            .iter()
            .filter(|(id, _)| exclude != Some(id))
            .filter_map(|(id, coord)| {
                let distance_km = haversine_km(point, *coord);
                (distance_km <= radius_km).then(|| NearbyStop {
                    stop_id: id.clone(),
                    distance_km,
                })
            })
            .collect();

        matches.sort_by(|a, b| {
            a.distance_km
                .total_cmp(&b.distance_km)
                .then_with(|| a.stop_id.cmp(&b.stop_id))
        });
        matches
    }

    /// Number of positioned stops.
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    /// True when no stop has coordinates.
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }
}
