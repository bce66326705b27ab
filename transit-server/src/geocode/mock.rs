//! Mock geocoder for tests and offline development.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::client::GeocodedPlace;
use super::error::GeocodeError;
use super::{normalize_place, Geocoder};

/// A geocoder backed by a fixed place table.
#[derive(Debug, Default)]
pub struct MockGeocoder {
    places: HashMap<String, GeocodedPlace>,
    calls: AtomicUsize,
}

impl MockGeocoder {
    /// Create an empty mock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a place; lookups are case- and whitespace-insensitive.
    pub fn insert(&mut self, place: &str, lat: f64, lon: f64) {
        self.places.insert(
            normalize_place(place),
            GeocodedPlace {
                lat,
                lon,
                formatted_address: place.trim().to_string(),
            },
        );
    }

    /// How many geocode calls the mock has served.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl Geocoder for MockGeocoder {
    async fn geocode(&self, place: &str) -> Result<GeocodedPlace, GeocodeError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.places
            .get(&normalize_place(place))
            .cloned()
            .ok_or(GeocodeError::NoResults)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn lookup_is_normalized() {
        let mut mock = MockGeocoder::new();
        mock.insert("Harbour View", 0.0, 0.021);

        let place = mock.geocode("  harbour view ").await.unwrap();
        assert_eq!(place.lon, 0.021);
        assert_eq!(place.formatted_address, "Harbour View");
    }

    #[tokio::test]
    async fn unknown_place_is_no_results() {
        let mock = MockGeocoder::new();
        assert_eq!(
            mock.geocode("nowhere").await,
            Err(GeocodeError::NoResults)
        );
    }

    #[tokio::test]
    async fn calls_are_counted() {
        let mut mock = MockGeocoder::new();
        mock.insert("somewhere", 1.0, 2.0);

        let _ = mock.geocode("somewhere").await;
        let _ = mock.geocode("elsewhere").await;
        assert_eq!(mock.calls(), 2);
    }
}
