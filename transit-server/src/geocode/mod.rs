//! Geocoding: free-text place names to coordinates.
//!
//! The planner treats geocoding as an external oracle behind the
//! [`Geocoder`] trait, so queries can run against the HTTP client or a mock.

mod client;
mod error;
mod mock;

use std::future::Future;

pub use client::{GeocodeClient, GeocodedPlace, GeocoderConfig, API_KEY_ENV};
pub use error::GeocodeError;
pub use mock::MockGeocoder;

/// Trait for resolving place names.
///
/// This abstraction allows the web layer to be tested with mock data.
pub trait Geocoder: Send + Sync {
    /// Resolve a free-text place to a coordinate and formatted address.
    fn geocode(
        &self,
        place: &str,
    ) -> impl Future<Output = Result<GeocodedPlace, GeocodeError>> + Send;
}

impl Geocoder for GeocodeClient {
    async fn geocode(&self, place: &str) -> Result<GeocodedPlace, GeocodeError> {
        self.resolve(place).await
    }
}

/// Canonical cache/lookup key for a place string.
pub fn normalize_place(place: &str) -> String {
    place.trim().to_lowercase()
}
