//! HTTP geocoding client.
//!
//! Talks to a provider that accepts a URL-encoded address and returns a JSON
//! document with a `status` field and `results[0].geometry.location`.

use serde::Deserialize;
use tracing::debug;

use super::error::GeocodeError;

/// Default provider endpoint.
const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";

/// Environment variable carrying the provider API key.
pub const API_KEY_ENV: &str = "GEOCODER_API_KEY";

/// A successfully geocoded place.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodedPlace {
    pub lat: f64,
    pub lon: f64,
    pub formatted_address: String,
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
    #[serde(default)]
    formatted_address: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: Location,
}

#[derive(Debug, Deserialize)]
struct Location {
    lat: f64,
    lng: f64,
}

/// Configuration for the geocoding client.
#[derive(Debug, Clone)]
pub struct GeocoderConfig {
    /// Provider API key.
    pub api_key: String,
    /// Base URL for the provider endpoint.
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl GeocoderConfig {
    /// Create a config with the given API key and default endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }

    /// Read the API key from the environment. An absent key yields an empty
    /// one; the provider then denies the first query.
    pub fn from_env() -> Self {
        Self::new(std::env::var(API_KEY_ENV).unwrap_or_default())
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

/// Reqwest-backed geocoding client.
#[derive(Debug, Clone)]
pub struct GeocodeClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl GeocodeClient {
    /// Create a client.
    pub fn new(config: GeocoderConfig) -> Result<Self, GeocodeError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GeocodeError::NetworkError(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url,
            api_key: config.api_key,
        })
    }

    /// Resolve a free-text place to a coordinate.
    pub async fn resolve(&self, place: &str) -> Result<GeocodedPlace, GeocodeError> {
        let response = self
            .http
            .get(&self.base_url)
            .query(&[("address", place), ("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| GeocodeError::NetworkError(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(GeocodeError::AuthDenied);
        }
        if !status.is_success() {
            return Err(GeocodeError::NetworkError(format!(
                "provider returned HTTP {status}"
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| GeocodeError::NetworkError(e.to_string()))?;

        let place = interpret(&body)?;
        debug!(lat = place.lat, lon = place.lon, "Geocoded");
        Ok(place)
    }
}

/// Map a provider response body to a result.
fn interpret(body: &str) -> Result<GeocodedPlace, GeocodeError> {
    let response: GeocodeResponse =
        serde_json::from_str(body).map_err(|e| GeocodeError::ParseError(e.to_string()))?;

    match response.status.as_str() {
        "OK" => {
            let first = response
                .results
                .into_iter()
                .next()
                .ok_or(GeocodeError::NoResults)?;
            Ok(GeocodedPlace {
                lat: first.geometry.location.lat,
                lon: first.geometry.location.lng,
                formatted_address: first.formatted_address.unwrap_or_default(),
            })
        }
        "ZERO_RESULTS" => Err(GeocodeError::NoResults),
        "REQUEST_DENIED" => Err(GeocodeError::AuthDenied),
        other => Err(GeocodeError::ParseError(format!(
            "unexpected provider status {other:?}"
        ))),
    }
}
