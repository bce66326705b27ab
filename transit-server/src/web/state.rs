//! Application state for the web layer.

use std::sync::Arc;

use crate::cache::{CachedGeocoder, IndexCache};
use crate::geo::GeoIndex;
use crate::geocode::GeocodeClient;
use crate::planner::SearchConfig;

/// Shared application state.
///
/// Everything here is immutable after startup and shared read-only across
/// request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Trip indices per (date, route-type filter), built on demand
    pub indices: Arc<IndexCache>,

    /// Geographic stop index
    pub geo: Arc<GeoIndex>,

    /// Cached geocoding client
    pub geocoder: Arc<CachedGeocoder<GeocodeClient>>,

    /// Journey planner configuration
    pub config: Arc<SearchConfig>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(
        indices: IndexCache,
        geo: GeoIndex,
        geocoder: CachedGeocoder<GeocodeClient>,
        config: SearchConfig,
    ) -> Self {
        Self {
            indices: Arc::new(indices),
            geo: Arc::new(geo),
            geocoder: Arc::new(geocoder),
            config: Arc::new(config),
        }
    }
}
