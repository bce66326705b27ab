//! Caching layer for trip indices and geocode results.
//!
//! A trip index depends only on `(service date, route-type filter)`, so it
//! is built once per distinct key and shared read-only. Geocode results are
//! keyed by the normalized place string; the cache is safe for concurrent
//! readers with single-writer inserts.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use moka::future::Cache as FutureCache;
use moka::sync::Cache as SyncCache;
use tracing::debug;

use crate::domain::RouteType;
use crate::feed::FeedStore;
use crate::geocode::{normalize_place, GeocodeError, GeocodedPlace, Geocoder};
use crate::schedule::{valid_trips, TripIndex};

/// Cache key for trip indices.
type IndexKey = (NaiveDate, Option<RouteType>);

/// Configuration for the caches.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of cached trip indices.
    pub index_capacity: u64,

    /// Maximum number of cached geocode results.
    pub geocode_capacity: u64,

    /// TTL for geocode results.
    pub geocode_ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            index_capacity: 16,
            geocode_capacity: 1024,
            geocode_ttl: Duration::from_secs(24 * 60 * 60),
        }
    }
}

/// Builds and caches trip indices per `(date, route-type filter)`.
pub struct IndexCache {
    store: Arc<FeedStore>,
    indices: SyncCache<IndexKey, Arc<TripIndex>>,
}

impl IndexCache {
    /// Create a cache over a shared feed store.
    pub fn new(store: Arc<FeedStore>, config: &CacheConfig) -> Self {
        let indices = SyncCache::builder()
            .max_capacity(config.index_capacity)
            .build();
        Self { store, indices }
    }

    /// The trip index for a service day and filter, built on first use.
    pub fn get(&self, date: NaiveDate, route_type: Option<RouteType>) -> Arc<TripIndex> {
        self.indices.get_with((date, route_type), || {
            debug!(date = %date, route_type = ?route_type, "Building trip index");
            let valid = valid_trips(&self.store, date, route_type);
            Arc::new(TripIndex::build(&self.store, &valid))
        })
    }

    /// The shared feed store.
    pub fn store(&self) -> &Arc<FeedStore> {
        &self.store
    }

    /// Number of cached indices (for monitoring).
    pub fn entry_count(&self) -> u64 {
        self.indices.run_pending_tasks();
        self.indices.entry_count()
    }
}

/// A geocoder wrapped with a result cache.
///
/// Errors are never cached; a failed place is retried on the next query.
pub struct CachedGeocoder<G> {
    inner: G,
    cache: FutureCache<String, GeocodedPlace>,
}

impl<G: Geocoder> CachedGeocoder<G> {
    /// Wrap a geocoder.
    pub fn new(inner: G, config: &CacheConfig) -> Self {
        let cache = FutureCache::builder()
            .max_capacity(config.geocode_capacity)
            .time_to_live(config.geocode_ttl)
            .build();
        Self { inner, cache }
    }

    /// Access the wrapped geocoder.
    pub fn inner(&self) -> &G {
        &self.inner
    }
}

impl<G: Geocoder> Geocoder for CachedGeocoder<G> {
    async fn geocode(&self, place: &str) -> Result<GeocodedPlace, GeocodeError> {
        let key = normalize_place(place);
        self.cache
            .try_get_with(key, self.inner.geocode(place))
            .await
            .map_err(|e: Arc<GeocodeError>| (*e).clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        Coord, Route, RouteId, Service, ServiceId, ServiceTime, Stop, StopId, StopTime, Trip,
        TripId,
    };
    use crate::geocode::MockGeocoder;

    fn time(s: &str) -> ServiceTime {
        ServiceTime::parse(s).unwrap()
    }

    fn store() -> Arc<FeedStore> {
        Arc::new(
            FeedStore::new(
                vec![
                    Stop::new(StopId::new("S1"), "First", Some(Coord::new(0.0, 0.0))),
                    Stop::new(StopId::new("S2"), "Second", Some(Coord::new(0.0, 0.01))),
                ],
                vec![Route::new(RouteId::new("R"), RouteType::Bus, "1", "")],
                vec![Service::new(ServiceId::new("C"), [true; 7], 20240101, 20241231)],
                vec![],
                vec![Trip::new(TripId::new("T1"), RouteId::new("R"), ServiceId::new("C"), "")],
                vec![
                    StopTime::new(TripId::new("T1"), StopId::new("S1"), 1, time("08:00:00"), time("08:00:00")).unwrap(),
                    StopTime::new(TripId::new("T1"), StopId::new("S2"), 2, time("08:10:00"), time("08:10:00")).unwrap(),
                ],
            )
            .unwrap(),
        )
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn same_key_shares_the_index() {
        let cache = IndexCache::new(store(), &CacheConfig::default());

        let first = cache.get(date(2024, 3, 4), None);
        let second = cache.get(date(2024, 3, 4), None);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.entry_count(), 1);
    }

    #[test]
    fn different_keys_build_different_indices() {
        let cache = IndexCache::new(store(), &CacheConfig::default());

        let unfiltered = cache.get(date(2024, 3, 4), None);
        let filtered = cache.get(date(2024, 3, 4), Some(RouteType::Metro));
        assert!(!Arc::ptr_eq(&unfiltered, &filtered));
        assert_eq!(unfiltered.trip_count(), 1);
        assert!(filtered.is_empty());

        let other_day = cache.get(date(2024, 3, 5), None);
        assert!(!Arc::ptr_eq(&unfiltered, &other_day));
    }

    #[tokio::test]
    async fn geocode_results_are_cached_by_normalized_key() {
        let mut mock = MockGeocoder::new();
        mock.insert("Harbour View", 0.0, 0.021);
        let cached = CachedGeocoder::new(mock, &CacheConfig::default());

        let first = cached.geocode("Harbour View").await.unwrap();
        let second = cached.geocode("  harbour view ").await.unwrap();
        assert_eq!(first, second);
        assert_eq!(cached.inner().calls(), 1);
    }

    #[tokio::test]
    async fn geocode_errors_are_not_cached() {
        let cached = CachedGeocoder::new(MockGeocoder::new(), &CacheConfig::default());

        assert_eq!(
            cached.geocode("nowhere").await,
            Err(GeocodeError::NoResults)
        );
        assert_eq!(
            cached.geocode("nowhere").await,
            Err(GeocodeError::NoResults)
        );
        assert_eq!(cached.inner().calls(), 2);
    }
}
