//! GTFS feed ingestion.
//!
//! Reads a feed directory (the five required tables plus the optional
//! `calendar_dates.txt`) into an immutable, validated [`FeedStore`]. Other
//! GTFS files in the directory are ignored.

mod error;
mod read;
mod store;

use std::path::Path;

use tracing::info;

pub use error::FeedError;
pub use store::FeedStore;

/// Load and validate a GTFS feed directory.
///
/// # Errors
///
/// Returns [`FeedError::Missing`] when a required table is absent and
/// [`FeedError::Malformed`] when a row fails to parse or the tables fail
/// cross-validation. All errors are fatal for the process.
pub fn load(dir: impl AsRef<Path>) -> Result<FeedStore, FeedError> {
    let dir = dir.as_ref();

    let stops = read::read_stops(dir)?;
    let routes = read::read_routes(dir)?;
    let services = read::read_calendar(dir)?;
    let exceptions = read::read_calendar_dates(dir)?;
    let trips = read::read_trips(dir)?;
    let stop_times = read::read_stop_times(dir)?;

    let store = FeedStore::new(stops, routes, services, exceptions, trips, stop_times)?;

    info!(
        stops = store.stop_count(),
        trips = store.trip_count(),
        "Feed loaded"
    );

    Ok(store)
}
