//! Service-day filtering and trip indexing.
//!
//! The planner never touches raw feed tables: each query works against a
//! [`TripIndex`] built from the trips valid on the query's service day.

mod service_day;
mod trip_index;

pub use service_day::{service_active, valid_trips, TripMeta, ValidTrips};
pub use trip_index::TripIndex;
