//! Domain types for the transit journey planner.
//!
//! This module contains the core domain model: validated GTFS entities and
//! the journey result types. All types enforce their invariants at
//! construction time, so code that receives these types can trust their
//! validity.

mod calendar;
mod error;
mod id;
mod journey;
mod route;
mod stop;
mod stop_time;
mod time;
mod trip;

pub use calendar::{date_to_yyyymmdd, ExceptionType, Service, ServiceException};
pub use error::DomainError;
pub use id::{RouteId, ServiceId, StopId, TripId};
pub use journey::{Journey, Leg, Walk, TRANSFER_BUFFER_MINS, WALK_SPEED_M_PER_MIN};
pub use route::{Route, RouteType};
pub use stop::{Coord, Stop};
pub use stop_time::StopTime;
pub use time::{ServiceTime, TimeError};
pub use trip::Trip;
