//! GTFS transit journey planner server.
//!
//! Answers: "from this stop, at this date and time, what is the best
//! transit journey to a stop near this place?" Journeys may start with a
//! short walk and use a bounded number of transfers.

pub mod cache;
pub mod domain;
pub mod feed;
pub mod geo;
pub mod geocode;
pub mod planner;
pub mod schedule;
pub mod web;
