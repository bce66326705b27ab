//! Web layer for the transit journey planner.
//!
//! Exposes the per-query planning contract as `GET /plan`.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::create_router;
pub use state::AppState;
