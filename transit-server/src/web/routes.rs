//! HTTP route handlers.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{Local, NaiveDate};
use tracing::error;

use crate::domain::{Coord, RouteType, ServiceTime, StopId};
use crate::geocode::{GeocodeError, Geocoder};
use crate::planner::{PlanResult, Planner};

use super::dto::{ErrorResponse, JourneyResponse, NoJourneyResponse, PlanRequest, PlanResponse};
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/plan", get(plan_journey))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Plan a journey from a stop to a free-text destination.
async fn plan_journey(
    State(state): State<AppState>,
    Query(req): Query<PlanRequest>,
) -> Result<Response, AppError> {
    let source = StopId::new(&req.source_stop_id);
    if state.indices.store().stop(&source).is_none() {
        return Err(AppError::NotFound {
            message: format!("unknown source stop {:?}", req.source_stop_id),
        });
    }

    let date = match &req.departure_date {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
            AppError::BadRequest {
                message: format!("invalid departure_date {raw:?}, expected YYYY-MM-DD"),
            }
        })?,
        None => Local::now().date_naive(),
    };

    let earliest = match &req.departure_time {
        Some(raw) => ServiceTime::parse(raw).map_err(|e| AppError::BadRequest {
            message: format!("invalid departure_time {raw:?}: {e}"),
        })?,
        None => ServiceTime::from_naive(Local::now().time()),
    };

    let route_type = match req.route_type_filter {
        Some(code) => Some(RouteType::from_code(code).ok_or_else(|| AppError::BadRequest {
            message: format!("invalid route_type_filter {code}, expected 0-7"),
        })?),
        None => None,
    };

    let max_transfers = req.max_transfers.unwrap_or(state.config.max_transfers);
    if max_transfers > 2 {
        return Err(AppError::BadRequest {
            message: format!("max_transfers {max_transfers} out of range, expected 0-2"),
        });
    }

    let place = state.geocoder.geocode(&req.destination_place).await?;
    let destination = Coord::new(place.lat, place.lon);

    let index = state.indices.get(date, route_type);
    let config = crate::planner::SearchConfig {
        max_transfers,
        ..(*state.config).clone()
    };

    let planner = Planner::new(&index, &state.geo, &config);
    let response = match planner.plan(&source, destination, earliest) {
        PlanResult::Found(planned) => PlanResponse::Journey(Box::new(
            JourneyResponse::from_planned(&planned, state.indices.store(), &place.formatted_address),
        )),
        PlanResult::NoJourney(reason) => {
            PlanResponse::NoJourney(NoJourneyResponse::from_reason(reason))
        }
    };

    Ok(Json(response).into_response())
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Upstream { message: String },
}

impl From<GeocodeError> for AppError {
    fn from(e: GeocodeError) -> Self {
        match e {
            GeocodeError::NoResults => AppError::NotFound {
                message: e.to_string(),
            },
            GeocodeError::AuthDenied | GeocodeError::NetworkError(_) | GeocodeError::ParseError(_) => {
                AppError::Upstream {
                    message: e.to_string(),
                }
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message.clone()),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message.clone()),
            AppError::Upstream { message } => (StatusCode::BAD_GATEWAY, message.clone()),
        };

        error!(%status, message = %message, "Request failed");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geocode_errors_map_to_statuses() {
        let err: AppError = GeocodeError::NoResults.into();
        assert!(matches!(err, AppError::NotFound { .. }));

        let err: AppError = GeocodeError::AuthDenied.into();
        assert!(matches!(err, AppError::Upstream { .. }));

        let err: AppError = GeocodeError::NetworkError("down".into()).into();
        assert!(matches!(err, AppError::Upstream { .. }));

        let err: AppError = GeocodeError::ParseError("bad json".into()).into();
        assert!(matches!(err, AppError::Upstream { .. }));
    }
}
