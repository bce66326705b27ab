//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::feed::FeedStore;
use crate::planner::{NoJourneyReason, PlannedJourney};

/// Query parameters for `GET /plan`.
#[derive(Debug, Deserialize)]
pub struct PlanRequest {
    /// Source stop identifier as it appears in the feed
    pub source_stop_id: String,

    /// Free-text destination place name
    pub destination_place: String,

    /// Departure time `HH:MM:SS` (defaults to now)
    pub departure_time: Option<String>,

    /// Departure date `YYYY-MM-DD` (defaults to today)
    pub departure_date: Option<String>,

    /// GTFS route type code 0-7 to restrict the search
    pub route_type_filter: Option<u8>,

    /// Maximum transfers, 0-2 (defaults to 2)
    pub max_transfers: Option<usize>,
}

/// A segment of a planned journey.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SegmentDto {
    Walk(WalkDto),
    Transit(LegDto),
}

/// A walk segment.
#[derive(Debug, Serialize)]
pub struct WalkDto {
    pub from_stop: String,
    pub from_name: String,
    pub to_stop: String,
    pub to_name: String,
    pub distance_m: f64,
    pub duration_mins: i64,
}

/// An on-vehicle segment.
#[derive(Debug, Serialize)]
pub struct LegDto {
    pub trip_id: String,
    pub route_id: String,
    pub headsign: String,
    pub from_stop: String,
    pub from_name: String,
    pub to_stop: String,
    pub to_name: String,
    pub departure: String,
    pub arrival: String,
}

/// A planned journey.
#[derive(Debug, Serialize)]
pub struct JourneyResponse {
    pub segments: Vec<SegmentDto>,
    pub total_minutes: i64,
    pub transfers: usize,
    pub final_stop: String,
    pub final_distance_km: f64,
    /// The geocoder's formatted destination address
    pub destination_address: String,
    /// True when a cap or timeout cut the search short
    pub partial: bool,
}

/// A structured "no journey" result.
#[derive(Debug, Serialize)]
pub struct NoJourneyResponse {
    pub reason: &'static str,
}

/// The `/plan` response body.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum PlanResponse {
    Journey(Box<JourneyResponse>),
    NoJourney(NoJourneyResponse),
}

/// Error body for failed requests.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn stop_name(store: &FeedStore, stop_id: &crate::domain::StopId) -> String {
    store
        .stop(stop_id)
        .map(|s| s.name.clone())
        .unwrap_or_default()
}

impl JourneyResponse {
    /// Map a planned journey onto the wire shape.
    pub fn from_planned(
        planned: &PlannedJourney,
        store: &FeedStore,
        destination_address: &str,
    ) -> Self {
        let mut segments = Vec::new();

        if let Some(walk) = planned.journey.walk() {
            segments.push(SegmentDto::Walk(WalkDto {
                from_stop: walk.from_stop.to_string(),
                from_name: stop_name(store, &walk.from_stop),
                to_stop: walk.to_stop.to_string(),
                to_name: stop_name(store, &walk.to_stop),
                distance_m: walk.distance_m,
                duration_mins: walk.duration_mins,
            }));
        }

        for leg in planned.journey.legs() {
            segments.push(SegmentDto::Transit(LegDto {
                trip_id: leg.trip_id.to_string(),
                route_id: leg.route_id.to_string(),
                headsign: leg.headsign.clone(),
                from_stop: leg.from_stop.to_string(),
                from_name: stop_name(store, &leg.from_stop),
                to_stop: leg.to_stop.to_string(),
                to_name: stop_name(store, &leg.to_stop),
                departure: leg.departure.to_string(),
                arrival: leg.arrival.to_string(),
            }));
        }

        Self {
            segments,
            total_minutes: planned.total_minutes,
            transfers: planned.transfers,
            final_stop: planned.final_stop.to_string(),
            final_distance_km: planned.final_distance_km,
            destination_address: destination_address.to_string(),
            partial: planned.partial,
        }
    }
}

impl NoJourneyResponse {
    /// The wire reason code for a no-journey outcome.
    pub fn from_reason(reason: NoJourneyReason) -> Self {
        let reason = match reason {
            NoJourneyReason::NoServiceOnDate => "no_service_on_date",
            NoJourneyReason::NoPath => "no_journey",
            NoJourneyReason::Timeout => "timeout",
            NoJourneyReason::IterationCap => "iteration_cap",
        };
        Self { reason }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        Coord, Journey, Leg, Route, RouteId, RouteType, Service, ServiceId, ServiceTime, Stop,
        StopId, Walk,
    };

    fn store() -> FeedStore {
        FeedStore::new(
            vec![
                Stop::new(StopId::new("S1"), "First", Some(Coord::new(0.0, 0.0))),
                Stop::new(StopId::new("S3"), "Third", Some(Coord::new(0.0, 0.02))),
            ],
            vec![Route::new(RouteId::new("R"), RouteType::Bus, "1", "")],
            vec![Service::new(ServiceId::new("C"), [true; 7], 20240101, 20241231)],
            vec![],
            vec![],
            vec![],
        )
        .unwrap()
    }

    fn planned() -> PlannedJourney {
        let leg = Leg::new(
            "T1".into(),
            "R".into(),
            "Third",
            "S1".into(),
            "S3".into(),
            1,
            3,
            ServiceTime::parse("08:00:00").unwrap(),
            ServiceTime::parse("08:20:00").unwrap(),
        )
        .unwrap();
        let walk = Walk::new(StopId::new("S1"), StopId::new("S1"), 0.0);
        // A zero-length walk to the boarding stop keeps the mapping simple
        // to exercise; real plans use None or a real walk.
        let journey = Journey::new(Some(walk), vec![leg]).unwrap();
        PlannedJourney {
            journey,
            transfers: 0,
            final_stop: StopId::new("S3"),
            final_distance_km: 0.111,
            total_minutes: 20,
            score: 20,
            partial: false,
        }
    }

    #[test]
    fn journey_maps_to_segments() {
        let response = JourneyResponse::from_planned(&planned(), &store(), "Harbour View");

        assert_eq!(response.segments.len(), 2);
        assert!(matches!(response.segments[0], SegmentDto::Walk(_)));
        match &response.segments[1] {
            SegmentDto::Transit(leg) => {
                assert_eq!(leg.from_stop, "S1");
                assert_eq!(leg.from_name, "First");
                assert_eq!(leg.to_name, "Third");
                assert_eq!(leg.departure, "08:00:00");
            }
            other => panic!("expected transit segment, got {other:?}"),
        }
        assert_eq!(response.destination_address, "Harbour View");
        assert_eq!(response.transfers, 0);
    }

    #[test]
    fn segments_serialize_tagged() {
        let response = JourneyResponse::from_planned(&planned(), &store(), "x");
        let json = serde_json::to_value(&response.segments).unwrap();

        assert_eq!(json[0]["type"], "walk");
        assert_eq!(json[1]["type"], "transit");
        assert_eq!(json[1]["arrival"], "08:20:00");
    }

    #[test]
    fn reason_codes() {
        assert_eq!(
            NoJourneyResponse::from_reason(NoJourneyReason::NoServiceOnDate).reason,
            "no_service_on_date"
        );
        assert_eq!(
            NoJourneyResponse::from_reason(NoJourneyReason::NoPath).reason,
            "no_journey"
        );
        assert_eq!(
            NoJourneyResponse::from_reason(NoJourneyReason::Timeout).reason,
            "timeout"
        );
        assert_eq!(
            NoJourneyResponse::from_reason(NoJourneyReason::IterationCap).reason,
            "iteration_cap"
        );
    }
}
