//! CSV readers for the GTFS tables.
//!
//! Each table is read through the `csv` crate (which handles quoting,
//! embedded commas and the header row) into a serde row struct, then
//! converted to a validated domain entity. Unknown columns are ignored, so
//! feeds with vendor extensions load unchanged.

use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::domain::{
    Coord, ExceptionType, Route, RouteId, RouteType, Service, ServiceException, ServiceId,
    ServiceTime, Stop, StopId, StopTime, Trip, TripId,
};

use super::error::FeedError;

/// Read a table into `(line, row)` pairs.
///
/// Returns `Ok(None)` when the file does not exist; callers decide whether
/// absence is fatal.
fn read_rows<T: DeserializeOwned>(
    dir: &Path,
    table: &'static str,
) -> Result<Option<Vec<(u64, T)>>, FeedError> {
    let file = match File::open(dir.join(table)) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(FeedError::Io { table, source: e }),
    };

    let mut reader = csv::Reader::from_reader(file);
    let headers = reader
        .headers()
        .map_err(|e| FeedError::malformed(table, 1, e.to_string()))?
        .clone();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| {
            let line = e.position().map_or(0, |p| p.line());
            FeedError::malformed(table, line, e.to_string())
        })?;
        let line = record.position().map_or(0, |p| p.line());
        let row: T = record
            .deserialize(Some(&headers))
            .map_err(|e| FeedError::malformed(table, line, e.to_string()))?;
        rows.push((line, row));
    }

    Ok(Some(rows))
}

fn require<T>(rows: Option<Vec<(u64, T)>>, table: &'static str) -> Result<Vec<(u64, T)>, FeedError> {
    rows.ok_or(FeedError::Missing(table))
}

#[derive(Debug, Deserialize)]
struct RawStop {
    stop_id: String,
    #[serde(default)]
    stop_name: Option<String>,
    #[serde(default)]
    stop_lat: Option<String>,
    #[serde(default)]
    stop_lon: Option<String>,
}

pub(super) fn read_stops(dir: &Path) -> Result<Vec<Stop>, FeedError> {
    const TABLE: &str = "stops.txt";
    let rows = require(read_rows::<RawStop>(dir, TABLE)?, TABLE)?;

    rows.into_iter()
        .map(|(line, raw)| {
            let lat = raw.stop_lat.as_deref().unwrap_or("").trim();
            let lon = raw.stop_lon.as_deref().unwrap_or("").trim();
            let coord = match (lat.is_empty(), lon.is_empty()) {
                (true, true) => None,
                (false, false) => {
                    let lat: f64 = lat.parse().map_err(|_| {
                        FeedError::malformed(TABLE, line, format!("invalid stop_lat {lat:?}"))
                    })?;
                    let lon: f64 = lon.parse().map_err(|_| {
                        FeedError::malformed(TABLE, line, format!("invalid stop_lon {lon:?}"))
                    })?;
                    Some(Coord::new(lat, lon))
                }
                _ => {
                    return Err(FeedError::malformed(
                        TABLE,
                        line,
                        "stop has only one of stop_lat/stop_lon",
                    ));
                }
            };
            Ok(Stop::new(
                StopId::new(raw.stop_id),
                raw.stop_name.unwrap_or_default(),
                coord,
            ))
        })
        .collect()
}

#[derive(Debug, Deserialize)]
struct RawRoute {
    route_id: String,
    route_type: String,
    #[serde(default)]
    route_short_name: Option<String>,
    #[serde(default)]
    route_long_name: Option<String>,
}

pub(super) fn read_routes(dir: &Path) -> Result<Vec<Route>, FeedError> {
    const TABLE: &str = "routes.txt";
    let rows = require(read_rows::<RawRoute>(dir, TABLE)?, TABLE)?;

    rows.into_iter()
        .map(|(line, raw)| {
            let route_type = raw
                .route_type
                .trim()
                .parse::<u8>()
                .ok()
                .and_then(RouteType::from_code)
                .ok_or_else(|| {
                    FeedError::malformed(
                        TABLE,
                        line,
                        format!("unknown route_type {:?}", raw.route_type),
                    )
                })?;
            Ok(Route::new(
                RouteId::new(raw.route_id),
                route_type,
                raw.route_short_name.unwrap_or_default(),
                raw.route_long_name.unwrap_or_default(),
            ))
        })
        .collect()
}

#[derive(Debug, Deserialize)]
struct RawCalendar {
    service_id: String,
    monday: String,
    tuesday: String,
    wednesday: String,
    thursday: String,
    friday: String,
    saturday: String,
    sunday: String,
    start_date: String,
    end_date: String,
}

fn parse_flag(table: &'static str, line: u64, field: &str, value: &str) -> Result<bool, FeedError> {
    match value.trim() {
        "0" => Ok(false),
        "1" => Ok(true),
        other => Err(FeedError::malformed(
            table,
            line,
            format!("{field} must be 0 or 1, got {other:?}"),
        )),
    }
}

fn parse_date8(table: &'static str, line: u64, field: &str, value: &str) -> Result<u32, FeedError> {
    let value = value.trim();
    let malformed = || FeedError::malformed(table, line, format!("{field} must be YYYYMMDD, got {value:?}"));

    if value.len() != 8 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }
    let ymd: u32 = value.parse().map_err(|_| malformed())?;
    let month = ymd / 100 % 100;
    let day = ymd % 100;
    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return Err(malformed());
    }
    Ok(ymd)
}

pub(super) fn read_calendar(dir: &Path) -> Result<Vec<Service>, FeedError> {
    const TABLE: &str = "calendar.txt";
    let rows = require(read_rows::<RawCalendar>(dir, TABLE)?, TABLE)?;

    rows.into_iter()
        .map(|(line, raw)| {
            let weekdays = [
                parse_flag(TABLE, line, "monday", &raw.monday)?,
                parse_flag(TABLE, line, "tuesday", &raw.tuesday)?,
                parse_flag(TABLE, line, "wednesday", &raw.wednesday)?,
                parse_flag(TABLE, line, "thursday", &raw.thursday)?,
                parse_flag(TABLE, line, "friday", &raw.friday)?,
                parse_flag(TABLE, line, "saturday", &raw.saturday)?,
                parse_flag(TABLE, line, "sunday", &raw.sunday)?,
            ];
            let start = parse_date8(TABLE, line, "start_date", &raw.start_date)?;
            let end = parse_date8(TABLE, line, "end_date", &raw.end_date)?;
            Ok(Service::new(
                ServiceId::new(raw.service_id),
                weekdays,
                start,
                end,
            ))
        })
        .collect()
}

#[derive(Debug, Deserialize)]
struct RawTrip {
    trip_id: String,
    route_id: String,
    service_id: String,
    #[serde(default)]
    trip_headsign: Option<String>,
}

pub(super) fn read_trips(dir: &Path) -> Result<Vec<Trip>, FeedError> {
    const TABLE: &str = "trips.txt";
    let rows = require(read_rows::<RawTrip>(dir, TABLE)?, TABLE)?;

    Ok(rows
        .into_iter()
        .map(|(_, raw)| {
            Trip::new(
                TripId::new(raw.trip_id),
                RouteId::new(raw.route_id),
                ServiceId::new(raw.service_id),
                raw.trip_headsign.unwrap_or_default(),
            )
        })
        .collect())
}

#[derive(Debug, Deserialize)]
struct RawStopTime {
    trip_id: String,
    stop_id: String,
    stop_sequence: String,
    arrival_time: String,
    departure_time: String,
}

pub(super) fn read_stop_times(dir: &Path) -> Result<Vec<StopTime>, FeedError> {
    const TABLE: &str = "stop_times.txt";
    let rows = require(read_rows::<RawStopTime>(dir, TABLE)?, TABLE)?;

    rows.into_iter()
        .map(|(line, raw)| {
            let sequence: u32 = raw.stop_sequence.trim().parse().map_err(|_| {
                FeedError::malformed(
                    TABLE,
                    line,
                    format!("invalid stop_sequence {:?}", raw.stop_sequence),
                )
            })?;
            let arrival = ServiceTime::parse(raw.arrival_time.trim()).map_err(|e| {
                FeedError::malformed(TABLE, line, format!("arrival_time: {e}"))
            })?;
            let departure = ServiceTime::parse(raw.departure_time.trim()).map_err(|e| {
                FeedError::malformed(TABLE, line, format!("departure_time: {e}"))
            })?;
            StopTime::new(
                TripId::new(raw.trip_id),
                StopId::new(raw.stop_id),
                sequence,
                arrival,
                departure,
            )
            .map_err(|e| FeedError::malformed(TABLE, line, e.to_string()))
        })
        .collect()
}

#[derive(Debug, Deserialize)]
struct RawCalendarDate {
    service_id: String,
    date: String,
    exception_type: String,
}

/// `calendar_dates.txt` is optional; absence yields no exceptions.
pub(super) fn read_calendar_dates(dir: &Path) -> Result<Vec<ServiceException>, FeedError> {
    const TABLE: &str = "calendar_dates.txt";
    let Some(rows) = read_rows::<RawCalendarDate>(dir, TABLE)? else {
        return Ok(Vec::new());
    };

    rows.into_iter()
        .map(|(line, raw)| {
            let date = parse_date8(TABLE, line, "date", &raw.date)?;
            let exception_type = raw
                .exception_type
                .trim()
                .parse::<u8>()
                .ok()
                .and_then(ExceptionType::from_code)
                .ok_or_else(|| {
                    FeedError::malformed(
                        TABLE,
                        line,
                        format!("unknown exception_type {:?}", raw.exception_type),
                    )
                })?;
            Ok(ServiceException {
                service_id: ServiceId::new(raw.service_id),
                date,
                exception_type,
            })
        })
        .collect()
}
