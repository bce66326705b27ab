//! Service calendar types.
//!
//! A `Service` says on which weekdays, between which dates, its trips run.
//! `calendar_dates.txt` exceptions overlay the weekly pattern: a date can be
//! added to or removed from a service regardless of the weekday bits.

use chrono::{Datelike, NaiveDate};

use super::ServiceId;

/// Convert a calendar date to the GTFS `YYYYMMDD` integer form.
pub fn date_to_yyyymmdd(date: NaiveDate) -> u32 {
    date.year() as u32 * 10_000 + date.month() * 100 + date.day()
}

/// A service calendar entry from `calendar.txt`.
#[derive(Debug, Clone, PartialEq)]
pub struct Service {
    pub id: ServiceId,
    /// One flag per weekday, Monday first.
    pub weekdays: [bool; 7],
    /// Inclusive first active date, `YYYYMMDD`.
    pub start_date: u32,
    /// Inclusive last active date, `YYYYMMDD`.
    pub end_date: u32,
}

impl Service {
    /// Create a calendar entry.
    pub fn new(id: ServiceId, weekdays: [bool; 7], start_date: u32, end_date: u32) -> Self {
        Self {
            id,
            weekdays,
            start_date,
            end_date,
        }
    }

    /// Whether the weekly pattern makes this service active on `date`.
    ///
    /// This is the pure calendar rule; `calendar_dates` exceptions are
    /// applied on top by the service-day filter.
    pub fn active_on(&self, date: NaiveDate) -> bool {
        let ymd = date_to_yyyymmdd(date);
        let weekday = date.weekday().num_days_from_monday() as usize;
        self.weekdays[weekday] && self.start_date <= ymd && ymd <= self.end_date
    }
}

/// The effect of a `calendar_dates.txt` row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExceptionType {
    /// `exception_type` 1: the service runs on this date.
    Added,
    /// `exception_type` 2: the service does not run on this date.
    Removed,
}

impl ExceptionType {
    /// Map the GTFS integer code.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Added),
            2 => Some(Self::Removed),
            _ => None,
        }
    }
}

/// A service exception from `calendar_dates.txt`.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceException {
    pub service_id: ServiceId,
    /// The affected date, `YYYYMMDD`.
    pub date: u32,
    pub exception_type: ExceptionType,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weekdays_only() -> [bool; 7] {
        [true, true, true, true, true, false, false]
    }

    fn service() -> Service {
        Service::new(
            ServiceId::new("C"),
            weekdays_only(),
            20240101,
            20241231,
        )
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn yyyymmdd_conversion() {
        assert_eq!(date_to_yyyymmdd(date(2024, 3, 4)), 20240304);
        assert_eq!(date_to_yyyymmdd(date(2024, 12, 31)), 20241231);
    }

    #[test]
    fn active_on_matching_weekday() {
        // 2024-03-04 is a Monday.
        assert!(service().active_on(date(2024, 3, 4)));
        // 2024-03-08 is a Friday.
        assert!(service().active_on(date(2024, 3, 8)));
    }

    #[test]
    fn inactive_on_weekend() {
        // 2024-03-09 is a Saturday, 2024-03-10 a Sunday.
        assert!(!service().active_on(date(2024, 3, 9)));
        assert!(!service().active_on(date(2024, 3, 10)));
    }

    #[test]
    fn inactive_outside_range() {
        assert!(!service().active_on(date(2023, 12, 25)));
        assert!(!service().active_on(date(2025, 1, 6)));
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let svc = Service::new(
            ServiceId::new("C"),
            [true; 7],
            20240304,
            20240308,
        );
        assert!(svc.active_on(date(2024, 3, 4)));
        assert!(svc.active_on(date(2024, 3, 8)));
        assert!(!svc.active_on(date(2024, 3, 3)));
        assert!(!svc.active_on(date(2024, 3, 9)));
    }

    #[test]
    fn exception_type_codes() {
        assert_eq!(ExceptionType::from_code(1), Some(ExceptionType::Added));
        assert_eq!(ExceptionType::from_code(2), Some(ExceptionType::Removed));
        assert_eq!(ExceptionType::from_code(0), None);
        assert_eq!(ExceptionType::from_code(3), None);
    }
}
