//! Service-day time handling for GTFS schedules.
//!
//! GTFS stop times are `HH:MM:SS` strings where the hour may exceed 23 to
//! place a stop on the day after the service day (a trip starting 23:55 may
//! arrive 24:10). Comparing such strings lexicographically is wrong past
//! midnight, so times are normalized at parse time to seconds since midnight
//! of the service day and all comparisons are numeric.

use std::fmt;

use chrono::{Duration, NaiveTime, Timelike};

/// Largest hour accepted in a GTFS time. Feeds use hours up to the low
/// thirties for overnight service; anything past 47 is treated as garbage.
const MAX_HOUR: u32 = 47;

/// Error returned when parsing an invalid time string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// A time on a service day, in seconds since that day's midnight.
///
/// Values past 86 400 denote the following calendar day and order correctly
/// with no special casing.
///
/// # Examples
///
/// ```
/// use transit_server::domain::ServiceTime;
///
/// let morning = ServiceTime::parse("08:10:30").unwrap();
/// assert_eq!(morning.to_string(), "08:10:30");
///
/// // Next-day service orders after late evening.
/// let late = ServiceTime::parse("23:55:00").unwrap();
/// let after_midnight = ServiceTime::parse("24:10:00").unwrap();
/// assert!(after_midnight > late);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ServiceTime(u32);

impl ServiceTime {
    /// Build a time from hour/minute/second components.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the hour exceeds 47 or minute/second exceed 59.
    pub fn from_hms(hour: u32, minute: u32, second: u32) -> Result<Self, TimeError> {
        if hour > MAX_HOUR {
            return Err(TimeError::new("hour out of range"));
        }
        if minute > 59 {
            return Err(TimeError::new("minute must be 0-59"));
        }
        if second > 59 {
            return Err(TimeError::new("second must be 0-59"));
        }
        Ok(Self(hour * 3600 + minute * 60 + second))
    }

    /// Parse a GTFS `HH:MM:SS` or `H:MM:SS` time.
    ///
    /// Hours from 0 to 47 are accepted; 24 and above denote the next
    /// calendar day.
    pub fn parse(s: &str) -> Result<Self, TimeError> {
        let mut parts = s.split(':');
        let (h, m, sec) = match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(h), Some(m), Some(sec), None) => (h, m, sec),
            _ => return Err(TimeError::new("expected HH:MM:SS")),
        };

        if h.is_empty() || h.len() > 2 || m.len() != 2 || sec.len() != 2 {
            return Err(TimeError::new("expected HH:MM:SS"));
        }

        let hour = parse_digits(h).ok_or_else(|| TimeError::new("invalid hour digits"))?;
        let minute = parse_digits(m).ok_or_else(|| TimeError::new("invalid minute digits"))?;
        let second = parse_digits(sec).ok_or_else(|| TimeError::new("invalid second digits"))?;

        Self::from_hms(hour, minute, second)
    }

    /// The given wall-clock time of day as a service time.
    pub fn from_naive(time: NaiveTime) -> Self {
        Self(time.num_seconds_from_midnight())
    }

    /// Seconds since midnight of the service day.
    pub fn seconds(&self) -> u32 {
        self.0
    }

    /// The hour component (may exceed 23 for next-day times).
    pub fn hour(&self) -> u32 {
        self.0 / 3600
    }

    /// The minute component (0-59).
    pub fn minute(&self) -> u32 {
        self.0 / 60 % 60
    }

    /// The second component (0-59).
    pub fn second(&self) -> u32 {
        self.0 % 60
    }

    /// Add whole minutes, e.g. for transfer buffers and walk offsets.
    pub fn plus_minutes(&self, minutes: u32) -> Self {
        Self(self.0 + minutes * 60)
    }

    /// Whole minutes elapsed since `earlier` (negative if `earlier` is
    /// actually later). Fractional minutes round toward zero.
    pub fn minutes_since(&self, earlier: Self) -> i64 {
        (self.0 as i64 - earlier.0 as i64) / 60
    }

    /// The signed duration since `earlier`.
    pub fn signed_duration_since(&self, earlier: Self) -> Duration {
        Duration::seconds(self.0 as i64 - earlier.0 as i64)
    }
}

impl fmt::Debug for ServiceTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ServiceTime({self})")
    }
}

impl fmt::Display for ServiceTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.hour(),
            self.minute(),
            self.second()
        )
    }
}

/// Parse a 1-2 digit ASCII number.
fn parse_digits(s: &str) -> Option<u32> {
    if s.bytes().all(|b| b.is_ascii_digit()) {
        s.parse().ok()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_times() {
        let t = ServiceTime::parse("00:00:00").unwrap();
        assert_eq!(t.seconds(), 0);

        let t = ServiceTime::parse("08:10:30").unwrap();
        assert_eq!((t.hour(), t.minute(), t.second()), (8, 10, 30));

        let t = ServiceTime::parse("23:59:59").unwrap();
        assert_eq!(t.seconds(), 86_399);

        // Single-digit hour, as seen in some feeds.
        let t = ServiceTime::parse("7:05:00").unwrap();
        assert_eq!(t.hour(), 7);
    }

    #[test]
    fn parse_next_day_times() {
        let t = ServiceTime::parse("24:10:00").unwrap();
        assert_eq!(t.hour(), 24);
        assert_eq!(t.seconds(), 24 * 3600 + 600);

        let t = ServiceTime::parse("30:00:00").unwrap();
        assert_eq!(t.hour(), 30);
    }

    #[test]
    fn parse_invalid() {
        assert!(ServiceTime::parse("").is_err());
        assert!(ServiceTime::parse("08:00").is_err());
        assert!(ServiceTime::parse("08:00:00:00").is_err());
        assert!(ServiceTime::parse("ab:cd:ef").is_err());
        assert!(ServiceTime::parse("08:60:00").is_err());
        assert!(ServiceTime::parse("08:00:60").is_err());
        assert!(ServiceTime::parse("48:00:00").is_err());
        assert!(ServiceTime::parse("08:0:00").is_err());
        assert!(ServiceTime::parse("-8:00:00").is_err());
    }

    #[test]
    fn next_day_orders_after_evening() {
        let late = ServiceTime::parse("23:55:00").unwrap();
        let next = ServiceTime::parse("24:05:00").unwrap();
        assert!(next > late);

        // The lexicographic-string comparison trap: "25:00:00" sorts before
        // "3:00:00" as a string but after it as a time.
        let very_late = ServiceTime::parse("25:00:00").unwrap();
        let early = ServiceTime::parse("3:00:00").unwrap();
        assert!(very_late > early);
    }

    #[test]
    fn plus_minutes_and_minutes_since() {
        let t = ServiceTime::parse("08:10:00").unwrap();
        assert_eq!(t.plus_minutes(5).to_string(), "08:15:00");

        let dep = ServiceTime::parse("08:00:00").unwrap();
        let arr = ServiceTime::parse("08:20:00").unwrap();
        assert_eq!(arr.minutes_since(dep), 20);
        assert_eq!(dep.minutes_since(arr), -20);

        // Partial minutes round toward zero.
        let arr = ServiceTime::parse("08:20:30").unwrap();
        assert_eq!(arr.minutes_since(dep), 20);
    }

    #[test]
    fn crossing_midnight_via_plus_minutes() {
        let t = ServiceTime::parse("23:50:00").unwrap();
        let later = t.plus_minutes(20);
        assert_eq!(later.to_string(), "24:10:00");
        assert!(later > t);
    }

    #[test]
    fn display_roundtrip() {
        for s in ["00:00:00", "09:05:00", "23:59:59", "26:30:00"] {
            assert_eq!(ServiceTime::parse(s).unwrap().to_string(), s);
        }
    }

    #[test]
    fn signed_duration() {
        let a = ServiceTime::parse("10:00:00").unwrap();
        let b = ServiceTime::parse("12:30:00").unwrap();
        assert_eq!(
            b.signed_duration_since(a),
            Duration::hours(2) + Duration::minutes(30)
        );
    }

    #[test]
    fn from_naive() {
        let t = ServiceTime::from_naive(NaiveTime::from_hms_opt(14, 30, 15).unwrap());
        assert_eq!(t.to_string(), "14:30:15");
    }
}
