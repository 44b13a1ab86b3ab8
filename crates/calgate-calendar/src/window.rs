//! Date parsing and start/end computation for queries and new events.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};

use crate::error::CalendarError;
use crate::types::{DateBoundary, EventWindow};

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse `YYYY-MM-DD`.
///
/// # Errors
///
/// `InvalidDateFormat` carrying the rejected input.
pub fn parse_date(date_iso: &str) -> Result<NaiveDate, CalendarError> {
    NaiveDate::parse_from_str(date_iso, DATE_FORMAT)
        .map_err(|_| CalendarError::InvalidDateFormat(date_iso.to_string()))
}

/// Parse a date plus a `HH:MM:SS` time of day.
///
/// # Errors
///
/// `InvalidDateTimeFormat` carrying the combined input. A leap second
/// (`:60`) is rejected too.
pub fn parse_date_time(date_iso: &str, time_str: &str) -> Result<NaiveDateTime, CalendarError> {
    let combined = format!("{} {}", date_iso, time_str);
    match NaiveDateTime::parse_from_str(&combined, DATE_TIME_FORMAT) {
        // chrono encodes second 60 as an overflowing nanosecond
        Ok(parsed) if parsed.nanosecond() < 1_000_000_000 => Ok(parsed),
        _ => Err(CalendarError::InvalidDateTimeFormat(combined)),
    }
}

/// UTC query range that anchors one calendar day for the all-day lookup.
///
/// Spans `00:00:00Z` to `00:01:00Z`: any all-day event on that date overlaps it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    pub time_min: DateTime<Utc>,
    pub time_max: DateTime<Utc>,
}

impl DayWindow {
    pub fn for_date(day: NaiveDate) -> Self {
        let time_min = day.and_time(NaiveTime::MIN).and_utc();
        Self {
            time_min,
            time_max: time_min + Duration::minutes(1),
        }
    }
}

impl EventWindow {
    /// Whole-day event: ends on the following date.
    pub fn all_day(day: NaiveDate) -> Self {
        Self {
            start: DateBoundary::AllDay { date: day },
            end: DateBoundary::AllDay {
                date: day + Duration::days(1),
            },
        }
    }

    /// One-hour event in `time_zone`. A start in the 23:00 hour ends on the next day.
    pub fn timed(start: NaiveDateTime, time_zone: &str) -> Self {
        Self {
            start: DateBoundary::Timed {
                date_time: start,
                time_zone: time_zone.to_string(),
            },
            end: DateBoundary::Timed {
                date_time: start + Duration::hours(1),
                time_zone: time_zone.to_string(),
            },
        }
    }
}
