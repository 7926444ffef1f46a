//! Date and date-time values parsed from SQLite text

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::fmt;
use tracing::warn;

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const TIME_FORMAT: &str = "%H:%M:%S%.f";

/// Display form of the zero date sentinel
pub const ZERO_DATE: &str = "0000-00-00";
/// Display form of the zero date-time sentinel
pub const ZERO_DATETIME: &str = "0000-00-00 00:00:00";

fn parse_date_part(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT).ok()
}

/// `HH:MM:SS`, with optional fractional seconds. A `:60` second parses as a
/// leap second.
fn parse_time_part(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s, TIME_FORMAT).ok()
}

/// Calendar date. `None` is the zero sentinel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Date(pub Option<NaiveDate>);

impl Date {
    pub fn new(date: NaiveDate) -> Self {
        Self(Some(date))
    }

    /// Parse `YYYY-MM-DD`. Malformed or out-of-range text yields the zero
    /// sentinel and a warning.
    pub fn parse(s: &str) -> Self {
        match parse_date_part(s.trim()) {
            Some(date) => Self(Some(date)),
            None => {
                warn!("Could not parse value '{}' into a date", s);
                Self(None)
            }
        }
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_none()
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(date) => write!(f, "{}", date.format(DATE_FORMAT)),
            None => f.write_str(ZERO_DATE),
        }
    }
}

impl From<NaiveDate> for Date {
    fn from(date: NaiveDate) -> Self {
        Self(Some(date))
    }
}

/// Date and time of day. `None` is the zero sentinel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Datetime(pub Option<NaiveDateTime>);

impl Datetime {
    pub fn new(datetime: NaiveDateTime) -> Self {
        Self(Some(datetime))
    }

    /// Parse `YYYY-MM-DD HH:MM:SS` (a `T` separator is also accepted).
    /// Fractional seconds are kept but not displayed. Malformed or out-of-range text yields the zero sentinel and a warning.
    pub fn parse(s: &str) -> Self {
        let trimmed = s.trim();
        let parsed = trimmed
            .split_once([' ', 'T'])
            .and_then(|(date, time)| Some(parse_date_part(date)?.and_time(parse_time_part(time)?)));
        match parsed {
            Some(datetime) => Self(Some(datetime)),
            None => {
                warn!("Could not parse value '{}' into a date", s);
                Self(None)
            }
        }
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_none()
    }

    pub fn date(&self) -> Date {
        Date(self.0.map(|dt| dt.date()))
    }
}

impl fmt::Display for Datetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(datetime) => write!(f, "{}", datetime.format(DATETIME_FORMAT)),
            None => f.write_str(ZERO_DATETIME),
        }
    }
}

impl From<NaiveDateTime> for Datetime {
    fn from(datetime: NaiveDateTime) -> Self {
        Self(Some(datetime))
    }
}

impl From<Date> for Datetime {
    fn from(date: Date) -> Self {
        Self(date.0.and_then(|d| d.and_hms_opt(0, 0, 0)))
    }
}
