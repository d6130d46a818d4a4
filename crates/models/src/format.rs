use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};
use thiserror::Error;

/// Raised when a date or timezone string cannot be understood
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub enum FormatError {
    #[error("invalid date-time '{0}'")]
    InvalidInstant(String),
    #[error("invalid date '{0}'")]
    InvalidDate(String),
    #[error("unknown timezone '{0}'")]
    UnknownTimezone(String),
}

/// The single civil timezone every user-facing time is rendered in,
/// independent of where the viewer is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayZone(Tz);

impl DisplayZone {
    pub const DEFAULT: Self = DisplayZone(chrono_tz::America::New_York);

    pub fn new(tz: Tz) -> Self {
        Self(tz)
    }

    pub fn tz(self) -> Tz {
        self.0
    }

    pub fn local(self, instant: DateTime<Utc>) -> DateTime<Tz> {
        instant.with_timezone(&self.0)
    }

    /// Calendar date of an instant in the display zone
    pub fn date_of(self, instant: DateTime<Utc>) -> NaiveDate {
        self.local(instant).date_naive()
    }

    /// Today's date in the display zone
    pub fn today(self, now: DateTime<Utc>) -> NaiveDate {
        self.date_of(now)
    }

    /// Maps a wall-clock time in the display zone back to an instant.
    ///
    /// Ambiguous times (fall back) take the earlier instant. Times that do not
    /// exist (spring forward) are pushed forward by the gap.
    pub fn instant_of(self, local: NaiveDateTime) -> DateTime<Utc> {
        match self.0.from_local_datetime(&local).earliest() {
            Some(resolved) => resolved.with_timezone(&Utc),
            None => {
                let shifted = local + Duration::hours(1);
                self.0
                    .from_local_datetime(&shifted)
                    .earliest()
                    .map(|resolved| resolved.with_timezone(&Utc))
                    .unwrap_or_else(|| Utc.from_utc_datetime(&local))
            }
        }
    }

    /// e.g. "Tue, Mar 3, 2026"
    pub fn format_date(self, instant: DateTime<Utc>) -> String {
        self.local(instant).format("%a, %b %-d, %Y").to_string()
    }

    /// e.g. "3:00 PM EST"
    pub fn format_time(self, instant: DateTime<Utc>) -> String {
        self.local(instant).format("%-I:%M %p %Z").to_string()
    }

    /// e.g. "Tue, Mar 3, 2026 at 3:00 PM EST"
    pub fn format_date_time(self, instant: DateTime<Utc>) -> String {
        format!(
            "{} at {}",
            self.format_date(instant),
            self.format_time(instant)
        )
    }

    /// e.g. "3:00 PM - 4:00 PM EST"
    pub fn format_time_range(self, start: DateTime<Utc>, duration_minutes: u32) -> String {
        let end = start + Duration::minutes(i64::from(duration_minutes));
        format!(
            "{} - {}",
            self.local(start).format("%-I:%M %p"),
            self.format_time(end)
        )
    }

    /// e.g. "March 2026", used as a grouping label
    pub fn format_month(self, instant: DateTime<Utc>) -> String {
        self.local(instant).format("%B %Y").to_string()
    }
}

impl Default for DisplayZone {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl FromStr for DisplayZone {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<Tz>()
            .map(Self)
            .map_err(|_| FormatError::UnknownTimezone(s.to_owned()))
    }
}

impl Display for DisplayZone {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.0.name())
    }
}

/// Parses an ISO-8601 instant ("2026-03-03T20:00:00.000Z" or with an offset)
pub fn parse_instant(s: &str) -> Result<DateTime<Utc>, FormatError> {
    DateTime::parse_from_rfc3339(s.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| FormatError::InvalidInstant(s.to_owned()))
}

/// Parses a calendar date ("2026-03-03")
pub fn parse_date(s: &str) -> Result<NaiveDate, FormatError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| FormatError::InvalidDate(s.to_owned()))
}
