use crate::format::DisplayZone;
use chrono::{DateTime, Duration, Months, NaiveDate, NaiveDateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{AsRefStr, Display, EnumIter, EnumString};
use thiserror::Error;

/// Upper bound on the number of sessions one series may create
pub const MAX_OCCURRENCES: u32 = 52;
/// Upper bound on how far past the first session a series may reach
pub const MAX_DAYS_AHEAD: i64 = 365;

/// Configuration errors for a series
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub enum RecurrenceError {
    #[error("unknown frequency '{0}', expected weekly, biweekly or monthly")]
    UnknownFrequency(String),
    #[error("a series needs exactly one end condition: occurrences or end date")]
    AmbiguousEndCondition,
    #[error("a series needs at least one occurrence")]
    ZeroOccurrences,
    #[error("a series is limited to {max} occurrences, got {requested}")]
    TooManyOccurrences { requested: u32, max: u32 },
    #[error("end date {end} is before the first session on {start}")]
    EndBeforeStart { start: NaiveDate, end: NaiveDate },
    #[error("end date {end} is more than {max_days} days after {start}")]
    EndTooFarAhead {
        start: NaiveDate,
        end: NaiveDate,
        max_days: i64,
    },
    #[error("occurrence {step} of the series falls outside the representable calendar")]
    Unrepresentable { step: u32 },
}

/// How often a series repeats
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Frequency {
    Weekly,
    Biweekly,
    Monthly,
}

impl Frequency {
    /// Wall-clock time of the `step`-th occurrence after `first`.
    ///
    /// Monthly steps are counted from the first occurrence, so a series
    /// starting on the 31st lands on the last day of short months and returns
    /// to the 31st afterwards.
    fn step(self, first: NaiveDateTime, step: u32) -> Option<NaiveDateTime> {
        match self {
            Self::Weekly => first.checked_add_signed(Duration::weeks(i64::from(step))),
            Self::Biweekly => first.checked_add_signed(Duration::weeks(2 * i64::from(step))),
            Self::Monthly => first.checked_add_months(Months::new(step)),
        }
    }
}

/// When a series stops
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EndCondition {
    /// Exactly this many sessions, the first included
    Occurrences(u32),
    /// Every session up to and including this date in the display zone
    EndDate(NaiveDate),
}

/// A validated recurrence configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RecurrenceConfig {
    pub frequency: Frequency,
    pub end: EndCondition,
}

/// The loosely-typed shape forms submit, before validation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurrenceInput {
    pub frequency: String,
    pub occurrences: Option<u32>,
    pub end_date: Option<NaiveDate>,
}

impl TryFrom<RecurrenceInput> for RecurrenceConfig {
    type Error = RecurrenceError;

    fn try_from(input: RecurrenceInput) -> Result<Self, Self::Error> {
        let frequency = Frequency::from_str(input.frequency.trim())
            .map_err(|_| RecurrenceError::UnknownFrequency(input.frequency.clone()))?;

        let end = match (input.occurrences, input.end_date) {
            (Some(count), None) => EndCondition::Occurrences(count),
            (None, Some(date)) => EndCondition::EndDate(date),
            _ => return Err(RecurrenceError::AmbiguousEndCondition),
        };

        Ok(Self { frequency, end })
    }
}

/// Expands a series into the start instants of its sessions.
///
/// Stepping happens on the wall clock of the display zone, so a 3 PM series
/// stays at 3 PM across daylight-saving changes.
///
/// # Arguments
/// * `start` - The first session's start
/// * `config` - Frequency and end condition
/// * `zone` - The program's display timezone
///
/// # Returns
/// A non-empty, strictly increasing list beginning with `start`, or the
/// configuration error that prevents generating one
pub fn generate_occurrences(
    start: DateTime<Utc>,
    config: &RecurrenceConfig,
    zone: DisplayZone,
) -> Result<Vec<DateTime<Utc>>, RecurrenceError> {
    let first_local = zone.local(start).naive_local();
    let first_date = first_local.date();

    let (count, last_date) = match config.end {
        EndCondition::Occurrences(0) => return Err(RecurrenceError::ZeroOccurrences),
        EndCondition::Occurrences(count) if count > MAX_OCCURRENCES => {
            return Err(RecurrenceError::TooManyOccurrences {
                requested: count,
                max: MAX_OCCURRENCES,
            });
        }
        EndCondition::Occurrences(count) => (Some(count), None),
        EndCondition::EndDate(end) if end < first_date => {
            return Err(RecurrenceError::EndBeforeStart {
                start: first_date,
                end,
            });
        }
        EndCondition::EndDate(end) if (end - first_date).num_days() > MAX_DAYS_AHEAD => {
            return Err(RecurrenceError::EndTooFarAhead {
                start: first_date,
                end,
                max_days: MAX_DAYS_AHEAD,
            });
        }
        EndCondition::EndDate(end) => (None, Some(end)),
    };

    let horizon = first_date
        .checked_add_signed(Duration::days(MAX_DAYS_AHEAD))
        .unwrap_or(NaiveDate::MAX);
    let mut occurrences = vec![start];
    let mut step = 1;

    // Each step lands on a later date, so an end date always stops the loop
    loop {
        if let Some(count) = count
            && step >= count
        {
            break;
        }

        // Past the last representable date is past any end date too
        let Some(local) = config.frequency.step(first_local, step) else {
            if last_date.is_some() {
                break;
            }
            return Err(RecurrenceError::Unrepresentable { step });
        };
        let date = local.date();

        if last_date.is_some_and(|last| date > last) {
            break;
        }

        if date > horizon {
            return Err(RecurrenceError::EndTooFarAhead {
                start: first_date,
                end: date,
                max_days: MAX_DAYS_AHEAD,
            });
        }

        let instant = zone.instant_of(local);
        if occurrences.last().is_some_and(|prev| instant <= *prev) {
            return Err(RecurrenceError::Unrepresentable { step });
        }

        occurrences.push(instant);
        step += 1;
    }

    if occurrences.len() > MAX_OCCURRENCES as usize {
        return Err(RecurrenceError::TooManyOccurrences {
            requested: occurrences.len() as u32,
            max: MAX_OCCURRENCES,
        });
    }

    debug!(
        "expanded {} series from {start} into {} occurrences",
        config.frequency,
        occurrences.len()
    );

    Ok(occurrences)
}
