use chrono::{DateTime, Utc};
use datalayer::services::session::CreatedSeries;
use models::{format::DisplayZone, recurrence::RecurrenceInput, validation::SessionDraft};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A session form plus how it repeats
#[derive(Debug, Deserialize, ToSchema)]
pub struct SeriesRequest {
    /// The first session; its start anchors the series
    #[schema(value_type = Object)]
    pub session: SessionDraft,

    /// `frequency` (weekly, biweekly or monthly) with exactly one of
    /// `occurrences` or `endDate`
    #[schema(value_type = Object)]
    pub recurrence: RecurrenceInput,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OccurrenceResponse {
    pub start: DateTime<Utc>,
    /// e.g. "Tue, Mar 3, 2026 at 3:00 PM EST"
    pub label: String,
}

impl OccurrenceResponse {
    pub fn new(start: DateTime<Utc>, zone: DisplayZone) -> Self {
        Self {
            start,
            label: zone.format_date_time(start),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SeriesPreviewResponse {
    pub count: usize,
    pub occurrences: Vec<OccurrenceResponse>,
}

impl SeriesPreviewResponse {
    pub fn new(starts: Vec<DateTime<Utc>>, zone: DisplayZone) -> Self {
        Self {
            count: starts.len(),
            occurrences: starts
                .into_iter()
                .map(|start| OccurrenceResponse::new(start, zone))
                .collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedSessionResponse {
    pub id: String,
    pub scheduled_start: Option<DateTime<Utc>>,
    pub label: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedSeriesResponse {
    /// Absent for a one-off session
    pub series_id: Option<String>,
    pub sessions: Vec<CreatedSessionResponse>,
}

impl CreatedSeriesResponse {
    pub fn new(created: CreatedSeries, zone: DisplayZone) -> Self {
        Self {
            series_id: created.series_id,
            sessions: created
                .sessions
                .into_iter()
                .map(|session| CreatedSessionResponse {
                    label: session.scheduled_start.map(|s| zone.format_date_time(s)),
                    id: session.id,
                    scheduled_start: session.scheduled_start,
                })
                .collect(),
        }
    }
}
