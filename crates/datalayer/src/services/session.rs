use crate::{
    client::DataSource,
    error::{DataError, ServiceError},
    queries,
    records::{SessionRecord, decode_valid},
};
use chrono::{DateTime, SecondsFormat, Utc};
use futures::future::try_join_all;
use log::{error, info};
use models::{
    format::{DisplayZone, parse_instant},
    recurrence::{RecurrenceConfig, generate_occurrences},
    session::{ParticipantRole, Session, SessionStatus},
    validation::SessionDraft,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
struct SessionsData {
    sessions: Vec<SessionRecord>,
}

#[derive(Debug, Deserialize)]
struct SessionData {
    session: Option<SessionRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdatedSessionData {
    update_session: Option<SessionRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatedSessionRecord {
    id: String,
    scheduled_start: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatedSessionsData {
    create_sessions: Vec<CreatedSessionRecord>,
}

/// A session record the provider just created
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatedSession {
    pub id: String,
    pub scheduled_start: Option<DateTime<Utc>>,
}

/// The outcome of creating sessions from one form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatedSeries {
    /// `None` for a one-off session
    pub series_id: Option<String>,
    pub sessions: Vec<CreatedSession>,
}

pub struct SessionService;

impl SessionService {
    /// The provider accepts at most this many records per create call
    pub const BATCH_SIZE: usize = 10;

    pub async fn list_sessions<S: DataSource>(source: &S) -> Result<Vec<Session>, DataError> {
        let data: SessionsData = source
            .execute(queries::SESSIONS, json!({}))
            .await
            .inspect_err(|e| error!("Failed to list sessions: {e}"))?;

        Ok(decode_valid(data.sessions))
    }

    pub async fn get_session<S: DataSource>(source: &S, id: &str) -> Result<Session, DataError> {
        let data: SessionData = source
            .execute(queries::SESSION, json!({ "id": id }))
            .await
            .inspect_err(|e| error!("Failed to fetch session {id}: {e}"))?;

        let record = data
            .session
            .ok_or_else(|| DataError::NotFound(id.to_owned()))?;

        Session::try_from(record)
    }

    pub async fn update_status<S: DataSource>(
        source: &S,
        id: &str,
        status: SessionStatus,
    ) -> Result<Session, DataError> {
        let data: UpdatedSessionData = source
            .execute(
                queries::UPDATE_SESSION_STATUS,
                json!({ "id": id, "status": status.to_string() }),
            )
            .await
            .inspect_err(|e| error!("Failed to set session {id} to {status}: {e}"))?;

        let record = data
            .update_session
            .ok_or_else(|| DataError::NotFound(id.to_owned()))?;

        info!("Session {id} is now {status}");
        Session::try_from(record)
    }

    /// Validates the draft and expands the recurrence without writing anything
    ///
    /// # Returns
    /// The start of every session the series would create
    pub fn plan_series(
        draft: &SessionDraft,
        recurrence: &RecurrenceConfig,
        zone: DisplayZone,
    ) -> Result<Vec<DateTime<Utc>>, ServiceError> {
        draft.validate()?;

        let Some(start) = draft.scheduled_start else {
            return Ok(Vec::new());
        };

        Ok(generate_occurrences(start, recurrence, zone)?)
    }

    /// Creates one session from a draft
    pub async fn create_session<S: DataSource>(
        source: &S,
        draft: &SessionDraft,
    ) -> Result<CreatedSeries, ServiceError> {
        draft.validate()?;

        let starts: Vec<DateTime<Utc>> = draft.scheduled_start.into_iter().collect();
        let sessions = Self::create_records(source, draft, &starts, None).await?;
        Ok(CreatedSeries {
            series_id: None,
            sessions,
        })
    }

    /// Creates every session of a recurring series under one new series id.
    ///
    /// Batches are sent concurrently and the whole call fails on the first
    /// failed batch. Batches that already succeeded are not rolled back.
    pub async fn create_series<S: DataSource>(
        source: &S,
        draft: &SessionDraft,
        recurrence: &RecurrenceConfig,
        zone: DisplayZone,
    ) -> Result<CreatedSeries, ServiceError> {
        let occurrences = Self::plan_series(draft, recurrence, zone)?;
        let series_id = Uuid::new_v4().to_string();

        let sessions =
            Self::create_records(source, draft, &occurrences, Some(series_id.as_str())).await?;

        Ok(CreatedSeries {
            series_id: Some(series_id),
            sessions,
        })
    }

    async fn create_records<S: DataSource>(
        source: &S,
        draft: &SessionDraft,
        occurrences: &[DateTime<Utc>],
        series_id: Option<&str>,
    ) -> Result<Vec<CreatedSession>, DataError> {
        let total = occurrences.len();
        let batches = total.div_ceil(Self::BATCH_SIZE);
        info!("Creating {total} sessions in {batches} batch(es)");

        let batch_futures = occurrences
            .chunks(Self::BATCH_SIZE)
            .enumerate()
            .map(|(batch_idx, batch)| {
                let records: Vec<Value> = batch
                    .iter()
                    .map(|&start| session_input(draft, start, series_id))
                    .collect();

                async move {
                    let result: Result<CreatedSessionsData, DataError> = source
                        .execute(queries::CREATE_SESSIONS, json!({ "records": records }))
                        .await;

                    match &result {
                        Ok(data) => info!(
                            "Completed batch {}/{batches}, {} sessions created",
                            batch_idx + 1,
                            data.create_sessions.len()
                        ),
                        Err(e) => error!("Error in batch {}/{batches}: {e}", batch_idx + 1),
                    }

                    result
                }
            });

        let created: Vec<CreatedSessionsData> = try_join_all(batch_futures).await?;

        created
            .into_iter()
            .flat_map(|data| data.create_sessions)
            .map(|record| -> Result<CreatedSession, DataError> {
                let scheduled_start = match record.scheduled_start.as_deref() {
                    Some(raw) => Some(parse_instant(raw).map_err(|e| DataError::Malformed {
                        id: record.id.clone(),
                        reason: e.to_string(),
                    })?),
                    None => None,
                };

                Ok(CreatedSession {
                    id: record.id,
                    scheduled_start,
                })
            })
            .collect()
    }
}

/// The provider's input object for one new session
fn session_input(draft: &SessionDraft, start: DateTime<Utc>, series_id: Option<&str>) -> Value {
    let mut participants: Vec<Value> = Vec::new();
    if let Some(lead) = &draft.lead_mentor_id {
        participants.push(json!({
            "contact": lead,
            "role": ParticipantRole::LeadMentor.to_string(),
        }));
    }
    for supporting in &draft.supporting_mentor_ids {
        participants.push(json!({
            "contact": supporting,
            "role": ParticipantRole::SupportingMentor.to_string(),
        }));
    }

    json!({
        "sessionType": draft.session_type,
        "team": draft.team_id,
        "scheduledStart": start.to_rfc3339_opts(SecondsFormat::Secs, true),
        "duration": draft.duration_minutes,
        "status": draft.status.unwrap_or_default().to_string(),
        "meetingPlatform": draft.meeting_platform,
        "meetingUrl": draft.meeting_url,
        "agenda": draft.agenda,
        "requirePrep": draft.require_prep,
        "requireFeedback": draft.require_feedback,
        "seriesId": series_id,
        "participants": participants,
    })
}
