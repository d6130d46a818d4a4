//! Raw record shapes returned by the GraphQL proxy and their conversion into
//! domain types.
//!
//! Linked records arrive as nested objects, single selects as their label
//! strings and checkboxes as nullable booleans.

use crate::error::DataError;
use chrono::{DateTime, NaiveDate, Utc};
use log::warn;
use models::{
    format::{parse_date, parse_instant},
    session::{
        Contact, DEFAULT_DURATION_MINUTES, FeedbackRole, Participant, ParticipantStatus,
        PreMeetingSubmission, Session, SessionFeedback, SessionStatus, TeamRef,
    },
    task::{Task, TaskStatus, TaskUpdate},
};
use serde::Deserialize;
use std::str::FromStr;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRecord {
    pub id: String,
    pub full_name: Option<String>,
    pub email: Option<String>,
}

impl From<ContactRecord> for Contact {
    fn from(record: ContactRecord) -> Self {
        Self {
            id: record.id,
            name: record.full_name.unwrap_or_default(),
            email: record.email.filter(|email| !email.trim().is_empty()),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamRecord {
    pub id: String,
    pub team_name: Option<String>,
}

impl From<TeamRecord> for TeamRef {
    fn from(record: TeamRecord) -> Self {
        Self {
            id: record.id,
            name: record.team_name.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantRecord {
    pub id: String,
    pub role: Option<String>,
    pub status: Option<String>,
    pub contact: Option<ContactRecord>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRecord {
    pub id: String,
    pub role: Option<String>,
    pub respondent: Option<ContactRecord>,
    pub submitted_at: Option<String>,
    pub rating: Option<u8>,
    pub usefulness: Option<u8>,
    pub summary: Option<String>,
    pub private_notes: Option<String>,
    pub team_progress: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRecord {
    pub id: String,
    pub respondent: Option<ContactRecord>,
    pub agenda_items: Option<String>,
    pub questions: Option<String>,
    pub topics: Option<String>,
    pub materials_links: Option<String>,
    pub submitted_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LinkRecord {
    pub id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub id: String,
    pub session_type: Option<String>,
    pub scheduled_start: Option<String>,
    pub duration: Option<u32>,
    pub status: Option<String>,
    pub meeting_platform: Option<String>,
    pub meeting_url: Option<String>,
    pub agenda: Option<String>,
    pub require_prep: Option<bool>,
    pub require_feedback: Option<bool>,
    pub series_id: Option<String>,
    pub team: Option<TeamRecord>,
    pub mentor: Option<Vec<ContactRecord>>,
    pub session_participants: Option<Vec<ParticipantRecord>>,
    pub feedback: Option<Vec<FeedbackRecord>>,
    pub pre_meeting_submissions: Option<Vec<SubmissionRecord>>,
    pub tasks: Option<Vec<LinkRecord>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskUpdateRecord {
    pub id: String,
    pub health: Option<String>,
    pub message: Option<String>,
    pub created_at: Option<String>,
    pub author: Option<ContactRecord>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    pub id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub due_date: Option<String>,
    pub session_id: Option<String>,
    pub team: Option<TeamRecord>,
    pub assignee: Option<ContactRecord>,
    pub updates: Option<Vec<TaskUpdateRecord>>,
}

/// Parses a single-select label, dropping labels this program does not know.
fn select<T: FromStr>(record_id: &str, field: &str, label: Option<&str>) -> Option<T> {
    let label = label.map(str::trim).filter(|label| !label.is_empty())?;

    match label.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("record {record_id}: ignoring unknown {field} {label:?}");
            None
        }
    }
}

fn malformed(record_id: &str, reason: impl Into<String>) -> DataError {
    DataError::Malformed {
        id: record_id.to_owned(),
        reason: reason.into(),
    }
}

fn instant(record_id: &str, field: &str, raw: Option<&str>) -> Result<Option<DateTime<Utc>>, DataError> {
    match raw.map(str::trim).filter(|raw| !raw.is_empty()) {
        Some(raw) => parse_instant(raw)
            .map(Some)
            .map_err(|e| malformed(record_id, format!("{field}: {e}"))),
        None => Ok(None),
    }
}

fn date(record_id: &str, field: &str, raw: Option<&str>) -> Result<Option<NaiveDate>, DataError> {
    match raw.map(str::trim).filter(|raw| !raw.is_empty()) {
        Some(raw) => parse_date(raw)
            .map(Some)
            .map_err(|e| malformed(record_id, format!("{field}: {e}"))),
        None => Ok(None),
    }
}

fn participant(record: ParticipantRecord) -> Option<Participant> {
    let role = select(&record.id, "participant role", record.role.as_deref())?;
    let Some(contact) = record.contact else {
        warn!("participant {} has no contact", record.id);
        return None;
    };

    Some(Participant {
        contact: contact.into(),
        role,
        status: select(&record.id, "participant status", record.status.as_deref())
            .unwrap_or(ParticipantStatus::Active),
    })
}

impl TryFrom<FeedbackRecord> for SessionFeedback {
    type Error = DataError;

    fn try_from(record: FeedbackRecord) -> Result<Self, Self::Error> {
        let submitted_at = instant(&record.id, "submittedAt", record.submitted_at.as_deref())?;
        let role = select::<FeedbackRole>(&record.id, "feedback role", record.role.as_deref());

        Ok(Self {
            id: record.id,
            role,
            respondent: record.respondent.map(Contact::from),
            submitted_at,
            rating: record.rating,
            usefulness: record.usefulness,
            summary: record.summary,
            private_notes: record.private_notes,
            team_progress: record.team_progress,
        })
    }
}

impl TryFrom<SubmissionRecord> for PreMeetingSubmission {
    type Error = DataError;

    fn try_from(record: SubmissionRecord) -> Result<Self, Self::Error> {
        let submitted_at = instant(&record.id, "submittedAt", record.submitted_at.as_deref())?;

        Ok(Self {
            id: record.id,
            respondent: record.respondent.map(Contact::from),
            agenda_items: record.agenda_items,
            questions: record.questions,
            topics: record.topics,
            materials_links: record.materials_links,
            submitted_at,
        })
    }
}

impl TryFrom<SessionRecord> for Session {
    type Error = DataError;

    /// A malformed start time or an unknown session status rejects the record.
    /// Unknown participant roles only drop that participant.
    fn try_from(record: SessionRecord) -> Result<Self, Self::Error> {
        let id = record.id;
        let scheduled_start = instant(&id, "scheduledStart", record.scheduled_start.as_deref())?;

        let status = match record.status.as_deref().map(str::trim) {
            None | Some("") => SessionStatus::default(),
            Some(label) => label
                .parse()
                .map_err(|_| malformed(&id, format!("unknown status {label:?}")))?,
        };

        let feedback = record
            .feedback
            .unwrap_or_default()
            .into_iter()
            .map(SessionFeedback::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        let submissions = record
            .pre_meeting_submissions
            .unwrap_or_default()
            .into_iter()
            .map(PreMeetingSubmission::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            scheduled_start,
            duration_minutes: record
                .duration
                .filter(|&minutes| minutes > 0)
                .unwrap_or(DEFAULT_DURATION_MINUTES),
            status,
            session_type: record.session_type.filter(|s| !s.trim().is_empty()),
            meeting_platform: record.meeting_platform,
            meeting_url: record.meeting_url.filter(|s| !s.trim().is_empty()),
            agenda: record.agenda,
            require_prep: record.require_prep.into(),
            require_feedback: record.require_feedback.into(),
            series_id: record.series_id.filter(|s| !s.trim().is_empty()),
            team: record.team.map(TeamRef::from),
            participants: record
                .session_participants
                .unwrap_or_default()
                .into_iter()
                .filter_map(participant)
                .collect(),
            legacy_mentors: record
                .mentor
                .unwrap_or_default()
                .into_iter()
                .map(Contact::from)
                .collect(),
            feedback,
            submissions,
            task_ids: record
                .tasks
                .unwrap_or_default()
                .into_iter()
                .map(|link| link.id)
                .collect(),
            id,
        })
    }
}

impl TryFrom<TaskUpdateRecord> for TaskUpdate {
    type Error = DataError;

    fn try_from(record: TaskUpdateRecord) -> Result<Self, Self::Error> {
        let created_at = instant(&record.id, "createdAt", record.created_at.as_deref())?;
        let health = select(&record.id, "health", record.health.as_deref());

        Ok(Self {
            id: record.id,
            health,
            message: record.message.unwrap_or_default(),
            author: record.author.map(Contact::from),
            created_at,
        })
    }
}

impl TryFrom<TaskRecord> for Task {
    type Error = DataError;

    fn try_from(record: TaskRecord) -> Result<Self, Self::Error> {
        let id = record.id;
        let due_date = date(&id, "dueDate", record.due_date.as_deref())?;

        let status = match record.status.as_deref().map(str::trim) {
            None | Some("") => TaskStatus::default(),
            Some(label) => label
                .parse()
                .map_err(|_| malformed(&id, format!("unknown status {label:?}")))?,
        };

        let mut updates = record
            .updates
            .unwrap_or_default()
            .into_iter()
            .map(TaskUpdate::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        // Oldest first, undated updates ahead of dated ones
        updates.sort_by_key(|update| update.created_at);

        Ok(Self {
            name: record.name.unwrap_or_default(),
            description: record.description,
            status,
            priority: select(&id, "priority", record.priority.as_deref()),
            due_date,
            assignee: record.assignee.map(Contact::from),
            session_id: record.session_id,
            team: record.team.map(TeamRef::from),
            updates,
            id,
        })
    }
}

/// Converts a list of raw records, dropping the malformed ones.
///
/// One row with an unexpected label must not blank a whole listing, so
/// each rejected record is logged and skipped.
pub fn decode_valid<R, T>(records: Vec<R>) -> Vec<T>
where
    T: TryFrom<R, Error = DataError>,
{
    let total = records.len();
    let decoded: Vec<T> = records
        .into_iter()
        .filter_map(|record| {
            T::try_from(record)
                .inspect_err(|e| warn!("Skipping record: {e}"))
                .ok()
        })
        .collect();

    if decoded.len() < total {
        warn!("Skipped {} of {total} records", total - decoded.len());
    }

    decoded
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::{
        session::{ParticipantRole, Requirement},
        task::{Health, Priority},
    };
    use serde_json::json;

    fn session_json() -> serde_json::Value {
        json!({
            "id": "recSession1",
            "sessionType": "Team Check-in",
            "scheduledStart": "2026-04-01T19:00:00.000Z",
            "duration": 45,
            "status": "In Progress",
            "meetingUrl": "https://meet.example.org/abc",
            "requirePrep": false,
            "requireFeedback": null,
            "team": { "id": "recTeam", "teamName": "Rocket" },
            "mentor": [{ "id": "recLegacy", "fullName": "Old Mentor", "email": "old@example.org" }],
            "sessionParticipants": [
                {
                    "id": "recP1",
                    "role": "Lead Mentor",
                    "status": "Active",
                    "contact": { "id": "recGrace", "fullName": "Grace", "email": "grace@example.org" }
                },
                {
                    "id": "recP2",
                    "role": "Guest Star",
                    "contact": { "id": "recX", "fullName": "X" }
                },
                {
                    "id": "recP3",
                    "role": "Mentee",
                    "contact": { "id": "recMaya", "fullName": "Maya", "email": "" }
                }
            ],
            "feedback": [
                { "id": "recF1", "role": "Mentor", "summary": "Good progress", "submittedAt": "2026-04-01T20:00:00Z" }
            ],
            "tasks": [{ "id": "recT1" }, { "id": "recT2" }]
        })
    }

    #[test]
    fn test_session_record_decodes() {
        let record: SessionRecord = serde_json::from_value(session_json()).unwrap();
        let session = Session::try_from(record).unwrap();

        assert_eq!(session.status, SessionStatus::InProgress);
        assert_eq!(session.duration_minutes, 45);
        assert_eq!(session.require_prep, Requirement::NotRequired);
        assert_eq!(session.require_feedback, Requirement::Unspecified);
        assert_eq!(session.team_name(), Some("Rocket"));
        assert_eq!(session.legacy_mentors.len(), 1);
        assert_eq!(session.task_ids, vec!["recT1", "recT2"]);

        // The unknown role is dropped, the blank email becomes None
        assert_eq!(session.participants.len(), 2);
        assert_eq!(session.participants[0].role, ParticipantRole::LeadMentor);
        assert_eq!(session.participants[1].contact.email, None);
        assert_eq!(session.participants[1].status, ParticipantStatus::Active);

        assert_eq!(session.feedback[0].role, Some(FeedbackRole::Mentor));
    }

    #[test]
    fn test_sparse_session_gets_defaults() {
        let record: SessionRecord = serde_json::from_value(json!({ "id": "recBare" })).unwrap();
        let session = Session::try_from(record).unwrap();

        assert_eq!(session.status, SessionStatus::Scheduled);
        assert_eq!(session.duration_minutes, DEFAULT_DURATION_MINUTES);
        assert!(session.scheduled_start.is_none());
        assert!(session.participants.is_empty());
    }

    #[test]
    fn test_bad_start_is_rejected() {
        let record: SessionRecord =
            serde_json::from_value(json!({ "id": "recBad", "scheduledStart": "next tuesday" }))
                .unwrap();

        let err = Session::try_from(record).unwrap_err();
        assert!(matches!(err, DataError::Malformed { ref id, .. } if id == "recBad"));
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let record: SessionRecord =
            serde_json::from_value(json!({ "id": "recOdd", "status": "Postponed" })).unwrap();
        assert!(Session::try_from(record).is_err());
    }

    #[test]
    fn test_task_record_decodes() {
        let record: TaskRecord = serde_json::from_value(json!({
            "id": "recTask",
            "name": "Draft pitch deck",
            "status": "In Progress",
            "priority": "High",
            "dueDate": "2026-05-09",
            "assignee": { "id": "recMaya", "fullName": "Maya", "email": "maya@example.org" },
            "updates": [
                { "id": "recU2", "health": "At Risk", "message": "Blocked", "createdAt": "2026-05-03T12:00:00Z" },
                { "id": "recU1", "health": "On Track", "message": "Started", "createdAt": "2026-05-01T12:00:00Z" }
            ]
        }))
        .unwrap();

        let task = Task::try_from(record).unwrap();
        assert_eq!(task.status, TaskStatus::InProgress);
        assert_eq!(task.priority, Some(Priority::High));
        assert_eq!(task.due_date, NaiveDate::from_ymd_opt(2026, 5, 9));
        assert!(task.is_assigned_to("Maya@Example.org"));
        assert_eq!(task.latest_update().unwrap().health, Some(Health::AtRisk));
    }

    #[test]
    fn test_decode_valid_drops_malformed_records() {
        let records = vec![
            TaskRecord {
                id: "ok".to_owned(),
                ..Default::default()
            },
            TaskRecord {
                id: "bad".to_owned(),
                due_date: Some("05/09/2026".to_owned()),
                ..Default::default()
            },
            TaskRecord {
                id: "rescheduled".to_owned(),
                status: Some("Rescheduled".to_owned()),
                ..Default::default()
            },
            TaskRecord {
                id: "also-ok".to_owned(),
                ..Default::default()
            },
        ];

        let tasks: Vec<Task> = decode_valid(records);
        let ids: Vec<&str> = tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["ok", "also-ok"]);
    }
}
