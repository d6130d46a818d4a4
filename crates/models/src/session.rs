use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Default meeting length when a record has no duration
pub const DEFAULT_DURATION_MINUTES: u32 = 60;

/// Represents the staff-controlled status of a session
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
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
#[strum(ascii_case_insensitive)]
pub enum SessionStatus {
    #[default]
    Scheduled,
    #[strum(serialize = "In Progress")]
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
    Cancelled,
    #[strum(serialize = "No-Show")]
    #[serde(rename = "No-Show")]
    NoShow,
}

impl SessionStatus {
    /// Whether the status can no longer change through the normal lifecycle
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Cancelled | Self::NoShow)
    }
}

/// Tri-state flag for `requirePrep` / `requireFeedback`.
///
/// Older records never had the field, and the program treated them as
/// required, so [`Requirement::Unspecified`] behaves like
/// [`Requirement::Required`] everywhere downstream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Requirement {
    Required,
    NotRequired,
    #[default]
    Unspecified,
}

impl Requirement {
    pub fn is_required(self) -> bool {
        !matches!(self, Self::NotRequired)
    }
}

impl From<Option<bool>> for Requirement {
    fn from(value: Option<bool>) -> Self {
        match value {
            Some(true) => Self::Required,
            Some(false) => Self::NotRequired,
            None => Self::Unspecified,
        }
    }
}

/// A person known to the program (mentor, student or staff)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Contact {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
}

impl Contact {
    /// Case-insensitive comparison against a login email
    pub fn has_email(&self, email: &str) -> bool {
        self.email
            .as_deref()
            .is_some_and(|own| own.trim().eq_ignore_ascii_case(email.trim()))
    }
}

/// The student team a session belongs to
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TeamRef {
    pub id: String,
    pub name: String,
}

/// The part a contact plays in one session
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
#[strum(ascii_case_insensitive)]
pub enum ParticipantRole {
    #[strum(serialize = "Lead Mentor")]
    #[serde(rename = "Lead Mentor")]
    LeadMentor,
    #[strum(serialize = "Supporting Mentor")]
    #[serde(rename = "Supporting Mentor")]
    SupportingMentor,
    Observer,
    Mentee,
}

impl ParticipantRole {
    pub fn is_mentor(self) -> bool {
        matches!(self, Self::LeadMentor | Self::SupportingMentor)
    }
}

/// Attendance state of a participant
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
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
#[strum(ascii_case_insensitive)]
pub enum ParticipantStatus {
    #[default]
    Active,
    Cancelled,
    Declined,
    #[strum(serialize = "No-Show")]
    #[serde(rename = "No-Show")]
    NoShow,
    Invited,
}

impl ParticipantStatus {
    /// Cancelled, declined and no-show participants drop out of every
    /// "active" derivation
    pub fn is_active(self) -> bool {
        matches!(self, Self::Active | Self::Invited)
    }
}

/// Links a contact to a session with a role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub contact: Contact,
    pub role: ParticipantRole,
    pub status: ParticipantStatus,
}

/// Which side of the meeting wrote a feedback record
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
#[strum(ascii_case_insensitive)]
pub enum FeedbackRole {
    Mentor,
    Mentee,
}

/// Post-meeting feedback from one respondent
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SessionFeedback {
    pub id: String,
    /// `None` when the record's role field is blank or unrecognised
    pub role: Option<FeedbackRole>,
    pub respondent: Option<Contact>,
    pub submitted_at: Option<DateTime<Utc>>,
    /// Mentee rating of the session, 1-5
    pub rating: Option<u8>,
    /// Mentee rating of how useful the advice was, 1-5
    pub usefulness: Option<u8>,
    /// Mentor summary, visible to the team
    pub summary: Option<String>,
    /// Staff-only mentor notes
    pub private_notes: Option<String>,
    /// Staff-only mentor assessment of team progress
    pub team_progress: Option<String>,
}

/// Preparation submitted by one respondent before a session
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PreMeetingSubmission {
    pub id: String,
    pub respondent: Option<Contact>,
    pub agenda_items: Option<String>,
    pub questions: Option<String>,
    pub topics: Option<String>,
    pub materials_links: Option<String>,
    pub submitted_at: Option<DateTime<Utc>>,
}

/// A scheduled meeting between mentors and a team
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub session_type: Option<String>,
    pub scheduled_start: Option<DateTime<Utc>>,
    pub duration_minutes: u32,
    pub status: SessionStatus,
    pub meeting_platform: Option<String>,
    pub meeting_url: Option<String>,
    pub agenda: Option<String>,
    pub require_prep: Requirement,
    pub require_feedback: Requirement,
    /// Shared by every session generated from one recurrence configuration
    pub series_id: Option<String>,
    pub team: Option<TeamRef>,
    pub participants: Vec<Participant>,
    /// Legacy mentor link used before per-session participants existed
    pub legacy_mentors: Vec<Contact>,
    pub feedback: Vec<SessionFeedback>,
    pub submissions: Vec<PreMeetingSubmission>,
    pub task_ids: Vec<String>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            id: String::new(),
            session_type: None,
            scheduled_start: None,
            duration_minutes: DEFAULT_DURATION_MINUTES,
            status: SessionStatus::default(),
            meeting_platform: None,
            meeting_url: None,
            agenda: None,
            require_prep: Requirement::default(),
            require_feedback: Requirement::default(),
            series_id: None,
            team: None,
            participants: Vec::new(),
            legacy_mentors: Vec::new(),
            feedback: Vec::new(),
            submissions: Vec::new(),
            task_ids: Vec::new(),
        }
    }
}

impl Session {
    pub fn duration(&self) -> Duration {
        Duration::minutes(i64::from(self.duration_minutes))
    }

    /// Scheduled end, when the session has a start
    pub fn scheduled_end(&self) -> Option<DateTime<Utc>> {
        self.scheduled_start.map(|start| start + self.duration())
    }

    pub fn team_name(&self) -> Option<&str> {
        self.team.as_ref().map(|team| team.name.as_str())
    }

    /// Whether the contact with this email is an active mentee of the session
    pub fn has_mentee(&self, email: &str) -> bool {
        self.participants.iter().any(|p| {
            p.role == ParticipantRole::Mentee && p.status.is_active() && p.contact.has_email(email)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_session_status_labels() {
        assert_eq!(
            SessionStatus::from_str("In Progress").unwrap(),
            SessionStatus::InProgress
        );
        assert_eq!(
            SessionStatus::from_str("no-show").unwrap(),
            SessionStatus::NoShow
        );
        assert_eq!(SessionStatus::NoShow.to_string(), "No-Show");
        assert!(SessionStatus::from_str("Rescheduled").is_err());
    }

    #[test]
    fn test_session_status_serde_matches_display() {
        for status in SessionStatus::iter() {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{status}\""));
        }
    }

    #[test]
    fn test_participant_role_labels() {
        assert_eq!(
            ParticipantRole::from_str("Lead Mentor").unwrap(),
            ParticipantRole::LeadMentor
        );
        assert!(ParticipantRole::SupportingMentor.is_mentor());
        assert!(!ParticipantRole::Observer.is_mentor());
        assert!(!ParticipantRole::Mentee.is_mentor());
    }

    #[test]
    fn test_requirement_from_option() {
        assert_eq!(Requirement::from(Some(true)), Requirement::Required);
        assert_eq!(Requirement::from(Some(false)), Requirement::NotRequired);
        assert_eq!(Requirement::from(None), Requirement::Unspecified);

        assert!(Requirement::Unspecified.is_required());
        assert!(!Requirement::NotRequired.is_required());
    }

    #[test]
    fn test_contact_email_match_ignores_case() {
        let contact = Contact {
            id: "rec1".to_owned(),
            name: "Ada".to_owned(),
            email: Some("Ada@Example.org".to_owned()),
        };
        assert!(contact.has_email("ada@example.org"));
        assert!(!contact.has_email("grace@example.org"));
    }

    #[test]
    fn test_scheduled_end_uses_duration() {
        let start = DateTime::parse_from_rfc3339("2026-03-02T15:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let session = Session {
            scheduled_start: Some(start),
            duration_minutes: 45,
            ..Default::default()
        };
        assert_eq!(session.scheduled_end(), Some(start + Duration::minutes(45)));
        assert_eq!(Session::default().scheduled_end(), None);
    }
}
