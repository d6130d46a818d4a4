use crate::{
    session::SessionStatus,
    task::{Health, Priority, TaskStatus},
};
use chrono::{DateTime, NaiveDate, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

lazy_static! {
    static ref MEETING_URL: Regex =
        Regex::new(r"^https?://[A-Za-z0-9.-]+\.[A-Za-z]{2,}(:\d+)?(/\S*)?$").unwrap();
    static ref EMAIL: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
}

/// Longest session a form may request, in minutes
pub const MAX_DURATION_MINUTES: u32 = 8 * 60;

/// A single problem with a submitted form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("{field}: {message}")]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Every problem found in a form, reported together
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Error)]
#[error("{} invalid field(s): {}", .errors.len(), summary(.errors))]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

fn summary(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationErrors {
    fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    fn require(&mut self, field: &'static str, value: Option<&str>) {
        if value.is_none_or(|v| v.trim().is_empty()) {
            self.push(field, "is required");
        }
    }

    fn into_result(self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

pub fn is_valid_meeting_url(url: &str) -> bool {
    MEETING_URL.is_match(url.trim())
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL.is_match(email.trim())
}

/// The fields staff or mentors fill in when scheduling a session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDraft {
    pub session_type: Option<String>,
    pub team_id: Option<String>,
    pub scheduled_start: Option<DateTime<Utc>>,
    pub duration_minutes: Option<u32>,
    pub status: Option<SessionStatus>,
    pub meeting_platform: Option<String>,
    pub meeting_url: Option<String>,
    pub agenda: Option<String>,
    pub lead_mentor_id: Option<String>,
    #[serde(default)]
    pub supporting_mentor_ids: Vec<String>,
    pub require_prep: Option<bool>,
    pub require_feedback: Option<bool>,
}

impl SessionDraft {
    /// Checks the draft before any request is issued
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();

        errors.require("sessionType", self.session_type.as_deref());
        errors.require("teamId", self.team_id.as_deref());
        errors.require("leadMentorId", self.lead_mentor_id.as_deref());

        if self.scheduled_start.is_none() {
            errors.push("scheduledStart", "is required");
        }

        match self.duration_minutes {
            None => errors.push("durationMinutes", "is required"),
            Some(0) => errors.push("durationMinutes", "must be greater than zero"),
            Some(minutes) if minutes > MAX_DURATION_MINUTES => errors.push(
                "durationMinutes",
                format!("must be at most {MAX_DURATION_MINUTES} minutes"),
            ),
            Some(_) => {}
        }

        if let Some(url) = self.meeting_url.as_deref()
            && !url.trim().is_empty()
            && !is_valid_meeting_url(url)
        {
            errors.push("meetingUrl", "must be an http(s) link");
        }

        if let Some(lead) = self.lead_mentor_id.as_deref()
            && self.supporting_mentor_ids.iter().any(|id| id == lead)
        {
            errors.push(
                "supportingMentorIds",
                "cannot include the lead mentor",
            );
        }

        errors.into_result()
    }
}

/// The fields of a new or edited task
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub due_date: Option<NaiveDate>,
    pub assignee_email: Option<String>,
    pub session_id: Option<String>,
    pub team_id: Option<String>,
}

impl TaskDraft {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();

        errors.require("name", self.name.as_deref());

        if self.session_id.is_none() && self.team_id.is_none() {
            errors.push("teamId", "a task must belong to a session or a team");
        }

        if let Some(email) = self.assignee_email.as_deref()
            && !is_valid_email(email)
        {
            errors.push("assigneeEmail", "is not a valid email address");
        }

        errors.into_result()
    }
}

/// A progress note about to be posted on a task
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskUpdateDraft {
    pub health: Option<Health>,
    pub message: Option<String>,
    pub author_id: Option<String>,
}

impl TaskUpdateDraft {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();

        errors.require("message", self.message.as_deref());
        if self.health.is_none() {
            errors.push("health", "is required");
        }

        errors.into_result()
    }
}
