use crate::session::{Contact, TeamRef};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Represents where an action item stands
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
pub enum TaskStatus {
    #[default]
    #[strum(serialize = "Not Started")]
    #[serde(rename = "Not Started")]
    NotStarted,
    #[strum(serialize = "In Progress")]
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
    Cancelled,
}

impl TaskStatus {
    /// Open tasks still need work
    pub fn is_open(self) -> bool {
        matches!(self, Self::NotStarted | Self::InProgress)
    }
}

/// Task priority, most urgent first
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    EnumIter,
    AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum Priority {
    Urgent,
    High,
    Medium,
    Low,
}

/// Health reported with a task progress update
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
pub enum Health {
    #[strum(serialize = "On Track")]
    #[serde(rename = "On Track")]
    OnTrack,
    #[strum(serialize = "At Risk")]
    #[serde(rename = "At Risk")]
    AtRisk,
    #[strum(serialize = "Off Track")]
    #[serde(rename = "Off Track")]
    OffTrack,
    Completed,
}

/// A progress note attached to a task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskUpdate {
    pub id: String,
    pub health: Option<Health>,
    pub message: String,
    pub author: Option<Contact>,
    pub created_at: Option<DateTime<Utc>>,
}

/// An action item, usually coming out of a session
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: Option<Priority>,
    pub due_date: Option<NaiveDate>,
    pub assignee: Option<Contact>,
    pub session_id: Option<String>,
    pub team: Option<TeamRef>,
    /// Oldest first
    pub updates: Vec<TaskUpdate>,
}

impl Task {
    /// The most recent progress update, if any
    pub fn latest_update(&self) -> Option<&TaskUpdate> {
        self.updates.last()
    }

    /// An open task whose due date lies before `today`
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status.is_open() && self.due_date.is_some_and(|due| due < today)
    }

    pub fn is_assigned_to(&self, email: &str) -> bool {
        self.assignee
            .as_ref()
            .is_some_and(|contact| contact.has_email(email))
    }
}
