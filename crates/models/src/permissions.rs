use crate::session::{FeedbackRole, SessionFeedback};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

/// Who is looking at the portal
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
pub enum Role {
    Student,
    Mentor,
    Staff,
}

/// A field or action that is shown or hidden per role
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
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Capability {
    ViewAllSessions,
    CreateSession,
    CreateSeries,
    EditSessionDetails,
    EditSessionStatus,
    CancelSession,
    DeleteSession,
    ManageParticipants,
    EditMeetingLink,
    SubmitPrep,
    ViewPrepSubmissions,
    SubmitMentorFeedback,
    SubmitMenteeFeedback,
    ViewMentorSummary,
    ViewMentorPrivateFeedback,
    ViewMenteeRatings,
    CreateTask,
    EditTask,
    DeleteTask,
    PostTaskUpdate,
}

impl Role {
    /// The capability table. Every (role, capability) pair is listed once.
    pub fn can(self, capability: Capability) -> bool {
        use Capability::*;

        match self {
            Role::Staff => true,
            Role::Mentor => matches!(
                capability,
                CreateSession
                    | CreateSeries
                    | EditSessionDetails
                    | EditSessionStatus
                    | CancelSession
                    | EditMeetingLink
                    | ViewPrepSubmissions
                    | SubmitMentorFeedback
                    | ViewMentorSummary
                    | CreateTask
                    | EditTask
                    | PostTaskUpdate
            ),
            Role::Student => matches!(
                capability,
                SubmitPrep
                    | ViewPrepSubmissions
                    | SubmitMenteeFeedback
                    | ViewMentorSummary
                    | CreateTask
                    | EditTask
                    | PostTaskUpdate
            ),
        }
    }

    /// Every capability granted to the role, in declaration order
    pub fn capabilities(self) -> Vec<Capability> {
        Capability::iter().filter(|c| self.can(*c)).collect()
    }
}

/// The signed-in user a view is computed for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewer {
    pub role: Role,
    pub email: Option<String>,
}

impl Viewer {
    pub fn new(role: Role, email: Option<String>) -> Self {
        Self { role, email }
    }

    pub fn can(&self, capability: Capability) -> bool {
        self.role.can(capability)
    }

    fn is_respondent(&self, feedback: &SessionFeedback) -> bool {
        match (&self.email, &feedback.respondent) {
            (Some(email), Some(contact)) => contact.has_email(email),
            _ => false,
        }
    }
}

/// The parts of a feedback record a viewer may see
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct FeedbackVisibility {
    /// The record exists and its public text can be shown
    pub record: bool,
    pub ratings: bool,
    pub private_fields: bool,
}

/// Mentee ratings are for staff and the mentee who wrote them; the mentor's
/// private fields are staff-only.
pub fn feedback_visibility(viewer: &Viewer, feedback: &SessionFeedback) -> FeedbackVisibility {
    let own = viewer.is_respondent(feedback);

    match feedback.role {
        Some(FeedbackRole::Mentee) => FeedbackVisibility {
            record: own || viewer.can(Capability::ViewMenteeRatings),
            ratings: own || viewer.can(Capability::ViewMenteeRatings),
            private_fields: false,
        },
        Some(FeedbackRole::Mentor) => FeedbackVisibility {
            record: own || viewer.can(Capability::ViewMentorSummary),
            ratings: false,
            private_fields: viewer.can(Capability::ViewMentorPrivateFeedback),
        },
        None => FeedbackVisibility {
            record: viewer.role == Role::Staff,
            ..Default::default()
        },
    }
}

/// Strips whatever the viewer is not allowed to see from a feedback record.
///
/// Returns `None` when the record is hidden entirely.
pub fn redact_feedback(viewer: &Viewer, feedback: &SessionFeedback) -> Option<SessionFeedback> {
    let visibility = feedback_visibility(viewer, feedback);
    if !visibility.record {
        return None;
    }

    let mut redacted = feedback.clone();
    if !visibility.ratings {
        redacted.rating = None;
        redacted.usefulness = None;
    }
    if !visibility.private_fields {
        redacted.private_notes = None;
        redacted.team_progress = None;
    }

    Some(redacted)
}
