use crate::dtos::viewer::to_viewer;
use chrono::{DateTime, Utc};
use models::{
    eligibility::{has_submitted_prep, is_eligible_for_feedback, is_prep_required, session_needs_prep},
    mentors::{mentee_participants, mentor_names, resolve_mentors},
    permissions::{Capability, Role, Viewer, redact_feedback},
    phase::{derive_phase, is_joinable},
    session::{Contact, PreMeetingSubmission, Session, SessionFeedback, SessionStatus},
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use views::{
    context::ViewContext,
    group::Group,
    pipeline::{ListQuery, Listable},
    sessions::{SessionFilter, SessionGroupBy, SessionSortKey},
    sort::SortDirection,
};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SessionListParams {
    /// Whitespace-separated terms, ignored below two characters
    pub search: Option<String>,

    /// all, upcoming, past, needs-feedback or cancelled
    #[param(value_type = Option<String>, example = "upcoming")]
    pub filter: Option<SessionFilter>,

    /// date, type, status, team or mentor
    #[param(value_type = Option<String>, example = "date")]
    pub sort: Option<SessionSortKey>,

    /// asc or desc
    #[param(value_type = Option<String>)]
    pub direction: Option<SortDirection>,

    /// none, status, type, team or month
    #[param(value_type = Option<String>)]
    pub group: Option<SessionGroupBy>,

    #[param(value_type = Option<String>, example = "mentor")]
    pub role: Option<Role>,
    pub email: Option<String>,
}

impl SessionListParams {
    pub fn viewer(&self) -> Viewer {
        to_viewer(self.role, self.email.as_deref())
    }

    pub fn query(&self) -> ListQuery<Session> {
        let query = ListQuery::new(
            self.filter.unwrap_or_default(),
            self.sort.unwrap_or_default(),
            self.group.unwrap_or_default(),
        )
        .with_direction(self.direction.unwrap_or_default());

        match &self.search {
            Some(search) => query.with_search(search.clone()),
            None => query,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SessionSummary {
    pub id: String,
    pub session_type: Option<String>,
    pub scheduled_start: Option<DateTime<Utc>>,
    pub duration_minutes: u32,
    pub status: String,
    /// upcoming, starting-soon, during, completed, cancelled or no-show
    pub phase: Option<String>,
    pub team: Option<String>,
    /// Lead first
    pub mentors: Vec<String>,
    /// Date and time range in the program's timezone
    pub when: Option<String>,
    pub needs_feedback: bool,
    pub needs_prep: bool,
}

impl SessionSummary {
    pub fn new(session: &Session, ctx: &ViewContext) -> Self {
        let when = session.scheduled_start.map(|start| {
            format!(
                "{}, {}",
                ctx.zone.format_date(start),
                ctx.zone.format_time_range(start, session.duration_minutes)
            )
        });

        Self {
            id: session.id.clone(),
            session_type: session.session_type.clone(),
            scheduled_start: session.scheduled_start,
            duration_minutes: session.duration_minutes,
            status: session.status.to_string(),
            phase: derive_phase(session, ctx.now, ctx.window).map(|phase| phase.to_string()),
            team: session.team_name().map(str::to_owned),
            mentors: mentor_names(session),
            when,
            needs_feedback: session.matches(SessionFilter::NeedsFeedback, ctx),
            needs_prep: ctx
                .viewer_email()
                .is_some_and(|email| session_needs_prep(session, email, ctx.now)),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SessionGroupResponse {
    pub label: String,
    pub sessions: Vec<SessionSummary>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SessionListResponse {
    pub groups: Vec<SessionGroupResponse>,
    pub total: usize,
}

impl SessionListResponse {
    pub fn new(groups: Vec<Group<Session>>, ctx: &ViewContext) -> Self {
        let groups: Vec<SessionGroupResponse> = groups
            .into_iter()
            .map(|group| SessionGroupResponse {
                label: group.label,
                sessions: group
                    .items
                    .iter()
                    .map(|session| SessionSummary::new(session, ctx))
                    .collect(),
            })
            .collect();

        Self {
            total: groups.iter().map(|g| g.sessions.len()).sum(),
            groups,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ContactResponse {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
}

impl From<&Contact> for ContactResponse {
    fn from(contact: &Contact) -> Self {
        Self {
            id: contact.id.clone(),
            name: contact.name.clone(),
            email: contact.email.clone(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MentorResponse {
    #[serde(flatten)]
    pub contact: ContactResponse,
    pub role: String,
    pub lead: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FeedbackResponse {
    pub id: String,
    pub role: Option<String>,
    pub respondent: Option<String>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub rating: Option<u8>,
    pub usefulness: Option<u8>,
    pub summary: Option<String>,
    pub private_notes: Option<String>,
    pub team_progress: Option<String>,
}

impl From<SessionFeedback> for FeedbackResponse {
    fn from(feedback: SessionFeedback) -> Self {
        Self {
            id: feedback.id,
            role: feedback.role.map(|role| role.to_string()),
            respondent: feedback.respondent.map(|contact| contact.name),
            submitted_at: feedback.submitted_at,
            rating: feedback.rating,
            usefulness: feedback.usefulness,
            summary: feedback.summary,
            private_notes: feedback.private_notes,
            team_progress: feedback.team_progress,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SubmissionResponse {
    pub id: String,
    pub respondent: Option<String>,
    pub agenda_items: Option<String>,
    pub questions: Option<String>,
    pub topics: Option<String>,
    pub materials_links: Option<String>,
    pub submitted_at: Option<DateTime<Utc>>,
}

impl From<&PreMeetingSubmission> for SubmissionResponse {
    fn from(submission: &PreMeetingSubmission) -> Self {
        Self {
            id: submission.id.clone(),
            respondent: submission.respondent.as_ref().map(|c| c.name.clone()),
            agenda_items: submission.agenda_items.clone(),
            questions: submission.questions.clone(),
            topics: submission.topics.clone(),
            materials_links: submission.materials_links.clone(),
            submitted_at: submission.submitted_at,
        }
    }
}

/// Everything the session page shows, already filtered for the viewer
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionDetail {
    pub summary: SessionSummary,
    pub meeting_platform: Option<String>,
    pub meeting_url: Option<String>,
    /// The meeting is under way or about to start
    pub joinable: bool,
    pub agenda: Option<String>,
    pub series_id: Option<String>,
    /// participants, legacy or none
    pub mentor_source: String,
    pub mentors: Vec<MentorResponse>,
    pub mentees: Vec<ContactResponse>,
    pub feedback_eligible: bool,
    pub feedback: Vec<FeedbackResponse>,
    pub prep_required: bool,
    pub prep_submitted: bool,
    pub prep_submissions: Vec<SubmissionResponse>,
    pub task_ids: Vec<String>,
    pub capabilities: Vec<String>,
}

impl SessionDetail {
    pub fn new(session: &Session, ctx: &ViewContext) -> Self {
        let viewer = &ctx.viewer;
        let resolution = resolve_mentors(session);

        let prep_submissions = if viewer.can(Capability::ViewPrepSubmissions) {
            session.submissions.iter().map(SubmissionResponse::from).collect()
        } else {
            Vec::new()
        };

        Self {
            summary: SessionSummary::new(session, ctx),
            meeting_platform: session.meeting_platform.clone(),
            meeting_url: session.meeting_url.clone(),
            joinable: is_joinable(session, ctx.now, ctx.window),
            agenda: session.agenda.clone(),
            series_id: session.series_id.clone(),
            mentor_source: resolution.source.to_string(),
            mentors: resolution
                .mentors
                .iter()
                .map(|mentor| MentorResponse {
                    contact: ContactResponse::from(&mentor.contact),
                    role: mentor.role.to_string(),
                    lead: mentor.is_lead(),
                })
                .collect(),
            mentees: mentee_participants(session)
                .into_iter()
                .map(|p| ContactResponse::from(&p.contact))
                .collect(),
            feedback_eligible: is_eligible_for_feedback(session, ctx.now),
            feedback: session
                .feedback
                .iter()
                .filter_map(|feedback| redact_feedback(viewer, feedback))
                .map(FeedbackResponse::from)
                .collect(),
            prep_required: is_prep_required(session),
            prep_submitted: ctx
                .viewer_email()
                .is_some_and(|email| has_submitted_prep(session, email)),
            prep_submissions,
            task_ids: session.task_ids.clone(),
            capabilities: viewer
                .role
                .capabilities()
                .into_iter()
                .map(|c| c.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SessionStatusRequest {
    /// Scheduled, In Progress, Completed, Cancelled or No-Show
    #[schema(value_type = String, example = "Completed")]
    pub status: SessionStatus,
}
