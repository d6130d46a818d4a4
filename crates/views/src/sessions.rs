use crate::{context::ViewContext, pipeline::Listable, sort::SortValue};
use models::{
    eligibility::session_needs_feedback,
    mentors::{is_current_user_mentor, mentor_names},
    permissions::Role,
    phase::has_elapsed,
    session::{ParticipantRole, Session, SessionStatus},
};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Named session filters offered on dashboards
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum SessionFilter {
    #[default]
    All,
    Upcoming,
    Past,
    NeedsFeedback,
    Cancelled,
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum SessionSortKey {
    #[default]
    Date,
    Type,
    Status,
    Team,
    Mentor,
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum SessionGroupBy {
    #[default]
    None,
    Status,
    Type,
    Team,
    Month,
}

fn status_rank(status: SessionStatus) -> u8 {
    match status {
        SessionStatus::InProgress => 0,
        SessionStatus::Scheduled => 1,
        SessionStatus::Completed => 2,
        SessionStatus::NoShow => 3,
        SessionStatus::Cancelled => 4,
    }
}

/// Whether the session has not yet run its course
fn is_upcoming(session: &Session, ctx: &ViewContext) -> bool {
    matches!(
        session.status,
        SessionStatus::Scheduled | SessionStatus::InProgress
    ) && session.scheduled_start.is_some()
        && !has_elapsed(session, ctx.now)
}

fn is_past(session: &Session, ctx: &ViewContext) -> bool {
    match session.status {
        SessionStatus::Completed | SessionStatus::NoShow => true,
        SessionStatus::Cancelled => false,
        SessionStatus::Scheduled | SessionStatus::InProgress => has_elapsed(session, ctx.now),
    }
}

/// Whether a session belongs on the viewer's dashboard.
///
/// Staff see everything. Mentors see the sessions they mentor. Students see
/// sessions that list them as a mentee, or that list no mentees at all. A
/// viewer whose email is unknown is not narrowed.
pub fn is_visible_to(session: &Session, ctx: &ViewContext) -> bool {
    match (ctx.viewer.role, ctx.viewer_email()) {
        (Role::Staff, _) | (_, None) => true,
        (Role::Mentor, Some(email)) => is_current_user_mentor(session, email),
        (Role::Student, Some(email)) => {
            let lists_mentees = session
                .participants
                .iter()
                .any(|p| p.role == ParticipantRole::Mentee);
            !lists_mentees || session.has_mentee(email)
        }
    }
}

/// Whether the viewer may change a session, beyond holding the capability.
///
/// Staff may change any session. Anyone else must be identified by email and
/// take part in it: mentors as one of its mentors, students as a mentee.
pub fn is_managed_by(session: &Session, ctx: &ViewContext) -> bool {
    match (ctx.viewer.role, ctx.viewer_email()) {
        (Role::Staff, _) => true,
        (_, None) => false,
        (Role::Mentor, Some(email)) => is_current_user_mentor(session, email),
        (Role::Student, Some(email)) => session.has_mentee(email),
    }
}

impl Listable for Session {
    type Filter = SessionFilter;
    type SortKey = SessionSortKey;
    type GroupBy = SessionGroupBy;

    fn search_text(&self) -> String {
        let mut parts: Vec<String> = Vec::new();

        if let Some(team) = self.team_name() {
            parts.push(team.to_owned());
        }
        parts.extend(mentor_names(self));
        if let Some(session_type) = &self.session_type {
            parts.push(session_type.clone());
        }
        if let Some(agenda) = &self.agenda {
            parts.push(agenda.clone());
        }
        parts.push(self.status.to_string());

        parts.join(" ")
    }

    fn matches(&self, filter: SessionFilter, ctx: &ViewContext) -> bool {
        match filter {
            SessionFilter::All => true,
            SessionFilter::Upcoming => is_upcoming(self, ctx),
            SessionFilter::Past => is_past(self, ctx),
            SessionFilter::NeedsFeedback => {
                session_needs_feedback(self, ctx.viewer.role, ctx.now) && is_visible_to(self, ctx)
            }
            SessionFilter::Cancelled => self.status == SessionStatus::Cancelled,
        }
    }

    fn sort_value(&self, key: SessionSortKey, _ctx: &ViewContext) -> Option<SortValue> {
        match key {
            SessionSortKey::Date => self.scheduled_start.map(SortValue::Instant),
            SessionSortKey::Type => self.session_type.as_deref().map(SortValue::text),
            SessionSortKey::Status => Some(SortValue::Rank(status_rank(self.status))),
            SessionSortKey::Team => self.team_name().map(SortValue::text),
            SessionSortKey::Mentor => mentor_names(self)
                .first()
                .map(|name| SortValue::text(name)),
        }
    }

    fn group_label(&self, group: SessionGroupBy, ctx: &ViewContext) -> Option<String> {
        let label = match group {
            SessionGroupBy::None => return None,
            SessionGroupBy::Status => self.status.to_string(),
            SessionGroupBy::Type => self
                .session_type
                .clone()
                .unwrap_or_else(|| "Other".to_owned()),
            SessionGroupBy::Team => self
                .team_name()
                .map(str::to_owned)
                .unwrap_or_else(|| "No team".to_owned()),
            SessionGroupBy::Month => self
                .scheduled_start
                .map(|start| ctx.zone.format_month(start))
                .unwrap_or_else(|| "Unscheduled".to_owned()),
        };

        Some(label)
    }
}
