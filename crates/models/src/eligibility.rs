use crate::{
    permissions::Role,
    session::{FeedbackRole, Session, SessionStatus},
};
use chrono::{DateTime, Utc};

/// Whether feedback may be collected for a session at `now`.
///
/// A session that explicitly opts out never becomes eligible. Otherwise a
/// completed session is eligible, cancelled and no-show sessions are not, and
/// any other session becomes eligible once its start has passed (covering
/// sessions nobody marked as completed).
pub fn is_eligible_for_feedback(session: &Session, now: DateTime<Utc>) -> bool {
    if !session.require_feedback.is_required() {
        return false;
    }

    match session.status {
        SessionStatus::Completed => true,
        SessionStatus::Cancelled | SessionStatus::NoShow => false,
        SessionStatus::Scheduled | SessionStatus::InProgress => session
            .scheduled_start
            .is_some_and(|start| start < now),
    }
}

fn has_feedback_from(session: &Session, role: FeedbackRole) -> bool {
    session.feedback.iter().any(|f| f.role == Some(role))
}

/// Whether any mentor feedback record exists
pub fn has_mentor_feedback(session: &Session) -> bool {
    has_feedback_from(session, FeedbackRole::Mentor)
}

/// Whether any mentee feedback record exists
pub fn has_mentee_feedback(session: &Session) -> bool {
    has_feedback_from(session, FeedbackRole::Mentee)
}

/// Whether the given role still owes feedback for the session.
///
/// Mentors and staff look at mentor feedback, students at mentee feedback.
pub fn session_needs_feedback(session: &Session, role: Role, now: DateTime<Utc>) -> bool {
    if !is_eligible_for_feedback(session, now) {
        return false;
    }

    match role {
        Role::Mentor | Role::Staff => !has_mentor_feedback(session),
        Role::Student => !has_mentee_feedback(session),
    }
}

/// Whether preparation is expected before the session
pub fn is_prep_required(session: &Session) -> bool {
    session.require_prep.is_required()
}

/// Whether the respondent has already sent their preparation
pub fn has_submitted_prep(session: &Session, email: &str) -> bool {
    session.submissions.iter().any(|submission| {
        submission
            .respondent
            .as_ref()
            .is_some_and(|contact| contact.has_email(email))
    })
}

/// Whether the respondent still owes preparation for an upcoming session
pub fn session_needs_prep(session: &Session, email: &str, now: DateTime<Utc>) -> bool {
    is_prep_required(session)
        && session.status == SessionStatus::Scheduled
        && session.scheduled_start.is_some_and(|start| start > now)
        && !has_submitted_prep(session, email)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{Contact, PreMeetingSubmission, Requirement, SessionFeedback};
    use chrono::Duration;
    use strum::IntoEnumIterator;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-06-10T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn session_at(offset_hours: i64, status: SessionStatus) -> Session {
        Session {
            scheduled_start: Some(now() + Duration::hours(offset_hours)),
            status,
            ..Default::default()
        }
    }

    fn feedback(role: FeedbackRole) -> SessionFeedback {
        SessionFeedback {
            id: format!("fb-{role}"),
            role: Some(role),
            ..Default::default()
        }
    }

    #[test]
    fn test_opted_out_sessions_never_eligible() {
        for status in SessionStatus::iter() {
            for offset in [-48, -1, 1, 48] {
                let mut session = session_at(offset, status);
                session.require_feedback = Requirement::NotRequired;
                assert!(!is_eligible_for_feedback(&session, now()));
            }
        }
    }

    #[test]
    fn test_cancelled_and_no_show_never_eligible() {
        for status in [SessionStatus::Cancelled, SessionStatus::NoShow] {
            let session = session_at(-24, status);
            assert!(!is_eligible_for_feedback(&session, now()));
        }
    }

    #[test]
    fn test_completed_is_eligible_even_in_future() {
        let session = session_at(24, SessionStatus::Completed);
        assert!(is_eligible_for_feedback(&session, now()));
    }

    #[test]
    fn test_past_scheduled_is_eligible() {
        assert!(is_eligible_for_feedback(
            &session_at(-2, SessionStatus::Scheduled),
            now()
        ));
        assert!(!is_eligible_for_feedback(
            &session_at(2, SessionStatus::Scheduled),
            now()
        ));
        assert!(!is_eligible_for_feedback(&Session::default(), now()));
    }

    #[test]
    fn test_legacy_unspecified_requirement_counts_as_required() {
        let session = session_at(-2, SessionStatus::Scheduled);
        assert_eq!(session.require_feedback, Requirement::Unspecified);
        assert!(is_eligible_for_feedback(&session, now()));
    }

    #[test]
    fn test_feedback_presence() {
        let mut session = session_at(-2, SessionStatus::Completed);
        assert!(!has_mentor_feedback(&session));

        session.feedback.push(feedback(FeedbackRole::Mentee));
        session.feedback.push(feedback(FeedbackRole::Mentee));
        assert!(has_mentee_feedback(&session));
        assert!(!has_mentor_feedback(&session));

        session.feedback.push(SessionFeedback::default());
        assert!(!has_mentor_feedback(&session));
    }

    #[test]
    fn test_needs_feedback_by_role() {
        let mut session = session_at(-2, SessionStatus::Completed);
        session.feedback.push(feedback(FeedbackRole::Mentor));

        assert!(!session_needs_feedback(&session, Role::Mentor, now()));
        assert!(!session_needs_feedback(&session, Role::Staff, now()));
        assert!(session_needs_feedback(&session, Role::Student, now()));

        let future = session_at(2, SessionStatus::Scheduled);
        assert!(!session_needs_feedback(&future, Role::Student, now()));
    }

    #[test]
    fn test_needs_prep() {
        let mut session = session_at(24, SessionStatus::Scheduled);
        assert!(session_needs_prep(&session, "team@example.org", now()));

        session.submissions.push(PreMeetingSubmission {
            id: "prep1".to_owned(),
            respondent: Some(Contact {
                id: "c1".to_owned(),
                name: "Team Lead".to_owned(),
                email: Some("team@example.org".to_owned()),
            }),
            ..Default::default()
        });
        assert!(!session_needs_prep(&session, "team@example.org", now()));
        assert!(session_needs_prep(&session, "other@example.org", now()));

        session.require_prep = Requirement::NotRequired;
        assert!(!session_needs_prep(&session, "other@example.org", now()));

        let past = session_at(-24, SessionStatus::Scheduled);
        assert!(!session_needs_prep(&past, "team@example.org", now()));
    }
}
