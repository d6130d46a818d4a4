use crate::session::{Session, SessionStatus};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Lifecycle stage of a session relative to the current time
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
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Phase {
    Upcoming,
    StartingSoon,
    During,
    Completed,
    Cancelled,
    NoShow,
}

/// How long before its start a session counts as "starting soon"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartingSoonWindow(u32);

impl StartingSoonWindow {
    /// Used by list views
    pub const DEFAULT: Self = StartingSoonWindow(30);
    /// Used by the "join" call-to-action on dashboards
    pub const EXTENDED: Self = StartingSoonWindow(60);

    pub fn from_minutes(minutes: u32) -> Self {
        Self(minutes)
    }

    pub fn minutes(self) -> u32 {
        self.0
    }

    pub fn duration(self) -> Duration {
        Duration::minutes(i64::from(self.0))
    }
}

impl Default for StartingSoonWindow {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Derives the phase of a session at `now`.
///
/// Terminal statuses win over the clock. Without a scheduled start no phase
/// is asserted. Once a session's window has elapsed the status field stays
/// authoritative: an `In Progress` session is still `During`, but a session
/// left at `Scheduled` yields `None` rather than a guessed `Completed`.
///
/// # Arguments
/// * `session` - The session to inspect
/// * `now` - The current instant
/// * `window` - How far ahead of the start "starting soon" begins
///
/// # Returns
/// `Some(Phase)` when one can be asserted, `None` otherwise
pub fn derive_phase(
    session: &Session,
    now: DateTime<Utc>,
    window: StartingSoonWindow,
) -> Option<Phase> {
    match session.status {
        SessionStatus::Cancelled => return Some(Phase::Cancelled),
        SessionStatus::NoShow => return Some(Phase::NoShow),
        SessionStatus::Completed => return Some(Phase::Completed),
        SessionStatus::Scheduled | SessionStatus::InProgress => {}
    }

    let start = session.scheduled_start?;
    let end = start + session.duration();

    if now > end {
        return (session.status == SessionStatus::InProgress).then_some(Phase::During);
    }

    if now >= start {
        Some(Phase::During)
    } else if now >= start - window.duration() {
        Some(Phase::StartingSoon)
    } else {
        Some(Phase::Upcoming)
    }
}

/// Whether the session's scheduled window is over, regardless of status
pub fn has_elapsed(session: &Session, now: DateTime<Utc>) -> bool {
    session.scheduled_end().is_some_and(|end| now > end)
}

/// Whether the session is happening right now or about to, the point at
/// which the meeting link is surfaced
pub fn is_joinable(session: &Session, now: DateTime<Utc>, window: StartingSoonWindow) -> bool {
    matches!(
        derive_phase(session, now, window),
        Some(Phase::StartingSoon | Phase::During)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn scheduled(start: &str) -> Session {
        Session {
            scheduled_start: Some(at(start)),
            duration_minutes: 60,
            ..Default::default()
        }
    }

    #[test]
    fn test_phase_during_window() {
        let session = scheduled("2026-04-01T18:00:00Z");
        let now = at("2026-04-01T18:30:00Z");
        assert_eq!(
            derive_phase(&session, now, StartingSoonWindow::DEFAULT),
            Some(Phase::During)
        );

        // Both edges of the window count as during
        assert_eq!(
            derive_phase(&session, at("2026-04-01T18:00:00Z"), StartingSoonWindow::DEFAULT),
            Some(Phase::During)
        );
        assert_eq!(
            derive_phase(&session, at("2026-04-01T19:00:00Z"), StartingSoonWindow::DEFAULT),
            Some(Phase::During)
        );
    }

    #[test]
    fn test_phase_starting_soon_respects_window() {
        let session = scheduled("2026-04-01T18:00:00Z");
        let now = at("2026-04-01T17:15:00Z");

        assert_eq!(
            derive_phase(&session, now, StartingSoonWindow::EXTENDED),
            Some(Phase::StartingSoon)
        );
        assert_eq!(
            derive_phase(&session, now, StartingSoonWindow::DEFAULT),
            Some(Phase::Upcoming)
        );
    }

    #[test]
    fn test_phase_upcoming() {
        let session = scheduled("2026-04-01T18:00:00Z");
        assert_eq!(
            derive_phase(&session, at("2026-04-01T16:00:00Z"), StartingSoonWindow::EXTENDED),
            Some(Phase::Upcoming)
        );
    }

    #[test]
    fn test_terminal_statuses_ignore_time() {
        let mut session = scheduled("2026-04-01T18:00:00Z");
        let now = at("2026-04-01T18:30:00Z");

        session.status = SessionStatus::Cancelled;
        assert_eq!(
            derive_phase(&session, now, StartingSoonWindow::DEFAULT),
            Some(Phase::Cancelled)
        );

        session.status = SessionStatus::NoShow;
        assert_eq!(
            derive_phase(&session, now, StartingSoonWindow::DEFAULT),
            Some(Phase::NoShow)
        );

        session.status = SessionStatus::Completed;
        session.scheduled_start = None;
        assert_eq!(
            derive_phase(&session, now, StartingSoonWindow::DEFAULT),
            Some(Phase::Completed)
        );
    }

    #[test]
    fn test_no_phase_without_start() {
        let session = Session::default();
        assert_eq!(
            derive_phase(&session, Utc::now(), StartingSoonWindow::DEFAULT),
            None
        );
    }

    #[test]
    fn test_elapsed_scheduled_session_is_not_completed() {
        let mut session = scheduled("2026-04-01T18:00:00Z");
        let later = at("2026-04-02T09:00:00Z");

        assert_eq!(
            derive_phase(&session, later, StartingSoonWindow::DEFAULT),
            None
        );
        assert!(has_elapsed(&session, later));

        session.status = SessionStatus::InProgress;
        assert_eq!(
            derive_phase(&session, later, StartingSoonWindow::DEFAULT),
            Some(Phase::During)
        );
    }

    #[test]
    fn test_phase_is_deterministic() {
        let session = scheduled("2026-04-01T18:00:00Z");
        let now = at("2026-04-01T17:50:00Z");
        let first = derive_phase(&session, now, StartingSoonWindow::DEFAULT);
        let second = derive_phase(&session, now, StartingSoonWindow::DEFAULT);
        assert_eq!(first, second);
        assert!(is_joinable(&session, now, StartingSoonWindow::DEFAULT));
    }

    #[test]
    fn test_phase_labels() {
        assert_eq!(Phase::StartingSoon.to_string(), "starting-soon");
        assert_eq!(Phase::NoShow.to_string(), "no-show");
        for phase in Phase::iter() {
            let json = serde_json::to_string(&phase).unwrap();
            assert_eq!(json, format!("\"{phase}\""));
        }
    }
}
