use crate::session::{Contact, Participant, ParticipantRole, Session};
use serde::Serialize;
use strum::{AsRefStr, Display};

/// Where a session's mentors were resolved from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MentorSource {
    /// Per-session participant records
    Participants,
    /// The legacy mentor link on the session itself
    Legacy,
    /// Neither shape carries a mentor
    None,
}

/// A mentor attached to a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MentorParticipant {
    pub contact: Contact,
    pub role: ParticipantRole,
}

impl MentorParticipant {
    pub fn is_lead(&self) -> bool {
        self.role == ParticipantRole::LeadMentor
    }
}

/// Resolved mentors together with the shape they came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MentorResolution {
    pub source: MentorSource,
    pub mentors: Vec<MentorParticipant>,
}

/// Picks the mentor shape to use for a session.
///
/// Participant records win whenever the session has any; only sessions with
/// no participants at all fall back to the legacy link.
pub fn resolve_mentors(session: &Session) -> MentorResolution {
    if !session.participants.is_empty() {
        let mut mentors: Vec<MentorParticipant> = session
            .participants
            .iter()
            .filter(|p| p.role.is_mentor() && p.status.is_active())
            .map(|p| MentorParticipant {
                contact: p.contact.clone(),
                role: p.role,
            })
            .collect();

        // Lead first, then by name; stable so equal names keep record order
        mentors.sort_by(|a, b| {
            b.is_lead()
                .cmp(&a.is_lead())
                .then_with(|| a.contact.name.to_lowercase().cmp(&b.contact.name.to_lowercase()))
        });

        return MentorResolution {
            source: MentorSource::Participants,
            mentors,
        };
    }

    if session.legacy_mentors.is_empty() {
        return MentorResolution {
            source: MentorSource::None,
            mentors: Vec::new(),
        };
    }

    let mentors = session
        .legacy_mentors
        .iter()
        .enumerate()
        .map(|(idx, contact)| MentorParticipant {
            contact: contact.clone(),
            role: if idx == 0 {
                ParticipantRole::LeadMentor
            } else {
                ParticipantRole::SupportingMentor
            },
        })
        .collect();

    MentorResolution {
        source: MentorSource::Legacy,
        mentors,
    }
}

/// Active mentors of a session, lead first then alphabetical
pub fn mentor_participants(session: &Session) -> Vec<MentorParticipant> {
    resolve_mentors(session).mentors
}

/// The lead mentor, if one can be resolved
pub fn lead_mentor(session: &Session) -> Option<MentorParticipant> {
    mentor_participants(session)
        .into_iter()
        .find(MentorParticipant::is_lead)
}

/// Mentor names in display order, as shown in lists and used for sorting
pub fn mentor_names(session: &Session) -> Vec<String> {
    mentor_participants(session)
        .into_iter()
        .map(|m| m.contact.name)
        .collect()
}

/// Whether the signed-in user is one of the session's active mentors
pub fn is_current_user_mentor(session: &Session, email: &str) -> bool {
    if email.trim().is_empty() {
        return false;
    }

    mentor_participants(session)
        .iter()
        .any(|m| m.contact.has_email(email))
}

/// Active mentee participants of a session
pub fn mentee_participants(session: &Session) -> Vec<&Participant> {
    session
        .participants
        .iter()
        .filter(|p| p.role == ParticipantRole::Mentee && p.status.is_active())
        .collect()
}
