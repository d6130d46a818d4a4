use crate::{context::ViewContext, pipeline::Listable, sort::SortValue};
use models::{
    mentors::is_current_user_mentor,
    permissions::Role,
    session::Session,
    task::{Task, TaskStatus},
};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

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
pub enum TaskFilter {
    #[default]
    All,
    Open,
    Completed,
    Overdue,
    /// Tasks assigned to the viewer
    Mine,
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
pub enum TaskSortKey {
    Priority,
    #[default]
    DueDate,
    Status,
    Name,
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
pub enum TaskGroupBy {
    #[default]
    None,
    Status,
    Priority,
    Assignee,
}

fn status_rank(status: TaskStatus) -> u8 {
    match status {
        TaskStatus::InProgress => 0,
        TaskStatus::NotStarted => 1,
        TaskStatus::Completed => 2,
        TaskStatus::Cancelled => 3,
    }
}

impl Listable for Task {
    type Filter = TaskFilter;
    type SortKey = TaskSortKey;
    type GroupBy = TaskGroupBy;

    fn search_text(&self) -> String {
        let mut parts = vec![self.name.clone()];

        if let Some(description) = &self.description {
            parts.push(description.clone());
        }
        if let Some(assignee) = &self.assignee {
            parts.push(assignee.name.clone());
        }
        if let Some(team) = &self.team {
            parts.push(team.name.clone());
        }
        parts.push(self.status.to_string());

        parts.join(" ")
    }

    fn matches(&self, filter: TaskFilter, ctx: &ViewContext) -> bool {
        match filter {
            TaskFilter::All => true,
            TaskFilter::Open => self.status.is_open(),
            TaskFilter::Completed => self.status == TaskStatus::Completed,
            TaskFilter::Overdue => self.is_overdue(ctx.today()),
            TaskFilter::Mine => ctx
                .viewer_email()
                .is_some_and(|email| self.is_assigned_to(email)),
        }
    }

    fn sort_value(&self, key: TaskSortKey, _ctx: &ViewContext) -> Option<SortValue> {
        match key {
            TaskSortKey::Priority => self.priority.map(|p| SortValue::Rank(p as u8)),
            TaskSortKey::DueDate => self.due_date.map(SortValue::Date),
            TaskSortKey::Status => Some(SortValue::Rank(status_rank(self.status))),
            TaskSortKey::Name => Some(SortValue::text(&self.name)),
        }
    }

    fn group_label(&self, group: TaskGroupBy, _ctx: &ViewContext) -> Option<String> {
        let label = match group {
            TaskGroupBy::None => return None,
            TaskGroupBy::Status => self.status.to_string(),
            TaskGroupBy::Priority => self
                .priority
                .map(|p| p.to_string())
                .unwrap_or_else(|| "No priority".to_owned()),
            TaskGroupBy::Assignee => self
                .assignee
                .as_ref()
                .map(|contact| contact.name.clone())
                .unwrap_or_else(|| "Unassigned".to_owned()),
        };

        Some(label)
    }
}

/// Whether the viewer may change a task, beyond holding the capability.
///
/// Staff may change any task and everyone may change tasks assigned to them.
/// Otherwise the task's session decides: mentors of that session and its
/// mentees may change the tasks that came out of it.
pub fn is_editable_by(task: &Task, linked_session: Option<&Session>, ctx: &ViewContext) -> bool {
    if ctx.viewer.role == Role::Staff {
        return true;
    }

    let Some(email) = ctx.viewer_email() else {
        return false;
    };

    if task.is_assigned_to(email) {
        return true;
    }

    linked_session.is_some_and(|session| match ctx.viewer.role {
        Role::Mentor => is_current_user_mentor(session, email),
        _ => session.has_mentee(email),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{group::flatten, pipeline::ListQuery, sort::SortDirection};
    use chrono::{DateTime, NaiveDate, Utc};
    use models::{
        permissions::{Role, Viewer},
        session::Contact,
        task::Priority,
    };

    fn now() -> DateTime<Utc> {
        // 2026-05-10 in New York, already 2026-05-11 in UTC
        DateTime::parse_from_rfc3339("2026-05-11T02:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn person(name: &str) -> Contact {
        Contact {
            id: format!("rec-{name}"),
            name: name.to_owned(),
            email: Some(format!("{}@example.org", name.to_lowercase())),
        }
    }

    fn task(
        id: &str,
        name: &str,
        status: TaskStatus,
        priority: Option<Priority>,
        due: Option<(u32, u32)>,
        assignee: Option<&str>,
    ) -> Task {
        Task {
            id: id.to_owned(),
            name: name.to_owned(),
            status,
            priority,
            due_date: due.and_then(|(m, d)| NaiveDate::from_ymd_opt(2026, m, d)),
            assignee: assignee.map(person),
            ..Default::default()
        }
    }

    fn fixtures() -> Vec<Task> {
        vec![
            task("t1", "Draft pitch deck", TaskStatus::InProgress, Some(Priority::High), Some((5, 9)), Some("Maya")),
            task("t2", "Book user interviews", TaskStatus::NotStarted, None, Some((5, 20)), Some("Leo")),
            task("t3", "Ship landing page", TaskStatus::Completed, Some(Priority::Urgent), Some((5, 1)), Some("Maya")),
            task("t4", "Collect survey results", TaskStatus::NotStarted, Some(Priority::Low), Some((5, 10)), None),
            task("t5", "Budget review", TaskStatus::Cancelled, Some(Priority::High), None, Some("Leo")),
        ]
    }

    fn ctx(email: Option<&str>) -> ViewContext {
        ViewContext::new(Viewer::new(Role::Student, email.map(str::to_owned)), now())
    }

    fn ids(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|t| t.id.as_str()).collect()
    }

    fn run(query: ListQuery<Task>, ctx: &ViewContext) -> Vec<Task> {
        flatten(query.run(fixtures(), ctx))
    }

    #[test]
    fn test_filters() {
        let ctx = ctx(Some("MAYA@example.org"));
        let query = |filter| ListQuery::<Task>::new(filter, TaskSortKey::DueDate, TaskGroupBy::None);

        assert_eq!(ids(&run(query(TaskFilter::Open), &ctx)), vec!["t1", "t4", "t2"]);
        assert_eq!(ids(&run(query(TaskFilter::Completed), &ctx)), vec!["t3"]);
        assert_eq!(ids(&run(query(TaskFilter::Mine), &ctx)), vec!["t3", "t1"]);
    }

    #[test]
    fn test_overdue_uses_display_zone_today() {
        // t4 is due on the 10th, which is still today in New York
        let ctx = ctx(None);
        let overdue = run(
            ListQuery::new(TaskFilter::Overdue, TaskSortKey::DueDate, TaskGroupBy::None),
            &ctx,
        );
        assert_eq!(ids(&overdue), vec!["t1"]);
    }

    #[test]
    fn test_mine_without_email_is_empty() {
        let mine = run(
            ListQuery::new(TaskFilter::Mine, TaskSortKey::Name, TaskGroupBy::None),
            &ctx(None),
        );
        assert!(mine.is_empty());
    }

    #[test]
    fn test_priority_sort_puts_missing_last() {
        let ctx = ctx(None);
        let asc = run(
            ListQuery::new(TaskFilter::All, TaskSortKey::Priority, TaskGroupBy::None),
            &ctx,
        );
        assert_eq!(ids(&asc), vec!["t3", "t1", "t5", "t4", "t2"]);

        let desc = run(
            ListQuery::new(TaskFilter::All, TaskSortKey::Priority, TaskGroupBy::None)
                .with_direction(SortDirection::Desc),
            &ctx,
        );
        assert_eq!(ids(&desc), vec!["t4", "t1", "t5", "t3", "t2"]);
    }

    #[test]
    fn test_group_by_assignee() {
        let groups = ListQuery::<Task>::new(TaskFilter::All, TaskSortKey::Name, TaskGroupBy::Assignee)
            .run(fixtures(), &ctx(None));

        let labels: Vec<&str> = groups.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, vec!["Leo", "Unassigned", "Maya"]);
        assert_eq!(ids(&groups[0].items), vec!["t2", "t5"]);
        assert_eq!(ids(&groups[2].items), vec!["t1", "t3"]);
    }

    #[test]
    fn test_group_by_priority_labels() {
        let groups = ListQuery::<Task>::new(TaskFilter::Open, TaskSortKey::Priority, TaskGroupBy::Priority)
            .run(fixtures(), &ctx(None));

        let labels: Vec<&str> = groups.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, vec!["High", "Low", "No priority"]);
    }

    #[test]
    fn test_search_matches_assignee_and_name() {
        let found = run(
            ListQuery::new(TaskFilter::All, TaskSortKey::Name, TaskGroupBy::None).with_search("maya deck"),
            &ctx(None),
        );
        assert_eq!(ids(&found), vec!["t1"]);
    }

    #[test]
    fn test_pipeline_is_idempotent() {
        let ctx = ctx(Some("leo@example.org"));
        let query = ListQuery::<Task>::new(TaskFilter::All, TaskSortKey::Status, TaskGroupBy::Priority)
            .with_direction(SortDirection::Desc);

        let once = query.run(fixtures(), &ctx);
        let twice = query.run(flatten(once.clone()), &ctx);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_task_editing_is_scoped() {
        use models::session::{Participant, ParticipantRole, ParticipantStatus};

        let participant = |name: &str, role| Participant {
            contact: person(name),
            role,
            status: ParticipantStatus::Active,
        };
        let session = Session {
            id: "s1".to_owned(),
            participants: vec![
                participant("Grace", ParticipantRole::LeadMentor),
                participant("Maya", ParticipantRole::Mentee),
            ],
            ..Default::default()
        };
        let leos = task("t2", "Book user interviews", TaskStatus::NotStarted, None, None, Some("Leo"));
        let as_role = |role, email: Option<&str>| {
            ViewContext::new(Viewer::new(role, email.map(str::to_owned)), now())
        };

        assert!(is_editable_by(&leos, None, &as_role(Role::Staff, None)));
        assert!(is_editable_by(&leos, None, &as_role(Role::Student, Some("leo@example.org"))));
        assert!(!is_editable_by(&leos, None, &as_role(Role::Student, Some("maya@example.org"))));
        assert!(!is_editable_by(&leos, None, &as_role(Role::Student, None)));

        assert!(is_editable_by(&leos, Some(&session), &as_role(Role::Student, Some("maya@example.org"))));
        assert!(is_editable_by(&leos, Some(&session), &as_role(Role::Mentor, Some("grace@example.org"))));
        assert!(!is_editable_by(&leos, Some(&session), &as_role(Role::Mentor, Some("alan@example.org"))));
    }
}
