use crate::dtos::viewer::to_viewer;
use chrono::{DateTime, NaiveDate, Utc};
use models::{
    permissions::{Role, Viewer},
    task::{Task, TaskStatus, TaskUpdate},
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use views::{
    context::ViewContext,
    group::Group,
    pagination::Page,
    pipeline::ListQuery,
    sort::SortDirection,
    tasks::{TaskFilter, TaskGroupBy, TaskSortKey},
};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TaskListParams {
    pub search: Option<String>,

    /// all, open, completed, overdue or mine
    #[param(value_type = Option<String>, example = "open")]
    pub filter: Option<TaskFilter>,

    /// priority, due-date, status or name
    #[param(value_type = Option<String>, example = "due-date")]
    pub sort: Option<TaskSortKey>,

    #[param(value_type = Option<String>)]
    pub direction: Option<SortDirection>,

    /// none, status, priority or assignee
    #[param(value_type = Option<String>)]
    pub group: Option<TaskGroupBy>,

    /// How many pages have been disclosed so far
    #[serde(default = "default_pages")]
    pub pages: usize,

    #[param(value_type = Option<String>)]
    pub role: Option<Role>,
    pub email: Option<String>,
}

fn default_pages() -> usize {
    1
}

impl TaskListParams {
    pub fn viewer(&self) -> Viewer {
        to_viewer(self.role, self.email.as_deref())
    }

    pub fn query(&self) -> ListQuery<Task> {
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
pub struct TaskUpdateResponse {
    pub id: String,
    pub health: Option<String>,
    pub message: String,
    pub author: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<&TaskUpdate> for TaskUpdateResponse {
    fn from(update: &TaskUpdate) -> Self {
        Self {
            id: update.id.clone(),
            health: update.health.map(|h| h.to_string()),
            message: update.message.clone(),
            author: update.author.as_ref().map(|a| a.name.clone()),
            created_at: update.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TaskSummary {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    pub priority: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub overdue: bool,
    pub assignee: Option<String>,
    pub team: Option<String>,
    pub session_id: Option<String>,
    pub latest_update: Option<TaskUpdateResponse>,
}

impl TaskSummary {
    pub fn new(task: &Task, ctx: &ViewContext) -> Self {
        Self {
            id: task.id.clone(),
            name: task.name.clone(),
            description: task.description.clone(),
            status: task.status.to_string(),
            priority: task.priority.map(|p| p.to_string()),
            due_date: task.due_date,
            overdue: task.is_overdue(ctx.today()),
            assignee: task.assignee.as_ref().map(|a| a.name.clone()),
            team: task.team.as_ref().map(|t| t.name.clone()),
            session_id: task.session_id.clone(),
            latest_update: task.latest_update().map(TaskUpdateResponse::from),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TaskGroupResponse {
    pub label: String,
    pub tasks: Vec<TaskSummary>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TaskListResponse {
    pub groups: Vec<TaskGroupResponse>,
    /// Pages disclosed, echoing the request
    pub pages: usize,
    /// Tasks matching the query, shown or not
    pub total: usize,
    pub has_more: bool,
}

impl TaskListResponse {
    pub fn new(page: Page<Group<Task>>, ctx: &ViewContext) -> Self {
        Self {
            groups: page
                .items
                .into_iter()
                .map(|group| TaskGroupResponse {
                    label: group.label,
                    tasks: group
                        .items
                        .iter()
                        .map(|task| TaskSummary::new(task, ctx))
                        .collect(),
                })
                .collect(),
            pages: page.shown,
            total: page.total,
            has_more: page.has_more,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct TaskStatusRequest {
    /// Not Started, In Progress, Completed or Cancelled
    #[schema(value_type = String, example = "In Progress")]
    pub status: TaskStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::{
        format::parse_instant,
        session::Contact,
        task::{Health, Priority},
    };
    use views::pagination::paginate_groups;

    fn ctx() -> ViewContext {
        ViewContext::new(
            to_viewer(Some(Role::Student), Some("maya@example.org")),
            parse_instant("2026-05-10T15:00:00Z").unwrap(),
        )
    }

    fn task(n: u32) -> Task {
        Task {
            id: format!("recT{n}"),
            name: format!("Task {n}"),
            priority: Some(Priority::Medium),
            due_date: NaiveDate::from_ymd_opt(2026, 5, n),
            assignee: Some(Contact {
                id: "recMaya".to_owned(),
                name: "Maya".to_owned(),
                email: Some("maya@example.org".to_owned()),
            }),
            updates: vec![TaskUpdate {
                id: format!("recU{n}"),
                health: Some(Health::OnTrack),
                message: "Moving".to_owned(),
                author: None,
                created_at: None,
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_summary_marks_overdue() {
        let summary = TaskSummary::new(&task(9), &ctx());
        assert!(summary.overdue);
        assert_eq!(summary.priority.as_deref(), Some("Medium"));
        assert_eq!(summary.status, "Not Started");
        assert_eq!(
            summary.latest_update.unwrap().health.as_deref(),
            Some("On Track")
        );

        assert!(!TaskSummary::new(&task(10), &ctx()).overdue);
    }

    #[test]
    fn test_list_response_pages() {
        let ctx = ctx();
        let params: TaskListParams = serde_json::from_value(serde_json::json!({
            "filter": "mine",
            "group": "assignee"
        }))
        .unwrap();
        assert_eq!(params.pages, 1);

        let tasks: Vec<Task> = (1..=12).map(task).collect();
        let groups = params.query().run(tasks, &ctx);
        let response = TaskListResponse::new(paginate_groups(groups, params.pages, 10), &ctx);

        assert_eq!(response.total, 12);
        assert!(response.has_more);
        assert_eq!(response.groups[0].label, "Maya");
        assert_eq!(response.groups[0].tasks.len(), 10);
    }
}
