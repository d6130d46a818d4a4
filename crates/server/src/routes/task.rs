use crate::{
    dtos::{
        task::{TaskListParams, TaskListResponse, TaskStatusRequest, TaskSummary, TaskUpdateResponse},
        viewer::ViewerParams,
    },
    error::{ApiError, ErrorBody},
    state::{AppState, SharedState},
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use datalayer::{
    client::DataSource,
    error::DataError,
    services::{session::SessionService, task::TaskService},
};
use models::{
    permissions::{Capability, Role},
    task::{Task, TaskStatus},
    validation::{TaskDraft, TaskUpdateDraft},
};
use views::{context::ViewContext, pagination::paginate_groups, tasks::is_editable_by};

/// List tasks, a page at a time
#[utoipa::path(
    get,
    path = "/tasks",
    params(TaskListParams),
    responses(
        (status = 200, description = "Grouped tasks", body = TaskListResponse),
        (status = 400, description = "Invalid query parameters"),
        (status = 502, description = "The data source failed", body = ErrorBody)
    ),
    tag = "Tasks"
)]
pub async fn get_tasks(
    State(state): State<SharedState>,
    Query(params): Query<TaskListParams>,
) -> Result<Json<TaskListResponse>, ApiError> {
    list_tasks(&state, &params).await.map(Json)
}

async fn list_tasks<S: DataSource>(
    state: &AppState<S>,
    params: &TaskListParams,
) -> Result<TaskListResponse, ApiError> {
    let ctx = state.view_context(params.viewer());

    let tasks = TaskService::list_tasks(&state.source).await?;
    let groups = params.query().run(tasks, &ctx);
    let page = paginate_groups(groups, params.pages, state.settings.tasks_per_page);

    Ok(TaskListResponse::new(page, &ctx))
}

/// Create a task
#[utoipa::path(
    post,
    path = "/tasks",
    params(ViewerParams),
    request_body(content = Object, description = "The task form"),
    responses(
        (status = 201, description = "Task created", body = TaskSummary),
        (status = 403, description = "The role cannot create tasks", body = ErrorBody),
        (status = 422, description = "The form failed validation", body = ErrorBody),
        (status = 502, description = "The data source failed", body = ErrorBody)
    ),
    tag = "Tasks"
)]
pub async fn create_task(
    State(state): State<SharedState>,
    Query(viewer): Query<ViewerParams>,
    Json(draft): Json<TaskDraft>,
) -> Result<(StatusCode, Json<TaskSummary>), ApiError> {
    let viewer = viewer.require(Capability::CreateTask)?;

    let task = TaskService::create_task(&state.source, &draft).await?;
    let ctx = state.view_context(viewer);

    Ok((StatusCode::CREATED, Json(TaskSummary::new(&task, &ctx))))
}

/// Loads a task the viewer may change, or reports it as missing.
///
/// The task's session is only fetched when the assignee alone does not
/// settle the question.
async fn editable_task<S: DataSource>(
    state: &AppState<S>,
    id: &str,
    ctx: &ViewContext,
) -> Result<Task, ApiError> {
    let task = TaskService::get_task(&state.source, id).await?;

    if is_editable_by(&task, None, ctx) {
        return Ok(task);
    }

    let linked = match (&task.session_id, ctx.viewer.role) {
        (Some(session_id), Role::Mentor | Role::Student) => {
            match SessionService::get_session(&state.source, session_id).await {
                Ok(session) => Some(session),
                Err(DataError::NotFound(_)) => None,
                Err(e) => return Err(e.into()),
            }
        }
        _ => None,
    };

    if is_editable_by(&task, linked.as_ref(), ctx) {
        Ok(task)
    } else {
        Err(ApiError::NotFound(id.to_owned()))
    }
}

/// Move a task to another status
#[utoipa::path(
    patch,
    path = "/tasks/{id}/status",
    params(
        ("id" = String, Path, description = "Task record ID"),
        ViewerParams
    ),
    request_body = TaskStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = TaskSummary),
        (status = 403, description = "The role cannot edit tasks", body = ErrorBody),
        (status = 404, description = "No such task, or not one the viewer may change", body = ErrorBody),
        (status = 502, description = "The data source failed", body = ErrorBody)
    ),
    tag = "Tasks"
)]
pub async fn update_task_status(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Query(viewer): Query<ViewerParams>,
    Json(request): Json<TaskStatusRequest>,
) -> Result<Json<TaskSummary>, ApiError> {
    set_task_status(&state, &id, &viewer, request.status)
        .await
        .map(Json)
}

async fn set_task_status<S: DataSource>(
    state: &AppState<S>,
    id: &str,
    viewer: &ViewerParams,
    status: TaskStatus,
) -> Result<TaskSummary, ApiError> {
    let ctx = state.view_context(viewer.require(Capability::EditTask)?);
    editable_task(state, id, &ctx).await?;

    let task = TaskService::update_status(&state.source, id, status).await?;
    Ok(TaskSummary::new(&task, &ctx))
}

/// Post a progress update on a task
#[utoipa::path(
    post,
    path = "/tasks/{id}/updates",
    params(
        ("id" = String, Path, description = "Task record ID"),
        ViewerParams
    ),
    request_body(content = Object, description = "health, message and optionally authorId"),
    responses(
        (status = 201, description = "Update posted", body = TaskUpdateResponse),
        (status = 403, description = "The role cannot post updates", body = ErrorBody),
        (status = 404, description = "No such task, or not one the viewer may change", body = ErrorBody),
        (status = 422, description = "The update failed validation", body = ErrorBody),
        (status = 502, description = "The data source failed", body = ErrorBody)
    ),
    tag = "Tasks"
)]
pub async fn post_task_update(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Query(viewer): Query<ViewerParams>,
    Json(draft): Json<TaskUpdateDraft>,
) -> Result<(StatusCode, Json<TaskUpdateResponse>), ApiError> {
    let update = append_update(&state, &id, &viewer, &draft).await?;
    Ok((StatusCode::CREATED, Json(update)))
}

async fn append_update<S: DataSource>(
    state: &AppState<S>,
    id: &str,
    viewer: &ViewerParams,
    draft: &TaskUpdateDraft,
) -> Result<TaskUpdateResponse, ApiError> {
    let ctx = state.view_context(viewer.require(Capability::PostTaskUpdate)?);
    editable_task(state, id, &ctx).await?;

    let update = TaskService::append_update(&state.source, id, draft).await?;
    Ok(TaskUpdateResponse::from(&update))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::tests::fake_state;
    use datalayer::{queries, testing::FakeSource};
    use models::task::Health;
    use serde_json::{Value, json};

    fn task_json(status: &str) -> Value {
        json!({
            "id": "recT1",
            "name": "Book user interviews",
            "status": status,
            "sessionId": "recS1",
            "assignee": { "id": "recLeo", "fullName": "Leo Park", "email": "leo@example.org" }
        })
    }

    fn session_json() -> Value {
        json!({
            "id": "recS1",
            "status": "Scheduled",
            "scheduledStart": "2026-04-01T19:00:00Z",
            "sessionParticipants": [
                {
                    "id": "recP1",
                    "role": "Lead Mentor",
                    "status": "Active",
                    "contact": { "id": "recGrace", "fullName": "Grace Hopper", "email": "grace@example.org" }
                },
                {
                    "id": "recP2",
                    "role": "Mentee",
                    "status": "Active",
                    "contact": { "id": "recMaya", "fullName": "Maya Chen", "email": "maya@example.org" }
                }
            ]
        })
    }

    fn task_source() -> FakeSource {
        FakeSource::new(|query, variables| {
            let data = if query == queries::TASK {
                json!({ "task": task_json("Not Started") })
            } else if query == queries::SESSION {
                json!({ "session": session_json() })
            } else if query == queries::UPDATE_TASK_STATUS {
                let status = variables["status"].as_str().unwrap_or_default();
                json!({ "updateTask": task_json(status) })
            } else if query == queries::CREATE_TASK_UPDATE {
                json!({ "createTaskUpdate": { "id": "recU1", "health": "At Risk", "message": "Slots moved" } })
            } else {
                json!({ "tasks": [task_json("Not Started")] })
            };
            Ok(data)
        })
    }

    fn viewer(role: Role, email: &str) -> ViewerParams {
        ViewerParams {
            role: Some(role),
            email: Some(email.to_owned()),
        }
    }

    fn writes(source: &FakeSource) -> usize {
        source
            .calls()
            .iter()
            .filter(|(query, _)| query == queries::UPDATE_TASK_STATUS || query == queries::CREATE_TASK_UPDATE)
            .count()
    }

    #[tokio::test]
    async fn test_assignee_can_change_status() {
        let state = fake_state(task_source());

        let summary = set_task_status(
            &state,
            "recT1",
            &viewer(Role::Student, "leo@example.org"),
            TaskStatus::Completed,
        )
        .await
        .unwrap();

        assert_eq!(summary.status, "Completed");
        // The assignee alone settles it, so the session is never fetched
        assert!(state.source.calls().iter().all(|(query, _)| query != queries::SESSION));
    }

    #[tokio::test]
    async fn test_teammate_and_session_mentor_can_change_status() {
        for (role, email) in [(Role::Student, "maya@example.org"), (Role::Mentor, "grace@example.org")] {
            let state = fake_state(task_source());
            set_task_status(&state, "recT1", &viewer(role, email), TaskStatus::InProgress)
                .await
                .unwrap();
            assert_eq!(writes(&state.source), 1);
        }
    }

    #[tokio::test]
    async fn test_unrelated_student_cannot_change_status() {
        let state = fake_state(task_source());

        let err = set_task_status(
            &state,
            "recT1",
            &viewer(Role::Student, "zoe@example.org"),
            TaskStatus::Cancelled,
        )
        .await
        .unwrap_err();

        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(writes(&state.source), 0);
    }

    #[tokio::test]
    async fn test_unrelated_mentor_cannot_post_update() {
        let state = fake_state(task_source());
        let draft = TaskUpdateDraft {
            health: Some(Health::AtRisk),
            message: Some("Slots moved".to_owned()),
            author_id: None,
        };

        let err = append_update(&state, "recT1", &viewer(Role::Mentor, "alan@example.org"), &draft)
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let posted = append_update(&state, "recT1", &viewer(Role::Mentor, "grace@example.org"), &draft)
            .await
            .unwrap();
        assert_eq!(posted.health.as_deref(), Some("At Risk"));
        assert_eq!(writes(&state.source), 1);
    }

    #[tokio::test]
    async fn test_staff_can_change_any_task() {
        let state = fake_state(task_source());

        set_task_status(&state, "recT1", &viewer(Role::Staff, "ops@example.org"), TaskStatus::Cancelled)
            .await
            .unwrap();
        assert_eq!(writes(&state.source), 1);
    }

    #[tokio::test]
    async fn test_viewer_without_email_cannot_change_status() {
        let state = fake_state(task_source());
        let anonymous = ViewerParams {
            role: Some(Role::Mentor),
            email: None,
        };

        let err = set_task_status(&state, "recT1", &anonymous, TaskStatus::Completed)
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(writes(&state.source), 0);
    }

    #[tokio::test]
    async fn test_list_pages_tasks() {
        let state = fake_state(task_source());
        let params: TaskListParams = serde_json::from_value(json!({ "role": "staff" })).unwrap();

        let response = list_tasks(&state, &params).await.unwrap();
        assert_eq!(response.total, 1);
        assert!(!response.has_more);
    }
}
