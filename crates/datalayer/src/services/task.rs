use crate::{
    client::DataSource,
    error::{DataError, ServiceError},
    queries,
    records::{TaskRecord, TaskUpdateRecord, decode_valid},
};
use log::{error, info};
use models::{
    task::{Task, TaskStatus, TaskUpdate},
    validation::{TaskDraft, TaskUpdateDraft},
};
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
struct TasksData {
    tasks: Vec<TaskRecord>,
}

#[derive(Debug, Deserialize)]
struct TaskData {
    task: Option<TaskRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatedTaskData {
    create_task: TaskRecord,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdatedTaskData {
    update_task: Option<TaskRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatedTaskUpdateData {
    create_task_update: TaskUpdateRecord,
}

pub struct TaskService;

impl TaskService {
    pub async fn list_tasks<S: DataSource>(source: &S) -> Result<Vec<Task>, DataError> {
        let data: TasksData = source
            .execute(queries::TASKS, json!({}))
            .await
            .inspect_err(|e| error!("Failed to list tasks: {e}"))?;

        Ok(decode_valid(data.tasks))
    }

    pub async fn get_task<S: DataSource>(source: &S, id: &str) -> Result<Task, DataError> {
        let data: TaskData = source
            .execute(queries::TASK, json!({ "id": id }))
            .await
            .inspect_err(|e| error!("Failed to fetch task {id}: {e}"))?;

        let record = data.task.ok_or_else(|| DataError::NotFound(id.to_owned()))?;
        Task::try_from(record)
    }

    pub async fn create_task<S: DataSource>(
        source: &S,
        draft: &TaskDraft,
    ) -> Result<Task, ServiceError> {
        draft.validate()?;

        let fields = json!({
            "name": draft.name.as_deref().map(str::trim),
            "description": draft.description,
            "status": draft.status.unwrap_or_default().to_string(),
            "priority": draft.priority.map(|p| p.to_string()),
            "dueDate": draft.due_date.map(|d| d.format("%Y-%m-%d").to_string()),
            "assigneeEmail": draft.assignee_email,
            "session": draft.session_id,
            "team": draft.team_id,
        });

        let data: CreatedTaskData = source
            .execute(queries::CREATE_TASK, json!({ "fields": fields }))
            .await
            .inspect_err(|e| error!("Failed to create task: {e}"))?;

        let task = Task::try_from(data.create_task)?;
        info!("Created task {}", task.id);
        Ok(task)
    }

    pub async fn update_status<S: DataSource>(
        source: &S,
        id: &str,
        status: TaskStatus,
    ) -> Result<Task, DataError> {
        let data: UpdatedTaskData = source
            .execute(
                queries::UPDATE_TASK_STATUS,
                json!({ "id": id, "status": status.to_string() }),
            )
            .await
            .inspect_err(|e| error!("Failed to set task {id} to {status}: {e}"))?;

        let record = data
            .update_task
            .ok_or_else(|| DataError::NotFound(id.to_owned()))?;

        Task::try_from(record)
    }

    /// Posts a progress note on a task
    pub async fn append_update<S: DataSource>(
        source: &S,
        task_id: &str,
        draft: &TaskUpdateDraft,
    ) -> Result<TaskUpdate, ServiceError> {
        draft.validate()?;

        let fields = json!({
            "task": task_id,
            "health": draft.health.map(|h| h.to_string()),
            "message": draft.message.as_deref().map(str::trim),
            "author": draft.author_id,
        });

        let data: CreatedTaskUpdateData = source
            .execute(queries::CREATE_TASK_UPDATE, json!({ "fields": fields }))
            .await
            .inspect_err(|e| error!("Failed to post an update on task {task_id}: {e}"))?;

        Ok(TaskUpdate::try_from(data.create_task_update)?)
    }
}
