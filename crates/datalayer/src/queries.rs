//! GraphQL documents sent to the proxy.
//!
//! Field names follow the proxy's camelCase rendering of the base's columns.

macro_rules! contact_fields {
    () => {
        "id fullName email"
    };
}

macro_rules! session_fields {
    () => {
        concat!(
            "id sessionType scheduledStart duration status meetingPlatform meetingUrl agenda ",
            "requirePrep requireFeedback seriesId ",
            "team { id teamName } ",
            "mentor { ",
            contact_fields!(),
            " } ",
            "sessionParticipants { id role status contact { ",
            contact_fields!(),
            " } } ",
            "feedback { id role submittedAt rating usefulness summary privateNotes teamProgress ",
            "respondent { ",
            contact_fields!(),
            " } } ",
            "preMeetingSubmissions { id agendaItems questions topics materialsLinks submittedAt ",
            "respondent { ",
            contact_fields!(),
            " } } ",
            "tasks { id }"
        )
    };
}

macro_rules! task_fields {
    () => {
        concat!(
            "id name description status priority dueDate sessionId ",
            "team { id teamName } ",
            "assignee { ",
            contact_fields!(),
            " } ",
            "updates { id health message createdAt author { ",
            contact_fields!(),
            " } }"
        )
    };
}

pub const SESSIONS: &str = concat!("query Sessions { sessions { ", session_fields!(), " } }");

pub const SESSION: &str = concat!(
    "query Session($id: String!) { session(id: $id) { ",
    session_fields!(),
    " } }"
);

pub const UPDATE_SESSION_STATUS: &str = concat!(
    "mutation UpdateSessionStatus($id: String!, $status: String!) { ",
    "updateSession(id: $id, fields: { status: $status }) { ",
    session_fields!(),
    " } }"
);

/// At most [`crate::services::session::SessionService::BATCH_SIZE`] records per call
pub const CREATE_SESSIONS: &str = concat!(
    "mutation CreateSessions($records: [SessionInput!]!) { ",
    "createSessions(records: $records) { id scheduledStart seriesId } }"
);

pub const TASKS: &str = concat!("query Tasks { tasks { ", task_fields!(), " } }");

pub const TASK: &str = concat!(
    "query Task($id: String!) { task(id: $id) { ",
    task_fields!(),
    " } }"
);

pub const CREATE_TASK: &str = concat!(
    "mutation CreateTask($fields: TaskInput!) { createTask(fields: $fields) { ",
    task_fields!(),
    " } }"
);

pub const UPDATE_TASK_STATUS: &str = concat!(
    "mutation UpdateTaskStatus($id: String!, $status: String!) { ",
    "updateTask(id: $id, fields: { status: $status }) { ",
    task_fields!(),
    " } }"
);

pub const CREATE_TASK_UPDATE: &str = concat!(
    "mutation CreateTaskUpdate($fields: TaskUpdateInput!) { createTaskUpdate(fields: $fields) { ",
    "id health message createdAt author { ",
    contact_fields!(),
    " } } }"
);
