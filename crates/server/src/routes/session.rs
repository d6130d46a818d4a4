use crate::{
    dtos::{
        series::CreatedSeriesResponse,
        session::{SessionDetail, SessionListParams, SessionListResponse, SessionStatusRequest},
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
use datalayer::{client::DataSource, services::session::SessionService};
use log::info;
use models::{permissions::Capability, session::SessionStatus, validation::SessionDraft};
use views::sessions::{is_managed_by, is_visible_to};

/// List the sessions the viewer can see, searched, filtered, sorted and grouped
#[utoipa::path(
    get,
    path = "/sessions",
    params(SessionListParams),
    responses(
        (status = 200, description = "Grouped sessions", body = SessionListResponse),
        (status = 400, description = "Invalid query parameters"),
        (status = 502, description = "The data source failed", body = ErrorBody)
    ),
    tag = "Sessions"
)]
pub async fn get_sessions(
    State(state): State<SharedState>,
    Query(params): Query<SessionListParams>,
) -> Result<Json<SessionListResponse>, ApiError> {
    list_sessions(&state, &params).await.map(Json)
}

async fn list_sessions<S: DataSource>(
    state: &AppState<S>,
    params: &SessionListParams,
) -> Result<SessionListResponse, ApiError> {
    let ctx = state.view_context(params.viewer());

    let mut sessions = SessionService::list_sessions(&state.source).await?;
    sessions.retain(|session| is_visible_to(session, &ctx));

    let groups = params.query().run(sessions, &ctx);
    Ok(SessionListResponse::new(groups, &ctx))
}

/// Get one session, with feedback redacted for the viewer
#[utoipa::path(
    get,
    path = "/sessions/{id}",
    params(
        ("id" = String, Path, description = "Session record ID"),
        ViewerParams
    ),
    responses(
        (status = 200, description = "Session found", body = SessionDetail),
        (status = 404, description = "No such session, or not one the viewer can see", body = ErrorBody),
        (status = 502, description = "The data source failed", body = ErrorBody)
    ),
    tag = "Sessions"
)]
pub async fn get_session_by_id(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Query(viewer): Query<ViewerParams>,
) -> Result<Json<SessionDetail>, ApiError> {
    session_detail(&state, id, &viewer).await.map(Json)
}

async fn session_detail<S: DataSource>(
    state: &AppState<S>,
    id: String,
    viewer: &ViewerParams,
) -> Result<SessionDetail, ApiError> {
    let ctx = state.view_context(viewer.viewer());
    let session = SessionService::get_session(&state.source, &id).await?;

    if !is_visible_to(&session, &ctx) {
        return Err(ApiError::NotFound(id));
    }

    Ok(SessionDetail::new(&session, &ctx))
}

/// Create a one-off session
#[utoipa::path(
    post,
    path = "/sessions",
    params(ViewerParams),
    request_body(content = Object, description = "The session form"),
    responses(
        (status = 201, description = "Session created", body = CreatedSeriesResponse),
        (status = 403, description = "The role cannot create sessions", body = ErrorBody),
        (status = 422, description = "The form failed validation", body = ErrorBody),
        (status = 502, description = "The data source failed", body = ErrorBody)
    ),
    tag = "Sessions"
)]
pub async fn create_session(
    State(state): State<SharedState>,
    Query(viewer): Query<ViewerParams>,
    Json(draft): Json<SessionDraft>,
) -> Result<(StatusCode, Json<CreatedSeriesResponse>), ApiError> {
    let created = schedule_session(&state, &viewer, &draft).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn schedule_session<S: DataSource>(
    state: &AppState<S>,
    viewer: &ViewerParams,
    draft: &SessionDraft,
) -> Result<CreatedSeriesResponse, ApiError> {
    viewer.require(Capability::CreateSession)?;

    let created = SessionService::create_session(&state.source, draft).await?;
    Ok(CreatedSeriesResponse::new(created, state.settings.display_zone))
}

/// Move a session to another status
///
/// Only staff and the session's own participants may change it; anyone else
/// gets the same 404 as for a session that does not exist.
#[utoipa::path(
    patch,
    path = "/sessions/{id}/status",
    params(
        ("id" = String, Path, description = "Session record ID"),
        ViewerParams
    ),
    request_body = SessionStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = SessionDetail),
        (status = 403, description = "The role cannot make this change", body = ErrorBody),
        (status = 404, description = "No such session, or not one the viewer takes part in", body = ErrorBody),
        (status = 502, description = "The data source failed", body = ErrorBody)
    ),
    tag = "Sessions"
)]
pub async fn update_session_status(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Query(viewer): Query<ViewerParams>,
    Json(request): Json<SessionStatusRequest>,
) -> Result<Json<SessionDetail>, ApiError> {
    set_session_status(&state, id, &viewer, request.status)
        .await
        .map(Json)
}

async fn set_session_status<S: DataSource>(
    state: &AppState<S>,
    id: String,
    viewer: &ViewerParams,
    status: SessionStatus,
) -> Result<SessionDetail, ApiError> {
    let viewer = viewer.require(Capability::EditSessionStatus)?;
    if status == SessionStatus::Cancelled && !viewer.can(Capability::CancelSession) {
        return Err(ApiError::Forbidden(Capability::CancelSession));
    }

    let ctx = state.view_context(viewer);
    let current = SessionService::get_session(&state.source, &id).await?;
    if !is_managed_by(&current, &ctx) {
        return Err(ApiError::NotFound(id));
    }

    let session = SessionService::update_status(&state.source, &id, status).await?;
    info!("Session {id} is now {}", session.status);

    Ok(SessionDetail::new(&session, &ctx))
}
