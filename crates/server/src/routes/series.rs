use crate::{
    dtos::{
        series::{CreatedSeriesResponse, SeriesPreviewResponse, SeriesRequest},
        viewer::ViewerParams,
    },
    error::{ApiError, ErrorBody},
    state::{AppState, SharedState},
};
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use datalayer::{client::DataSource, services::session::SessionService};
use models::{permissions::Capability, recurrence::RecurrenceConfig};

/// Show the sessions a series would create without creating them
#[utoipa::path(
    post,
    path = "/series/preview",
    params(ViewerParams),
    request_body = SeriesRequest,
    responses(
        (status = 200, description = "Planned occurrences", body = SeriesPreviewResponse),
        (status = 400, description = "Invalid recurrence", body = ErrorBody),
        (status = 403, description = "The role cannot create series", body = ErrorBody),
        (status = 422, description = "The session form failed validation", body = ErrorBody)
    ),
    tag = "Series"
)]
pub async fn preview_series(
    State(state): State<SharedState>,
    Query(viewer): Query<ViewerParams>,
    Json(request): Json<SeriesRequest>,
) -> Result<Json<SeriesPreviewResponse>, ApiError> {
    plan(&state, &viewer, request).map(Json)
}

fn plan<S>(
    state: &AppState<S>,
    viewer: &ViewerParams,
    request: SeriesRequest,
) -> Result<SeriesPreviewResponse, ApiError> {
    viewer.require(Capability::CreateSeries)?;

    let zone = state.settings.display_zone;
    let recurrence = RecurrenceConfig::try_from(request.recurrence)?;
    let starts = SessionService::plan_series(&request.session, &recurrence, zone)?;

    Ok(SeriesPreviewResponse::new(starts, zone))
}

/// Create every session of a recurring series
#[utoipa::path(
    post,
    path = "/series",
    params(ViewerParams),
    request_body = SeriesRequest,
    responses(
        (status = 201, description = "Series created", body = CreatedSeriesResponse),
        (status = 400, description = "Invalid recurrence", body = ErrorBody),
        (status = 403, description = "The role cannot create series", body = ErrorBody),
        (status = 422, description = "The session form failed validation", body = ErrorBody),
        (status = 502, description = "A batch was rejected by the data source", body = ErrorBody)
    ),
    tag = "Series"
)]
pub async fn create_series(
    State(state): State<SharedState>,
    Query(viewer): Query<ViewerParams>,
    Json(request): Json<SeriesRequest>,
) -> Result<(StatusCode, Json<CreatedSeriesResponse>), ApiError> {
    let created = schedule_series(&state, &viewer, request).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn schedule_series<S: DataSource>(
    state: &AppState<S>,
    viewer: &ViewerParams,
    request: SeriesRequest,
) -> Result<CreatedSeriesResponse, ApiError> {
    viewer.require(Capability::CreateSeries)?;

    let zone = state.settings.display_zone;
    let recurrence = RecurrenceConfig::try_from(request.recurrence)?;
    let created =
        SessionService::create_series(&state.source, &request.session, &recurrence, zone).await?;

    Ok(CreatedSeriesResponse::new(created, zone))
}
