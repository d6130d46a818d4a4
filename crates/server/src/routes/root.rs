use axum::http::StatusCode;

/// Names the service, so a bare request to the host shows something useful
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service banner", content_type = "text/plain", body = String)
    ),
    tag = "Health"
)]
pub async fn root() -> (StatusCode, &'static str) {
    (StatusCode::OK, "Mentorship portal API, see /docs")
}
