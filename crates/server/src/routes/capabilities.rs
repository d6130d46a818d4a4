use crate::{dtos::viewer::CapabilitiesResponse, error::ApiError};
use axum::{Json, extract::Path};
use models::permissions::Role;
use std::str::FromStr;

/// List what a role may do
#[utoipa::path(
    get,
    path = "/capabilities/{role}",
    params(
        ("role" = String, Path, description = "student, mentor or staff")
    ),
    responses(
        (status = 200, description = "Capabilities granted to the role", body = CapabilitiesResponse),
        (status = 400, description = "Unknown role", body = crate::error::ErrorBody)
    ),
    tag = "Capabilities"
)]
pub async fn get_capabilities(Path(role): Path<String>) -> Result<Json<CapabilitiesResponse>, ApiError> {
    let role = Role::from_str(role.trim())
        .map_err(|_| ApiError::BadRequest(format!("unknown role '{role}'")))?;

    Ok(Json(CapabilitiesResponse::new(role)))
}
