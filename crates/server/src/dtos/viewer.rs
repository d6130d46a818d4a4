use crate::error::ApiError;
use models::permissions::{Capability, Role, Viewer};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Who is asking, passed on every request
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ViewerParams {
    /// student, mentor or staff; defaults to student
    #[param(value_type = Option<String>, example = "mentor")]
    pub role: Option<Role>,
    pub email: Option<String>,
}

impl ViewerParams {
    pub fn viewer(&self) -> Viewer {
        to_viewer(self.role, self.email.as_deref())
    }

    /// The viewer, or a 403 when their role lacks `capability`
    pub fn require(&self, capability: Capability) -> Result<Viewer, ApiError> {
        let viewer = self.viewer();
        if viewer.can(capability) {
            Ok(viewer)
        } else {
            Err(ApiError::Forbidden(capability))
        }
    }
}

pub fn to_viewer(role: Option<Role>, email: Option<&str>) -> Viewer {
    Viewer::new(
        role.unwrap_or(Role::Student),
        email
            .map(str::trim)
            .filter(|email| !email.is_empty())
            .map(str::to_owned),
    )
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CapabilitiesResponse {
    pub role: String,
    pub capabilities: Vec<String>,
}

impl CapabilitiesResponse {
    pub fn new(role: Role) -> Self {
        Self {
            role: role.to_string(),
            capabilities: role
                .capabilities()
                .into_iter()
                .map(|c| c.to_string())
                .collect(),
        }
    }
}
