use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use datalayer::error::{DataError, ServiceError};
use log::{error, warn};
use models::{
    format::FormatError, permissions::Capability, recurrence::RecurrenceError,
    validation::ValidationErrors,
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct FieldErrorBody {
    pub field: String,
    pub message: String,
}

/// Body of every non-2xx response
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldErrorBody>,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Invalid(#[from] ValidationErrors),

    #[error("{0}")]
    BadRequest(String),

    #[error("the {0} capability is required")]
    Forbidden(Capability),

    #[error("{0} was not found")]
    NotFound(String),

    #[error(transparent)]
    Data(DataError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Invalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Data(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl From<DataError> for ApiError {
    fn from(e: DataError) -> Self {
        match e {
            DataError::NotFound(id) => Self::NotFound(id),
            other => Self::Data(other),
        }
    }
}

impl From<RecurrenceError> for ApiError {
    fn from(e: RecurrenceError) -> Self {
        Self::BadRequest(e.to_string())
    }
}

impl From<FormatError> for ApiError {
    fn from(e: FormatError) -> Self {
        Self::BadRequest(e.to_string())
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Invalid(errors) => errors.into(),
            ServiceError::Recurrence(e) => e.into(),
            ServiceError::Data(e) => e.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {self}");
        } else {
            warn!("Request rejected with {status}: {self}");
        }

        let fields = match &self {
            Self::Invalid(errors) => errors
                .errors
                .iter()
                .map(|e| FieldErrorBody {
                    field: e.field.to_owned(),
                    message: e.message.clone(),
                })
                .collect(),
            _ => Vec::new(),
        };

        let body = ErrorBody {
            error: self.to_string(),
            fields,
        };

        (status, Json(body)).into_response()
    }
}
