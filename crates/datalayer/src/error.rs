use models::{recurrence::RecurrenceError, validation::ValidationErrors};
use thiserror::Error;

/// Failures talking to the data provider
#[derive(Debug, Error)]
pub enum DataError {
    #[error("environment variable {0} must be set")]
    MissingConfig(&'static str),

    #[error("environment variable {name} has an invalid value {value:?}")]
    InvalidConfig { name: &'static str, value: String },

    #[error("request to the data provider failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("data provider answered with HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("data provider rejected the request: {0}")]
    Graphql(String),

    #[error("could not decode the provider response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("record {id} is malformed: {reason}")]
    Malformed { id: String, reason: String },

    #[error("record {0} was not found")]
    NotFound(String),
}

/// Failures of a write that validates its input before reaching the provider
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Invalid(#[from] ValidationErrors),

    #[error(transparent)]
    Recurrence(#[from] RecurrenceError),

    #[error(transparent)]
    Data(#[from] DataError),
}
