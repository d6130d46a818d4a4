use crate::error::DataError;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for the GraphQL proxy in front of the base
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataLayerConfig {
    pub graphql_url: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl DataLayerConfig {
    pub fn new(graphql_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            graphql_url: graphql_url.into(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Reads `GRAPHQL_URL`, `GRAPHQL_API_KEY` and the optional
    /// `GRAPHQL_TIMEOUT_SECS`, loading a `.env` file first if there is one
    pub fn from_env() -> Result<Self, DataError> {
        dotenvy::dotenv().ok();

        let graphql_url = required("GRAPHQL_URL")?;
        let api_key = required("GRAPHQL_API_KEY")?;

        let timeout = match std::env::var("GRAPHQL_TIMEOUT_SECS") {
            Ok(secs) => secs
                .trim()
                .parse::<u64>()
                .map_err(|_| DataError::InvalidConfig {
                    name: "GRAPHQL_TIMEOUT_SECS",
                    value: secs.clone(),
                })?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            graphql_url,
            api_key,
            timeout: Duration::from_secs(timeout),
        })
    }
}

fn required(name: &'static str) -> Result<String, DataError> {
    std::env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .ok_or(DataError::MissingConfig(name))
}
