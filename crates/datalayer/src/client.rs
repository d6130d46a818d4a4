use crate::{config::DataLayerConfig, error::DataError};
use log::{debug, error};
use reqwest::Client;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::future::Future;

/// Anything that can answer a GraphQL document.
///
/// Services only talk to the provider through this trait, so tests can swap
/// in an in-memory source.
pub trait DataSource: Send + Sync {
    /// Runs `query` and decodes its `data` object into `D`
    fn execute<D: DeserializeOwned>(
        &self,
        query: &str,
        variables: Value,
    ) -> impl Future<Output = Result<D, DataError>> + Send;
}

#[derive(Debug, Serialize)]
struct GraphqlRequest<'a> {
    query: &'a str,
    variables: Value,
}

#[derive(Debug, Deserialize)]
struct GraphqlErrorMessage {
    message: String,
}

#[derive(Debug, Deserialize)]
struct GraphqlResponse {
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<GraphqlErrorMessage>,
}

/// Decodes a GraphQL response body, surfacing its `errors` array
pub fn decode_response<D: DeserializeOwned>(body: Value) -> Result<D, DataError> {
    let response: GraphqlResponse = serde_json::from_value(body)?;

    if !response.errors.is_empty() {
        let messages: Vec<String> = response.errors.into_iter().map(|e| e.message).collect();
        return Err(DataError::Graphql(messages.join("; ")));
    }

    Ok(serde_json::from_value(response.data.unwrap_or(Value::Null))?)
}

/// The name of the first operation in a document, for logging
fn operation_name(query: &str) -> &str {
    query
        .split(['(', '{'])
        .next()
        .and_then(|head| head.split_whitespace().nth(1))
        .unwrap_or("anonymous")
}

/// HTTP client for the hosted GraphQL proxy
#[derive(Debug, Clone)]
pub struct GraphqlClient {
    client: Client,
    config: DataLayerConfig,
}

impl GraphqlClient {
    pub fn new(config: DataLayerConfig) -> Result<Self, DataError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    pub fn from_env() -> Result<Self, DataError> {
        Self::new(DataLayerConfig::from_env()?)
    }
}

impl DataSource for GraphqlClient {
    async fn execute<D: DeserializeOwned>(
        &self,
        query: &str,
        variables: Value,
    ) -> Result<D, DataError> {
        let operation = operation_name(query);
        debug!("sending {operation} to {}", self.config.graphql_url);

        let response = self
            .client
            .post(&self.config.graphql_url)
            .bearer_auth(&self.config.api_key)
            .json(&GraphqlRequest { query, variables })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("{operation} failed with HTTP {status}");
            return Err(DataError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: Value = response.json().await?;
        decode_response(body)
    }
}
