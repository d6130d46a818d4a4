use crate::{client::DataSource, error::DataError};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Mutex;

type Handler = Box<dyn Fn(&str, &Value) -> Result<Value, DataError> + Send + Sync>;

/// In-memory source answering every document through a closure and
/// remembering what it was asked
pub struct FakeSource {
    handler: Handler,
    calls: Mutex<Vec<(String, Value)>>,
}

impl FakeSource {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&str, &Value) -> Result<Value, DataError> + Send + Sync + 'static,
    {
        Self {
            handler: Box::new(handler),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Answers every document with the same `data` object
    pub fn returning(data: Value) -> Self {
        Self::new(move |_, _| Ok(data.clone()))
    }

    pub fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().unwrap().clone()
    }
}

impl DataSource for FakeSource {
    async fn execute<D: DeserializeOwned>(
        &self,
        query: &str,
        variables: Value,
    ) -> Result<D, DataError> {
        let data = (self.handler)(query, &variables);
        self.calls
            .lock()
            .unwrap()
            .push((query.to_owned(), variables));

        Ok(serde_json::from_value(data?)?)
    }
}
