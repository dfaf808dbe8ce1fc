//! Scripted in-memory executor shared by the integration tests.

#![allow(dead_code)]

use amlstore::error::ExecutorError;
use amlstore::executor::QueryExecutor;
use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::StatusCode;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

pub const STORE: &str = "AutomationML";
pub const RESOURCE: &str = "Lib.aml";

pub const HEADER_QUERY_KEY: &str = "doc('AutomationML/Lib.aml')/CAEXFile return <CAEXFile>";

pub const HEADER_RESPONSE: &str = r#"<CAEXFile FileName="Lib.aml" SchemaVersion="3.0" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"/>"#;

pub const ROLE_CLASS_LIBS: &str = r#"<XElements>
  <RoleClassLib Name="AutomationMLBaseRoleClassLib">
    <Version>2.10</Version>
  </RoleClassLib>
  <RoleClassLib Name="AutomationMLDMIRoleClassLib">
    <Description>Discrete manufacturing roles</Description>
  </RoleClassLib>
</XElements>"#;

/// Executor answering from canned responses keyed by a substring of the query text.
#[derive(Default)]
pub struct ScriptedExecutor {
    listings: Mutex<HashMap<Option<String>, Result<String, ExecutorError>>>,
    responses: Mutex<Vec<(String, Result<String, ExecutorError>)>>,
    queries: Mutex<Vec<(String, String)>>,
    list_calls: Mutex<usize>,
    delay: Mutex<Option<Duration>>,
}

impl ScriptedExecutor {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Executor that already knows the `Lib.aml` header and its role class libraries.
    pub fn with_library() -> Arc<Self> {
        let executor = Self::new();
        executor.respond(HEADER_QUERY_KEY, Ok(HEADER_RESPONSE.to_string()));
        executor.respond("$root/RoleClassLib", Ok(ROLE_CLASS_LIBS.to_string()));
        executor
    }

    pub fn respond(&self, key: &str, response: Result<String, ExecutorError>) {
        self.responses.lock().push((key.to_string(), response));
    }

    pub fn listing(&self, store_name: Option<&str>, response: Result<String, ExecutorError>) {
        self.listings
            .lock()
            .insert(store_name.map(str::to_string), response);
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock() = Some(delay);
    }

    pub fn query_count(&self) -> usize {
        self.queries.lock().len()
    }

    pub fn queries(&self) -> Vec<(String, String)> {
        self.queries.lock().clone()
    }

    pub fn queries_containing(&self, key: &str) -> usize {
        self.queries
            .lock()
            .iter()
            .filter(|(_, text)| text.contains(key))
            .count()
    }

    pub fn list_calls(&self) -> usize {
        *self.list_calls.lock()
    }
}

#[async_trait]
impl QueryExecutor for ScriptedExecutor {
    async fn list(&self, store_name: Option<&str>) -> Result<String, ExecutorError> {
        *self.list_calls.lock() += 1;
        self.listings
            .lock()
            .get(&store_name.map(str::to_string))
            .cloned()
            .unwrap_or(Err(ExecutorError::Status(StatusCode::NOT_FOUND)))
    }

    async fn query(&self, store_name: &str, query: &str) -> Result<String, ExecutorError> {
        self.queries
            .lock()
            .push((store_name.to_string(), query.to_string()));
        let delay = *self.delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.responses
            .lock()
            .iter()
            .find(|(key, _)| query.contains(key.as_str()))
            .map(|(_, response)| response.clone())
            .unwrap_or(Err(ExecutorError::Status(StatusCode::NOT_FOUND)))
    }
}

pub fn as_executor(executor: &Arc<ScriptedExecutor>) -> Arc<dyn QueryExecutor> {
    executor.clone()
}
