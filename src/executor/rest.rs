//! BaseX REST implementation of [`QueryExecutor`].

use super::QueryExecutor;
use crate::config::ServerConfig;
use crate::error::{ApiError, ExecutorError};
use crate::query::{query_request_body, script_request_body, QUERY_CONTENT_TYPE};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder};
use std::time::Duration;
use tracing::{debug, warn};

/// HTTP client bound to one REST root, e.g. `http://localhost:8080/rest/`
pub struct RestExecutor {
    client: Client,
    base_url: String,
    username: Option<String>,
    password: Option<String>,
}

impl RestExecutor {
    pub fn new(config: &ServerConfig) -> Result<Self, ApiError> {
        config.validate().map_err(ApiError::ConfigError)?;

        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| ApiError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: normalize_base_url(&config.address),
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of one store below the REST root.
    pub fn store_url(&self, store_name: &str) -> String {
        format!("{}{}", self.base_url, store_name)
    }

    /// Run a query script stored on the server, binding `variables` as externals.
    pub async fn run_script(
        &self,
        store_name: &str,
        script_name: &str,
        variables: &[(&str, &str)],
    ) -> Result<String, ExecutorError> {
        let body = script_request_body(script_name, variables);
        debug!(store = store_name, script = script_name, "Running stored query script");
        self.post(&self.store_url(store_name), body).await
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.username {
            Some(user) => request.basic_auth(user, self.password.as_deref()),
            None => request,
        }
    }

    async fn post(&self, url: &str, body: String) -> Result<String, ExecutorError> {
        let request = self
            .client
            .post(url)
            .header(CONTENT_TYPE, QUERY_CONTENT_TYPE)
            .header(ACCEPT, "application/xml")
            .body(body);
        self.send(self.authorize(request), url).await
    }

    async fn send(&self, request: RequestBuilder, url: &str) -> Result<String, ExecutorError> {
        let response = request.send().await.map_err(|e| {
            warn!(url, error = %e, "Store request failed");
            ExecutorError::Transport(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(url, %status, "Store answered with non-success status");
            return Err(ExecutorError::Status(status));
        }

        let text = response
            .text()
            .await
            .map_err(|e| ExecutorError::Transport(e.to_string()))?;
        if text.is_empty() {
            return Err(ExecutorError::NoContent);
        }
        debug!(url, bytes = text.len(), "Store response received");
        Ok(text)
    }
}

#[async_trait]
impl QueryExecutor for RestExecutor {
    async fn list(&self, store_name: Option<&str>) -> Result<String, ExecutorError> {
        let url = match store_name {
            Some(name) => self.store_url(name),
            None => self.base_url.clone(),
        };
        debug!(url = %url, "Listing store catalog");
        let request = self
            .client
            .get(&url)
            .header(ACCEPT, "application/xml");
        self.send(self.authorize(request), &url).await
    }

    async fn query(&self, store_name: &str, query: &str) -> Result<String, ExecutorError> {
        debug!(store = store_name, query, "Posting query");
        self.post(&self.store_url(store_name), query_request_body(query))
            .await
    }
}

fn normalize_base_url(address: &str) -> String {
    let trimmed = address.trim();
    if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{}/", trimmed)
    }
}
