//! HTTP client for a remote task list server.
//!
//! Configuration is via environment variables:
//! - `TASKLIST_URL` - Base URL (default: `http://127.0.0.1:3000/api/v1`)

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::controller::TaskBackend;
use crate::dispatch::Mutation;
use crate::models::Task;

/// Default URL for a locally running server.
pub const DEFAULT_URL: &str = "http://127.0.0.1:3000/api/v1";

/// HTTP client errors.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Server error: {0}")]
    Server(String),
}

#[derive(Debug, Clone)]
pub struct TaskClient {
    base_url: String,
    client: Client,
}

impl TaskClient {
    /// Create client from environment variables.
    pub fn from_env() -> Self {
        let base_url = std::env::var("TASKLIST_URL").unwrap_or_else(|_| DEFAULT_URL.to_string());
        Self::new(base_url)
    }

    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.client.request(method, &url)
    }

    /// Turn a non-success status into the matching error.
    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await?;
        match status {
            StatusCode::NOT_FOUND => Err(ClientError::NotFound(body)),
            StatusCode::BAD_REQUEST => Err(ClientError::BadRequest(body)),
            _ => Err(ClientError::Server(format!("{}: {}", status, body))),
        }
    }

    async fn handle_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        Ok(Self::check_status(response).await?.json().await?)
    }

    pub async fn health(&self) -> Result<(), ClientError> {
        let response = self
            .request(reqwest::Method::GET, "/health")
            .send()
            .await?;
        Self::check_status(response).await.map(|_| ())
    }

    pub async fn list_tasks(&self) -> Result<Vec<Task>, ClientError> {
        let response = self
            .request(reqwest::Method::GET, "/tasks")
            .send()
            .await?;
        Self::handle_response(response).await
    }

    /// Post a mutation as a urlencoded form.
    pub async fn submit(&self, mutation: &Mutation) -> Result<(), ClientError> {
        let response = self
            .request(reqwest::Method::POST, "/tasks")
            .form(&mutation.to_fields())
            .send()
            .await?;
        Self::check_status(response).await.map(|_| ())
    }
}

#[async_trait]
impl TaskBackend for TaskClient {
    type Error = ClientError;

    async fn list_tasks(&self) -> Result<Vec<Task>, ClientError> {
        TaskClient::list_tasks(self).await
    }

    async fn submit(&self, mutation: &Mutation) -> Result<(), ClientError> {
        TaskClient::submit(self, mutation).await
    }
}
