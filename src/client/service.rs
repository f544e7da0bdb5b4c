//! Typed HTTP client for the task API.

use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::api::{ApiError, TaskRequest, TaskResponse};
use crate::domain::{Task, TaskId};

/// Errors returned by [`TaskClient`].
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered with a non-success status.
    #[error("{} {}", .status.as_u16(), .message)]
    Status {
        /// HTTP status of the response.
        status: StatusCode,
        /// Server-provided message, body text or reason phrase.
        message: String,
    },

    /// The request could not be sent or the response could not be read.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ClientError {
    /// Returns the HTTP status if the server responded.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(_) => None,
        }
    }
}

/// Client issuing the five task calls against a base URL such as
/// `http://localhost:8080/api`.
#[derive(Debug, Clone)]
pub struct TaskClient {
    http: reqwest::Client,
    base_url: String,
}

impl TaskClient {
    /// Creates a client with a default `reqwest::Client`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_http_client(reqwest::Client::new(), base_url)
    }

    /// Creates a client over an existing `reqwest::Client`.
    #[must_use]
    pub fn with_http_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    /// Returns the base URL, without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn tasks_url(&self) -> String {
        format!("{}/tasks", self.base_url)
    }

    fn task_url(&self, id: TaskId) -> String {
        format!("{}/tasks/{id}", self.base_url)
    }

    /// `GET /tasks`.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` on a non-success status or transport failure.
    pub async fn list(&self) -> Result<Vec<Task>, ClientError> {
        let response = self.http.get(self.tasks_url()).send().await?;
        let tasks: Vec<TaskResponse> = read_json(response).await?;
        Ok(tasks.into_iter().map(Task::from).collect())
    }

    /// `GET /tasks/{id}`.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Status` with 404 if the task does not exist.
    pub async fn get(&self, id: TaskId) -> Result<Task, ClientError> {
        let response = self.http.get(self.task_url(id)).send().await?;
        read_json::<TaskResponse>(response).await.map(Task::from)
    }

    /// `POST /tasks`.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Status` with 400 if the request fails validation.
    pub async fn create(&self, request: &TaskRequest) -> Result<Task, ClientError> {
        let response = self
            .http
            .post(self.tasks_url())
            .json(request)
            .send()
            .await?;
        read_json::<TaskResponse>(response).await.map(Task::from)
    }

    /// `PUT /tasks/{id}`.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Status` with 400 or 404.
    pub async fn update(&self, id: TaskId, request: &TaskRequest) -> Result<Task, ClientError> {
        let response = self
            .http
            .put(self.task_url(id))
            .json(request)
            .send()
            .await?;
        read_json::<TaskResponse>(response).await.map(Task::from)
    }

    /// `DELETE /tasks/{id}`.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Status` with 404 if the task does not exist.
    pub async fn delete(&self, id: TaskId) -> Result<(), ClientError> {
        let response = self.http.delete(self.task_url(id)).send().await?;
        ensure_success(response).await?;
        Ok(())
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    Ok(ensure_success(response).await?.json().await?)
}

/// Passes success responses through and turns the rest into
/// `ClientError::Status`.
async fn ensure_success(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(ClientError::Status {
        status,
        message: error_message(status, &body),
    })
}

fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(error) = serde_json::from_str::<ApiError>(body) {
        return error.message;
    }
    let body = body.trim();
    if body.is_empty() {
        status.canonical_reason().unwrap_or_default().to_string()
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(
        StatusCode::NOT_FOUND,
        r#"{"code":"NOT_FOUND","message":"Task not found with id: 7"}"#,
        "Task not found with id: 7"
    )]
    #[case(StatusCode::BAD_GATEWAY, "upstream down\n", "upstream down")]
    #[case(StatusCode::SERVICE_UNAVAILABLE, "", "Service Unavailable")]
    #[case(StatusCode::INTERNAL_SERVER_ERROR, "   ", "Internal Server Error")]
    fn test_error_message(#[case] status: StatusCode, #[case] body: &str, #[case] expected: &str) {
        assert_eq!(error_message(status, body), expected);
    }

    #[rstest]
    fn test_status_error_display() {
        let error = ClientError::Status {
            status: StatusCode::NOT_FOUND,
            message: "Task not found with id: 7".to_string(),
        };
        assert_eq!(error.to_string(), "404 Task not found with id: 7");
        assert_eq!(error.status(), Some(StatusCode::NOT_FOUND));
    }

    #[rstest]
    #[case("http://localhost:8080/api", "http://localhost:8080/api/tasks/3")]
    #[case("http://localhost:8080/api/", "http://localhost:8080/api/tasks/3")]
    fn test_task_url(#[case] base_url: &str, #[case] expected: &str) {
        let client = TaskClient::new(base_url);
        assert_eq!(client.task_url(TaskId::new(3)), expected);
    }
}
