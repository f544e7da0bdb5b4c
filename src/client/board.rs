//! Client-side task board.
//!
//! Holds the last fetched collection and the current view parameters.
//! Every mutation is sent to the server and followed by a full reload; a
//! failed call records its message and leaves the held state as it was.

use chrono::{Local, NaiveDate};

use super::service::{ClientError, TaskClient};
use super::view_model::{ViewParams, distinct_categories, is_overdue, view};
use crate::api::TaskRequest;
use crate::domain::{Task, TaskId};

/// Stateful list screen over a [`TaskClient`].
#[derive(Debug, Clone)]
pub struct TaskBoard {
    client: TaskClient,
    tasks: Vec<Task>,
    params: ViewParams,
    last_error: Option<String>,
}

impl TaskBoard {
    /// Creates an empty board; call [`TaskBoard::reload`] to populate it.
    #[must_use]
    pub fn new(client: TaskClient) -> Self {
        Self {
            client,
            tasks: Vec::new(),
            params: ViewParams::default(),
            last_error: None,
        }
    }

    /// The full fetched collection, in server order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// The search, filters and sort applied by [`TaskBoard::visible`].
    #[must_use]
    pub const fn params(&self) -> &ViewParams {
        &self.params
    }

    /// Replaces the view parameters. Takes effect on the next [`TaskBoard::visible`].
    pub fn set_params(&mut self, params: ViewParams) {
        self.params = params;
    }

    /// Message of the most recent failed call, cleared by the next success.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Refetches the whole collection.
    ///
    /// # Errors
    ///
    /// Returns the client error; the previous collection is kept.
    pub async fn reload(&mut self) -> Result<(), ClientError> {
        let result = self.client.list().await;
        self.tasks = self.record(result)?;
        Ok(())
    }

    /// Creates a task, then reloads.
    ///
    /// # Errors
    ///
    /// Returns the client error if the create call fails.
    pub async fn create(&mut self, request: &TaskRequest) -> Result<Task, ClientError> {
        let result = self.client.create(request).await;
        let created = self.record(result)?;
        self.reload_after_mutation().await;
        Ok(created)
    }

    /// Replaces a task, then reloads.
    ///
    /// # Errors
    ///
    /// Returns the client error if the update call fails.
    pub async fn update(&mut self, id: TaskId, request: &TaskRequest) -> Result<Task, ClientError> {
        let result = self.client.update(id, request).await;
        let updated = self.record(result)?;
        self.reload_after_mutation().await;
        Ok(updated)
    }

    /// Deletes a task, then reloads.
    ///
    /// # Errors
    ///
    /// Returns the client error if the delete call fails.
    pub async fn delete(&mut self, id: TaskId) -> Result<(), ClientError> {
        let result = self.client.delete(id).await;
        self.record(result)?;
        self.reload_after_mutation().await;
        Ok(())
    }

    /// The mutation itself succeeded; a reload failure is only recorded.
    async fn reload_after_mutation(&mut self) {
        if let Err(error) = self.reload().await {
            tracing::warn!(%error, "Reload after mutation failed");
        }
    }

    fn record<T>(&mut self, result: Result<T, ClientError>) -> Result<T, ClientError> {
        match &result {
            Ok(_) => self.last_error = None,
            Err(error) => self.last_error = Some(error.to_string()),
        }
        result
    }

    /// Tasks after search, filters and sort.
    #[must_use]
    pub fn visible(&self) -> Vec<Task> {
        view(&self.tasks, &self.params)
    }

    /// Filter choices for the category selector.
    #[must_use]
    pub fn categories(&self) -> Vec<String> {
        distinct_categories(&self.tasks)
    }

    /// Overdue flag against today's local date.
    #[must_use]
    pub fn is_overdue(task: &Task) -> bool {
        is_overdue(task, today())
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
