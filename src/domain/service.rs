//! Task service.
//!
//! Mediates between the HTTP layer and the repository. The only rules it
//! enforces are identity (the store assigns ids) and existence (operations
//! on an absent id fail with [`ServiceError::NotFound`]).

use std::sync::Arc;

use thiserror::Error;

use super::{Task, TaskDraft, TaskId};
use crate::infrastructure::{RepositoryError, TaskRepository};

/// Errors surfaced by [`TaskService`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// No task has the referenced id.
    #[error("Task not found with id: {0}")]
    NotFound(TaskId),

    /// The store failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Application service for task CRUD.
#[derive(Clone)]
pub struct TaskService {
    repository: Arc<dyn TaskRepository>,
}

impl std::fmt::Debug for TaskService {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("TaskService")
            .field("repository", &"Arc<dyn TaskRepository>")
            .finish()
    }
}

impl TaskService {
    /// Creates a service over the given repository.
    #[must_use]
    pub fn new(repository: Arc<dyn TaskRepository>) -> Self {
        Self { repository }
    }

    /// Returns every task, in the order the store yields them.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if the store fails.
    pub async fn list_all(&self) -> Result<Vec<Task>, ServiceError> {
        let tasks = self.repository.find_all().await?;
        tracing::debug!(count = tasks.len(), "Listed tasks");
        Ok(tasks)
    }

    /// Returns the task with the given id.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if no task has that id.
    pub async fn get_by_id(&self, id: TaskId) -> Result<Task, ServiceError> {
        self.repository.find_by_id(id).await?.ok_or_else(|| {
            tracing::warn!(task_id = %id, "Task not found");
            ServiceError::NotFound(id)
        })
    }

    /// Persists a new task.
    ///
    /// The draft carries no id, so the store always assigns one.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if the store fails.
    pub async fn create(&self, draft: TaskDraft) -> Result<Task, ServiceError> {
        let task = self.repository.insert(draft).await?;
        tracing::debug!(task_id = %task.id, "Created task");
        Ok(task)
    }

    /// Replaces every writable field of an existing task.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if no task has that id, including
    /// when it is deleted between the lookup and the write.
    pub async fn update(&self, id: TaskId, changes: TaskDraft) -> Result<Task, ServiceError> {
        let existing = self.get_by_id(id).await?;
        let updated = self
            .repository
            .update(existing.replace_with(changes))
            .await?
            .ok_or(ServiceError::NotFound(id))?;
        tracing::debug!(task_id = %id, "Updated task");
        Ok(updated)
    }

    /// Removes a task permanently.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if no task has that id.
    pub async fn delete(&self, id: TaskId) -> Result<(), ServiceError> {
        let existing = self.get_by_id(id).await?;
        if !self.repository.delete(existing.id).await? {
            return Err(ServiceError::NotFound(id));
        }
        tracing::debug!(task_id = %id, "Deleted task");
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
