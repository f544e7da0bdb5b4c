//! Repository trait for the task store.
//!
//! Every method returns a boxed future so the trait stays object safe and
//! backends can be selected at runtime behind `Arc<dyn TaskRepository>`.

use futures::future::BoxFuture;
use thiserror::Error;

use crate::domain::{Task, TaskDraft, TaskId};

// =============================================================================
// Repository Error
// =============================================================================

/// Errors that can occur during repository operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// Database connection or query error.
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// A stored row could not be mapped back to a task.
    #[error("Corrupt record: {0}")]
    CorruptRecord(String),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(error: sqlx::Error) -> Self {
        Self::DatabaseError(error.to_string())
    }
}

/// Convenience alias for boxed repository futures.
pub type RepositoryFuture<T> = BoxFuture<'static, Result<T, RepositoryError>>;

// =============================================================================
// Task Repository
// =============================================================================

/// CRUD accessor over the task store.
///
/// Implementations own identifier assignment and timestamps: `insert`
/// assigns a fresh id and stamps both timestamps, `update` refreshes
/// `updated_at` and leaves `id` and `created_at` untouched.
pub trait TaskRepository: Send + Sync {
    /// Returns every stored task, in whatever order the store yields.
    fn find_all(&self) -> RepositoryFuture<Vec<Task>>;

    /// Finds a task by its ID.
    ///
    /// Returns `Ok(None)` if no task has that id.
    fn find_by_id(&self, id: TaskId) -> RepositoryFuture<Option<Task>>;

    /// Persists a draft as a new task and returns the stored record.
    fn insert(&self, draft: TaskDraft) -> RepositoryFuture<Task>;

    /// Persists the writable fields of an existing task.
    ///
    /// Returns `Ok(None)` if the task no longer exists.
    fn update(&self, task: Task) -> RepositoryFuture<Option<Task>>;

    /// Deletes a task by its ID.
    ///
    /// Returns `Ok(true)` if the task was deleted, `Ok(false)` if it didn't exist.
    fn delete(&self, id: TaskId) -> RepositoryFuture<bool>;
}

// =============================================================================
// Tests
// =============================================================================
