//! In-memory repository implementation.
//!
//! Suitable for development and tests. Tasks live in an ordered map behind
//! a `tokio::sync::RwLock`, so every operation is atomic for a single
//! record and `find_all` yields tasks in ascending id order.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::domain::{Task, TaskDraft, TaskId, Timestamp};
use crate::infrastructure::{RepositoryFuture, TaskRepository};

/// Mutable state guarded by the lock.
#[derive(Debug, Default)]
struct Store {
    tasks: BTreeMap<TaskId, Task>,
    /// Last identifier handed out. Only ever grows, so ids are never reused.
    last_id: i64,
}

/// In-memory implementation of `TaskRepository`.
///
/// # Example
///
/// ```ignore
/// let repository = InMemoryTaskRepository::new();
/// let task = repository.insert(TaskDraft::new("My Task")).await?;
/// let found = repository.find_by_id(task.id).await?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryTaskRepository {
    /// Creates a new empty in-memory task repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl TaskRepository for InMemoryTaskRepository {
    fn find_all(&self) -> RepositoryFuture<Vec<Task>> {
        let store = Arc::clone(&self.store);
        Box::pin(async move {
            let guard = store.read().await;
            Ok(guard.tasks.values().cloned().collect())
        })
    }

    fn find_by_id(&self, id: TaskId) -> RepositoryFuture<Option<Task>> {
        let store = Arc::clone(&self.store);
        Box::pin(async move {
            let guard = store.read().await;
            Ok(guard.tasks.get(&id).cloned())
        })
    }

    fn insert(&self, draft: TaskDraft) -> RepositoryFuture<Task> {
        let store = Arc::clone(&self.store);
        Box::pin(async move {
            let mut guard = store.write().await;
            guard.last_id += 1;
            let id = TaskId::new(guard.last_id);
            let task = Task::from_draft(id, draft, Timestamp::now());
            guard.tasks.insert(id, task.clone());
            Ok(task)
        })
    }

    fn update(&self, task: Task) -> RepositoryFuture<Option<Task>> {
        let store = Arc::clone(&self.store);
        Box::pin(async move {
            let mut guard = store.write().await;
            let Some(existing) = guard.tasks.get_mut(&task.id) else {
                return Ok(None);
            };
            let updated = existing
                .clone()
                .replace_with(task.to_draft())
                .with_updated_at(Timestamp::now());
            existing.clone_from(&updated);
            Ok(Some(updated))
        })
    }

    fn delete(&self, id: TaskId) -> RepositoryFuture<bool> {
        let store = Arc::clone(&self.store);
        Box::pin(async move {
            let mut guard = store.write().await;
            Ok(guard.tasks.remove(&id).is_some())
        })
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TaskStatus;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn test_insert_assigns_sequential_ids() {
        let repository = InMemoryTaskRepository::new();

        let first = repository.insert(TaskDraft::new("First")).await.unwrap();
        let second = repository.insert(TaskDraft::new("Second")).await.unwrap();

        assert_eq!(first.id, TaskId::new(1));
        assert_eq!(second.id, TaskId::new(2));
        assert_eq!(first.created_at, first.updated_at);
    }

    #[rstest]
    #[tokio::test]
    async fn test_ids_are_not_reused_after_delete() {
        let repository = InMemoryTaskRepository::new();

        let first = repository.insert(TaskDraft::new("First")).await.unwrap();
        assert!(repository.delete(first.id).await.unwrap());

        let second = repository.insert(TaskDraft::new("Second")).await.unwrap();
        assert_ne!(first.id, second.id);
    }

    #[rstest]
    #[tokio::test]
    async fn test_find_all_yields_ascending_ids() {
        let repository = InMemoryTaskRepository::new();
        for title in ["a", "b", "c"] {
            repository.insert(TaskDraft::new(title)).await.unwrap();
        }

        let ids: Vec<i64> = repository
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .map(|task| task.id.value())
            .collect();

        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[rstest]
    #[tokio::test]
    async fn test_update_preserves_created_at_and_refreshes_updated_at() {
        let repository = InMemoryTaskRepository::new();
        let task = repository.insert(TaskDraft::new("Draft")).await.unwrap();

        let changed = task
            .clone()
            .replace_with(TaskDraft::new("Final").with_status(TaskStatus::Done));
        let updated = repository.update(changed).await.unwrap().unwrap();

        assert_eq!(updated.id, task.id);
        assert_eq!(updated.created_at, task.created_at);
        assert!(updated.updated_at >= task.updated_at);
        assert_eq!(updated.title, "Final");

        let found = repository.find_by_id(task.id).await.unwrap().unwrap();
        assert_eq!(found, updated);
    }

    #[rstest]
    #[tokio::test]
    async fn test_update_missing_returns_none() {
        let repository = InMemoryTaskRepository::new();
        let ghost = Task::from_draft(TaskId::new(42), TaskDraft::new("Ghost"), Timestamp::now());

        assert!(repository.update(ghost).await.unwrap().is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn test_delete_missing_returns_false() {
        let repository = InMemoryTaskRepository::new();
        assert!(!repository.delete(TaskId::new(7)).await.unwrap());
    }
}
