//! `PostgreSQL` repository implementation.
//!
//! Uses `sqlx` with a connection pool. Identifiers come from a `BIGSERIAL`
//! sequence, so they are unique and never reused, and both timestamps are
//! stamped by the database clock.
//!
//! # Table Schema
//!
//! ```sql
//! CREATE TABLE IF NOT EXISTS tasks (
//!     id BIGSERIAL PRIMARY KEY,
//!     title VARCHAR(100) NOT NULL,
//!     description VARCHAR(500),
//!     status VARCHAR(20) NOT NULL DEFAULT 'TODO',
//!     category VARCHAR(255),
//!     due_date DATE,
//!     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
//!     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
//! );
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;

use crate::domain::{Task, TaskDraft, TaskId, TaskStatus, Timestamp};
use crate::infrastructure::{RepositoryError, RepositoryFuture, TaskRepository};

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS tasks (\
     id BIGSERIAL PRIMARY KEY, \
     title VARCHAR(100) NOT NULL, \
     description VARCHAR(500), \
     status VARCHAR(20) NOT NULL DEFAULT 'TODO', \
     category VARCHAR(255), \
     due_date DATE, \
     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(), \
     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW())";

const COLUMNS: &str = "id, title, description, status, category, due_date, created_at, updated_at";

// =============================================================================
// Row Mapping
// =============================================================================

/// Raw row as stored in the `tasks` table.
#[derive(Debug, sqlx::FromRow)]
struct TaskRow {
    id: i64,
    title: String,
    description: Option<String>,
    status: String,
    category: Option<String>,
    due_date: Option<NaiveDate>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<TaskRow> for Task {
    type Error = RepositoryError;

    fn try_from(row: TaskRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse::<TaskStatus>()
            .map_err(|error| RepositoryError::CorruptRecord(format!("task {}: {error}", row.id)))?;

        Ok(Self {
            id: TaskId::new(row.id),
            title: row.title,
            description: row.description,
            status,
            category: row.category,
            due_date: row.due_date,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

// =============================================================================
// PostgreSQL Task Repository
// =============================================================================

/// `PostgreSQL` implementation of `TaskRepository`.
///
/// # Example
///
/// ```ignore
/// let pool = PgPool::connect("postgres://localhost/tasks").await?;
/// let repository = PostgresTaskRepository::new(pool);
/// repository.ensure_schema().await?;
/// let task = repository.insert(TaskDraft::new("My Task")).await?;
/// ```
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    /// Connection pool for `PostgreSQL`.
    pool: PgPool,
}

impl PostgresTaskRepository {
    /// Creates a new `PostgreSQL` task repository with the given connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the `tasks` table if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::DatabaseError` if the statement fails.
    pub async fn ensure_schema(&self) -> Result<(), RepositoryError> {
        sqlx::query(CREATE_TABLE).execute(&self.pool).await?;
        Ok(())
    }
}

impl TaskRepository for PostgresTaskRepository {
    fn find_all(&self) -> RepositoryFuture<Vec<Task>> {
        let pool = self.pool.clone();

        Box::pin(async move {
            let rows: Vec<TaskRow> =
                sqlx::query_as(&format!("SELECT {COLUMNS} FROM tasks ORDER BY id"))
                    .fetch_all(&pool)
                    .await?;

            rows.into_iter().map(Task::try_from).collect()
        })
    }

    fn find_by_id(&self, id: TaskId) -> RepositoryFuture<Option<Task>> {
        let pool = self.pool.clone();

        Box::pin(async move {
            let row: Option<TaskRow> =
                sqlx::query_as(&format!("SELECT {COLUMNS} FROM tasks WHERE id = $1"))
                    .bind(id.value())
                    .fetch_optional(&pool)
                    .await?;

            row.map(Task::try_from).transpose()
        })
    }

    fn insert(&self, draft: TaskDraft) -> RepositoryFuture<Task> {
        let pool = self.pool.clone();

        Box::pin(async move {
            let row: TaskRow = sqlx::query_as(&format!(
                "INSERT INTO tasks (title, description, status, category, due_date, created_at, updated_at) \
                 VALUES ($1, $2, $3, $4, $5, NOW(), NOW()) \
                 RETURNING {COLUMNS}"
            ))
            .bind(&draft.title)
            .bind(&draft.description)
            .bind(draft.status.as_str())
            .bind(&draft.category)
            .bind(draft.due_date)
            .fetch_one(&pool)
            .await?;

            let task = Task::try_from(row)?;
            tracing::debug!(task_id = %task.id, "Inserted task row");
            Ok(task)
        })
    }

    fn update(&self, task: Task) -> RepositoryFuture<Option<Task>> {
        let pool = self.pool.clone();

        Box::pin(async move {
            let row: Option<TaskRow> = sqlx::query_as(&format!(
                "UPDATE tasks SET title = $1, description = $2, status = $3, category = $4, \
                 due_date = $5, updated_at = NOW() \
                 WHERE id = $6 \
                 RETURNING {COLUMNS}"
            ))
            .bind(&task.title)
            .bind(&task.description)
            .bind(task.status.as_str())
            .bind(&task.category)
            .bind(task.due_date)
            .bind(task.id.value())
            .fetch_optional(&pool)
            .await?;

            row.map(Task::try_from).transpose()
        })
    }

    fn delete(&self, id: TaskId) -> RepositoryFuture<bool> {
        let pool = self.pool.clone();

        Box::pin(async move {
            let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
                .bind(id.value())
                .execute(&pool)
                .await?;

            Ok(result.rows_affected() > 0)
        })
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn row(status: &str) -> TaskRow {
        let now = Utc::now();
        TaskRow {
            id: 3,
            title: "Row".to_string(),
            description: Some("From the database".to_string()),
            status: status.to_string(),
            category: None,
            due_date: NaiveDate::from_ymd_opt(2025, 2, 28),
            created_at: now,
            updated_at: now,
        }
    }

    // -------------------------------------------------------------------------
    // Structure Tests (no DB connection required)
    // -------------------------------------------------------------------------

    #[rstest]
    #[case("TODO", TaskStatus::Todo)]
    #[case("IN_PROGRESS", TaskStatus::InProgress)]
    #[case("DONE", TaskStatus::Done)]
    fn test_row_conversion(#[case] status: &str, #[case] expected: TaskStatus) {
        let task = Task::try_from(row(status)).unwrap();

        assert_eq!(task.id, TaskId::new(3));
        assert_eq!(task.status, expected);
        assert_eq!(task.description.as_deref(), Some("From the database"));
        assert_eq!(task.due_date, NaiveDate::from_ymd_opt(2025, 2, 28));
    }

    #[rstest]
    fn test_row_conversion_rejects_unknown_status() {
        let result = Task::try_from(row("LATER"));
        assert!(matches!(result, Err(RepositoryError::CorruptRecord(_))));
    }

    // -------------------------------------------------------------------------
    // Integration Tests (require PostgreSQL)
    // -------------------------------------------------------------------------

    async fn connect() -> PostgresTaskRepository {
        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| "postgres://localhost/test".into());
        let pool = PgPool::connect(&database_url).await.unwrap();
        let repository = PostgresTaskRepository::new(pool);
        repository.ensure_schema().await.unwrap();
        repository
    }

    #[rstest]
    #[tokio::test]
    #[ignore = "Requires PostgreSQL instance"]
    async fn test_postgres_insert_find_update_delete() {
        let repository = connect().await;

        let task = repository
            .insert(TaskDraft::new("Postgres task").with_category("Work"))
            .await
            .unwrap();
        let found = repository.find_by_id(task.id).await.unwrap();
        assert_eq!(found.as_ref(), Some(&task));

        let changed = task
            .clone()
            .replace_with(TaskDraft::new("Renamed").with_status(TaskStatus::Done));
        let updated = repository.update(changed).await.unwrap().unwrap();
        assert_eq!(updated.title, "Renamed");
        assert!(updated.category.is_none());
        assert_eq!(updated.created_at, task.created_at);

        assert!(repository.delete(task.id).await.unwrap());
        assert!(repository.find_by_id(task.id).await.unwrap().is_none());
    }

    #[rstest]
    #[tokio::test]
    #[ignore = "Requires PostgreSQL instance"]
    async fn test_postgres_missing_rows() {
        let repository = connect().await;
        let ghost = Task::from_draft(TaskId::new(-1), TaskDraft::new("Ghost"), Timestamp::now());

        assert!(repository.find_by_id(ghost.id).await.unwrap().is_none());
        assert!(repository.update(ghost.clone()).await.unwrap().is_none());
        assert!(!repository.delete(ghost.id).await.unwrap());
    }
}
