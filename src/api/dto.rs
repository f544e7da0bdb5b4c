//! Data Transfer Objects for API requests and responses.
//!
//! These types define the JSON wire format and are shared by the server
//! handlers and the HTTP client.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::error::{FieldError, ValidationError};
use crate::domain::{Task, TaskDraft, TaskId, TaskStatus, Timestamp};

/// Maximum title length, in characters, after trimming.
pub const TITLE_MAX_LENGTH: usize = 100;

/// Maximum description length, in characters, after trimming.
pub const DESCRIPTION_MAX_LENGTH: usize = 500;

/// Maximum category length, in characters, after trimming.
pub const CATEGORY_MAX_LENGTH: usize = 255;

// =============================================================================
// Task DTOs
// =============================================================================

/// Request body for creating or updating a task.
///
/// Unknown fields (including `id`, `createdAt` and `updatedAt`) are
/// ignored. On update, omitted fields are treated as explicit nulls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRequest {
    /// Title of the task.
    #[serde(default)]
    pub title: String,
    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Status (defaults to TODO).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    /// Optional category label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Optional due date (`YYYY-MM-DD`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
}

impl TaskRequest {
    /// Creates a request with only a title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

impl From<&Task> for TaskRequest {
    fn from(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            status: Some(task.status),
            category: task.category.clone(),
            due_date: task.due_date,
        }
    }
}

/// Response body for a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    /// Task ID.
    pub id: i64,
    /// Title of the task.
    pub title: String,
    /// Description of the task.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Current status.
    pub status: TaskStatus,
    /// Category label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Due date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<&Task> for TaskResponse {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id.value(),
            title: task.title.clone(),
            description: task.description.clone(),
            status: task.status,
            category: task.category.clone(),
            due_date: task.due_date,
            created_at: *task.created_at.as_datetime(),
            updated_at: *task.updated_at.as_datetime(),
        }
    }
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self::from(&task)
    }
}

impl From<TaskResponse> for Task {
    fn from(response: TaskResponse) -> Self {
        Self {
            id: TaskId::new(response.id),
            title: response.title,
            description: response.description,
            status: response.status,
            category: response.category,
            due_date: response.due_date,
            created_at: Timestamp::from_datetime(response.created_at),
            updated_at: Timestamp::from_datetime(response.updated_at),
        }
    }
}

// =============================================================================
// Validation
// =============================================================================

/// Validates a task title.
///
/// # Validation Rules
///
/// - Title must not be blank
/// - Title must not exceed 100 characters
///
/// # Errors
///
/// Returns a `FieldError` for `title` if a rule is violated.
pub fn validate_title(title: &str) -> Result<String, FieldError> {
    let title = title.trim();

    if title.is_empty() {
        return Err(FieldError::new("title", "Title is required"));
    }

    if title.chars().count() > TITLE_MAX_LENGTH {
        return Err(FieldError::new(
            "title",
            format!("Title must not exceed {TITLE_MAX_LENGTH} characters"),
        ));
    }

    Ok(title.to_string())
}

/// Validates an optional text field, trimming it and treating blank as absent.
fn validate_optional_text(
    field: &str,
    label: &str,
    value: Option<&str>,
    max_length: usize,
) -> Result<Option<String>, FieldError> {
    let Some(value) = value.map(str::trim).filter(|value| !value.is_empty()) else {
        return Ok(None);
    };

    if value.chars().count() > max_length {
        return Err(FieldError::new(
            field,
            format!("{label} must not exceed {max_length} characters"),
        ));
    }

    Ok(Some(value.to_string()))
}

/// Validates a task description.
///
/// # Validation Rules
///
/// - Description must not exceed 500 characters
/// - A blank description is stored as absent
///
/// # Errors
///
/// Returns a `FieldError` for `description` if too long.
pub fn validate_description(description: Option<&str>) -> Result<Option<String>, FieldError> {
    validate_optional_text(
        "description",
        "Description",
        description,
        DESCRIPTION_MAX_LENGTH,
    )
}

/// Validates a task category.
///
/// # Errors
///
/// Returns a `FieldError` for `category` if too long.
pub fn validate_category(category: Option<&str>) -> Result<Option<String>, FieldError> {
    validate_optional_text("category", "Category", category, CATEGORY_MAX_LENGTH)
}

/// Validates a create/update request and converts it to a draft.
///
/// All field errors are collected rather than stopping at the first.
///
/// # Errors
///
/// Returns `ValidationError` listing every invalid field.
pub fn validate_task_request(request: &TaskRequest) -> Result<TaskDraft, ValidationError> {
    let title = validate_title(&request.title);
    let description = validate_description(request.description.as_deref());
    let category = validate_category(request.category.as_deref());

    match (title, description, category) {
        (Ok(title), Ok(description), Ok(category)) => Ok(TaskDraft {
            title,
            description,
            status: request.status.unwrap_or_default(),
            category,
            due_date: request.due_date,
        }),
        (title, description, category) => Err(ValidationError::new(
            [title.err(), description.err(), category.err()]
                .into_iter()
                .flatten()
                .collect(),
        )),
    }
}

// =============================================================================
// Tests
// =============================================================================
