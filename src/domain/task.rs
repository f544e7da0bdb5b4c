//! Task domain model.
//!
//! This module contains the single domain entity of the tracker together
//! with its value objects and the writable [`TaskDraft`].

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Value Objects - Newtypes
// =============================================================================

/// Store-assigned identifier for a task.
///
/// Identifiers are handed out by the store on insert and are never reused,
/// even after the task they belonged to has been deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(i64);

impl TaskId {
    /// Wraps a raw identifier.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// A timestamp wrapper for `DateTime<Utc>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a `Timestamp` from a `DateTime<Utc>`.
    #[must_use]
    pub const fn from_datetime(datetime: DateTime<Utc>) -> Self {
        Self(datetime)
    }

    /// Returns the inner `DateTime<Utc>`.
    #[must_use]
    pub const fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Returns the current time as a `Timestamp`.
    ///
    /// **Note**: reads the system clock.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now())
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0.to_rfc3339())
    }
}

// =============================================================================
// Enums
// =============================================================================

/// The progress state of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// Not started yet.
    #[default]
    Todo,
    /// Being worked on.
    InProgress,
    /// Finished.
    Done,
}

impl TaskStatus {
    /// Fixed sort rank: TODO=1, `IN_PROGRESS`=2, DONE=3.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Todo => 1,
            Self::InProgress => 2,
            Self::Done => 3,
        }
    }

    /// Returns the wire / database spelling of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "TODO",
            Self::InProgress => "IN_PROGRESS",
            Self::Done => "DONE",
        }
    }

    /// Returns `true` if the task has been completed.
    #[must_use]
    pub const fn is_done(self) -> bool {
        matches!(self, Self::Done)
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Error returned when a string does not name a [`TaskStatus`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown task status: '{0}'. Expected TODO, IN_PROGRESS or DONE")]
pub struct ParseStatusError(pub String);

impl FromStr for TaskStatus {
    type Err = ParseStatusError;

    /// Parses a status, accepting any case and `-` in place of `_`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().replace('-', "_").as_str() {
            "TODO" => Ok(Self::Todo),
            "IN_PROGRESS" => Ok(Self::InProgress),
            "DONE" => Ok(Self::Done),
            _ => Err(ParseStatusError(value.to_string())),
        }
    }
}

// =============================================================================
// Task Draft
// =============================================================================

/// The client-writable fields of a task.
///
/// A draft carries no identifier and no timestamps, so whatever a client
/// sends for those can never reach the store.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskDraft {
    /// Title, already trimmed and validated.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Progress state.
    pub status: TaskStatus,
    /// Optional free-text label.
    pub category: Option<String>,
    /// Optional due date.
    pub due_date: Option<NaiveDate>,
}

impl TaskDraft {
    /// Creates a draft with the given title and every other field defaulted.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Returns a new draft with the given description.
    #[must_use]
    pub fn with_description(self, description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            ..self
        }
    }

    /// Returns a new draft with the given status.
    #[must_use]
    pub fn with_status(self, status: TaskStatus) -> Self {
        Self { status, ..self }
    }

    /// Returns a new draft with the given category.
    #[must_use]
    pub fn with_category(self, category: impl Into<String>) -> Self {
        Self {
            category: Some(category.into()),
            ..self
        }
    }

    /// Returns a new draft with the given due date.
    #[must_use]
    pub fn with_due_date(self, due_date: NaiveDate) -> Self {
        Self {
            due_date: Some(due_date),
            ..self
        }
    }
}

// =============================================================================
// Task
// =============================================================================

/// A stored task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    /// Store-assigned identifier.
    pub id: TaskId,
    /// Title of the task.
    pub title: String,
    /// Optional detailed description.
    pub description: Option<String>,
    /// Current status.
    pub status: TaskStatus,
    /// Optional free-text label.
    pub category: Option<String>,
    /// Optional due date.
    pub due_date: Option<NaiveDate>,
    /// When the store first persisted the task.
    pub created_at: Timestamp,
    /// When the store last persisted the task.
    pub updated_at: Timestamp,
}

impl Task {
    /// Materializes a draft as a stored task.
    ///
    /// Stores call this on insert; they own identifier assignment and the clock.
    #[must_use]
    pub fn from_draft(id: TaskId, draft: TaskDraft, timestamp: Timestamp) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            status: draft.status,
            category: draft.category,
            due_date: draft.due_date,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Overwrites every writable field with the draft's values.
    ///
    /// Fields absent from the draft are cleared. `id` and `created_at`
    /// are preserved; the store refreshes `updated_at` when it persists.
    #[must_use]
    pub fn replace_with(self, draft: TaskDraft) -> Self {
        Self {
            title: draft.title,
            description: draft.description,
            status: draft.status,
            category: draft.category,
            due_date: draft.due_date,
            ..self
        }
    }

    /// Returns a new task with the updated timestamp.
    #[must_use]
    pub fn with_updated_at(self, timestamp: Timestamp) -> Self {
        Self {
            updated_at: timestamp,
            ..self
        }
    }

    /// Returns the writable fields of this task.
    #[must_use]
    pub fn to_draft(&self) -> TaskDraft {
        TaskDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            status: self.status,
            category: self.category.clone(),
            due_date: self.due_date,
        }
    }

    /// A task is overdue when its due date lies strictly before `today`
    /// and it is not done.
    #[must_use]
    pub fn is_overdue_on(&self, today: NaiveDate) -> bool {
        !self.status.is_done() && self.due_date.is_some_and(|due| due < today)
    }
}

// =============================================================================
// Tests
// =============================================================================
