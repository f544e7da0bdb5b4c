//! Domain module for task tracking.
//!
//! This module contains the domain model and the service that enforces
//! identity and existence rules around the repository.

pub mod service;
pub mod task;

pub use service::{ServiceError, TaskService};
pub use task::{ParseStatusError, Task, TaskDraft, TaskId, TaskStatus, Timestamp};
