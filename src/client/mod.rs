//! Client side of the task API.
//!
//! [`TaskClient`] issues the HTTP calls, the view-model derives what a list
//! screen shows, and [`TaskBoard`] ties the two together.

pub mod board;
pub mod service;
pub mod view_model;

pub use board::TaskBoard;
pub use service::{ClientError, TaskClient};
pub use view_model::{
    CategoryFilter, SortKey, StatusFilter, ViewParams, distinct_categories, is_overdue, view,
};
