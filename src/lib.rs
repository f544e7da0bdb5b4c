//! Task Tracker Library
//!
//! A single-entity task tracker: a REST API over a pluggable task store,
//! a typed HTTP client, and a view-model that searches, filters and sorts
//! the task list for presentation.

pub mod api;
pub mod client;
pub mod config;
pub mod domain;
pub mod infrastructure;
