//! Infrastructure module for the task store.
//!
//! This module contains the repository trait, its in-memory and
//! `PostgreSQL` backends, and the factory that selects one at startup.

pub mod factory;
pub mod in_memory;
pub mod postgres;
pub mod repository;

pub use factory::{
    ConfigurationError, FactoryError, RepositoryConfig, RepositoryFactory, StorageMode,
};
pub use in_memory::InMemoryTaskRepository;
pub use postgres::PostgresTaskRepository;
pub use repository::{RepositoryError, RepositoryFuture, TaskRepository};
