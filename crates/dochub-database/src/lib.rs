//! # dochub-database
//!
//! PostgreSQL connection management, the [`FolderStore`] / [`DocumentStore`]
//! traits the service layer is written against, their Postgres
//! repositories, and an in-memory [`MemoryStore`] with the same
//! constraints.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use memory::MemoryStore;
pub use repositories::{DocumentRepository, FolderRepository};
pub use store::{DocumentStore, FolderStore};
