//! Folder naming, tree reconciliation, and CRUD services.

pub mod lock;
pub mod naming;
pub mod service;
pub mod tree;

pub use lock::ParentLocks;
pub use service::{CreateFolderRequest, FolderService, UpdateFolderRequest};
pub use tree::{FolderMapper, RenamedFolder, TreeBuilder};
