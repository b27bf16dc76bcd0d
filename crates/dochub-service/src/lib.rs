//! # dochub-service
//!
//! Business logic for DocHub: path normalization, folder naming and tree
//! reconciliation, document ingestion, and the folder upload pipeline.
//!
//! Services follow constructor injection: stores and the blob store are
//! handed in as `Arc`s at construction time.

pub mod document;
pub mod folder;
pub mod path;
pub mod upload;

pub use document::{DocumentService, UpdateDocumentRequest, UploadedFile};
pub use folder::{
    CreateFolderRequest, FolderMapper, FolderService, ParentLocks, TreeBuilder,
    UpdateFolderRequest,
};
pub use upload::{FolderUploadRequest, FolderUploadService};
