//! Folder upload: the streaming ingestion pipeline.

pub mod request;
pub mod service;

pub use request::FolderUploadRequest;
pub use service::FolderUploadService;
