//! Document ingestion and CRUD.

pub mod service;

pub use service::{DocumentService, UpdateDocumentRequest, UploadedFile};
