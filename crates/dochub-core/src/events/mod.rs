//! Events surfaced to DocHub clients.
//!
//! The only event family today is the folder-upload progress stream,
//! serialized one JSON object per line.

pub mod upload;

pub use upload::{ProgressEvent, UploadStage};
