//! # dochub-storage
//!
//! Byte storage for uploaded documents. [`BlobStore`] names and writes
//! blobs through any [`StorageProvider`](dochub_core::traits::StorageProvider);
//! [`LocalStorageProvider`] keeps them on the local filesystem.

pub mod blob;
pub mod providers;

pub use blob::BlobStore;
pub use providers::local::LocalStorageProvider;
