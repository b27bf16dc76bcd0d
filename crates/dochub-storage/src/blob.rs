//! Blob writes for uploaded document bytes.

use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, warn};
use uuid::Uuid;

use dochub_core::result::AppResult;
use dochub_core::traits::storage::StorageProvider;

/// Writes document bytes under a fresh, collision-free key.
///
/// The key is `"{uuid}_{file_name}"` where `file_name` is the last path
/// segment of the client-supplied name. The key is stored as the
/// document's `file_url`.
#[derive(Debug, Clone)]
pub struct BlobStore {
    provider: Arc<dyn StorageProvider>,
}

impl BlobStore {
    /// Wrap a storage provider.
    pub fn new(provider: Arc<dyn StorageProvider>) -> Self {
        Self { provider }
    }

    /// The underlying provider.
    pub fn provider(&self) -> &Arc<dyn StorageProvider> {
        &self.provider
    }

    /// Store `data` and return the key it was written under.
    pub async fn store(&self, file_name: &str, data: Bytes) -> AppResult<String> {
        let key = blob_key(Uuid::new_v4(), file_name);
        let len = data.len();
        self.provider.write(&key, data).await?;
        debug!(key = %key, bytes = len, "Stored document bytes");
        Ok(key)
    }

    /// Read back the bytes stored under `key`.
    pub async fn load(&self, key: &str) -> AppResult<Bytes> {
        self.provider.read_bytes(key).await
    }

    /// Remove the bytes stored under `key`.
    pub async fn remove(&self, key: &str) -> AppResult<()> {
        self.provider.delete(key).await
    }

    /// Remove many blobs, logging failures instead of returning them.
    pub async fn remove_all_best_effort<'a, I>(&self, keys: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        for key in keys {
            if let Err(e) = self.provider.delete(key).await {
                warn!(key, error = %e, "Failed to remove document bytes");
            }
        }
    }
}

/// Build the storage key for a file.
pub fn blob_key(id: Uuid, file_name: &str) -> String {
    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .filter(|s| !s.is_empty() && *s != "." && *s != "..")
        .unwrap_or("file");
    format!("{id}_{base}")
}
