//! Document byte storage configuration.

use serde::{Deserialize, Serialize};

/// Where and how uploaded document bytes are stored.
///
/// The root path is read once at startup and handed to the storage
/// provider; it never changes for the lifetime of the process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory for uploaded document bytes.
    #[serde(default = "default_root_path")]
    pub root_path: String,
    /// Maximum size of a single uploaded file in bytes (default 512 MB).
    #[serde(default = "default_max_upload")]
    pub max_upload_size_bytes: u64,
    /// Maximum size of a whole multipart request body (default 5 GB).
    #[serde(default = "default_max_request")]
    pub max_request_size_bytes: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root_path: default_root_path(),
            max_upload_size_bytes: default_max_upload(),
            max_request_size_bytes: default_max_request(),
        }
    }
}

fn default_root_path() -> String {
    "./data/uploads".to_string()
}

fn default_max_upload() -> u64 {
    536_870_912 // 512 MB
}

fn default_max_request() -> u64 {
    5_368_709_120 // 5 GB
}
