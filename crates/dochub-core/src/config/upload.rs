//! Folder upload pipeline configuration.

use serde::{Deserialize, Serialize};

/// Tuning knobs for the folder upload pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// How many times folder creation re-resolves a name after the store
    /// rejects it as a duplicate sibling (another writer got there first).
    #[serde(default = "default_conflict_retries")]
    pub name_conflict_retries: u32,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            name_conflict_retries: default_conflict_retries(),
        }
    }
}

fn default_conflict_retries() -> u32 {
    3
}
