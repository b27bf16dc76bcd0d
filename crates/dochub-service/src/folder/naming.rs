//! Collision-free folder names among siblings.

use uuid::Uuid;

use dochub_core::error::AppError;
use dochub_database::store::FolderStore;

/// Find a name for a new folder under `parent_id`.
///
/// Returns `desired` unchanged when no sibling uses it, otherwise the first
/// free `"{desired} (n)"` for n = 1, 2, ... together with `true`. The check
/// runs against the store, so siblings from earlier uploads count.
pub async fn resolve_name(
    store: &dyn FolderStore,
    desired: &str,
    parent_id: Option<Uuid>,
) -> Result<(String, bool), AppError> {
    if store.find_by_name(parent_id, desired).await?.is_none() {
        return Ok((desired.to_string(), false));
    }

    let mut counter: u64 = 1;
    loop {
        let candidate = format!("{desired} ({counter})");
        if store.find_by_name(parent_id, &candidate).await?.is_none() {
            return Ok((candidate, true));
        }
        counter += 1;
    }
}
