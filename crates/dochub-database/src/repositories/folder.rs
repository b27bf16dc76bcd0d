//! Folder repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use dochub_core::error::{AppError, ErrorKind};
use dochub_core::result::AppResult;
use dochub_entity::folder::{CreateFolder, Folder};

use super::contains_pattern;
use crate::store::FolderStore;

/// Unique index enforcing sibling-name uniqueness.
const SIBLING_NAME_KEY: &str = "folders_parent_name_key";

/// Upper bound on tree depth walked by the recursive queries; guards
/// against looping on a corrupted parent chain.
const MAX_DEPTH: i32 = 4096;

/// Repository for folder CRUD and tree queries.
#[derive(Debug, Clone)]
pub struct FolderRepository {
    pool: PgPool,
}

impl FolderRepository {
    /// Create a new folder repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn map_write_error(e: sqlx::Error, name: &str, parent_id: Option<Uuid>) -> AppError {
        match e {
            sqlx::Error::Database(ref db_err) if db_err.constraint() == Some(SIBLING_NAME_KEY) => {
                AppError::conflict(format!("A folder named '{name}' already exists here"))
            }
            sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
                AppError::not_found(format!(
                    "Parent folder {} not found",
                    parent_id.map(|id| id.to_string()).unwrap_or_default()
                ))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to write folder", e),
        }
    }
}

#[async_trait]
impl FolderStore for FolderRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>("SELECT * FROM folders WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find folder", e))
    }

    async fn find_by_name(
        &self,
        parent_id: Option<Uuid>,
        name: &str,
    ) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>(
            "SELECT * FROM folders WHERE parent_id IS NOT DISTINCT FROM $1 AND name = $2",
        )
        .bind(parent_id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find folder by name", e)
        })
    }

    async fn find_children(
        &self,
        parent_id: Option<Uuid>,
        name_filter: Option<&str>,
    ) -> AppResult<Vec<Folder>> {
        let result = match name_filter {
            Some(q) => {
                sqlx::query_as::<_, Folder>(
                    "SELECT * FROM folders WHERE parent_id IS NOT DISTINCT FROM $1 \
                     AND name ILIKE $2 ORDER BY name ASC",
                )
                .bind(parent_id)
                .bind(contains_pattern(q))
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, Folder>(
                    "SELECT * FROM folders WHERE parent_id IS NOT DISTINCT FROM $1 ORDER BY name ASC",
                )
                .bind(parent_id)
                .fetch_all(&self.pool)
                .await
            }
        };

        result.map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list folders", e))
    }

    async fn find_ancestor_ids(&self, id: Uuid) -> AppResult<Vec<Uuid>> {
        sqlx::query_scalar::<_, Uuid>(
            "WITH RECURSIVE ancestors AS ( \
                SELECT id, parent_id, 0 AS depth FROM folders WHERE id = $1 \
                UNION ALL \
                SELECT f.id, f.parent_id, a.depth + 1 FROM folders f \
                INNER JOIN ancestors a ON f.id = a.parent_id WHERE a.depth < $2 \
             ) SELECT id FROM ancestors ORDER BY depth ASC",
        )
        .bind(id)
        .bind(MAX_DEPTH)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find ancestors", e))
    }

    async fn find_descendant_ids(&self, id: Uuid) -> AppResult<Vec<Uuid>> {
        sqlx::query_scalar::<_, Uuid>(
            "WITH RECURSIVE tree AS ( \
                SELECT id, 0 AS depth FROM folders WHERE id = $1 \
                UNION ALL \
                SELECT f.id, t.depth + 1 FROM folders f \
                INNER JOIN tree t ON f.parent_id = t.id WHERE t.depth < $2 \
             ) SELECT id FROM tree WHERE id != $1 ORDER BY depth ASC",
        )
        .bind(id)
        .bind(MAX_DEPTH)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list descendants", e))
    }

    async fn create(&self, data: &CreateFolder) -> AppResult<Folder> {
        sqlx::query_as::<_, Folder>(
            "INSERT INTO folders (name, parent_id) VALUES ($1, $2) RETURNING *",
        )
        .bind(&data.name)
        .bind(data.parent_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| Self::map_write_error(e, &data.name, data.parent_id))
    }

    async fn update(&self, folder: &Folder) -> AppResult<Folder> {
        sqlx::query_as::<_, Folder>(
            "UPDATE folders SET name = $2, parent_id = $3, updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(folder.id)
        .bind(&folder.name)
        .bind(folder.parent_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| Self::map_write_error(e, &folder.name, folder.parent_id))?
        .ok_or_else(|| AppError::not_found(format!("Folder {} not found", folder.id)))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM folders WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete folder", e)
            })?;
        Ok(result.rows_affected() > 0)
    }
}
