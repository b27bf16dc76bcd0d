//! Document repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

use dochub_core::error::{AppError, ErrorKind};
use dochub_core::result::AppResult;
use dochub_entity::document::{CreateDocument, Document};

use super::contains_pattern;
use crate::store::DocumentStore;

/// Repository for document CRUD and folder assignment.
#[derive(Debug, Clone)]
pub struct DocumentRepository {
    pool: PgPool,
}

impl DocumentRepository {
    /// Create a new document repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn map_write_error(e: sqlx::Error, folder_id: Option<Uuid>) -> AppError {
        match e {
            sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
                AppError::not_found(format!(
                    "Folder {} not found",
                    folder_id.map(|id| id.to_string()).unwrap_or_default()
                ))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to write document", e),
        }
    }
}

#[async_trait]
impl DocumentStore for DocumentRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Document>> {
        sqlx::query_as::<_, Document>("SELECT * FROM documents WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find document", e))
    }

    async fn find_in_folder(
        &self,
        folder_id: Option<Uuid>,
        name_filter: Option<&str>,
    ) -> AppResult<Vec<Document>> {
        let result = match name_filter {
            Some(q) => {
                sqlx::query_as::<_, Document>(
                    "SELECT * FROM documents WHERE folder_id IS NOT DISTINCT FROM $1 \
                     AND name ILIKE $2 ORDER BY name ASC",
                )
                .bind(folder_id)
                .bind(contains_pattern(q))
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, Document>(
                    "SELECT * FROM documents WHERE folder_id IS NOT DISTINCT FROM $1 ORDER BY name ASC",
                )
                .bind(folder_id)
                .fetch_all(&self.pool)
                .await
            }
        };

        result
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list documents", e))
    }

    async fn find_in_folders(&self, folder_ids: &[Uuid]) -> AppResult<Vec<Document>> {
        if folder_ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, Document>("SELECT * FROM documents WHERE folder_id = ANY($1)")
            .bind(folder_ids)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list documents", e))
    }

    async fn create(&self, data: &CreateDocument) -> AppResult<Document> {
        sqlx::query_as::<_, Document>(
            "INSERT INTO documents (name, file_url, folder_id) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(&data.name)
        .bind(&data.file_url)
        .bind(data.folder_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| Self::map_write_error(e, data.folder_id))
    }

    async fn update(&self, document: &Document) -> AppResult<Document> {
        sqlx::query_as::<_, Document>(
            "UPDATE documents SET name = $2, folder_id = $3, updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(document.id)
        .bind(&document.name)
        .bind(document.folder_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| Self::map_write_error(e, document.folder_id))?
        .ok_or_else(|| AppError::not_found(format!("Document {} not found", document.id)))
    }

    async fn assign_folders(&self, assignments: &[(Uuid, Option<Uuid>)]) -> AppResult<u64> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let mut updated = 0u64;
        for (document_id, folder_id) in assignments {
            let result = sqlx::query(
                "UPDATE documents SET folder_id = $2, updated_at = NOW() WHERE id = $1",
            )
            .bind(document_id)
            .bind(folder_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| Self::map_write_error(e, *folder_id))?;

            if result.rows_affected() == 0 {
                warn!(document_id = %document_id, "Document gone before folder assignment, skipped");
                continue;
            }
            updated += result.rows_affected();
        }

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit folder assignment", e)
        })?;

        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM documents WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete document", e)
            })?;
        Ok(result.rows_affected() > 0)
    }
}
