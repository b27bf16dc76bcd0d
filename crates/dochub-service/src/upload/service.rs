//! Folder upload pipeline producing ordered progress events.

use std::collections::HashMap;
use std::sync::Arc;

use async_stream::stream;
use futures::Stream;
use tracing::{error, info, warn};

use dochub_core::events::{ProgressEvent, UploadStage};
use dochub_database::store::FolderStore;
use dochub_entity::document::Document;

use super::request::FolderUploadRequest;
use crate::document::DocumentService;
use crate::folder::tree::{FolderMapper, TreeBuilder};
use crate::path;

/// Runs a folder upload and reports each step as it happens.
#[derive(Debug, Clone)]
pub struct FolderUploadService {
    /// Folder persistence, for resolving the destination.
    folders: Arc<dyn FolderStore>,
    /// Creates one document per uploaded file.
    documents: DocumentService,
    /// Reconciles paths into folders.
    tree: TreeBuilder,
}

impl FolderUploadService {
    /// Creates a new folder upload service.
    pub fn new(
        folders: Arc<dyn FolderStore>,
        documents: DocumentService,
        tree: TreeBuilder,
    ) -> Self {
        Self {
            folders,
            documents,
            tree,
        }
    }

    /// Ingest `request`, yielding progress events in order.
    ///
    /// Work only advances when the consumer polls for the next event. The
    /// last event is always `upload_complete` or `error`. Nothing written
    /// before an error is rolled back.
    pub fn stream_progress(
        &self,
        request: FolderUploadRequest,
    ) -> impl Stream<Item = ProgressEvent> + Send + 'static {
        let this = self.clone();

        stream! {
            let (paths, files, folder_id) = request.into_parts();
            let total_files = files.len();

            yield ProgressEvent::stage(UploadStage::FolderStructure, "Determining root folder");

            let mut mapper = match folder_id {
                Some(id) => match this.folders.find_by_id(id).await {
                    Ok(Some(root)) => FolderMapper::with_root(root),
                    Ok(None) => {
                        warn!(folder_id = %id, "Upload destination not found");
                        yield ProgressEvent::failure("Parent folder not found");
                        return;
                    }
                    Err(e) => {
                        error!(folder_id = %id, error = %e, "Failed to resolve upload destination");
                        yield ProgressEvent::failure(e.message);
                        return;
                    }
                },
                None => FolderMapper::new(),
            };

            let root_prefix = mapper.root_key().map(str::to_owned);
            let normalized: Vec<String> = paths
                .iter()
                .map(|p| path::normalize(p, root_prefix.as_deref()))
                .collect();

            yield ProgressEvent::documents_started(total_files);

            let mut documents_by_path: HashMap<String, Vec<Document>> = HashMap::new();
            let mut created = 0;
            for (file, full_path) in files.into_iter().zip(&normalized) {
                let file_name = file.file_name.clone();
                match this.documents.create_document(file, None).await {
                    Ok(document) => {
                        created += 1;
                        documents_by_path
                            .entry(full_path.clone())
                            .or_default()
                            .push(document);
                        yield ProgressEvent::document_created(&file_name, created, total_files);
                    }
                    Err(e) => {
                        warn!(file = %file_name, error = %e, "Document creation failed");
                        yield ProgressEvent::document_failed(&file_name, &e, created, total_files);
                    }
                }
            }

            yield ProgressEvent::stage(UploadStage::FolderStructure, "Creating folder structure");

            let walk = this
                .tree
                .walk(&normalized, &documents_by_path, &mut mapper)
                .await;
            for failed in &walk.failed_paths {
                yield ProgressEvent::path_failed(&failed.path, &failed.error.message);
            }

            yield ProgressEvent::stage(UploadStage::RelationUpdate, "Updating document relationships");

            let attached = match this.tree.finalize(&walk.pending).await {
                Ok(updated) => updated,
                Err(e) => {
                    error!(error = %e, "Failed to save document folder assignments");
                    yield ProgressEvent::failure(e.message);
                    return;
                }
            };

            info!(
                total_files,
                created,
                attached,
                folders_created = mapper.created_count(),
                renamed = walk.renamed.len(),
                failed_paths = walk.failed_paths.len(),
                "Folder upload complete"
            );
            yield ProgressEvent::complete(total_files, mapper.created_count());
        }
    }
}
