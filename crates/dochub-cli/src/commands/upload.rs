//! Directory upload through the streaming folder pipeline.

use std::path::{Component, Path, PathBuf};
use std::pin::pin;

use clap::Args;
use futures::StreamExt;

use crate::output::{self, OutputFormat};
use dochub_core::error::{AppError, ErrorKind};
use dochub_core::events::UploadStage;
use dochub_service::{FolderUploadRequest, UploadedFile};

/// Arguments for the upload command
#[derive(Debug, Args)]
pub struct UploadArgs {
    /// Local directory to upload; its name becomes the top folder
    pub dir: PathBuf,

    /// Destination folder ID (omit for the tree root)
    #[arg(long)]
    pub folder_id: Option<String>,
}

/// Execute the upload command
pub async fn execute(
    args: &UploadArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let folder_id = super::parse_id(args.folder_id.as_deref(), "folder")?;
    let entries = collect_files(&args.dir).await?;
    if entries.is_empty() {
        return Err(AppError::validation(format!(
            "No files found under {}",
            args.dir.display()
        )));
    }

    let mut paths = Vec::with_capacity(entries.len());
    let mut files = Vec::with_capacity(entries.len());
    for (relative, location) in entries {
        let data = tokio::fs::read(&location).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to read {}", location.display()),
                e,
            )
        })?;
        let file_name = relative.rsplit('/').next().unwrap_or(&relative).to_string();
        paths.push(relative);
        files.push(UploadedFile::new(file_name, data));
    }

    tracing::debug!(dir = %args.dir.display(), files = paths.len(), "Collected files");

    let config = super::load_config(config_path)?;
    let services = super::connect(&config).await?;
    let request = FolderUploadRequest::new(paths, files, folder_id)?;

    let mut events = pin!(services.upload.stream_progress(request));
    while let Some(event) = events.next().await {
        output::print_event(&event, format)?;
        if event.stage == UploadStage::Error {
            return Err(AppError::internal(format!("Upload failed: {}", event.message)));
        }
    }

    Ok(())
}

/// Every regular file below `dir` as `(relative path, location)`.
///
/// Relative paths start with the directory's own name and use `/`
/// separators. Entries are sorted by relative path.
pub async fn collect_files(dir: &Path) -> Result<Vec<(String, PathBuf)>, AppError> {
    let root = tokio::fs::canonicalize(dir).await.map_err(|e| {
        AppError::with_source(
            ErrorKind::NotFound,
            format!("Directory not found: {}", dir.display()),
            e,
        )
    })?;
    let root_name = root
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| AppError::validation(format!("Cannot upload {}", root.display())))?
        .to_string();

    let mut found = Vec::new();
    let mut pending = vec![root.clone()];
    while let Some(current) = pending.pop() {
        let mut entries = tokio::fs::read_dir(&current).await?;
        while let Some(entry) = entries.next_entry().await? {
            let file_type = entry.file_type().await?;
            let location = entry.path();
            if file_type.is_dir() {
                pending.push(location);
            } else if file_type.is_file() {
                let relative = relative_path(&root_name, &root, &location)?;
                found.push((relative, location));
            }
        }
    }

    found.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(found)
}

fn relative_path(root_name: &str, root: &Path, location: &Path) -> Result<String, AppError> {
    let inner = location
        .strip_prefix(root)
        .map_err(|_| AppError::internal(format!("{} is outside the upload root", location.display())))?;

    let mut relative = root_name.to_string();
    for component in inner.components() {
        if let Component::Normal(part) = component {
            let part = part.to_str().ok_or_else(|| {
                AppError::validation(format!("Non UTF-8 path: {}", location.display()))
            })?;
            relative.push('/');
            relative.push_str(part);
        }
    }
    Ok(relative)
}
