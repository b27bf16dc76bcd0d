//! Folder management CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use dochub_core::error::AppError;
use dochub_entity::folder::FolderContents;
use dochub_service::CreateFolderRequest;

/// Arguments for folder commands
#[derive(Debug, Args)]
pub struct FolderArgs {
    /// Folder subcommand
    #[command(subcommand)]
    pub command: FolderCommand,
}

/// Folder subcommands
#[derive(Debug, Subcommand)]
pub enum FolderCommand {
    /// List the folders and documents directly inside a folder
    Ls {
        /// Folder ID (omit for the tree root)
        #[arg(long)]
        folder_id: Option<String>,
        /// Case-insensitive name filter
        #[arg(short, long)]
        query: Option<String>,
    },
    /// Create a new folder
    Create {
        /// Folder name
        #[arg(short, long)]
        name: String,
        /// Parent folder ID (omit for root)
        #[arg(short, long)]
        parent_id: Option<String>,
    },
    /// Delete a folder with everything inside it
    Rm {
        /// Folder ID
        id: String,
    },
}

/// One listing row
#[derive(Debug, Serialize, Tabled)]
struct EntryRow {
    /// "folder" or "document"
    kind: &'static str,
    /// Entry ID
    id: String,
    /// Name
    name: String,
    /// Last modified
    updated_at: String,
}

/// Execute folder commands
pub async fn execute(
    args: &FolderArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    let services = super::connect(&config).await?;

    match &args.command {
        FolderCommand::Ls { folder_id, query } => {
            let folder_id = super::parse_id(folder_id.as_deref(), "folder")?;
            let contents = services
                .folders
                .folder_details(folder_id, query.as_deref())
                .await?;
            output::print_list(&rows(&contents), format);
        }
        FolderCommand::Create { name, parent_id } => {
            let parent_id = super::parse_id(parent_id.as_deref(), "parent")?;
            let folder = services
                .folders
                .create_folder(CreateFolderRequest {
                    name: name.clone(),
                    parent_id,
                })
                .await?;
            output::print_success(&format!("Folder '{}' created (id: {})", folder.name, folder.id));
        }
        FolderCommand::Rm { id } => {
            let id = super::parse_id(Some(id), "folder")?
                .ok_or_else(|| AppError::validation("Folder ID is required"))?;
            services.folders.delete_folder(id).await?;
            output::print_success(&format!("Folder {id} deleted"));
        }
    }

    Ok(())
}

fn rows(contents: &FolderContents) -> Vec<EntryRow> {
    let folders = contents.folders.iter().map(|f| EntryRow {
        kind: "folder",
        id: f.id.to_string(),
        name: f.name.clone(),
        updated_at: f.updated_at.format("%Y-%m-%d %H:%M").to_string(),
    });
    let documents = contents.documents.iter().map(|d| EntryRow {
        kind: "document",
        id: d.id.to_string(),
        name: d.name.clone(),
        updated_at: d.updated_at.format("%Y-%m-%d %H:%M").to_string(),
    });
    folders.chain(documents).collect()
}
