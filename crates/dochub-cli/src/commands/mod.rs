//! CLI command definitions and dispatch.

pub mod folder;
pub mod migrate;
pub mod upload;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use uuid::Uuid;

use crate::output::OutputFormat;
use dochub_core::config::AppConfig;
use dochub_core::error::AppError;
use dochub_database::{DatabasePool, DocumentRepository, DocumentStore, FolderRepository, FolderStore};
use dochub_service::{DocumentService, FolderService, FolderUploadService, ParentLocks, TreeBuilder};
use dochub_storage::{BlobStore, LocalStorageProvider};

/// DocHub: documents, folders and streaming folder upload
#[derive(Debug, Parser)]
#[command(name = "dochub", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Upload a local directory as a folder tree
    Upload(upload::UploadArgs),
    /// Folder management
    Folder(folder::FolderArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        match &self.command {
            Commands::Migrate(args) => migrate::execute(args, &self.config).await,
            Commands::Upload(args) => upload::execute(args, &self.config, self.format).await,
            Commands::Folder(args) => folder::execute(args, &self.config, self.format).await,
        }
    }
}

/// Services wired over the configured database and storage root.
pub struct Services {
    pub folders: FolderService,
    pub upload: FolderUploadService,
}

/// Helper: load configuration from file
pub fn load_config(config_path: &str) -> Result<AppConfig, AppError> {
    AppConfig::load(config_path)
}

/// Helper: connect to the database and build the service layer
pub async fn connect(config: &AppConfig) -> Result<Services, AppError> {
    let pool = DatabasePool::connect(&config.database).await?;
    let folders: Arc<dyn FolderStore> = Arc::new(FolderRepository::new(pool.pool().clone()));
    let documents: Arc<dyn DocumentStore> = Arc::new(DocumentRepository::new(pool.into_pool()));

    let provider = LocalStorageProvider::new(&config.storage.root_path).await?;
    let blobs = BlobStore::new(Arc::new(provider));

    let document_service = DocumentService::new(
        Arc::clone(&documents),
        Arc::clone(&folders),
        blobs.clone(),
        config.storage.max_upload_size_bytes,
    );
    let tree = TreeBuilder::new(
        Arc::clone(&folders),
        Arc::clone(&documents),
        Arc::new(ParentLocks::new()),
        config.upload.name_conflict_retries,
    );

    Ok(Services {
        folders: FolderService::new(Arc::clone(&folders), documents, blobs),
        upload: FolderUploadService::new(folders, document_service, tree),
    })
}

/// Helper: parse an optional UUID argument
pub fn parse_id(value: Option<&str>, what: &str) -> Result<Option<Uuid>, AppError> {
    value
        .map(|v| {
            Uuid::parse_str(v)
                .map_err(|e| AppError::validation(format!("Invalid {what} UUID: {e}")))
        })
        .transpose()
}
