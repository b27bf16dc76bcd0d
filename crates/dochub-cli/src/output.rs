//! Table and JSON output formatting for CLI commands.

use serde::Serialize;
use tabled::{Table, Tabled};

use dochub_core::error::AppError;
use dochub_core::events::ProgressEvent;

/// Output format selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// JSON output
    Json,
}

/// Print a list of items in the selected format
pub fn print_list<T: Serialize + Tabled>(items: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            if items.is_empty() {
                println!("No results found.");
            } else {
                println!("{}", Table::new(items));
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(items).unwrap_or_else(|_| "[]".to_string());
            println!("{json}");
        }
    }
}

/// Print one upload progress event as it arrives.
///
/// JSON output is the same line the HTTP stream carries.
pub fn print_event(event: &ProgressEvent, format: OutputFormat) -> Result<(), AppError> {
    match format {
        OutputFormat::Table => println!("{}", event_line(event)),
        OutputFormat::Json => print!("{}", event.to_line()?),
    }
    Ok(())
}

fn event_line(event: &ProgressEvent) -> String {
    let mut line = format!("{:<22} {}", event.stage.wire_name(), event.message);
    if let (Some(created), Some(total)) = (event.created_count, event.valid_files_count) {
        line.push_str(&format!(" [{created}/{total}]"));
    }
    if let (Some(files), Some(folders)) = (event.total_files, event.total_folders) {
        line.push_str(&format!(" ({files} files, {folders} folders created)"));
    }
    if let Some(error) = &event.error {
        line.push_str(&format!(": {error}"));
    }
    line
}

/// Print a success message
pub fn print_success(msg: &str) {
    println!("✓ {msg}");
}

/// Print an error message
pub fn print_error(msg: &str) {
    eprintln!("✗ {msg}");
}
