use super::format::{self, OutputFormat};
use crate::{BackupCatalog, DatabaseTool};
use anyhow::{Context, Result};

pub fn execute<T: DatabaseTool>(catalog: &BackupCatalog<T>, output_format: OutputFormat) -> Result<()> {
    if output_format == OutputFormat::Table {
        println!("Backing up database '{}'...", catalog.database());
        println!("  Backup directory: {}", catalog.dir().display());
    }

    let filename = catalog
        .create()
        .context("Backup failed! Please check the error logs")?;

    match output_format {
        OutputFormat::Json => {
            format::print_json(&serde_json::json!({ "filename": filename }))?;
        }
        OutputFormat::Table => {
            println!("\n✓ Backup created successfully");
            println!("  File: {}", filename);
        }
    }

    Ok(())
}
