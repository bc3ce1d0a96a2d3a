use super::format::{self, OutputFormat};
use crate::{BackupCatalog, DatabaseTool};
use anyhow::{Context, Result};

/// Restore `filename`, or the newest backup when none is given
pub fn execute<T: DatabaseTool>(
    catalog: &BackupCatalog<T>,
    filename: Option<&str>,
    output_format: OutputFormat,
) -> Result<()> {
    let filename = match filename {
        Some(name) => name.to_string(),
        None => {
            catalog
                .latest()?
                .ok_or_else(|| anyhow::anyhow!("No backups found in {}", catalog.dir().display()))?
                .filename
        }
    };

    if output_format == OutputFormat::Table {
        println!(
            "Restoring database '{}' from {}...",
            catalog.database(),
            filename
        );
    }

    catalog
        .restore(&filename)
        .context("Backup restoration failed! Please check the error logs")?;

    match output_format {
        OutputFormat::Json => {
            format::print_json(&serde_json::json!({ "filename": filename }))?;
        }
        OutputFormat::Table => {
            println!("✓ Backup restored successfully");
        }
    }

    Ok(())
}
