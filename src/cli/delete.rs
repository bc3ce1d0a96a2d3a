use super::format::{self, OutputFormat};
use crate::{BackupCatalog, DatabaseTool};
use anyhow::Result;

pub fn execute<T: DatabaseTool>(
    catalog: &BackupCatalog<T>,
    filename: &str,
    output_format: OutputFormat,
) -> Result<()> {
    catalog.delete(filename)?;

    match output_format {
        OutputFormat::Json => {
            format::print_json(&serde_json::json!({ "filename": filename }))?;
        }
        OutputFormat::Table => {
            println!("✓ Backup deleted: {}", filename);
        }
    }

    Ok(())
}
