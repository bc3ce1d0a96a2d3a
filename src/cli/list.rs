use super::format::{self, OutputFormat};
use crate::{BackupCatalog, DatabaseTool};
use anyhow::Result;

pub fn execute<T: DatabaseTool>(catalog: &BackupCatalog<T>, output_format: OutputFormat) -> Result<()> {
    let entries = catalog.list()?;

    match output_format {
        OutputFormat::Json => {
            let json_value = serde_json::to_value(&entries)?;
            format::print_json(&json_value)?;
        }
        OutputFormat::Table => {
            format::print_backup_list(&entries);
        }
    }

    Ok(())
}
