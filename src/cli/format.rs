use crate::BackupEntry;
use byte_unit::{Byte, UnitType};
use clap::ValueEnum;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Table};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

pub fn print_json(value: &Value) -> serde_json::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Format a byte count into a human-readable string
pub fn format_size(bytes: u64) -> String {
    let byte = Byte::from_u64(bytes);
    let adjusted = byte.get_appropriate_unit(UnitType::Binary);
    format!("{adjusted:.2}")
}

pub fn backup_table(entries: &[BackupEntry]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec!["FILENAME", "CREATED", "SIZE"]);

    for entry in entries {
        table.add_row(vec![
            entry.filename.clone(),
            entry.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            format_size(entry.size_bytes),
        ]);
    }

    table
}

pub fn print_backup_list(entries: &[BackupEntry]) {
    if entries.is_empty() {
        println!("No backups found.");
        return;
    }

    println!("{}", backup_table(entries));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(2048), "2.00 KiB");
    }

    #[test]
    fn test_backup_table_rows() {
        let entries = vec![
            BackupEntry::from_file("backup_01-02-2023_10-00-00.gz", 500).unwrap(),
            BackupEntry::from_file("backup_05-02-2023_08-30-00.gz", 700).unwrap(),
        ];

        let rendered = backup_table(&entries).to_string();

        assert!(rendered.contains("backup_01-02-2023_10-00-00.gz"));
        assert!(rendered.contains("2023-02-05 08:30:00"));
        assert!(rendered.contains("backup_05-02-2023_08-30-00.gz"));
    }
}
