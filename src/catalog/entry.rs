use crate::{CatalogError, Result};
use chrono::NaiveDateTime;
use serde::Serialize;

/// Extension the dump tool appends to the stem it is given
pub const ARTIFACT_EXTENSION: &str = "gz";

const STEM_FORMAT: &str = "backup_%d-%m-%Y_%H-%M-%S";

// '0' marks a position that must hold an ASCII digit
const STEM_SHAPE: &str = "backup_00-00-0000_00-00-00";

/// A single backup artifact in the catalog directory.
///
/// `created_at` always comes from the filename, never from filesystem times.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackupEntry {
    pub filename: String,
    pub created_at: NaiveDateTime,
    pub size_bytes: u64,
}

impl BackupEntry {
    pub fn from_file(filename: &str, size_bytes: u64) -> Result<Self> {
        Ok(Self {
            filename: filename.to_string(),
            created_at: parse_created_at(filename)?,
            size_bytes,
        })
    }
}

/// Stem handed to the dump tool, e.g. `backup_05-02-2023_08-30-00`
pub fn stem_for(timestamp: &NaiveDateTime) -> String {
    timestamp.format(STEM_FORMAT).to_string()
}

/// Filename the dump tool produces for a given stem
pub fn artifact_name(stem: &str) -> String {
    format!("{stem}.{ARTIFACT_EXTENSION}")
}

/// Parse the creation time encoded in `backup_<DD-MM-YYYY>_<HH-MM-SS>.gz`.
///
/// The match is strict: fixed-width numeric fields, literal separators, the
/// `.gz` suffix, and a date-time that exists on the calendar.
pub fn parse_created_at(filename: &str) -> Result<NaiveDateTime> {
    let invalid = || CatalogError::InvalidFilename(filename.to_string());

    let stem = filename
        .strip_suffix(ARTIFACT_EXTENSION)
        .and_then(|s| s.strip_suffix('.'))
        .ok_or_else(invalid)?;

    if !matches_shape(stem) {
        return Err(invalid());
    }

    NaiveDateTime::parse_from_str(stem, STEM_FORMAT).map_err(|_| invalid())
}

fn matches_shape(stem: &str) -> bool {
    stem.len() == STEM_SHAPE.len()
        && stem.bytes().zip(STEM_SHAPE.bytes()).all(|(c, s)| {
            if s == b'0' {
                c.is_ascii_digit()
            } else {
                c == s
            }
        })
}

#[cfg(test)]
#[path = "entry_tests.rs"]
mod entry_tests;
