use super::entry::{self, BackupEntry};
use crate::config::CatalogConfig;
use crate::tool::{CommandTool, DatabaseTool, DumpRequest, RestoreRequest};
use crate::{CatalogError, Result};
use chrono::{Local, NaiveDateTime};
use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

/// Directory-backed catalog of database backups.
///
/// The directory is the only state: entries are recomputed from it on
/// every call, and the dump/restore work is delegated to `T`.
pub struct BackupCatalog<T> {
    dir: PathBuf,
    database: String,
    tool: T,
}

impl BackupCatalog<CommandTool> {
    pub fn from_config(config: &CatalogConfig) -> Self {
        let tool = CommandTool::new(
            config.dump.clone(),
            config.restore.clone(),
            config.tool_timeout(),
        );
        Self::new(config.backup_dir.clone(), config.database.clone(), tool)
    }
}

impl<T: DatabaseTool> BackupCatalog<T> {
    pub fn new(dir: PathBuf, database: impl Into<String>, tool: T) -> Self {
        Self {
            dir,
            database: database.into(),
            tool,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    pub fn tool(&self) -> &T {
        &self.tool
    }

    /// List backups, oldest first.
    ///
    /// Files that don't follow the naming convention are skipped with a
    /// warning, as are entries that vanish while listing. A missing
    /// directory is an empty catalog.
    pub fn list(&self) -> Result<Vec<BackupEntry>> {
        let read_dir = match fs::read_dir(&self.dir) {
            Ok(read_dir) => read_dir,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(dir = %self.dir.display(), "Backup directory does not exist yet");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let mut entries = Vec::new();
        for dir_entry in read_dir {
            let dir_entry = dir_entry?;

            // Follows symlinks, as `resolve` does
            let metadata = match fs::metadata(dir_entry.path()) {
                Ok(metadata) => metadata,
                // Deleted since read_dir, or a dangling symlink
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    tracing::debug!(path = %dir_entry.path().display(), "Skipping vanished backup directory entry");
                    continue;
                }
                Err(e) => return Err(e.into()),
            };
            if !metadata.is_file() {
                continue;
            }

            let file_name = dir_entry.file_name();
            let Some(filename) = file_name.to_str() else {
                tracing::warn!(file = ?file_name, "Skipping non UTF-8 file in backup directory");
                continue;
            };

            match BackupEntry::from_file(filename, metadata.len()) {
                Ok(entry) => entries.push(entry),
                Err(e) => {
                    tracing::warn!(file = %filename, error = %e, "Skipping unrecognised file in backup directory");
                }
            }
        }

        // Stable, so equal timestamps keep directory order
        entries.sort_by_key(|entry| entry.created_at);

        Ok(entries)
    }

    /// Newest backup, if any
    pub fn latest(&self) -> Result<Option<BackupEntry>> {
        Ok(self.list()?.pop())
    }

    /// Dump the database into a new artifact named from the current local time.
    pub fn create(&self) -> Result<String> {
        self.create_at(Local::now().naive_local())
    }

    /// Dump the database into a new artifact named from `timestamp`.
    ///
    /// Returns the artifact filename. On tool failure any partial output the
    /// call could have produced is removed before `BackupFailed` is returned;
    /// files that were already present are left alone.
    pub fn create_at(&self, timestamp: NaiveDateTime) -> Result<String> {
        let stem = entry::stem_for(&timestamp);
        let filename = entry::artifact_name(&stem);

        fs::create_dir_all(&self.dir)?;

        // Names have second granularity; refuse to overwrite a same-second backup
        if self.dir.join(&filename).exists() {
            return Err(CatalogError::AlreadyExists(filename));
        }

        // Only paths absent before the dump are ours to clean up
        let cleanup: Vec<PathBuf> = partial_paths(&self.dir, &stem)
            .into_iter()
            .filter(|path| fs::symlink_metadata(path).is_err())
            .collect();

        tracing::info!(
            database = %self.database,
            filename = %filename,
            dir = %self.dir.display(),
            "Creating backup"
        );

        let request = DumpRequest {
            database: &self.database,
            catalog_dir: &self.dir,
            destination_path: &stem,
        };

        if let Err(e) = self.tool.dump(&request) {
            tracing::error!(
                database = %self.database,
                filename = %filename,
                error = %e,
                "Backup failed"
            );
            remove_partial(&cleanup);
            return Err(CatalogError::BackupFailed(e.to_string()));
        }

        if !self.dir.join(&filename).is_file() {
            tracing::warn!(
                filename = %filename,
                "Backup tool reported success but the artifact is missing"
            );
        }

        tracing::info!(filename = %filename, "Backup created successfully");

        Ok(filename)
    }

    /// Load an existing artifact back into the database.
    ///
    /// The artifact itself is left untouched; a failed restore leaves the
    /// database in whatever state the tool left it.
    pub fn restore(&self, filename: &str) -> Result<()> {
        self.resolve(filename)?;

        tracing::info!(database = %self.database, filename = %filename, "Restoring backup");

        let request = RestoreRequest {
            database: &self.database,
            catalog_dir: &self.dir,
            source_path: filename,
        };

        if let Err(e) = self.tool.restore(&request) {
            tracing::error!(
                database = %self.database,
                filename = %filename,
                error = %e,
                "Database restoration failed"
            );
            return Err(CatalogError::RestoreFailed(e.to_string()));
        }

        tracing::info!(filename = %filename, "Backup restored successfully");

        Ok(())
    }

    /// Remove an artifact from the catalog
    pub fn delete(&self, filename: &str) -> Result<()> {
        let path = self.resolve(filename)?;

        match fs::remove_file(&path) {
            Ok(()) => {}
            // Lost a race with another deleter
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(CatalogError::NotFound(filename.to_string()));
            }
            Err(e) => return Err(e.into()),
        }

        tracing::info!(filename = %filename, "Backup deleted");

        Ok(())
    }

    /// Path of an existing artifact directly inside the catalog directory
    fn resolve(&self, filename: &str) -> Result<PathBuf> {
        let not_found = || CatalogError::NotFound(filename.to_string());

        if !is_plain_file_name(filename) {
            tracing::warn!(filename = %filename, "Rejecting backup name outside the catalog directory");
            return Err(not_found());
        }

        let path = self.dir.join(filename);
        if !path.is_file() {
            return Err(not_found());
        }

        Ok(path)
    }
}

/// Where a dump of `stem` may leave output: the artifact, or the
/// uncompressed file if the tool died before compressing
fn partial_paths(dir: &Path, stem: &str) -> [PathBuf; 2] {
    [dir.join(entry::artifact_name(stem)), dir.join(stem)]
}

/// Best-effort cleanup of whatever the dump tool may have left behind
fn remove_partial(paths: &[PathBuf]) {
    for path in paths {
        match fs::remove_file(path) {
            Ok(()) => {
                tracing::info!(path = %path.display(), "Removed partial backup artifact");
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Failed to remove partial backup artifact"
                );
            }
        }
    }
}

fn is_plain_file_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(c)), None) if c == name
    )
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod manager_tests;
