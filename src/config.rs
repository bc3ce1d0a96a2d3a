use crate::tool::CommandSpec;
use crate::{CatalogError, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    // Catalog
    pub backup_dir: PathBuf,
    pub database: String,

    // External tool
    pub tool_timeout_secs: u64,
    pub dump: CommandSpec,
    pub restore: CommandSpec,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            backup_dir: default_backup_dir(),
            database: "mysql".to_string(),
            tool_timeout_secs: 60 * 60,
            dump: CommandSpec::new("php", &["artisan", "db:backup"]),
            restore: CommandSpec::new("php", &["artisan", "db:restore"]),
        }
    }
}

impl CatalogConfig {
    /// Load configuration from a TOML file; missing keys take their defaults
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            CatalogError::InvalidConfig(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config = toml::from_str(&content)?;

        tracing::debug!(path = %path.display(), "Loaded configuration");

        Ok(config)
    }

    /// Load `path` if given, otherwise the platform config file if it
    /// exists, otherwise defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }

        match default_config_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.database.trim().is_empty() {
            return Err(CatalogError::InvalidConfig("database must not be empty".into()));
        }

        if self.tool_timeout_secs == 0 {
            return Err(CatalogError::InvalidConfig(
                "tool_timeout_secs must be greater than zero".into(),
            ));
        }

        for (name, spec) in [("dump", &self.dump), ("restore", &self.restore)] {
            if spec.program.trim().is_empty() {
                return Err(CatalogError::InvalidConfig(format!(
                    "{} program must not be empty",
                    name
                )));
            }
        }

        Ok(())
    }

    pub fn tool_timeout(&self) -> Duration {
        Duration::from_secs(self.tool_timeout_secs)
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("dev", "backup-catalog", "backup-catalog")
}

fn default_backup_dir() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().join("backup"))
        .unwrap_or_else(|| PathBuf::from("backup"))
}

pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
