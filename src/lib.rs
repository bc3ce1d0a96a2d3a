pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod tool;

pub use catalog::{BackupCatalog, BackupEntry};
pub use config::CatalogConfig;
pub use error::{CatalogError, Result};
pub use tool::{CommandTool, DatabaseTool, ToolError};
