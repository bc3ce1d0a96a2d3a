// External dump/restore tool - the collaborator that moves database bytes
pub mod command;

pub use command::{CommandSpec, CommandTool};

use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Destination/source kind passed to the tool; artifacts always live on local disk
pub const STORAGE_LOCAL: &str = "local";

/// Compression passed to the tool; matches the `.gz` artifact extension
pub const COMPRESSION_GZIP: &str = "gzip";

#[derive(Error, Debug)]
pub enum ToolError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {}: {stderr}", exit_code_display(.code))]
    Failed {
        program: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("{program} did not finish within {timeout:?}")]
    TimedOut { program: String, timeout: Duration },

    #[error("IO error while waiting for {program}: {source}")]
    Io {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

fn exit_code_display(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "signal".to_string(),
    }
}

/// Parameters for producing a new artifact
#[derive(Debug, Clone)]
pub struct DumpRequest<'a> {
    pub database: &'a str,
    pub catalog_dir: &'a Path,
    /// Filename stem; the tool appends the compression extension
    pub destination_path: &'a str,
}

impl DumpRequest<'_> {
    pub fn to_args(&self) -> Vec<String> {
        vec![
            format!("--database={}", self.database),
            format!("--destination={}", STORAGE_LOCAL),
            format!("--compression={}", COMPRESSION_GZIP),
            format!("--destinationPath={}", self.destination_path),
        ]
    }
}

/// Parameters for loading an existing artifact into the database
#[derive(Debug, Clone)]
pub struct RestoreRequest<'a> {
    pub database: &'a str,
    pub catalog_dir: &'a Path,
    pub source_path: &'a str,
}

impl RestoreRequest<'_> {
    pub fn to_args(&self) -> Vec<String> {
        vec![
            format!("--source={}", STORAGE_LOCAL),
            format!("--sourcePath={}", self.source_path),
            format!("--database={}", self.database),
            format!("--compression={}", COMPRESSION_GZIP),
        ]
    }
}

/// Opaque collaborator performing the byte-level dump and restore.
///
/// Implementations block until the work is finished and report only
/// success or failure; no guarantee is made about partial output.
pub trait DatabaseTool {
    fn dump(&self, request: &DumpRequest<'_>) -> std::result::Result<(), ToolError>;

    fn restore(&self, request: &RestoreRequest<'_>) -> std::result::Result<(), ToolError>;
}
