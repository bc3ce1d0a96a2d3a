// CLI module - command handlers and output formatting
pub mod create;
pub mod delete;
pub mod format;
pub mod list;
pub mod restore;

pub use format::OutputFormat;
