// Backup catalog - artifacts on disk and the operations over them
pub mod entry;
pub mod manager;

pub use entry::BackupEntry;
pub use manager::BackupCatalog;
