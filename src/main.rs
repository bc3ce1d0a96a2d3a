use anyhow::Result;
use backup_catalog::{cli::OutputFormat, BackupCatalog, CatalogConfig};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "backup-catalog")]
#[command(about = "Create, list, restore and delete database backups", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Backup directory override
    #[arg(long, global = true, env = "BACKUP_DIR")]
    backup_dir: Option<PathBuf>,

    /// Database to back up or restore into
    #[arg(long, global = true, env = "BACKUP_DATABASE")]
    database: Option<String>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "table")]
    format: OutputFormat,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List backups, oldest first
    List,

    /// Back up the database into a new file
    Create,

    /// Restore the database from a backup
    Restore {
        /// Backup file name
        #[arg(required_unless_present = "latest")]
        filename: Option<String>,

        /// Restore the most recent backup
        #[arg(long, conflicts_with = "filename")]
        latest: bool,
    },

    /// Delete a backup
    Delete {
        /// Backup file name
        filename: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; stdout is reserved for command output
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    // Resolve configuration
    let mut config = CatalogConfig::load_or_default(cli.config.as_deref())?;
    if let Some(backup_dir) = cli.backup_dir {
        config.backup_dir = backup_dir;
    }
    if let Some(database) = cli.database {
        config.database = database;
    }
    config.validate()?;

    let catalog = BackupCatalog::from_config(&config);

    // Execute command
    match cli.command {
        Commands::List => {
            backup_catalog::cli::list::execute(&catalog, cli.format)?;
        }
        Commands::Create => {
            backup_catalog::cli::create::execute(&catalog, cli.format)?;
        }
        Commands::Restore { filename, latest: _ } => {
            backup_catalog::cli::restore::execute(&catalog, filename.as_deref(), cli.format)?;
        }
        Commands::Delete { filename } => {
            backup_catalog::cli::delete::execute(&catalog, &filename, cli.format)?;
        }
    }

    Ok(())
}
