#[cfg(test)]
mod tests {
    use super::super::CatalogConfig;
    use crate::tool::CommandSpec;
    use crate::CatalogError;
    use std::path::PathBuf;
    use std::time::Duration;
    use tempfile::TempDir;

    fn write_config(content: &str) -> (PathBuf, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, content).unwrap();
        (path, temp_dir)
    }

    #[test]
    fn test_defaults() {
        let config = CatalogConfig::default();

        assert_eq!(config.database, "mysql");
        assert_eq!(config.tool_timeout(), Duration::from_secs(3600));
        assert_eq!(config.dump, CommandSpec::new("php", &["artisan", "db:backup"]));
        assert_eq!(config.restore, CommandSpec::new("php", &["artisan", "db:restore"]));
        assert!(config.backup_dir.ends_with("backup"));
        config.validate().unwrap();
    }

    #[test]
    fn test_load_partial_file() {
        let (path, _temp) = write_config(
            r#"
backup_dir = "/var/backups/app"
tool_timeout_secs = 120

[dump]
program = "/usr/local/bin/dump-db"
"#,
        );

        let config = CatalogConfig::load(&path).unwrap();

        assert_eq!(config.backup_dir, PathBuf::from("/var/backups/app"));
        assert_eq!(config.database, "mysql");
        assert_eq!(config.tool_timeout_secs, 120);
        assert_eq!(config.dump.program, "/usr/local/bin/dump-db");
        assert!(config.dump.args.is_empty());
        assert_eq!(config.restore, CatalogConfig::default().restore);
    }

    #[test]
    fn test_load_full_file() {
        let (path, _temp) = write_config(
            r#"
backup_dir = "/srv/backup"
database = "pgsql"
tool_timeout_secs = 30

[dump]
program = "php"
args = ["artisan", "db:backup"]
working_dir = "/srv/app"

[restore]
program = "php"
args = ["artisan", "db:restore"]
working_dir = "/srv/app"
"#,
        );

        let config = CatalogConfig::load(&path).unwrap();

        assert_eq!(config.database, "pgsql");
        assert_eq!(config.dump.working_dir, Some(PathBuf::from("/srv/app")));
        assert_eq!(config.restore.args, vec!["artisan", "db:restore"]);
    }

    #[test]
    fn test_load_invalid_toml() {
        let (path, _temp) = write_config("tool_timeout_secs = \"soon\"");

        let result = CatalogConfig::load(&path);
        assert!(matches!(result, Err(CatalogError::Config(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();

        let result = CatalogConfig::load(&temp_dir.path().join("nope.toml"));
        assert!(matches!(result, Err(CatalogError::InvalidConfig(_))));
    }

    #[test]
    fn test_load_or_default_prefers_explicit_path() {
        let (path, _temp) = write_config("database = \"reporting\"");

        let config = CatalogConfig::load_or_default(Some(&path)).unwrap();
        assert_eq!(config.database, "reporting");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = CatalogConfig::default();
        config.tool_timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = CatalogConfig::default();
        config.database = "  ".to_string();
        assert!(config.validate().is_err());

        let mut config = CatalogConfig::default();
        config.restore.program = String::new();
        assert!(config.validate().is_err());
    }
}
