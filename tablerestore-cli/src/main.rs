use clap::Parser;
use std::path::{Path, PathBuf};

mod logging;
mod progress;

use logging::init_tracing;
use progress::ConsoleProgress;
use tablerestore_core::{IgnoredOverride, LogFormat, RestoreConfig, RestoreError};
use tablerestore_sqlite::{ImportOptions, ImportReport, Importer};

#[derive(Parser, Debug)]
#[command(name = "tablerestore", version)]
#[command(about = "Restore SQLite table rows from a JSON backup")]
struct Cli {
    /// JSON backup file [default: full_backup.json]
    backup_file: Option<PathBuf>,

    /// SQLite database to restore into [default: ../database/emb.db]
    database_path: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Ignore backup columns that the target table does not have
    #[arg(long)]
    skip_unknown_columns: bool,

    /// Do not copy the database file aside before importing
    #[arg(long)]
    no_snapshot: bool,

    /// Diagnostic log format (json, text)
    #[arg(long)]
    log_format: Option<LogFormat>,

    /// Write the import report as JSON to this file
    #[arg(long)]
    report: Option<PathBuf>,
}

impl Cli {
    /// Layer defaults, config file, environment and arguments.
    fn resolve_config(&self) -> Result<(RestoreConfig, Vec<IgnoredOverride>), RestoreError> {
        self.resolve_config_with(|key| std::env::var(key).ok())
    }

    fn resolve_config_with<F>(
        &self,
        lookup: F,
    ) -> Result<(RestoreConfig, Vec<IgnoredOverride>), RestoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match &self.config {
            Some(path) => RestoreConfig::load_from_file(path)?,
            None => RestoreConfig::default(),
        };
        let ignored = config.apply_overrides(lookup);
        self.apply_to(&mut config);
        config.validate()?;
        Ok((config, ignored))
    }

    fn apply_to(&self, config: &mut RestoreConfig) {
        if let Some(path) = &self.backup_file {
            config.backup_file = path.clone();
        }
        if let Some(path) = &self.database_path {
            config.database_path = path.clone();
        }
        if self.skip_unknown_columns {
            config.skip_unknown_columns = true;
        }
        if self.no_snapshot {
            config.snapshot = false;
        }
        if let Some(format) = self.log_format {
            config.log_format = format;
        }
    }
}

fn write_report(path: &Path, report: &ImportReport) -> std::io::Result<()> {
    let json = serde_json::to_string_pretty(report).map_err(std::io::Error::other)?;
    std::fs::write(path, json)
}

fn main() {
    let cli = Cli::parse();

    let (config, ignored) = match cli.resolve_config() {
        Ok(resolved) => resolved,
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            std::process::exit(1);
        }
    };

    init_tracing(config.log_format);
    for entry in &ignored {
        tracing::warn!(
            variable = entry.variable,
            value = %entry.value,
            error = %entry.reason,
            "Ignoring unparseable override"
        );
    }

    let importer = Importer::new(ImportOptions::from(&config));
    let mut progress = ConsoleProgress::new();

    let report = match importer.import(&config.backup_file, &config.database_path, &mut progress) {
        Ok(report) => report,
        Err(e) => {
            tracing::error!(error = %e, code = e.error_code(), "Import failed");
            eprintln!("❌ Error: {}", e);
            std::process::exit(1);
        }
    };

    if let Some(path) = &cli.report
        && let Err(e) = write_report(path, &report)
    {
        tracing::error!(path = %path.display(), error = %e, "Failed to write import report");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("tablerestore").chain(args.iter().copied()))
            .expect("arguments should parse")
    }

    #[test]
    fn test_no_arguments_uses_defaults() {
        let cli = parse(&[]);
        let mut config = RestoreConfig::default();
        cli.apply_to(&mut config);

        assert_eq!(config.backup_file, PathBuf::from("full_backup.json"));
        assert_eq!(config.database_path, PathBuf::from("../database/emb.db"));
        assert!(config.snapshot);
    }

    #[test]
    fn test_positional_paths() {
        let cli = parse(&["nightly.json", "/srv/app/emb.db"]);
        let mut config = RestoreConfig::default();
        cli.apply_to(&mut config);

        assert_eq!(config.backup_file, PathBuf::from("nightly.json"));
        assert_eq!(config.database_path, PathBuf::from("/srv/app/emb.db"));
    }

    #[test]
    fn test_flags() {
        let cli = parse(&[
            "--skip-unknown-columns",
            "--no-snapshot",
            "--log-format",
            "text",
            "backup.json",
        ]);
        let mut config = RestoreConfig::default();
        cli.apply_to(&mut config);

        assert!(config.skip_unknown_columns);
        assert!(!config.snapshot);
        assert_eq!(config.log_format, LogFormat::Text);
        assert_eq!(config.backup_file, PathBuf::from("backup.json"));
    }

    #[test]
    fn test_bad_log_format_rejected() {
        let result =
            Cli::try_parse_from(["tablerestore", "--log-format", "yaml", "backup.json"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_too_many_positionals_rejected() {
        let result = Cli::try_parse_from(["tablerestore", "a.json", "b.db", "c"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_arguments_override_config_file() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("restore.toml");
        fs::write(
            &config_path,
            "database_path = \"from_file.db\"\nsnapshot = true\nlog_format = \"text\"\n",
        )
        .unwrap();

        let cli = parse(&[
            "--config",
            config_path.to_str().unwrap(),
            "--no-snapshot",
            "b.json",
            "from_cli.db",
        ]);
        let mut config = RestoreConfig::load_from_file(&config_path).unwrap();
        cli.apply_to(&mut config);

        assert_eq!(config.database_path, PathBuf::from("from_cli.db"));
        assert!(!config.snapshot);
        assert_eq!(config.log_format, LogFormat::Text);
    }

    #[test]
    fn test_missing_config_file_is_error() {
        let cli = parse(&["--config", "/does/not/exist.toml"]);
        assert!(matches!(
            cli.resolve_config(),
            Err(RestoreError::Config { .. })
        ));
    }

    #[test]
    fn test_unparseable_env_override_is_kept_for_logging() {
        let cli = parse(&["b.json", "x.db"]);
        let (config, ignored) = cli
            .resolve_config_with(|key| {
                (key == tablerestore_core::config::ENV_BUSY_TIMEOUT_MS).then(|| "soon".to_string())
            })
            .unwrap();

        assert_eq!(
            config.busy_timeout_ms,
            tablerestore_core::config::DEFAULT_BUSY_TIMEOUT_MS
        );
        assert_eq!(ignored.len(), 1);
        assert_eq!(ignored[0].value, "soon");
    }

    #[test]
    fn test_write_report() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.json");
        let report = ImportReport {
            snapshot: tablerestore_sqlite::SnapshotStatus::Disabled,
            tables: vec![tablerestore_sqlite::TableOutcome::empty("orders")],
        };

        write_report(&path, &report).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["tables"][0]["table"], "orders");
        assert_eq!(json["tables"][0]["status"], "empty");
        assert_eq!(json["snapshot"]["status"], "disabled");
    }
}
