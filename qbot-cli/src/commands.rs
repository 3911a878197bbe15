//! Subcommand handlers.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use importer::{
    read_minimal_csv, write_csv, write_json, ImportDefaults, ImportReport, LegacySqliteSource,
};
use storage::{QuoteRepository, QuoteStore};
use tracing::info;

use crate::cli::ExportFormat;
use crate::config::QbotConfig;

/// Creates the parent directory of a file-backed database URL.
fn ensure_parent_dir(database_url: &str) -> Result<()> {
    let path = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))
        .unwrap_or(database_url);
    if path.starts_with(':') {
        return Ok(());
    }
    if let Some(parent) = Path::new(path).parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    Ok(())
}

async fn open_store(database_url: &str) -> Result<QuoteRepository> {
    ensure_parent_dir(database_url)?;
    QuoteRepository::new(database_url)
        .await
        .with_context(|| format!("Failed to open quote database {database_url}"))
}

fn finish(report: &ImportReport) -> Result<()> {
    println!("{report}");
    if report.is_anomalous() {
        bail!("post-import verification failed; inspect the target database");
    }
    Ok(())
}

/// Handle the migrate command.
///
/// A live run needs `yes`; a zero batch size is rejected before anything is opened.
pub async fn handle_migrate(
    config: &QbotConfig,
    source: &Path,
    target: Option<String>,
    dry_run: bool,
    batch_size: usize,
    yes: bool,
) -> Result<ImportReport> {
    if batch_size == 0 {
        bail!("--batch-size must be greater than zero");
    }
    if !dry_run && !yes {
        bail!("migration writes to the target database; re-run with --yes, or use --dry-run first");
    }

    let target_url = target.unwrap_or_else(|| config.database_url.clone());
    info!(
        source = %source.display(),
        target = %target_url,
        dry_run,
        batch_size,
        "Starting migration"
    );

    let legacy = LegacySqliteSource::open(source)
        .await
        .with_context(|| format!("Failed to open source database {}", source.display()))?;
    let store = open_store(&target_url).await?;

    let report = importer::run(&legacy, &store, dry_run, batch_size).await?;
    finish(&report)?;
    Ok(report)
}

/// Handle the export command. Writes to `output`, or stdout when `None`.
pub async fn handle_export(
    config: &QbotConfig,
    guild_id: i64,
    format: ExportFormat,
    output: Option<PathBuf>,
) -> Result<usize> {
    let store = open_store(&config.database_url).await?;
    let records = store.export_all(guild_id).await?;

    match &output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            write_records(&records, format, BufWriter::new(file))?;
            println!("Exported {} quotes to {}", records.len(), path.display());
        }
        None => {
            let stdout = io::stdout();
            write_records(&records, format, stdout.lock())?;
        }
    }

    info!(guild_id, count = records.len(), format = format.extension(), "Export finished");
    Ok(records.len())
}

fn write_records<W: Write>(
    records: &[storage::QuoteRecord],
    format: ExportFormat,
    mut writer: W,
) -> Result<()> {
    match format {
        ExportFormat::Csv => write_csv(records, &mut writer)?,
        ExportFormat::Json => write_json(records, &mut writer)?,
    }
    writer.flush()?;
    Ok(())
}

/// Handle the import command: minimal CSV into the configured database.
pub async fn handle_import(
    config: &QbotConfig,
    file: &Path,
    defaults: ImportDefaults,
    dry_run: bool,
    batch_size: usize,
) -> Result<ImportReport> {
    if batch_size == 0 {
        bail!("--batch-size must be greater than zero");
    }

    let reader = File::open(file).with_context(|| format!("Failed to open {}", file.display()))?;
    let source = read_minimal_csv(reader, defaults)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let store = open_store(&config.database_url).await?;

    let report = importer::run(&source, &store, dry_run, batch_size).await?;
    finish(&report)?;
    Ok(report)
}

/// Handle the config command.
pub fn handle_config(config: &QbotConfig) {
    println!("Mode:           {}", config.mode_display());
    println!("Command prefix: {}", config.command_prefix());
    println!("Database:       {}", config.database_url);
    println!("Log file:       {}", log_destination(config));
}

/// Logs always go to stderr; a configured file is added alongside.
fn log_destination(config: &QbotConfig) -> &str {
    config.log_file.as_deref().unwrap_or("(stderr only)")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_parent_dir_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("nested/deeper/quotes.db");

        ensure_parent_dir(&format!("sqlite:{}", db.display())).unwrap();

        assert!(db.parent().unwrap().is_dir());
        assert!(ensure_parent_dir("sqlite::memory:").is_ok());
        assert!(ensure_parent_dir("quotes.db").is_ok());
    }

    #[test]
    fn test_log_destination_names_stderr_without_file() {
        let mut config = QbotConfig {
            environment: crate::Environment::Development,
            database_url: "sqlite::memory:".to_string(),
            log_file: None,
        };
        assert_eq!(log_destination(&config), "(stderr only)");

        config.log_file = Some("logs/qbot.log".to_string());
        assert_eq!(log_destination(&config), "logs/qbot.log");
    }
}
