//! qbot CLI: migrate legacy quotes, export and import. Config from env and CLI args.

use anyhow::{Context, Result};
use clap::Parser;
use importer::ImportDefaults;
use qbot_cli::{commands, Cli, Commands, QbotConfig};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = QbotConfig::from_env().context("Load configuration from environment")?;

    if let Some(log_file) = config.log_file.as_deref() {
        if let Some(parent) = std::path::Path::new(log_file).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
    }
    qbot_core::init_tracing(config.log_file.as_deref())?;

    tracing::info!(mode = config.mode_display(), database = %config.database_url, "qbot starting");

    match cli.command {
        Commands::Migrate {
            source,
            target,
            dry_run,
            batch_size,
            yes,
        } => {
            commands::handle_migrate(&config, &source, target, dry_run, batch_size, yes).await?;
        }
        Commands::Export {
            guild,
            format,
            output,
        } => {
            commands::handle_export(&config, guild, format, output).await?;
        }
        Commands::Import {
            file,
            guild,
            added_by,
            channel,
            dry_run,
            batch_size,
        } => {
            let defaults = ImportDefaults {
                guild_id: guild,
                added_by,
                channel_id: channel,
            };
            commands::handle_import(&config, &file, defaults, dry_run, batch_size).await?;
        }
        Commands::Config => commands::handle_config(&config),
    }

    Ok(())
}
