//! CLI parser.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use importer::DEFAULT_BATCH_SIZE;

#[derive(Parser, Debug)]
#[command(name = "qbot")]
#[command(about = "Quote bot maintenance: migrate, export, import", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Copy quotes from a legacy database into the current one, skipping duplicates.
    Migrate {
        /// Legacy SQLite database file.
        #[arg(short, long)]
        source: PathBuf,
        /// Target database; defaults to DATABASE_URL.
        #[arg(short, long)]
        target: Option<String>,
        /// Classify rows and print the summary without writing.
        #[arg(long)]
        dry_run: bool,
        #[arg(short, long, default_value_t = DEFAULT_BATCH_SIZE)]
        batch_size: usize,
        /// Confirm a live migration.
        #[arg(short, long)]
        yes: bool,
    },
    /// Export every quote of a guild, ordered by id.
    Export {
        #[arg(short, long)]
        guild: i64,
        #[arg(short, long, value_enum, default_value_t = ExportFormat::Csv)]
        format: ExportFormat,
        /// Output file; stdout when omitted.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Import a CSV with Content and Author columns.
    Import {
        #[arg(short, long)]
        file: PathBuf,
        #[arg(short, long)]
        guild: i64,
        /// User recorded as the adder of every imported quote.
        #[arg(short, long)]
        added_by: i64,
        #[arg(short, long, default_value_t = 0)]
        channel: i64,
        #[arg(long)]
        dry_run: bool,
        #[arg(short, long, default_value_t = DEFAULT_BATCH_SIZE)]
        batch_size: usize,
    },
    /// Print the effective configuration.
    Config,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}
