//! # Importer
//!
//! Batched, duplicate-safe transfer of quotes into a [`QuoteStore`].
//!
//! Sources are anything implementing [`QuoteSource`]: a legacy SQLite database
//! ([`LegacySqliteSource`]), a minimal CSV file ([`read_minimal_csv`]), or a snapshot of another
//! store ([`MemorySource::from_store`]). The [`transfer`] module also holds the export formats.

mod config;
mod converter;
mod error;
mod legacy;
mod source;
pub mod transfer;


pub use config::{ImportConfig, ImportReport, Verification, DEFAULT_BATCH_SIZE};
pub use converter::{parse_timestamp, LegacyRow};
pub use error::ImportError;
pub use legacy::LegacySqliteSource;
pub use source::{MemorySource, QuoteSource, SourceRow};
pub use transfer::{read_minimal_csv, write_csv, write_json, ImportDefaults, EXPORT_HEADER};

use std::collections::HashSet;

use qbot_core::GuildId;
use storage::{NewQuote, QuoteStore};
use tracing::{info, instrument, warn};

/// Runs one import with an ad hoc configuration.
pub async fn run(
    source: &dyn QuoteSource,
    target: &dyn QuoteStore,
    dry_run: bool,
    batch_size: usize,
) -> Result<ImportReport, ImportError> {
    Importer::new(ImportConfig {
        dry_run,
        batch_size,
    })?
    .run(source, target)
    .await
}

/// Drives the batch loop for one configuration.
#[derive(Debug, Clone, Copy)]
pub struct Importer {
    config: ImportConfig,
}

impl Importer {
    pub fn new(config: ImportConfig) -> Result<Self, ImportError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> ImportConfig {
        self.config
    }

    /// Imports every row of `source` not already present in `target`.
    ///
    /// # Flow
    ///
    /// 1. Count source rows and target rows.
    /// 2. Fetch a batch, classify each row: invalid, duplicate (in the target or earlier in this
    ///    run), or new.
    /// 3. Insert the batch's new rows in one transaction (skipped in dry run).
    /// 4. Repeat until the source is exhausted, then verify the target grew by `imported`.
    ///
    /// A failing batch is rolled back and the error returned; earlier batches stay committed.
    #[instrument(skip_all, fields(dry_run = self.config.dry_run, batch_size = self.config.batch_size))]
    pub async fn run(
        &self,
        source: &dyn QuoteSource,
        target: &dyn QuoteStore,
    ) -> Result<ImportReport, ImportError> {
        let ImportConfig {
            dry_run,
            batch_size,
        } = self.config;

        let total_source = source.total().await?;
        let target_before = target.count_all().await?;
        info!(total_source, target_before, "Starting import");

        let mut report = ImportReport::new(total_source, target_before, dry_run);
        let mut seen: HashSet<(String, String, GuildId)> = HashSet::new();
        let mut offset: u64 = 0;
        let mut batch_number = 0usize;

        loop {
            let rows = source.fetch(offset, batch_size).await?;
            if rows.is_empty() {
                break;
            }
            let fetched = rows.len();
            batch_number += 1;

            let mut batch: Vec<NewQuote> = Vec::new();
            for row in rows {
                match row {
                    SourceRow::Invalid { reason } => {
                        warn!("Skipping invalid row: {}", reason);
                        report.skipped_invalid += 1;
                        report.warnings.push(reason);
                    }
                    SourceRow::Quote { quote, warnings } => {
                        for warning in warnings {
                            warn!("{}", warning);
                            report.warnings.push(warning);
                        }

                        let key = (quote.content.clone(), quote.author.clone(), quote.guild_id);
                        if seen.contains(&key)
                            || target
                                .find_duplicate(&quote.content, &quote.author, quote.guild_id)
                                .await?
                                .is_some()
                        {
                            report.skipped_duplicate += 1;
                            continue;
                        }
                        seen.insert(key);
                        batch.push(quote);
                    }
                }
            }

            if !batch.is_empty() {
                report.imported += if dry_run {
                    batch.len() as u64
                } else {
                    target.bulk_insert(&batch).await?
                };
            }

            info!(
                batch = batch_number,
                new_rows = batch.len(),
                imported = report.imported,
                skipped_duplicate = report.skipped_duplicate,
                "Batch processed"
            );

            offset += fetched as u64;
            if fetched < batch_size {
                break;
            }
        }

        if !dry_run {
            let target_after = target.count_all().await?;
            let grown = target_after.saturating_sub(target_before);
            report.verification = if grown == report.imported {
                Verification::Matched
            } else {
                warn!(
                    expected = report.imported,
                    actual = grown,
                    "Target row count does not match imported count"
                );
                Verification::Mismatch {
                    expected: report.imported,
                    actual: grown,
                }
            };
        }

        info!(
            imported = report.imported,
            skipped_duplicate = report.skipped_duplicate,
            skipped_invalid = report.skipped_invalid,
            warnings = report.warnings.len(),
            "Import finished"
        );
        Ok(report)
    }
}
