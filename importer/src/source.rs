//! Sources the importer reads from.

use async_trait::async_trait;
use qbot_core::GuildId;
use storage::{NewQuote, QuoteRecord, QuoteStore};

use crate::error::ImportError;

/// One source row after conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceRow {
    /// Importable; `warnings` describes any defaulted fields.
    Quote {
        quote: NewQuote,
        warnings: Vec<String>,
    },
    /// Missing a required field; counted and skipped.
    Invalid { reason: String },
}

impl SourceRow {
    pub fn quote(quote: NewQuote) -> Self {
        SourceRow::Quote {
            quote,
            warnings: Vec::new(),
        }
    }
}

/// Ordered, offset-addressable rows. `fetch` must return rows in the same order on every call.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    async fn total(&self) -> Result<u64, ImportError>;
    /// Up to `limit` rows starting at `offset`; empty past the end.
    async fn fetch(&self, offset: u64, limit: usize) -> Result<Vec<SourceRow>, ImportError>;
}

/// Rows held in memory: a parsed file or a snapshot of another store.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    rows: Vec<SourceRow>,
}

impl MemorySource {
    pub fn new(rows: Vec<SourceRow>) -> Self {
        Self { rows }
    }

    /// Keeps each record's channel and timestamps; the target assigns new ids.
    pub fn from_records(records: Vec<QuoteRecord>) -> Self {
        let rows = records
            .into_iter()
            .map(|record| {
                let mut quote = NewQuote::new(
                    record.content,
                    record.author,
                    record.added_by,
                    record.guild_id,
                )
                .with_channel(record.channel_id)
                .with_created_at(record.created_at);
                quote.original_timestamp = record.original_timestamp;
                SourceRow::quote(quote)
            })
            .collect();
        Self { rows }
    }

    /// Snapshot of one guild of `store`, in id order.
    pub async fn from_store(store: &dyn QuoteStore, guild_id: GuildId) -> Result<Self, ImportError> {
        Ok(Self::from_records(store.export_all(guild_id).await?))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[async_trait]
impl QuoteSource for MemorySource {
    async fn total(&self) -> Result<u64, ImportError> {
        Ok(self.rows.len() as u64)
    }

    async fn fetch(&self, offset: u64, limit: usize) -> Result<Vec<SourceRow>, ImportError> {
        let start = usize::try_from(offset).unwrap_or(usize::MAX).min(self.rows.len());
        let end = start.saturating_add(limit).min(self.rows.len());
        Ok(self.rows[start..end].to_vec())
    }
}
