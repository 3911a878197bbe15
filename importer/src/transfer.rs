//! Bulk transfer formats: full CSV export, JSON export and minimal CSV import.

use std::io::{Read, Write};

use chrono::SecondsFormat;
use qbot_core::{ChannelId, GuildId, UserId};
use storage::{NewQuote, QuoteRecord};

use crate::error::ImportError;
use crate::source::{MemorySource, SourceRow};

/// Column order of a full CSV export.
pub const EXPORT_HEADER: [&str; 6] = [
    "ID",
    "Content",
    "Author",
    "Added By",
    "Created At",
    "Channel ID",
];

/// Writes `records` as CSV with [`EXPORT_HEADER`], in the given order.
pub fn write_csv<W: Write>(records: &[QuoteRecord], writer: W) -> Result<(), ImportError> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(EXPORT_HEADER)?;
    for record in records {
        csv.write_record([
            record.id.to_string(),
            record.content.clone(),
            record.author.clone(),
            record.added_by.to_string(),
            record.created_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            record.channel_id.to_string(),
        ])?;
    }
    csv.flush()?;
    Ok(())
}

/// Writes `records` as a pretty-printed JSON array with every stored field.
pub fn write_json<W: Write>(records: &[QuoteRecord], writer: W) -> Result<(), ImportError> {
    serde_json::to_writer_pretty(writer, records)?;
    Ok(())
}

/// Ownership applied to rows of a minimal import, which only carry content and author.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportDefaults {
    pub guild_id: GuildId,
    pub added_by: UserId,
    pub channel_id: ChannelId,
}

/// Reads a CSV with at least `Content` and `Author` columns (matched case-insensitively).
/// Other columns are ignored; rows with a blank content or author are marked invalid.
pub fn read_minimal_csv<R: Read>(
    reader: R,
    defaults: ImportDefaults,
) -> Result<MemorySource, ImportError> {
    let mut csv = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|header| header.eq_ignore_ascii_case(name))
            .ok_or_else(|| ImportError::Source(format!("CSV is missing the {name} column")))
    };
    let content_idx = column("Content")?;
    let author_idx = column("Author")?;

    let mut rows = Vec::new();
    for (line, record) in csv.records().enumerate() {
        let record = record?;
        let content = record.get(content_idx).unwrap_or_default();
        let author = record.get(author_idx).unwrap_or_default();

        if content.is_empty() || author.is_empty() {
            rows.push(SourceRow::Invalid {
                reason: format!("CSV row {}: missing content or author", line + 1),
            });
            continue;
        }

        let quote = NewQuote::new(content, author, defaults.added_by, defaults.guild_id)
            .with_channel(defaults.channel_id);
        rows.push(SourceRow::quote(quote));
    }

    Ok(MemorySource::new(rows))
}
