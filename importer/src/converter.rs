//! Legacy row → [`NewQuote`] conversion.
//!
//! # Field mapping
//!
//! - content, author: trimmed; required
//! - added_by, guild_id: required
//! - channel_id: `0` when absent
//! - created_at: parsed; absent → now, malformed → now with a warning
//! - original_timestamp: parsed; malformed → dropped with a warning

use chrono::{DateTime, NaiveDateTime, Utc};
use qbot_core::LEGACY_CHANNEL_ID;
use storage::NewQuote;

use crate::source::SourceRow;

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

const OFFSET_FORMATS: [&str; 1] = ["%Y-%m-%d %H:%M:%S%.f%:z"];

/// A row as read from a legacy table; every column may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, sqlx::FromRow)]
pub struct LegacyRow {
    pub id: Option<i64>,
    pub content: Option<String>,
    pub author: Option<String>,
    pub added_by: Option<i64>,
    pub guild_id: Option<i64>,
    pub channel_id: Option<i64>,
    pub created_at: Option<String>,
    pub original_timestamp: Option<String>,
}

/// Parses RFC 3339, `YYYY-MM-DD HH:MM:SS[.f]` (UTC assumed) or Unix seconds.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in OFFSET_FORMATS {
        if let Ok(parsed) = DateTime::parse_from_str(value, format) {
            return Some(parsed.with_timezone(&Utc));
        }
    }
    for format in NAIVE_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Some(parsed.and_utc());
        }
    }

    let seconds = value.parse::<f64>().ok().filter(|s| s.is_finite())?;
    let whole = seconds.floor();
    let nanos = ((seconds - whole) * 1e9).round().min(999_999_999.0) as u32;
    DateTime::from_timestamp(whole as i64, nanos)
}

/// Converts `row`, defaulting timestamps to `now`.
pub fn convert(row: LegacyRow, now: DateTime<Utc>) -> SourceRow {
    let label = row
        .id
        .map(|id| format!("row {id}"))
        .unwrap_or_else(|| "row".to_string());

    let content = row.content.as_deref().map(str::trim).unwrap_or_default();
    let author = row.author.as_deref().map(str::trim).unwrap_or_default();
    let missing: Vec<&str> = [
        ("content", content.is_empty()),
        ("author", author.is_empty()),
        ("added_by", row.added_by.is_none()),
        ("guild_id", row.guild_id.is_none()),
    ]
    .into_iter()
    .filter_map(|(name, absent)| absent.then_some(name))
    .collect();

    let (Some(added_by), Some(guild_id), true) = (row.added_by, row.guild_id, missing.is_empty())
    else {
        return SourceRow::Invalid {
            reason: format!("{label}: missing {}", missing.join(", ")),
        };
    };

    let mut warnings = Vec::new();

    let created_at = match row.created_at.as_deref().map(str::trim) {
        None | Some("") => now,
        Some(raw) => parse_timestamp(raw).unwrap_or_else(|| {
            warnings.push(format!("{label}: malformed created_at {raw:?}, using now"));
            now
        }),
    };

    let original_timestamp = match row.original_timestamp.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => {
            let parsed = parse_timestamp(raw);
            if parsed.is_none() {
                warnings.push(format!("{label}: malformed original_timestamp {raw:?}, dropped"));
            }
            parsed
        }
    };

    let mut quote = NewQuote::new(content, author, added_by, guild_id)
        .with_channel(row.channel_id.unwrap_or(LEGACY_CHANNEL_ID))
        .with_created_at(created_at);
    quote.original_timestamp = original_timestamp;

    SourceRow::Quote { quote, warnings }
}
