//! Quote record model for persistence.
//!
//! Maps to the `quotes` table and is used by QuoteRepository.

use chrono::{DateTime, Utc};
use qbot_core::{ChannelId, GuildId, UserId, LEGACY_CHANNEL_ID};
use serde::{Deserialize, Serialize};

use crate::error::StorageError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct QuoteRecord {
    pub id: i64,
    pub content: String,
    pub author: String,
    pub added_by: UserId,
    pub guild_id: GuildId,
    pub channel_id: ChannelId,
    /// Insertion time; canonical for ordering.
    pub created_at: DateTime<Utc>,
    /// When the quoted material was originally produced, if known.
    pub original_timestamp: Option<DateTime<Utc>>,
}

impl QuoteRecord {
    /// Timestamp to show next to the quote: the original one when present.
    pub fn display_timestamp(&self) -> DateTime<Utc> {
        self.original_timestamp.unwrap_or(self.created_at)
    }
}

/// A quote that has not been stored yet. The store assigns `id`, and `created_at` when unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewQuote {
    pub content: String,
    pub author: String,
    pub added_by: UserId,
    pub guild_id: GuildId,
    pub channel_id: ChannelId,
    pub created_at: Option<DateTime<Utc>>,
    pub original_timestamp: Option<DateTime<Utc>>,
}

impl NewQuote {
    /// Creates a quote in the legacy channel with store-assigned timestamps.
    pub fn new(
        content: impl Into<String>,
        author: impl Into<String>,
        added_by: UserId,
        guild_id: GuildId,
    ) -> Self {
        Self {
            content: content.into(),
            author: author.into(),
            added_by,
            guild_id,
            channel_id: LEGACY_CHANNEL_ID,
            created_at: None,
            original_timestamp: None,
        }
    }

    pub fn with_channel(mut self, channel_id: ChannelId) -> Self {
        self.channel_id = channel_id;
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    pub fn with_original_timestamp(mut self, original_timestamp: DateTime<Utc>) -> Self {
        self.original_timestamp = Some(original_timestamp);
        self
    }

    /// Rejects empty content or author after trimming.
    pub fn validate(&self) -> Result<(), StorageError> {
        if self.content.trim().is_empty() {
            return Err(StorageError::Validation("quote content is empty".to_string()));
        }
        if self.author.trim().is_empty() {
            return Err(StorageError::Validation("quote author is empty".to_string()));
        }
        Ok(())
    }
}
