use async_trait::async_trait;
use qbot_core::{ChannelId, GuildId, UserId};

use crate::error::StorageError;
use crate::models::{NewQuote, QuoteQuery, QuoteRecord};

/// Result of a delete request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
    /// The requester neither added the quote nor is an administrator; nothing was removed.
    PermissionDenied,
}

/// Durable quote collection. Mutations are `add`, `delete` and `bulk_insert`; everything else is read-only.
#[async_trait]
pub trait QuoteStore: Send + Sync {
    async fn add(&self, quote: NewQuote) -> Result<QuoteRecord, StorageError>;
    async fn get_by_id(&self, id: i64, guild_id: GuildId) -> Result<Option<QuoteRecord>, StorageError>;
    async fn delete(
        &self,
        id: i64,
        guild_id: GuildId,
        requester_id: UserId,
        is_admin: bool,
    ) -> Result<DeleteOutcome, StorageError>;
    /// Newest first.
    async fn list(&self, query: &QuoteQuery) -> Result<Vec<QuoteRecord>, StorageError>;
    /// Newest first; `term` matched against content or author.
    async fn search(
        &self,
        guild_id: GuildId,
        term: &str,
        channels: &[ChannelId],
    ) -> Result<Vec<QuoteRecord>, StorageError>;
    async fn random_one(&self, query: &QuoteQuery) -> Result<Option<QuoteRecord>, StorageError>;
    async fn count(&self, query: &QuoteQuery) -> Result<u64, StorageError>;
    /// Every quote of the guild, ascending by id, regardless of channel.
    async fn export_all(&self, guild_id: GuildId) -> Result<Vec<QuoteRecord>, StorageError>;
    /// Inserts all quotes in one transaction, without deduplication. Returns the number inserted.
    async fn bulk_insert(&self, quotes: &[NewQuote]) -> Result<u64, StorageError>;
    async fn count_all(&self) -> Result<u64, StorageError>;
    /// Id of a quote with exactly this content, author and guild, if any.
    async fn find_duplicate(
        &self,
        content: &str,
        author: &str,
        guild_id: GuildId,
    ) -> Result<Option<i64>, StorageError>;
}
