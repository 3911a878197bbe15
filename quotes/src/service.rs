//! Access-gated quote operations.
//!
//! Every read computes the requester's access set first and passes it to the store, so the store
//! never returns a quote from a channel the requester cannot view. Lookups by id on a hidden channel
//! report "not found" rather than revealing the quote exists.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use qbot_core::{ChannelId, GuildId, UserId, LEGACY_CHANNEL_ID};
use storage::{DeleteOutcome, NewQuote, QuoteQuery, QuoteRecord, QuoteStore};
use tracing::{info, instrument};

use crate::access::AccessFilter;
use crate::command::parse_add_command;
use crate::error::QuoteError;

/// Who is asking, and where.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestContext {
    pub guild_id: GuildId,
    /// Channel the request was issued in; `None` outside a channel.
    pub channel_id: Option<ChannelId>,
    pub requester_id: UserId,
    /// Guild administrator flag, as reported by the platform.
    pub is_admin: bool,
}

impl RequestContext {
    pub fn new(guild_id: GuildId, requester_id: UserId) -> Self {
        Self {
            guild_id,
            channel_id: None,
            requester_id,
            is_admin: false,
        }
    }

    pub fn in_channel(mut self, channel_id: ChannelId) -> Self {
        self.channel_id = Some(channel_id);
        self
    }

    pub fn as_admin(mut self) -> Self {
        self.is_admin = true;
        self
    }
}

/// A platform message being quoted directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferencedMessage {
    pub content: String,
    pub author_name: String,
    pub channel_id: ChannelId,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct QuoteService {
    store: Arc<dyn QuoteStore>,
    access: AccessFilter,
}

impl QuoteService {
    pub fn new(store: Arc<dyn QuoteStore>, access: AccessFilter) -> Self {
        Self { store, access }
    }

    /// Adds a quote from `<quote> - <author>` text, tagged with the request's channel.
    #[instrument(skip(self, text), fields(guild_id = ctx.guild_id))]
    pub async fn add(&self, ctx: &RequestContext, text: &str) -> Result<QuoteRecord, QuoteError> {
        let (content, author) = parse_add_command(text)?;
        let quote = NewQuote::new(content, author, ctx.requester_id, ctx.guild_id)
            .with_channel(ctx.channel_id.unwrap_or(LEGACY_CHANNEL_ID));
        self.insert(quote).await
    }

    /// Adds the referenced message verbatim, keeping its channel and send time.
    #[instrument(skip(self, message), fields(guild_id = ctx.guild_id))]
    pub async fn add_from_message(
        &self,
        ctx: &RequestContext,
        message: &ReferencedMessage,
    ) -> Result<QuoteRecord, QuoteError> {
        let quote = NewQuote::new(
            message.content.clone(),
            message.author_name.clone(),
            ctx.requester_id,
            ctx.guild_id,
        )
        .with_channel(message.channel_id)
        .with_original_timestamp(message.created_at);
        self.insert(quote).await
    }

    async fn insert(&self, quote: NewQuote) -> Result<QuoteRecord, QuoteError> {
        let record = self.store.add(quote).await.map_err(QuoteError::from_storage)?;
        info!(quote_id = record.id, channel_id = record.channel_id, "Quote added");
        Ok(record)
    }

    /// The quote with `id`, or `None` when it is missing or its channel is hidden from the requester.
    #[instrument(skip(self), fields(guild_id = ctx.guild_id))]
    pub async fn get(&self, ctx: &RequestContext, id: i64) -> Result<Option<QuoteRecord>, QuoteError> {
        let Some(record) = self.store.get_by_id(id, ctx.guild_id).await? else {
            return Ok(None);
        };
        if !self.visible(ctx, &record).await? {
            return Ok(None);
        }
        Ok(Some(record))
    }

    /// Deletes a visible quote if the requester added it or is an administrator.
    #[instrument(skip(self), fields(guild_id = ctx.guild_id))]
    pub async fn delete(&self, ctx: &RequestContext, id: i64) -> Result<DeleteOutcome, QuoteError> {
        let Some(record) = self.store.get_by_id(id, ctx.guild_id).await? else {
            return Ok(DeleteOutcome::NotFound);
        };
        if !self.visible(ctx, &record).await? {
            return Ok(DeleteOutcome::NotFound);
        }

        let outcome = self
            .store
            .delete(id, ctx.guild_id, ctx.requester_id, ctx.is_admin)
            .await?;
        info!(quote_id = id, outcome = ?outcome, "Delete requested");
        Ok(outcome)
    }

    /// Visible quotes, newest first, optionally filtered by author substring.
    #[instrument(skip(self), fields(guild_id = ctx.guild_id))]
    pub async fn list(
        &self,
        ctx: &RequestContext,
        author: Option<&str>,
    ) -> Result<Vec<QuoteRecord>, QuoteError> {
        let query = self.scoped_query(ctx).await?.with_author(author);
        Ok(self.store.list(&query).await?)
    }

    #[instrument(skip(self), fields(guild_id = ctx.guild_id))]
    pub async fn search(&self, ctx: &RequestContext, term: &str) -> Result<Vec<QuoteRecord>, QuoteError> {
        let term = term.trim();
        if term.is_empty() {
            return Err(QuoteError::Validation("search term is empty".to_string()));
        }
        let channels = self.access.accessible_channel_ids(ctx.requester_id, ctx.guild_id).await?;
        Ok(self.store.search(ctx.guild_id, term, &channels.to_vec()).await?)
    }

    /// One visible quote chosen uniformly at random.
    #[instrument(skip(self), fields(guild_id = ctx.guild_id))]
    pub async fn random(
        &self,
        ctx: &RequestContext,
        author: Option<&str>,
    ) -> Result<Option<QuoteRecord>, QuoteError> {
        let query = self.scoped_query(ctx).await?.with_author(author);
        Ok(self.store.random_one(&query).await?)
    }

    /// Number of visible quotes.
    pub async fn count(&self, ctx: &RequestContext, author: Option<&str>) -> Result<u64, QuoteError> {
        let query = self.scoped_query(ctx).await?.with_author(author);
        Ok(self.store.count(&query).await?)
    }

    /// Every quote of the guild regardless of channel. Administrators only.
    #[instrument(skip(self), fields(guild_id = ctx.guild_id))]
    pub async fn export(&self, ctx: &RequestContext) -> Result<Vec<QuoteRecord>, QuoteError> {
        if !ctx.is_admin {
            return Err(QuoteError::PermissionDenied(
                "exporting quotes requires administrator rights".to_string(),
            ));
        }
        Ok(self.store.export_all(ctx.guild_id).await?)
    }

    async fn scoped_query(&self, ctx: &RequestContext) -> Result<QuoteQuery, QuoteError> {
        let channels = self.access.accessible_channel_ids(ctx.requester_id, ctx.guild_id).await?;
        Ok(QuoteQuery::new(ctx.guild_id, channels.to_vec()))
    }

    async fn visible(&self, ctx: &RequestContext, record: &QuoteRecord) -> Result<bool, QuoteError> {
        Ok(self
            .access
            .can_access(ctx.requester_id, ctx.guild_id, record.channel_id)
            .await?)
    }
}
