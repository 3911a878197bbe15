//! Quote repository: persistence and queries for quotes.
//!
//! Uses SqlitePoolManager and the models (QuoteRecord, NewQuote, QuoteQuery).
//! External: SQLite via sqlx; callers go through the [`QuoteStore`] trait.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use qbot_core::{ChannelId, GuildId, UserId};
use sqlx::{QueryBuilder, Sqlite};
use tracing::{debug, info};

use crate::error::StorageError;
use crate::models::{NewQuote, QuoteQuery, QuoteRecord};
use crate::random::{OffsetSource, ThreadRngOffsets};
use crate::repository::{DeleteOutcome, QuoteStore};
use crate::sqlite_pool::SqlitePoolManager;

const SELECT_QUOTES: &str = "SELECT id, content, author, added_by, guild_id, channel_id, created_at, original_timestamp FROM quotes";

const INSERT_QUOTE: &str = "INSERT INTO quotes (content, author, added_by, guild_id, channel_id, created_at, original_timestamp) VALUES (?, ?, ?, ?, ?, ?, ?)";

#[derive(Clone)]
pub struct QuoteRepository {
    pool_manager: SqlitePoolManager,
    offsets: Arc<dyn OffsetSource>,
}

impl QuoteRepository {
    pub async fn new(database_url: &str) -> Result<Self, StorageError> {
        let pool_manager = SqlitePoolManager::new(database_url).await?;
        Self::with_pool(pool_manager).await
    }

    /// Fresh private in-memory store.
    pub async fn in_memory() -> Result<Self, StorageError> {
        let pool_manager = SqlitePoolManager::in_memory().await?;
        Self::with_pool(pool_manager).await
    }

    pub async fn with_pool(pool_manager: SqlitePoolManager) -> Result<Self, StorageError> {
        let repo = Self {
            pool_manager,
            offsets: Arc::new(ThreadRngOffsets),
        };
        repo.init().await?;
        Ok(repo)
    }

    #[cfg(test)]
    pub(crate) fn pool(&self) -> &sqlx::SqlitePool {
        self.pool_manager.pool()
    }

    /// Replaces the offset source used by `random_one`.
    pub fn with_offsets(mut self, offsets: Arc<dyn OffsetSource>) -> Self {
        self.offsets = offsets;
        self
    }

    async fn init(&self) -> Result<(), StorageError> {
        info!("Creating quotes table if not exist");

        let pool = self.pool_manager.pool();

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS quotes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                content TEXT NOT NULL,
                author VARCHAR(255) NOT NULL,
                added_by INTEGER NOT NULL,
                guild_id INTEGER NOT NULL,
                channel_id INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                original_timestamp TEXT
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_quotes_guild_id ON quotes(guild_id)")
            .execute(pool)
            .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_quotes_channel_id ON quotes(channel_id)")
            .execute(pool)
            .await?;

        Ok(())
    }
}

/// `WHERE guild_id = ? AND channel_id IN (...)`. An empty scope matches nothing.
fn push_scope<'a>(qb: &mut QueryBuilder<'a, Sqlite>, guild_id: GuildId, channels: &[ChannelId]) {
    qb.push(" WHERE guild_id = ").push_bind(guild_id);
    qb.push(" AND channel_id IN (");
    let mut separated = qb.separated(", ");
    for channel_id in channels {
        separated.push_bind(*channel_id);
    }
    separated.push_unseparated(")");
}

fn push_query<'a>(qb: &mut QueryBuilder<'a, Sqlite>, query: &'a QuoteQuery) {
    push_scope(qb, query.guild_id, &query.channels);
    if let Some(author) = query.author.as_deref() {
        qb.push(" AND instr(lower(author), lower(")
            .push_bind(author)
            .push(")) > 0");
    }
}

#[async_trait]
impl QuoteStore for QuoteRepository {
    async fn add(&self, quote: NewQuote) -> Result<QuoteRecord, StorageError> {
        quote.validate()?;
        let pool = self.pool_manager.pool();

        let content = quote.content.trim().to_string();
        let author = quote.author.trim().to_string();
        let created_at = quote.created_at.unwrap_or_else(Utc::now);

        let result = sqlx::query(INSERT_QUOTE)
            .bind(&content)
            .bind(&author)
            .bind(quote.added_by)
            .bind(quote.guild_id)
            .bind(quote.channel_id)
            .bind(created_at)
            .bind(quote.original_timestamp)
            .execute(pool)
            .await?;

        let record = QuoteRecord {
            id: result.last_insert_rowid(),
            content,
            author,
            added_by: quote.added_by,
            guild_id: quote.guild_id,
            channel_id: quote.channel_id,
            created_at,
            original_timestamp: quote.original_timestamp,
        };

        info!(
            quote_id = record.id,
            guild_id = record.guild_id,
            channel_id = record.channel_id,
            "Saved quote"
        );
        Ok(record)
    }

    async fn get_by_id(&self, id: i64, guild_id: GuildId) -> Result<Option<QuoteRecord>, StorageError> {
        let pool = self.pool_manager.pool();
        let sql = format!("{} WHERE id = ? AND guild_id = ?", SELECT_QUOTES);

        let quote = sqlx::query_as::<_, QuoteRecord>(&sql)
            .bind(id)
            .bind(guild_id)
            .fetch_optional(pool)
            .await?;

        Ok(quote)
    }

    async fn delete(
        &self,
        id: i64,
        guild_id: GuildId,
        requester_id: UserId,
        is_admin: bool,
    ) -> Result<DeleteOutcome, StorageError> {
        let mut tx = self.pool_manager.pool().begin().await?;

        let owner: Option<(i64,)> =
            sqlx::query_as("SELECT added_by FROM quotes WHERE id = ? AND guild_id = ?")
                .bind(id)
                .bind(guild_id)
                .fetch_optional(&mut *tx)
                .await?;

        let outcome = match owner {
            None => DeleteOutcome::NotFound,
            Some((added_by,)) if added_by != requester_id && !is_admin => {
                DeleteOutcome::PermissionDenied
            }
            Some(_) => {
                let result = sqlx::query("DELETE FROM quotes WHERE id = ? AND guild_id = ?")
                    .bind(id)
                    .bind(guild_id)
                    .execute(&mut *tx)
                    .await?;
                if result.rows_affected() == 0 {
                    DeleteOutcome::NotFound
                } else {
                    DeleteOutcome::Deleted
                }
            }
        };

        if outcome == DeleteOutcome::Deleted {
            tx.commit().await?;
        } else {
            tx.rollback().await?;
        }

        info!(
            quote_id = id,
            guild_id = guild_id,
            requester_id = requester_id,
            outcome = ?outcome,
            "Delete requested"
        );
        Ok(outcome)
    }

    async fn list(&self, query: &QuoteQuery) -> Result<Vec<QuoteRecord>, StorageError> {
        let pool = self.pool_manager.pool();

        let mut qb = QueryBuilder::<Sqlite>::new(SELECT_QUOTES);
        push_query(&mut qb, query);
        qb.push(" ORDER BY created_at DESC, id DESC");

        let quotes = qb.build_query_as::<QuoteRecord>().fetch_all(pool).await?;
        debug!(
            guild_id = query.guild_id,
            count = quotes.len(),
            "Listed quotes"
        );
        Ok(quotes)
    }

    async fn search(
        &self,
        guild_id: GuildId,
        term: &str,
        channels: &[ChannelId],
    ) -> Result<Vec<QuoteRecord>, StorageError> {
        let pool = self.pool_manager.pool();

        let mut qb = QueryBuilder::<Sqlite>::new(SELECT_QUOTES);
        push_scope(&mut qb, guild_id, channels);
        qb.push(" AND (instr(lower(content), lower(")
            .push_bind(term)
            .push(")) > 0 OR instr(lower(author), lower(")
            .push_bind(term)
            .push(")) > 0)");
        qb.push(" ORDER BY created_at DESC, id DESC");

        let quotes = qb.build_query_as::<QuoteRecord>().fetch_all(pool).await?;
        info!("Found {} quotes matching '{}'", quotes.len(), term);
        Ok(quotes)
    }

    async fn random_one(&self, query: &QuoteQuery) -> Result<Option<QuoteRecord>, StorageError> {
        let count = self.count(query).await?;
        if count == 0 {
            return Ok(None);
        }

        let offset = self.offsets.pick(count);
        let offset = i64::try_from(offset).unwrap_or(i64::MAX);

        // Offsetting is only uniform if the order is the same one the count saw.
        let mut qb = QueryBuilder::<Sqlite>::new(SELECT_QUOTES);
        push_query(&mut qb, query);
        qb.push(" ORDER BY id ASC LIMIT 1 OFFSET ").push_bind(offset);

        let quote = qb
            .build_query_as::<QuoteRecord>()
            .fetch_optional(self.pool_manager.pool())
            .await?;
        debug!(count = count, offset = offset, "Picked random quote");
        Ok(quote)
    }

    async fn count(&self, query: &QuoteQuery) -> Result<u64, StorageError> {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM quotes");
        push_query(&mut qb, query);

        let count: i64 = qb
            .build_query_scalar::<i64>()
            .fetch_one(self.pool_manager.pool())
            .await?;
        Ok(count.max(0) as u64)
    }

    async fn export_all(&self, guild_id: GuildId) -> Result<Vec<QuoteRecord>, StorageError> {
        let sql = format!("{} WHERE guild_id = ? ORDER BY id ASC", SELECT_QUOTES);

        let quotes = sqlx::query_as::<_, QuoteRecord>(&sql)
            .bind(guild_id)
            .fetch_all(self.pool_manager.pool())
            .await?;

        info!(guild_id = guild_id, count = quotes.len(), "Exported quotes");
        Ok(quotes)
    }

    async fn bulk_insert(&self, quotes: &[NewQuote]) -> Result<u64, StorageError> {
        for quote in quotes {
            quote.validate()?;
        }

        let mut tx = self.pool_manager.pool().begin().await?;
        let mut inserted = 0u64;

        for quote in quotes {
            let created_at = quote.created_at.unwrap_or_else(Utc::now);
            let result = sqlx::query(INSERT_QUOTE)
                .bind(quote.content.trim())
                .bind(quote.author.trim())
                .bind(quote.added_by)
                .bind(quote.guild_id)
                .bind(quote.channel_id)
                .bind(created_at)
                .bind(quote.original_timestamp)
                .execute(&mut *tx)
                .await?;
            inserted += result.rows_affected();
        }

        tx.commit().await?;

        info!("Bulk inserted {} quotes", inserted);
        Ok(inserted)
    }

    async fn count_all(&self) -> Result<u64, StorageError> {
        let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM quotes")
            .fetch_one(self.pool_manager.pool())
            .await?;
        Ok(total.0.max(0) as u64)
    }

    async fn find_duplicate(
        &self,
        content: &str,
        author: &str,
        guild_id: GuildId,
    ) -> Result<Option<i64>, StorageError> {
        let existing: Option<(i64,)> = sqlx::query_as(
            "SELECT id FROM quotes WHERE content = ? AND author = ? AND guild_id = ? LIMIT 1",
        )
        .bind(content)
        .bind(author)
        .bind(guild_id)
        .fetch_optional(self.pool_manager.pool())
        .await?;

        Ok(existing.map(|row| row.0))
    }
}
