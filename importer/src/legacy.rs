//! Reader for quote tables of any historical shape.
//!
//! Columns are discovered with `PRAGMA table_info`; absent optional columns read as NULL.
//! The current store schema is one such shape, so a live database is also a valid source.

use std::collections::HashSet;
use std::path::Path;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::{info, instrument};

use crate::converter::{convert, LegacyRow};
use crate::error::ImportError;
use crate::source::{QuoteSource, SourceRow};

const TABLE: &str = "quotes";

const REQUIRED_COLUMNS: [&str; 4] = ["content", "author", "added_by", "guild_id"];

/// Selected columns and the SQL type they are read as.
const COLUMNS: [(&str, &str); 8] = [
    ("id", "INTEGER"),
    ("content", "TEXT"),
    ("author", "TEXT"),
    ("added_by", "INTEGER"),
    ("guild_id", "INTEGER"),
    ("channel_id", "INTEGER"),
    ("created_at", "TEXT"),
    ("original_timestamp", "TEXT"),
];

pub struct LegacySqliteSource {
    pool: SqlitePool,
    select: String,
}

impl LegacySqliteSource {
    /// Opens an existing database at `path` and checks its `quotes` table has the required columns.
    /// The source is only ever read.
    #[instrument]
    pub async fn open(path: &Path) -> Result<Self, ImportError> {
        if !path.exists() {
            return Err(ImportError::Source(format!(
                "source database {} does not exist",
                path.display()
            )));
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(false);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        Self::with_pool(pool).await
    }

    pub async fn with_pool(pool: SqlitePool) -> Result<Self, ImportError> {
        let columns: HashSet<String> = sqlx::query_as::<_, (String,)>(
            "SELECT name FROM pragma_table_info(?)",
        )
        .bind(TABLE)
        .fetch_all(&pool)
        .await?
        .into_iter()
        .map(|(name,)| name.to_lowercase())
        .collect();

        if columns.is_empty() {
            return Err(ImportError::Source(format!("source has no {TABLE} table")));
        }

        let missing: Vec<&str> = REQUIRED_COLUMNS
            .into_iter()
            .filter(|column| !columns.contains(*column))
            .collect();
        if !missing.is_empty() {
            return Err(ImportError::Source(format!(
                "source {TABLE} table is missing required columns: {}",
                missing.join(", ")
            )));
        }

        let select = build_select(&columns);
        info!(columns = columns.len(), "Opened legacy quote source");
        Ok(Self { pool, select })
    }
}

fn build_select(columns: &HashSet<String>) -> String {
    let projection: Vec<String> = COLUMNS
        .iter()
        .map(|(name, sql_type)| {
            if columns.contains(*name) {
                format!("CAST({name} AS {sql_type}) AS {name}")
            } else {
                format!("NULL AS {name}")
            }
        })
        .collect();
    format!(
        "SELECT {} FROM {TABLE} ORDER BY rowid LIMIT ? OFFSET ?",
        projection.join(", ")
    )
}

#[async_trait]
impl QuoteSource for LegacySqliteSource {
    async fn total(&self) -> Result<u64, ImportError> {
        let (total,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {TABLE}"))
            .fetch_one(&self.pool)
            .await?;
        Ok(total.max(0) as u64)
    }

    async fn fetch(&self, offset: u64, limit: usize) -> Result<Vec<SourceRow>, ImportError> {
        let rows: Vec<LegacyRow> = sqlx::query_as(&self.select)
            .bind(i64::try_from(limit).unwrap_or(i64::MAX))
            .bind(i64::try_from(offset).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await?;

        let now = Utc::now();
        Ok(rows.into_iter().map(|row| convert(row, now)).collect())
    }
}
