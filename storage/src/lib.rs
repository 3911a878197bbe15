//! Storage crate: quote persistence and the store abstraction.
//!
//! ## Modules
//!
//! - [`error`] – Storage error types
//! - [`models`] – QuoteRecord, NewQuote, QuoteQuery
//! - [`repository`] – QuoteStore trait and DeleteOutcome
//! - [`quote_repo`] – QuoteRepository (SQLite)
//! - [`random`] – Injectable offset sources for random selection
//! - [`sqlite_pool`] – SqlitePoolManager

mod error;
mod models;
mod quote_repo;
mod random;
mod repository;
mod sqlite_pool;

#[cfg(test)]
mod quote_repo_test;

pub use error::StorageError;
pub use models::{NewQuote, QuoteQuery, QuoteRecord};
pub use quote_repo::QuoteRepository;
pub use random::{OffsetSource, SeededOffsets, ThreadRngOffsets};
pub use repository::{DeleteOutcome, QuoteStore};
pub use sqlite_pool::SqlitePoolManager;
