//! Unit tests for QuoteRepository.
//!
//! Covers add/get, delete permissions, ordering, filters, random selection and bulk insert.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};

use crate::models::{NewQuote, QuoteQuery};
use crate::quote_repo::QuoteRepository;
use crate::random::{OffsetSource, SeededOffsets};
use crate::repository::{DeleteOutcome, QuoteStore};
use crate::StorageError;

const GUILD: i64 = 1000;

async fn repo() -> QuoteRepository {
    QuoteRepository::in_memory()
        .await
        .expect("Failed to create repository")
}

/// Always picks the same offset (clamped to the last row).
struct FixedOffset(u64);

impl OffsetSource for FixedOffset {
    fn pick(&self, count: u64) -> u64 {
        self.0.min(count - 1)
    }
}

#[tokio::test]
async fn test_add_then_get_by_id() {
    let repo = repo().await;

    let saved = repo
        .add(NewQuote::new("  Stay hungry  ", " Steve ", 42, GUILD))
        .await
        .expect("Failed to add quote");

    let fetched = repo
        .get_by_id(saved.id, GUILD)
        .await
        .expect("Failed to get quote")
        .expect("Quote should exist");

    assert_eq!(fetched.content, "Stay hungry");
    assert_eq!(fetched.author, "Steve");
    assert_eq!(fetched.added_by, 42);
    assert_eq!(fetched.channel_id, 0);
    assert_eq!(fetched.created_at, saved.created_at);
    assert!(fetched.original_timestamp.is_none());
}

#[tokio::test]
async fn test_add_keeps_channel_and_timestamps() {
    let repo = repo().await;
    let original = Utc.with_ymd_and_hms(2021, 3, 4, 5, 6, 7).unwrap();

    let saved = repo
        .add(
            NewQuote::new("hello", "Ann", 1, GUILD)
                .with_channel(77)
                .with_original_timestamp(original),
        )
        .await
        .unwrap();

    let fetched = repo.get_by_id(saved.id, GUILD).await.unwrap().unwrap();
    assert_eq!(fetched.channel_id, 77);
    assert_eq!(fetched.original_timestamp, Some(original));
    assert_eq!(fetched.display_timestamp(), original);
}

#[tokio::test]
async fn test_add_rejects_blank_content_or_author() {
    let repo = repo().await;

    let err = repo.add(NewQuote::new("   ", "Ann", 1, GUILD)).await;
    assert!(matches!(err, Err(StorageError::Validation(_))));

    let err = repo.add(NewQuote::new("text", "", 1, GUILD)).await;
    assert!(matches!(err, Err(StorageError::Validation(_))));

    assert_eq!(repo.count_all().await.unwrap(), 0);
}

#[tokio::test]
async fn test_get_by_id_is_scoped_to_guild() {
    let repo = repo().await;
    let saved = repo.add(NewQuote::new("hi", "Ann", 1, GUILD)).await.unwrap();

    assert!(repo.get_by_id(saved.id, GUILD + 1).await.unwrap().is_none());
    assert!(repo.get_by_id(saved.id + 100, GUILD).await.unwrap().is_none());
}

#[tokio::test]
async fn test_ids_are_monotonic_and_not_reused() {
    let repo = repo().await;
    let first = repo.add(NewQuote::new("a", "A", 1, GUILD)).await.unwrap();
    let second = repo.add(NewQuote::new("b", "B", 1, GUILD)).await.unwrap();
    assert!(second.id > first.id);

    let outcome = repo.delete(second.id, GUILD, 1, false).await.unwrap();
    assert_eq!(outcome, DeleteOutcome::Deleted);

    let third = repo.add(NewQuote::new("c", "C", 1, GUILD)).await.unwrap();
    assert!(third.id > second.id);
}

#[tokio::test]
async fn test_delete_permissions() {
    let repo = repo().await;
    let saved = repo.add(NewQuote::new("mine", "Ann", 10, GUILD)).await.unwrap();

    let denied = repo.delete(saved.id, GUILD, 11, false).await.unwrap();
    assert_eq!(denied, DeleteOutcome::PermissionDenied);
    assert!(repo.get_by_id(saved.id, GUILD).await.unwrap().is_some());

    let owner = repo.delete(saved.id, GUILD, 10, false).await.unwrap();
    assert_eq!(owner, DeleteOutcome::Deleted);
    assert!(repo.get_by_id(saved.id, GUILD).await.unwrap().is_none());

    let again = repo.delete(saved.id, GUILD, 10, false).await.unwrap();
    assert_eq!(again, DeleteOutcome::NotFound);
}

#[tokio::test]
async fn test_admin_can_delete_any_quote() {
    let repo = repo().await;
    let saved = repo.add(NewQuote::new("theirs", "Ann", 10, GUILD)).await.unwrap();

    let outcome = repo.delete(saved.id, GUILD, 99, true).await.unwrap();
    assert_eq!(outcome, DeleteOutcome::Deleted);
    assert_eq!(repo.count_all().await.unwrap(), 0);
}

#[tokio::test]
async fn test_delete_in_other_guild_is_not_found() {
    let repo = repo().await;
    let saved = repo.add(NewQuote::new("x", "Ann", 10, GUILD)).await.unwrap();

    let outcome = repo.delete(saved.id, GUILD + 1, 10, true).await.unwrap();
    assert_eq!(outcome, DeleteOutcome::NotFound);
    assert_eq!(repo.count_all().await.unwrap(), 1);
}

#[tokio::test]
async fn test_list_newest_first_with_author_filter() {
    let repo = repo().await;
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

    for (i, author) in ["Alice", "bob", "ALICE COOPER", "Carol"].iter().enumerate() {
        repo.add(
            NewQuote::new(format!("quote {}", i), *author, 1, GUILD)
                .with_created_at(base + Duration::minutes(i as i64)),
        )
        .await
        .unwrap();
    }

    let all = repo.list(&QuoteQuery::new(GUILD, vec![0])).await.unwrap();
    let contents: Vec<&str> = all.iter().map(|q| q.content.as_str()).collect();
    assert_eq!(contents, vec!["quote 3", "quote 2", "quote 1", "quote 0"]);

    let alices = repo
        .list(&QuoteQuery::new(GUILD, vec![0]).with_author(Some("alice")))
        .await
        .unwrap();
    let authors: Vec<&str> = alices.iter().map(|q| q.author.as_str()).collect();
    assert_eq!(authors, vec!["ALICE COOPER", "Alice"]);
}

#[tokio::test]
async fn test_list_respects_channel_scope_and_guild() {
    let repo = repo().await;
    repo.add(NewQuote::new("legacy", "A", 1, GUILD)).await.unwrap();
    repo.add(NewQuote::new("open", "A", 1, GUILD).with_channel(5)).await.unwrap();
    repo.add(NewQuote::new("secret", "A", 1, GUILD).with_channel(6)).await.unwrap();
    repo.add(NewQuote::new("elsewhere", "A", 1, GUILD + 1)).await.unwrap();

    let visible = repo.list(&QuoteQuery::new(GUILD, vec![0, 5])).await.unwrap();
    let mut contents: Vec<&str> = visible.iter().map(|q| q.content.as_str()).collect();
    contents.sort();
    assert_eq!(contents, vec!["legacy", "open"]);

    let nothing = repo.list(&QuoteQuery::new(GUILD, vec![])).await.unwrap();
    assert!(nothing.is_empty());
}

#[tokio::test]
async fn test_search_matches_content_or_author_case_insensitively() {
    let repo = repo().await;
    repo.add(NewQuote::new("The Quick fox", "Zed", 1, GUILD)).await.unwrap();
    repo.add(NewQuote::new("slow turtle", "Quinn", 1, GUILD)).await.unwrap();
    repo.add(NewQuote::new("nothing here", "Max", 1, GUILD)).await.unwrap();
    repo.add(NewQuote::new("quick but hidden", "Max", 1, GUILD).with_channel(9)).await.unwrap();

    let found = repo.search(GUILD, "QUI", &[0]).await.unwrap();
    let mut contents: Vec<&str> = found.iter().map(|q| q.content.as_str()).collect();
    contents.sort();
    assert_eq!(contents, vec!["The Quick fox", "slow turtle"]);

    let percent = repo.search(GUILD, "%", &[0]).await.unwrap();
    assert!(percent.is_empty());
}

#[tokio::test]
async fn test_random_one_empty_is_none() {
    let repo = repo().await;
    let query = QuoteQuery::new(GUILD, vec![0]);
    assert!(repo.random_one(&query).await.unwrap().is_none());

    repo.add(NewQuote::new("x", "Ann", 1, GUILD)).await.unwrap();
    let by_bob = query.with_author(Some("bob"));
    assert!(repo.random_one(&by_bob).await.unwrap().is_none());
}

#[tokio::test]
async fn test_random_one_uses_offset_in_id_order() {
    let repo = repo().await.with_offsets(Arc::new(FixedOffset(2)));
    let mut ids = Vec::new();
    for i in 0..4 {
        ids.push(repo.add(NewQuote::new(format!("q{}", i), "Ann", 1, GUILD)).await.unwrap().id);
    }

    let picked = repo
        .random_one(&QuoteQuery::new(GUILD, vec![0]))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(picked.id, ids[2]);
}

/// **Test: random_one is uniform over a fixed 4-quote set.**
///
/// **Setup:** Four quotes, seeded offset source.
/// **Action:** 1000 draws.
/// **Expected:** Chi-square statistic below the 0.1% critical value for 3 degrees of freedom.
#[tokio::test]
async fn test_random_one_is_uniform() {
    let repo = repo().await.with_offsets(Arc::new(SeededOffsets::new(20240501)));
    for i in 0..4 {
        repo.add(NewQuote::new(format!("q{}", i), "Ann", 1, GUILD)).await.unwrap();
    }

    let query = QuoteQuery::new(GUILD, vec![0]);
    let mut counts: HashMap<i64, u32> = HashMap::new();
    for _ in 0..1000 {
        let quote = repo.random_one(&query).await.unwrap().unwrap();
        *counts.entry(quote.id).or_default() += 1;
    }

    assert_eq!(counts.len(), 4);
    let expected = 250.0_f64;
    let chi_square: f64 = counts
        .values()
        .map(|&observed| {
            let diff = observed as f64 - expected;
            diff * diff / expected
        })
        .sum();
    assert!(chi_square < 16.27, "chi-square too large: {}", chi_square);
}

#[tokio::test]
async fn test_export_all_is_ascending_and_ignores_channels() {
    let repo = repo().await;
    let later = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
    let earlier = Utc.with_ymd_and_hms(2010, 1, 1, 0, 0, 0).unwrap();

    repo.add(NewQuote::new("first", "A", 1, GUILD).with_created_at(later)).await.unwrap();
    repo.add(NewQuote::new("second", "A", 1, GUILD).with_channel(8).with_created_at(earlier))
        .await
        .unwrap();
    repo.add(NewQuote::new("other guild", "A", 1, GUILD + 1)).await.unwrap();

    let exported = repo.export_all(GUILD).await.unwrap();
    let contents: Vec<&str> = exported.iter().map(|q| q.content.as_str()).collect();
    assert_eq!(contents, vec!["first", "second"]);
}

#[tokio::test]
async fn test_bulk_insert_counts_rows() {
    let repo = repo().await;
    let quotes = vec![
        NewQuote::new("a", "A", 1, GUILD),
        NewQuote::new("a", "A", 1, GUILD),
        NewQuote::new("b", "B", 2, GUILD).with_channel(3),
    ];

    let inserted = repo.bulk_insert(&quotes).await.unwrap();
    assert_eq!(inserted, 3);
    assert_eq!(repo.count_all().await.unwrap(), 3);
}

#[tokio::test]
async fn test_bulk_insert_with_invalid_row_writes_nothing() {
    let repo = repo().await;
    let quotes = vec![
        NewQuote::new("a", "A", 1, GUILD),
        NewQuote::new(" ", "B", 1, GUILD),
        NewQuote::new("c", "C", 1, GUILD),
    ];

    let result = repo.bulk_insert(&quotes).await;
    assert!(matches!(result, Err(StorageError::Validation(_))));
    assert_eq!(repo.count_all().await.unwrap(), 0);
}

/// **Test: Bulk-inserted rows are trimmed exactly like added ones.**
///
/// **Setup:** One quote added and one bulk-inserted, both with padded content and author.
///
/// **Action:** Export the guild and look up the trimmed triple.
///
/// **Expected:** Both rows stored as "x"/"A"; find_duplicate matches the trimmed values.
#[tokio::test]
async fn test_bulk_insert_trims_like_add() {
    let repo = repo().await;
    repo.add(NewQuote::new(" x ", " A ", 1, GUILD)).await.unwrap();
    repo.bulk_insert(&[NewQuote::new(" x ", " A ", 1, GUILD)])
        .await
        .unwrap();

    let stored = repo.export_all(GUILD).await.unwrap();
    assert_eq!(stored.len(), 2);
    for quote in &stored {
        assert_eq!(quote.content, "x");
        assert_eq!(quote.author, "A");
    }
    assert!(repo.find_duplicate("x", "A", GUILD).await.unwrap().is_some());
}

/// **Test: A row failing inside the transaction rolls back the rows before it.**
///
/// **Setup:** One committed quote; a trigger aborts any insert whose content is "boom".
///
/// **Action:** bulk_insert ["ok-1", "boom", "ok-2"].
///
/// **Expected:** Database error; only the earlier committed quote remains.
#[tokio::test]
async fn test_bulk_insert_rolls_back_on_failure_mid_batch() {
    let repo = repo().await;
    repo.add(NewQuote::new("kept", "K", 1, GUILD)).await.unwrap();
    sqlx::query(
        "CREATE TRIGGER reject_boom BEFORE INSERT ON quotes \
         WHEN NEW.content = 'boom' \
         BEGIN SELECT RAISE(ABORT, 'rejected'); END",
    )
    .execute(repo.pool())
    .await
    .unwrap();

    let quotes = vec![
        NewQuote::new("ok-1", "A", 1, GUILD),
        NewQuote::new("boom", "B", 1, GUILD),
        NewQuote::new("ok-2", "C", 1, GUILD),
    ];
    let result = repo.bulk_insert(&quotes).await;

    assert!(matches!(result, Err(StorageError::Database(_))));
    assert_eq!(repo.count_all().await.unwrap(), 1);
    let remaining = repo.export_all(GUILD).await.unwrap();
    assert_eq!(remaining[0].content, "kept");
}

#[tokio::test]
async fn test_find_duplicate_is_exact() {
    let repo = repo().await;
    let saved = repo.add(NewQuote::new("Hello", "Ann", 1, GUILD)).await.unwrap();

    assert_eq!(
        repo.find_duplicate("Hello", "Ann", GUILD).await.unwrap(),
        Some(saved.id)
    );
    assert!(repo.find_duplicate("hello", "Ann", GUILD).await.unwrap().is_none());
    assert!(repo.find_duplicate("Hello", "Ann", GUILD + 1).await.unwrap().is_none());
}

#[tokio::test]
async fn test_count_matches_list() {
    let repo = repo().await;
    repo.add(NewQuote::new("a", "Ann", 1, GUILD)).await.unwrap();
    repo.add(NewQuote::new("b", "Bob", 1, GUILD)).await.unwrap();
    repo.add(NewQuote::new("c", "Anna", 1, GUILD).with_channel(4)).await.unwrap();

    let query = QuoteQuery::new(GUILD, vec![0, 4]).with_author(Some("ann"));
    assert_eq!(repo.count(&query).await.unwrap(), 2);
    assert_eq!(repo.list(&query).await.unwrap().len(), 2);
}
