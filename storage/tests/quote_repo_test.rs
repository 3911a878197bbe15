//! Integration tests for [`storage::QuoteRepository`].
//!
//! Covers persistence across reopen of an on-disk database and channel-scope enforcement on every multi-row query.

use storage::{NewQuote, QuoteQuery, QuoteRepository, QuoteStore};

/// **Test: Quotes survive closing and reopening an on-disk database.**
///
/// **Setup:** Temp dir; open repo at a file path, add two quotes.
/// **Action:** Reopen the same path.
/// **Expected:** Both quotes are exported in id order with identical fields.
#[tokio::test]
async fn test_quotes_persist_across_reopen() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("quotes.db");
    let path = path.to_str().expect("utf-8 path");

    let saved = {
        let repo = QuoteRepository::new(path).await.expect("Failed to open repository");
        let a = repo.add(NewQuote::new("one", "Ann", 1, 5)).await.unwrap();
        let b = repo.add(NewQuote::new("two", "Bob", 2, 5).with_channel(9)).await.unwrap();
        vec![a, b]
    };

    let reopened = QuoteRepository::new(path).await.expect("Failed to reopen repository");
    let exported = reopened.export_all(5).await.unwrap();

    assert_eq!(exported, saved);
}

/// **Test: No multi-row query ever returns a quote outside the channel scope.**
///
/// **Setup:** 30 quotes spread over channels 0..5 in one guild.
/// **Action:** list / search / random_one with scope {0, 2, 4}.
/// **Expected:** Every returned channel_id is in the scope.
#[tokio::test]
async fn test_queries_never_leak_out_of_scope() {
    let repo = QuoteRepository::in_memory().await.unwrap();
    for i in 0..30i64 {
        repo.add(
            NewQuote::new(format!("quote number {}", i), format!("author {}", i % 3), 1, 7)
                .with_channel(i % 5),
        )
        .await
        .unwrap();
    }

    let scope = vec![0, 2, 4];
    let query = QuoteQuery::new(7, scope.clone());

    let listed = repo.list(&query).await.unwrap();
    assert_eq!(listed.len(), 18);
    assert!(listed.iter().all(|q| scope.contains(&q.channel_id)));

    let found = repo.search(7, "quote", &scope).await.unwrap();
    assert_eq!(found.len(), 18);
    assert!(found.iter().all(|q| scope.contains(&q.channel_id)));

    for _ in 0..50 {
        let picked = repo.random_one(&query).await.unwrap().unwrap();
        assert!(scope.contains(&picked.channel_id));
    }
}
