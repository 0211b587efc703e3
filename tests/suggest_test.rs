//! Tests for the suggestion store

use chrono::{DateTime, Duration, Utc};
use media_search_core::error::AppError;
use media_search_core::suggest::{
    ManualClock, Similarity, SuggestConfig, Suggestion, SuggestionStore, MAX_TTL_SECS,
    SUGGEST_METRICS,
};
use std::sync::Arc;
use std::thread;

const TTL_SECS: i64 = 3600;

fn store_with(similarity: Similarity) -> (SuggestionStore, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let config = SuggestConfig::builder()
        .ttl_secs(TTL_SECS)
        .similarity(similarity)
        .build()
        .expect("valid config");
    let store = SuggestionStore::with_clock(config, clock.clone()).expect("store");
    (store, clock)
}

fn store() -> (SuggestionStore, Arc<ManualClock>) {
    store_with(Similarity::Uniform)
}

fn texts(suggestions: &[Suggestion]) -> Vec<&str> {
    suggestions.iter().map(|s| s.text.as_str()).collect()
}

#[test]
fn test_groups_are_isolated() {
    let (store, _) = store();
    store.index("lubach", "vpro").unwrap();
    store.index("luitjes", "eo").unwrap();

    let result = store.suggest("lu", "vpro", None);
    assert_eq!(texts(&result), vec!["lubach"]);

    let result = store.suggest("lu", "eo", None);
    assert_eq!(texts(&result), vec!["luitjes"]);
}

#[test]
fn test_cleanup_after_ttl_empties_results() {
    let (store, clock) = store();
    store.index("lubach", "vpro").unwrap();
    store.index("luitjes", "eo").unwrap();

    clock.advance(Duration::seconds(TTL_SECS + 1));
    let removed = store.cleanup();

    assert_eq!(removed, 2);
    assert!(store.suggest("lu", "vpro", None).is_empty());
    assert_eq!(store.stats().entries, 0);

    // Idempotent
    assert_eq!(store.cleanup(), 0);
}

#[test]
fn test_expired_entries_hidden_before_cleanup() {
    let (store, clock) = store();
    store.index("lubach", "vpro").unwrap();
    clock.advance(Duration::seconds(TTL_SECS + 1));

    assert!(store.suggest("lu", "vpro", None).is_empty());
    assert_eq!(store.stats().entries, 1);
}

#[test]
fn test_equal_scores_keep_insertion_order() {
    let (store, _) = store();
    for text in ["cuba", "dubai", "libanon", "lubach", "libanon andere tijden"] {
        store.index(text, "vpro").unwrap();
    }

    let result = store.suggest("liba", "vpro", None);
    assert_eq!(
        texts(&result),
        vec!["cuba", "dubai", "libanon", "lubach", "libanon andere tijden"]
    );
    assert!(result.iter().all(|s| s.score == 1.0));
}

#[test]
fn test_edit_distance_ranks_closer_matches_first() {
    let (store, _) = store_with(Similarity::EditDistance);
    for text in ["cuba", "dubai", "libanon", "lubach", "libanon andere tijden"] {
        store.index(text, "vpro").unwrap();
    }

    let result = store.suggest("liba", "vpro", None);
    assert_eq!(
        texts(&result),
        vec!["libanon", "libanon andere tijden", "lubach", "cuba", "dubai"]
    );
}

#[test]
fn test_reindex_moves_entry_to_end_of_ties() {
    let (store, _) = store();
    store.index("lubach", "vpro").unwrap();
    store.index("luitjes", "vpro").unwrap();
    store.index("lubach", "vpro").unwrap();

    assert_eq!(
        texts(&store.suggest("lu", "vpro", None)),
        vec!["luitjes", "lubach"]
    );
    assert_eq!(store.stats().entries, 2);
}

#[test]
fn test_duplicates_across_groups_collapse() {
    let (store, _) = store();
    store.index("lubach", "vpro").unwrap();
    store.index("lubach", "eo").unwrap();
    store.index("luitjes", "eo").unwrap();

    let result = store.suggest_in("lu", &["vpro", "eo"], None);
    assert_eq!(texts(&result), vec!["lubach", "luitjes"]);
}

#[test]
fn test_size_limits() {
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let config = SuggestConfig::builder()
        .default_size(2)
        .max_size(3)
        .build()
        .unwrap();
    let store = SuggestionStore::with_clock(config, clock).unwrap();
    for text in ["lu1", "lu2", "lu3", "lu4", "lu5"] {
        store.index(text, "vpro").unwrap();
    }

    assert_eq!(store.suggest("lu", "vpro", None).len(), 2);
    assert_eq!(store.suggest("lu", "vpro", Some(1)).len(), 1);
    assert_eq!(store.suggest("lu", "vpro", Some(50)).len(), 3);
}

#[test]
fn test_unknown_group_and_blank_prefix_are_empty() {
    let (store, _) = store();
    store.index("lubach", "vpro").unwrap();
    assert!(store.suggest("lu", "npo", None).is_empty());
    assert!(store.suggest("   ", "vpro", None).is_empty());
    assert!(store.suggest("lu", "", None).is_empty());
}

#[test]
fn test_matching_is_case_insensitive() {
    let (store, _) = store();
    store.index("Zondag met Lubach", "vpro").unwrap();
    assert_eq!(
        texts(&store.suggest("ZON", "vpro", None)),
        vec!["Zondag met Lubach"]
    );
}

#[test]
fn test_non_positive_ttl_rejected() {
    for ttl in [0, -1] {
        let config = SuggestConfig {
            ttl_secs: ttl,
            ..Default::default()
        };
        let err = SuggestionStore::new(config).unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument(_)));
    }
}

#[test]
fn test_oversized_ttl_rejected() {
    for ttl in [MAX_TTL_SECS + 1, 10_000_000_000_000, i64::MAX] {
        let config = SuggestConfig {
            ttl_secs: ttl,
            ..Default::default()
        };
        assert!(config.check().is_err(), "ttl {}", ttl);
        let err = SuggestionStore::new(config).unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument(_)));
    }
}

#[test]
fn test_longest_ttl_near_earliest_date_never_expires() {
    let start = DateTime::<Utc>::MIN_UTC + Duration::days(1);
    let clock = Arc::new(ManualClock::new(start));
    let config = SuggestConfig::builder()
        .ttl_secs(MAX_TTL_SECS)
        .build()
        .expect("longest ttl is valid");
    let store = SuggestionStore::with_clock(config, clock.clone()).unwrap();

    store.index("lubach", "vpro").unwrap();
    clock.advance(Duration::days(2));

    assert_eq!(texts(&store.suggest("lu", "vpro", None)), vec!["lubach"]);
    assert_eq!(store.cleanup(), 0);
    assert_eq!(store.stats().entries, 1);
}

#[test]
fn test_entry_gauge_is_per_store() {
    let (first, clock) = store();
    let (second, _) = store();
    assert_ne!(first.metrics_label(), second.metrics_label());

    for text in ["lubach", "luitjes", "lubach"] {
        first.index(text, "vpro").unwrap();
    }
    second.index("cuba", "vpro").unwrap();

    let gauge = |store: &SuggestionStore| {
        SUGGEST_METRICS
            .entries
            .with_label_values(&[store.metrics_label()])
            .get()
    };
    assert_eq!(gauge(&first), 2.0);
    assert_eq!(gauge(&second), 1.0);

    clock.advance(Duration::seconds(TTL_SECS + 1));
    assert_eq!(first.cleanup(), 2);
    assert_eq!(gauge(&first), 0.0);
    assert_eq!(gauge(&second), 1.0);
}

#[test]
fn test_cleanup_keeps_entries_written_after_snapshot() {
    let (store, clock) = store();
    store.index("oud", "vpro").unwrap();
    clock.advance(Duration::seconds(TTL_SECS + 10));
    store.index("nieuw", "vpro").unwrap();

    assert_eq!(store.cleanup(), 1);
    assert_eq!(texts(&store.suggest("nie", "vpro", None)), vec!["nieuw"]);
}

#[test]
fn test_concurrent_index_suggest_and_cleanup() {
    let (store, clock) = store();
    let store = Arc::new(store);

    // Pre-existing, already expired entries
    for i in 0..50 {
        store.index(&format!("expired {}", i), "old").unwrap();
    }
    clock.advance(Duration::seconds(TTL_SECS + 1));

    let mut handles = Vec::new();
    for worker in 0..4 {
        let store = store.clone();
        handles.push(thread::spawn(move || {
            for i in 0..250 {
                store
                    .index(&format!("query {} {}", worker, i), &format!("group{}", i % 5))
                    .unwrap();
                let _ = store.suggest("query", &format!("group{}", i % 5), Some(5));
            }
        }));
    }
    for _ in 0..2 {
        let store = store.clone();
        handles.push(thread::spawn(move || {
            for _ in 0..20 {
                store.cleanup();
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    store.cleanup();
    let stats = store.stats();
    assert_eq!(stats.entries, 1000);
    assert_eq!(stats.groups, 5);
}
