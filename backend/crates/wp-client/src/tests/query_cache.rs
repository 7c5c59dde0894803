use crate::{QueryCache, QueryInvalidator};

use wp_core::InvalidationTarget;

use googletest::prelude::*;
use serde_json::json;

#[test]
fn given_cached_query_when_invalidated_twice_then_same_outcome_as_once() {
    // Given
    let cache = QueryCache::new();
    cache.insert("guests.list", json!(["ann", "bob"]));
    cache.insert("budget.summary", json!({"total": 100}));

    // When
    cache.invalidate(&InvalidationTarget::new("guests.list"));
    cache.invalidate(&InvalidationTarget::new("guests.list"));

    // Then
    assert_that!(cache.contains("guests.list"), is_false());
    assert_eq!(cache.get("budget.summary"), Some(json!({"total": 100})));
    assert_that!(cache.len(), eq(1));
}

#[test]
fn given_unknown_target_when_invalidated_then_nothing_changes() {
    let cache = QueryCache::new();
    cache.insert("guests.list", json!([]));

    cache.invalidate(&InvalidationTarget::new("vendors.list"));

    assert_that!(cache.len(), eq(1));
}

#[test]
fn given_cached_queries_when_invalidate_all_then_empty() {
    let cache = QueryCache::new();
    cache.insert("guests.list", json!([]));
    cache.insert("budget.summary", json!({}));

    cache.invalidate_all();

    assert_that!(cache.is_empty(), is_true());
}
