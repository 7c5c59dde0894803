use crate::QueryInvalidator;

use wp_core::InvalidationTarget;

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde_json::Value;

/// Minimal keyed cache of query results.
///
/// Invalidating a key drops its value; the next read refetches.
#[derive(Debug, Default)]
pub struct QueryCache {
    entries: Mutex<HashMap<String, Value>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, key: impl Into<String>, value: Value) {
        self.entries().insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.entries().get(key).cloned()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, Value>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl QueryInvalidator for QueryCache {
    fn invalidate(&self, target: &InvalidationTarget) {
        if self.entries().remove(target.as_str()).is_some() {
            log::debug!("Invalidated cached query {}", target);
        }
    }

    fn invalidate_all(&self) {
        let mut entries = self.entries();
        log::debug!("Invalidating all {} cached queries", entries.len());
        entries.clear();
    }
}
