//! In-memory log snapshot store.
//!
//! `LogStore` holds the entries produced by the most recent refresh of the
//! log source. A refresh swaps the whole snapshot; when the source yields
//! more than `capacity` entries only the newest ones are kept.
//!
//! The store itself is not `Sync`; callers wrap it in
//! `Arc<RwLock<LogStore>>` so it can be shared between the Tokio refresh
//! task and the Axum handler threads.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use crate::logs::query::{apply, sort_by_timestamp_desc};
use crate::logs::types::{LogEntry, LogFilter};

/// Default maximum number of entries retained in memory.
pub const DEFAULT_CAPACITY: usize = 50_000;

/// Capacity-bounded snapshot of parsed log entries.
#[derive(Debug)]
pub struct LogStore {
    entries: Vec<LogEntry>,
    capacity: usize,
    loaded_at: Option<DateTime<Utc>>,
}

impl LogStore {
    /// Create an empty store with the given maximum capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity,
            loaded_at: None,
        }
    }

    /// Replace the snapshot, keeping at most `capacity` newest entries.
    pub fn replace(&mut self, mut entries: Vec<LogEntry>) {
        if entries.len() > self.capacity {
            sort_by_timestamp_desc(&mut entries);
            entries.truncate(self.capacity);
        }
        self.entries = entries;
        self.loaded_at = Some(Utc::now());
    }

    /// Run a filtered query over the current snapshot.
    pub fn query(&self, filter: &LogFilter) -> Vec<LogEntry> {
        apply(&self.entries, filter)
    }

    /// Distinct service names present in the snapshot, sorted.
    pub fn services(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|e| e.service.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// When the snapshot was last replaced, if ever.
    pub fn last_loaded(&self) -> Option<DateTime<Utc>> {
        self.loaded_at
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logs::types::LogLevel;
    use chrono::Duration;

    fn make_entry(service: &str, minutes_ago: i64) -> LogEntry {
        LogEntry {
            timestamp: Utc::now() - Duration::minutes(minutes_ago),
            service: service.to_string(),
            level: LogLevel::Info,
            message: format!("{} {}", service, minutes_ago),
        }
    }

    // ---- replace / capacity ----

    #[test]
    fn new_store_is_empty() {
        let store = LogStore::new(10);
        assert!(store.is_empty());
        assert!(store.last_loaded().is_none());
    }

    #[test]
    fn replace_swaps_snapshot() {
        let mut store = LogStore::new(10);
        store.replace(vec![make_entry("a", 1), make_entry("a", 2)]);
        store.replace(vec![make_entry("b", 1)]);

        assert_eq!(store.len(), 1);
        assert_eq!(store.services(), vec!["b"]);
        assert!(store.last_loaded().is_some());
    }

    #[test]
    fn replace_keeps_newest_when_over_capacity() {
        let mut store = LogStore::new(2);
        store.replace(vec![
            make_entry("a", 30), // oldest
            make_entry("a", 1),
            make_entry("a", 10),
        ]);

        assert_eq!(store.len(), 2);
        let all = store.query(&LogFilter::default());
        assert_eq!(all[0].message, "a 1");
        assert_eq!(all[1].message, "a 10");
    }

    #[test]
    fn replace_exactly_at_capacity_keeps_everything() {
        let mut store = LogStore::new(3);
        store.replace(vec![make_entry("a", 1), make_entry("a", 2), make_entry("a", 3)]);
        assert_eq!(store.len(), 3);
    }

    // ---- query / services ----

    #[test]
    fn query_applies_filter() {
        let mut store = LogStore::new(10);
        store.replace(vec![make_entry("a", 1), make_entry("b", 2), make_entry("a", 3)]);

        let result = store.query(&LogFilter::default().with_service("a"));
        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|e| e.service == "a"));
    }

    #[test]
    fn services_are_distinct_and_sorted() {
        let mut store = LogStore::new(10);
        store.replace(vec![make_entry("web", 1), make_entry("api", 2), make_entry("web", 3)]);
        assert_eq!(store.services(), vec!["api", "web"]);
    }

    #[test]
    fn clear_empties_the_store() {
        let mut store = LogStore::new(10);
        store.replace(vec![make_entry("a", 1)]);
        store.clear();
        assert!(store.is_empty());
    }
}
