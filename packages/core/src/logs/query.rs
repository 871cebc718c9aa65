//! Filter, sort and truncate pipeline over in-memory log entries.

use crate::logs::types::{LogEntry, LogFilter};

/// Returns `true` when `entry` satisfies every field set on `filter`.
pub fn matches(entry: &LogEntry, filter: &LogFilter) -> bool {
    if let Some(service) = filter.service.as_deref() {
        if entry.service != service {
            return false;
        }
    }

    if let Some(level) = filter.level {
        if entry.level != level {
            return false;
        }
    }

    if let Some(start) = filter.start_date {
        if entry.timestamp <= start {
            return false;
        }
    }

    if let Some(end) = filter.end_date {
        if entry.timestamp >= end {
            return false;
        }
    }

    if let Some(term) = filter.search_term.as_deref() {
        if !entry.message.contains(term) {
            return false;
        }
    }

    true
}

/// Sort newest first. `sort_by` is stable, so equal timestamps keep their
/// input order.
pub fn sort_by_timestamp_desc(entries: &mut [LogEntry]) {
    entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}

/// Run `filter` over `entries` and return the newest matches, capped at the
/// filter's limit. `entries` is left untouched.
pub fn apply(entries: &[LogEntry], filter: &LogFilter) -> Vec<LogEntry> {
    let limit = filter.effective_limit();
    if limit == 0 {
        return Vec::new();
    }

    let mut matched: Vec<LogEntry> = entries
        .iter()
        .filter(|entry| matches(entry, filter))
        .cloned()
        .collect();

    sort_by_timestamp_desc(&mut matched);
    matched.truncate(limit);
    matched
}
