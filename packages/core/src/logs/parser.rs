//! Raw log line parsing.
//!
//! Handles the two shapes process managers write: JSON objects carrying
//! `message` and `timestamp`, and plain text lines with an optional leading
//! timestamp. Lines with no usable timestamp inherit the fallback one.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;

use crate::logs::classifier::classify;
use crate::logs::types::LogEntry;

/// Offset-aware layouts tried after RFC 3339.
const OFFSET_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f %:z", "%Y-%m-%d %H:%M:%S%.f %z"];

/// Naive layouts, interpreted as UTC.
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

#[derive(Debug, Deserialize)]
struct JsonLine {
    message: String,
    timestamp: Option<String>,
}

/// Parse a timestamp in any of the layouts seen in log prefixes.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }

    for format in OFFSET_FORMATS {
        if let Ok(ts) = DateTime::parse_from_str(raw, format) {
            return Some(ts.with_timezone(&Utc));
        }
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
}

/// Split a plain text line into its leading timestamp and the remainder.
fn split_timestamp(line: &str) -> Option<(DateTime<Utc>, &str)> {
    if let Some(rest) = line.strip_prefix('[') {
        let close = rest.find(']')?;
        let ts = parse_timestamp(&rest[..close])?;
        return Some((ts, rest[close + 1..].trim_start()));
    }

    if let Some(idx) = line.find(": ") {
        if let Some(ts) = parse_timestamp(&line[..idx]) {
            return Some((ts, &line[idx + 2..]));
        }
    }

    let (head, tail) = line.split_once(char::is_whitespace)?;
    let ts = parse_timestamp(head)?;
    Some((ts, tail.trim_start()))
}

/// Parse one raw line from `service`'s stream.
///
/// Returns `None` for blank lines. `fallback` is used when the line carries
/// no timestamp of its own.
pub fn parse_line(service: &str, line: &str, fallback: DateTime<Utc>) -> Option<LogEntry> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return None;
    }

    let (timestamp, message) = if line.trim_start().starts_with('{') {
        match serde_json::from_str::<JsonLine>(line.trim()) {
            Ok(json) => {
                let ts = json
                    .timestamp
                    .as_deref()
                    .and_then(parse_timestamp)
                    .unwrap_or(fallback);
                (ts, json.message.trim_end().to_string())
            }
            Err(_) => (fallback, line.to_string()),
        }
    } else {
        match split_timestamp(line) {
            Some((ts, rest)) => (ts, rest.to_string()),
            None => (fallback, line.to_string()),
        }
    };

    Some(LogEntry {
        level: classify(service, &message),
        timestamp,
        service: service.to_string(),
        message,
    })
}

/// Parse a whole file body. Timestamp-less lines inherit the timestamp of
/// the line before them, or `file_time` at the top of the file.
pub fn parse_lines(service: &str, text: &str, file_time: DateTime<Utc>) -> Vec<LogEntry> {
    let mut fallback = file_time;
    let mut entries = Vec::new();

    for line in text.lines() {
        if let Some(entry) = parse_line(service, line, fallback) {
            fallback = entry.timestamp;
            entries.push(entry);
        }
    }

    entries
}
