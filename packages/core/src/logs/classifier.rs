//! Severity classification for raw log lines.
//!
//! Rules are checked top to bottom and the first match wins: the stream
//! name beats line content, and error markers beat warning markers.

use crate::logs::types::LogLevel;

/// Case-insensitive substrings that mark a line as an error.
const ERROR_MARKERS: &[&str] = &["error", "err]", "exception", "stack trace", "code:"];

/// Case-insensitive substrings that mark a line as a warning.
const WARN_MARKERS: &[&str] = &["warn", "warning"];

/// Map a raw line and the name of the stream it came from to a [`LogLevel`].
///
/// Total: every input yields exactly one level.
pub fn classify(service_name: &str, line: &str) -> LogLevel {
    if service_name.to_lowercase().contains("error") {
        return LogLevel::Error;
    }

    let line = line.to_lowercase();

    if is_error_line(&line) {
        return LogLevel::Error;
    }

    if WARN_MARKERS.iter().any(|marker| line.contains(marker)) {
        return LogLevel::Warn;
    }

    LogLevel::Info
}

/// `line` must already be lowercased.
fn is_error_line(line: &str) -> bool {
    ERROR_MARKERS.iter().any(|marker| line.contains(marker))
        || has_suffixed_error_token(line)
        || is_stack_frame(line)
}

/// Matches tokens such as `typeerror:` or `syntaxerror:`.
fn has_suffixed_error_token(line: &str) -> bool {
    line.match_indices("error:").any(|(idx, _)| {
        line[..idx]
            .chars()
            .next_back()
            .map(|c| c.is_alphanumeric() || c == '_')
            .unwrap_or(false)
    })
}

/// Matches Node-style frames like `    at handler (/srv/app/index.js:10:5)`.
fn is_stack_frame(line: &str) -> bool {
    line.trim_start().starts_with("at ") && line.contains('/')
}
