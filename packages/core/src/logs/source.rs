//! Log Source Interface
//!
//! Abstracts where log entries come from so the refresh loop and the API
//! can be exercised against in-memory sources in tests.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::fs;

use crate::logs::error::LogSourceError;
use crate::logs::parser::parse_lines;
use crate::logs::types::LogEntry;

/// Default number of trailing lines read from each log file.
pub const DEFAULT_TAIL_LINES: usize = 1000;

/// Trait for log providers so the store does not care where entries come from
#[async_trait]
pub trait LogSource {
    /// Load and parse every entry currently available from the source.
    async fn load_entries(&self) -> Result<Vec<LogEntry>, LogSourceError>;

    /// Names of the services (log streams) the source knows about, sorted.
    async fn list_services(&self) -> Result<Vec<String>, LogSourceError>;

    /// Name of this source for logging/debugging
    fn source_name(&self) -> &str;
}

/// Directory of `*.log` files, one stream per file.
///
/// The file stem is the service name, so `api-out.log` and `api-error.log`
/// become the `api-out` and `api-error` streams.
#[derive(Debug, Clone)]
pub struct LogDirectory {
    root: PathBuf,
    tail_lines: usize,
}

impl LogDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            tail_lines: DEFAULT_TAIL_LINES,
        }
    }

    pub fn with_tail_lines(mut self, tail_lines: usize) -> Self {
        self.tail_lines = tail_lines;
        self
    }

    /// `(service, path)` for every `*.log` file directly under the root.
    async fn discover(&self) -> Result<Vec<(String, PathBuf)>, LogSourceError> {
        let mut dir = match fs::read_dir(&self.root).await {
            Ok(dir) => dir,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(LogSourceError::DirectoryNotFound {
                    path: self.root.clone(),
                });
            }
            Err(err) => return Err(LogSourceError::io(&self.root, err)),
        };

        let mut files = Vec::new();
        while let Some(item) = dir
            .next_entry()
            .await
            .map_err(|err| LogSourceError::io(&self.root, err))?
        {
            let path = item.path();
            let is_file = item
                .file_type()
                .await
                .map(|t| t.is_file())
                .unwrap_or(false);
            if !is_file || path.extension().and_then(|e| e.to_str()) != Some("log") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                files.push((stem.to_string(), path.clone()));
            }
        }

        files.sort();
        Ok(files)
    }

    async fn read_file(&self, service: &str, path: &Path) -> Result<Vec<LogEntry>, LogSourceError> {
        let bytes = fs::read(path)
            .await
            .map_err(|err| LogSourceError::io(path, err))?;
        let modified: DateTime<Utc> = fs::metadata(path)
            .await
            .and_then(|meta| meta.modified())
            .map(DateTime::<Utc>::from)
            .unwrap_or_else(|_| Utc::now());

        let text = String::from_utf8_lossy(&bytes);
        let tail = tail_lines(&text, self.tail_lines);
        Ok(parse_lines(service, tail, modified))
    }
}

/// The suffix of `text` holding at most its last `n` lines.
fn tail_lines(text: &str, n: usize) -> &str {
    if n == 0 {
        return "";
    }

    let trimmed = text.trim_end_matches('\n');
    let mut seen = 0;
    for (idx, _) in trimmed.rmatch_indices('\n') {
        seen += 1;
        if seen == n {
            return &trimmed[idx + 1..];
        }
    }
    trimmed
}

#[async_trait]
impl LogSource for LogDirectory {
    async fn load_entries(&self) -> Result<Vec<LogEntry>, LogSourceError> {
        let files = self.discover().await?;
        let mut entries = Vec::new();

        for (service, path) in &files {
            match self.read_file(service, path).await {
                Ok(mut parsed) => entries.append(&mut parsed),
                Err(err) => {
                    tracing::warn!("Skipping unreadable log file: {}", err);
                }
            }
        }

        tracing::debug!(
            "Loaded {} entries from {} log files in {}",
            entries.len(),
            files.len(),
            self.root.display()
        );
        Ok(entries)
    }

    async fn list_services(&self) -> Result<Vec<String>, LogSourceError> {
        let services: BTreeSet<String> = self
            .discover()
            .await?
            .into_iter()
            .map(|(service, _)| service)
            .collect();
        Ok(services.into_iter().collect())
    }

    fn source_name(&self) -> &str {
        "log-directory"
    }
}
