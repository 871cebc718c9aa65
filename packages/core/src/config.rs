use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::cli::Cli;
use crate::logs::source::DEFAULT_TAIL_LINES;
use crate::store::DEFAULT_CAPACITY;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_REFRESH_INTERVAL_SECONDS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    pub log_dir: PathBuf,
    pub database_url: String,
    pub port: u16,
    pub refresh_interval_seconds: u64,
    pub tail_lines: usize,
    pub store_capacity: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup. `from_env` passes `std::env`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let log_dir = lookup("LOG_DIR")
            .map(PathBuf::from)
            .ok_or("LOG_DIR is required")?;

        let database_url = lookup("DATABASE_URL").ok_or("DATABASE_URL is required")?;

        Ok(Self {
            log_dir,
            database_url,
            port: parse_or(&lookup, "PORT", DEFAULT_PORT)?,
            refresh_interval_seconds: parse_or(
                &lookup,
                "LOG_REFRESH_INTERVAL_SECONDS",
                DEFAULT_REFRESH_INTERVAL_SECONDS,
            )?,
            tail_lines: parse_or(&lookup, "LOG_TAIL_LINES", DEFAULT_TAIL_LINES)?,
            store_capacity: parse_or(&lookup, "LOG_STORE_CAPACITY", DEFAULT_CAPACITY)?,
        })
    }

    /// Command-line flags win over environment values.
    pub fn with_cli_overrides(mut self, cli: &Cli) -> Self {
        if let Some(log_dir) = &cli.log_dir {
            self.log_dir = log_dir.clone();
        }
        if let Some(database_url) = &cli.database_url {
            self.database_url = database_url.clone();
        }
        if let Some(port) = cli.port {
            self.port = port;
        }
        if let Some(interval) = cli.refresh_interval {
            self.refresh_interval_seconds = interval;
        }
        self
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, String>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| format!("{} must be a valid number", key)),
        None => Ok(default),
    }
}
