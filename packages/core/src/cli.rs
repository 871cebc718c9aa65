use std::path::PathBuf;

use clap::Parser;

/// Admin gateway CLI arguments
#[derive(Debug, Parser)]
#[command(
    name = "admin-gateway",
    version,
    about = "Administrative REST API for log access and notifications"
)]
pub struct Cli {
    /// Directory holding the `*.log` files to serve
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// SQLite connection string, e.g. sqlite://admin.db
    #[arg(long)]
    pub database_url: Option<String>,

    /// HTTP port to listen on
    #[arg(long)]
    pub port: Option<u16>,

    /// Log refresh interval in seconds
    #[arg(long)]
    pub refresh_interval: Option<u64>,
}
