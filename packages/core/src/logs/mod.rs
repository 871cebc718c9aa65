//! Log Access Module
//!
//! Classifies raw log lines, parses log files into entries, and answers
//! filtered queries over them.

pub mod classifier;
pub mod error;
pub mod parser;
pub mod query;
pub mod source;
pub mod types;

pub use classifier::classify;
pub use error::LogSourceError;
pub use query::{apply, matches};
pub use source::{LogDirectory, LogSource};
pub use types::*;
