use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Replays a library operation journal and prints the outcome of every row.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Input operations CSV file
    pub input: PathBuf,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long, env = "LIBRARY_DB_PATH")]
    pub db_path: Option<PathBuf>,

    /// Simulated payment gateway latency in milliseconds
    #[arg(long, env = "LIBRARY_GATEWAY_LATENCY_MS", default_value_t = 500)]
    pub gateway_latency_ms: u64,

    /// Log output format (logs go to stderr)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

impl Config {
    pub fn gateway_latency(&self) -> Duration {
        Duration::from_millis(self.gateway_latency_ms)
    }
}
