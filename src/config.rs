use std::{net::SocketAddr, path::PathBuf};

use clap::Args;
use tracing_subscriber::EnvFilter;

use crate::client::DEFAULT_API_URL;
use crate::store::DEFAULT_DB_PATH;

pub const DEFAULT_BIND: &str = "127.0.0.1:8000";
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Log filter from `RUST_LOG`, falling back to `info` when unset or unparsable.
pub fn log_filter() -> EnvFilter {
    log_filter_from(std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref())
}

pub fn log_filter_from(directives: Option<&str>) -> EnvFilter {
    directives
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Settings for `serve`.
#[derive(Debug, Clone, Args)]
pub struct ServerConfig {
    /// Address to listen on
    #[arg(long, env = "TASKS_BIND", default_value = DEFAULT_BIND)]
    pub bind: SocketAddr,

    /// JSON file holding the task store
    #[arg(long, env = "TASKS_DB_PATH", default_value = DEFAULT_DB_PATH)]
    pub db_path: PathBuf,
}

/// Settings for the client commands.
#[derive(Debug, Clone, Args)]
pub struct ClientConfig {
    /// Base URL of the task API
    #[arg(long, env = "TASKS_API_URL", default_value = DEFAULT_API_URL, global = true)]
    pub api_url: String,
}
