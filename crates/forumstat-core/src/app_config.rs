use std::net::SocketAddr;
use std::path::PathBuf;

use chrono_tz::Tz;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Display name of the tracked forum member.
    pub username: String,
    pub profile_url: String,
    /// Search pages listing the member's posts, tried in order until one
    /// answers successfully.
    pub search_urls: Vec<String>,
    /// Time zone the board renders post times in.
    pub board_tz: Tz,
    pub scraper_timeout_secs: u64,
    pub scraper_user_agent: String,
    pub cache_ttl_secs: u64,
    pub static_dir: PathBuf,
    /// Six-field cron expression for the cache warm-up job. `None` disables it.
    pub warm_cron: Option<String>,
}
