use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

pub const DEFAULT_USERNAME: &str = "Renny";
pub const DEFAULT_PROFILE_URL: &str = "https://stamnummer3.be/memberlist.php?mode=viewprofile&u=77";
pub const DEFAULT_SEARCH_URLS: &str = "https://stamnummer3.be/search.php?author_id=77&sr=posts,\
https://stamnummer3.be/search.php?author=Renny&sr=posts";
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

pub const DEFAULT_BOARD_TZ: &str = "Europe/Brussels";

/// Freshness window for the in-memory snapshot: five minutes.
pub const DEFAULT_CACHE_TTL_SECS: u64 = 5 * 60;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u16 = |var: &str, default: &str| -> Result<u16, ConfigError> {
        let raw = or_default(var, default);
        raw.trim()
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.trim()
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let env = parse_environment(&or_default("FORUMSTAT_ENV", "development"));

    let port = parse_u16("PORT", "3000")?;
    let bind_addr = SocketAddr::from(([0, 0, 0, 0], port));
    let log_level = or_default("FORUMSTAT_LOG_LEVEL", "info");

    let username = or_default("FORUMSTAT_USERNAME", DEFAULT_USERNAME);
    let profile_url = or_default("FORUMSTAT_PROFILE_URL", DEFAULT_PROFILE_URL);
    let search_urls = parse_url_list(&or_default("FORUMSTAT_SEARCH_URLS", DEFAULT_SEARCH_URLS));
    if search_urls.is_empty() {
        return Err(ConfigError::InvalidEnvVar {
            var: "FORUMSTAT_SEARCH_URLS".to_string(),
            reason: "expected at least one URL".to_string(),
        });
    }

    let board_tz_raw = or_default("FORUMSTAT_BOARD_TZ", DEFAULT_BOARD_TZ);
    let board_tz = board_tz_raw
        .trim()
        .parse::<chrono_tz::Tz>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: "FORUMSTAT_BOARD_TZ".to_string(),
            reason: e.to_string(),
        })?;

    let scraper_timeout_secs = parse_u64("FORUMSTAT_SCRAPER_TIMEOUT_SECS", "15")?;
    let scraper_user_agent = or_default("FORUMSTAT_SCRAPER_USER_AGENT", DEFAULT_USER_AGENT);
    let cache_ttl_secs = parse_u64(
        "FORUMSTAT_CACHE_TTL_SECS",
        &DEFAULT_CACHE_TTL_SECS.to_string(),
    )?;
    let static_dir = PathBuf::from(or_default("FORUMSTAT_STATIC_DIR", "./public"));
    let warm_cron = lookup("FORUMSTAT_WARM_CRON")
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        username,
        profile_url,
        search_urls,
        board_tz,
        scraper_timeout_secs,
        scraper_user_agent,
        cache_ttl_secs,
        static_dir,
        warm_cron,
    })
}

fn parse_url_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
