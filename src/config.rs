use std::env;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://www.thesportsdb.com/api/v1/json/1";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub base_url: String,
    pub debounce: Duration,
    pub request_timeout: Duration,
    pub tick_rate: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            debounce: Duration::from_millis(250),
            request_timeout: Duration::from_secs(10),
            tick_rate: Duration::from_millis(50),
        }
    }
}

impl Config {
    /// Reads `.env.local`, `.env` and the process environment.
    pub fn load() -> Self {
        let _ = dotenvy::from_filename(".env.local");
        let _ = dotenvy::from_filename(".env");
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let base_url = lookup("SPORTSDB_BASE_URL")
            .map(|val| val.trim().trim_end_matches('/').to_string())
            .filter(|val| !val.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let debounce_ms = lookup("SEARCH_DEBOUNCE_MS")
            .and_then(|val| val.trim().parse::<u64>().ok())
            .unwrap_or(250)
            .min(5000);
        let timeout_secs = lookup("REQUEST_TIMEOUT_SECS")
            .and_then(|val| val.trim().parse::<u64>().ok())
            .unwrap_or(10)
            .clamp(1, 120);
        let tick_ms = lookup("TICK_MS")
            .and_then(|val| val.trim().parse::<u64>().ok())
            .unwrap_or(50)
            .clamp(10, 1000);
        Self {
            base_url,
            debounce: Duration::from_millis(debounce_ms),
            request_timeout: Duration::from_secs(timeout_secs),
            tick_rate: Duration::from_millis(tick_ms),
        }
    }
}
