use std::env;
use std::time::Duration;

pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/120.0";

/// Page fetches (search results, about pages, video tabs).
pub const PAGE_TIMEOUT: Duration = Duration::from_secs(20);

/// YouTube Data API calls.
pub const API_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Clone, Debug, Default)]
pub struct ScoutConfig {
    /// Data API key; statistics lookups run only when this is present.
    pub api_key: Option<String>,
}

impl ScoutConfig {
    pub fn from_env() -> Self {
        let api_key = env::var("YOUTUBE_API_KEY")
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());
        ScoutConfig { api_key }
    }

    pub fn stats_enabled(&self) -> bool { self.api_key.is_some() }
}
