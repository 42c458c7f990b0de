use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the payments service.
    pub api_url: String,
    /// Request timeout for API calls, in seconds.
    pub timeout_secs: u64,
    /// Page size used when listing collections.
    pub page_size: i64,
    /// Minimum duration a search is allowed to take, so fast responses do
    /// not flash a loading indicator. Zero disables the floor.
    pub search_min_delay_ms: u64,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            api_url: env::var("OUTLAY_API_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| "http://localhost:8000".into()),
            timeout_secs: env::var("OUTLAY_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            page_size: env::var("OUTLAY_PAGE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(200),
            search_min_delay_ms: env::var("OUTLAY_SEARCH_MIN_DELAY_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8000".into(),
            timeout_secs: 30,
            page_size: 200,
            search_min_delay_ms: 0,
        }
    }
}
