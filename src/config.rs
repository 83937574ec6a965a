use crate::error::{AppError, Result};

pub const NAVER_SHOP_API_URL: &str = "https://openapi.naver.com/v1/search/shop.json";

/// Per-request timeout for the shopping search API (seconds).
pub const SEARCH_TIMEOUT_SECS: u64 = 10;

/// Total attempts per keyword before degrading to "no results".
pub const SEARCH_MAX_RETRIES: u32 = 3;

/// Sleep between failed search attempts (milliseconds).
pub const SEARCH_RETRY_DELAY_MS: u64 = 1000;

/// Timeout for the outbound webhook call (seconds).
pub const NOTIFY_TIMEOUT_SECS: u64 = 10;

/// Rows per INSERT statement when flushing the collection buffers.
/// Keeps each statement under backend payload limits.
pub const BATCH_SIZE: usize = 500;

/// Shared configuration for both binaries.
#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub db_path: String,
    pub api_port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            db_path: std::env::var("DB_PATH").unwrap_or_else(|_| "pricewatch.db".to_string()),
            api_port: std::env::var("API_PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse::<u16>()
                .map_err(|_| AppError::Config("API_PORT must be a valid port number".to_string()))?,
        })
    }
}

/// Collector-only configuration. Search credentials are required — the job
/// must not start without them.
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    pub naver_client_id: String,
    pub naver_client_secret: String,
    /// Results requested per search call (SEARCH_DISPLAY).
    pub search_display: u32,
    /// Sleep between keywords, rate-limit courtesy to the upstream API
    /// (REQUEST_DELAY_MS).
    pub request_delay_ms: u64,
    /// Titles containing any of these are dropped unless the word is part of
    /// the search keyword itself (EXCLUDE_KEYWORDS, comma-separated; empty
    /// falls back to the filter's built-in list).
    pub exclude_keywords: Vec<String>,
    pub slack_enabled: bool,
    pub slack_webhook_url: String,
    /// Repeat alerts for the same product are suppressed within this window
    /// (ALERT_DEDUP_HOURS).
    pub alert_dedup_hours: i64,
}

impl CollectorConfig {
    pub fn from_env() -> Result<Self> {
        let naver_client_id = std::env::var("NAVER_CLIENT_ID")
            .map_err(|_| AppError::Config("NAVER_CLIENT_ID is not set".to_string()))?;
        let naver_client_secret = std::env::var("NAVER_CLIENT_SECRET")
            .map_err(|_| AppError::Config("NAVER_CLIENT_SECRET is not set".to_string()))?;

        Ok(Self {
            naver_client_id,
            naver_client_secret,
            search_display: std::env::var("SEARCH_DISPLAY")
                .unwrap_or_else(|_| "30".to_string())
                .parse::<u32>()
                .unwrap_or(30),
            request_delay_ms: std::env::var("REQUEST_DELAY_MS")
                .unwrap_or_else(|_| "150".to_string())
                .parse::<u64>()
                .unwrap_or(150),
            exclude_keywords: std::env::var("EXCLUDE_KEYWORDS")
                .unwrap_or_default()
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            slack_enabled: std::env::var("SLACK_ENABLED")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            slack_webhook_url: std::env::var("SLACK_WEBHOOK_URL").unwrap_or_default(),
            alert_dedup_hours: std::env::var("ALERT_DEDUP_HOURS")
                .unwrap_or_else(|_| "24".to_string())
                .parse::<i64>()
                .unwrap_or(24),
        })
    }
}
