//! Configuration module for the photo tagging service.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use crate::tagging::PageSettings;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Pre-shared key for API authentication (required in production)
    pub api_psk: Option<String>,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Base URL of the backend REST API
    pub upstream_url: String,
    /// Bearer token sent with every backend request
    pub upstream_token: Option<String>,
    /// Timeout for a single backend request
    pub upstream_timeout: Duration,
    /// Cards added per "load more"
    pub page_size: usize,
    /// Maximum concurrent user-detail fetches per page
    pub detail_concurrency: usize,
    /// Cosmetic delay before the "load more" indicator clears
    pub load_more_delay: Duration,
    /// Delay between a successful submit and navigation back to the photo
    pub redirect_delay: Duration,
    /// Idle time after which a page is evicted
    pub page_ttl: Duration,
}

/// Parse an optional variable, warning and falling back on malformed values.
fn parse_or<T: FromStr>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid {} value {:?}, using default", name, raw);
            default
        }),
        Err(_) => default,
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, String> {
        dotenvy::dotenv().ok();

        let api_psk = env::var("TAGGER_API_PSK").ok();

        let bind_addr = env::var("TAGGER_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()
            .map_err(|e| format!("Invalid TAGGER_BIND_ADDR format: {}", e))?;

        let log_level = env::var("TAGGER_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let upstream_url = env::var("TAGGER_UPSTREAM_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:3000".to_string());
        let upstream_token = env::var("TAGGER_UPSTREAM_TOKEN")
            .ok()
            .filter(|t| !t.is_empty());

        Ok(Self {
            api_psk,
            bind_addr,
            log_level,
            upstream_url,
            upstream_token,
            upstream_timeout: Duration::from_secs(parse_or("TAGGER_UPSTREAM_TIMEOUT_SECS", 15)),
            page_size: parse_or("TAGGER_PAGE_SIZE", 12usize).max(1),
            detail_concurrency: parse_or("TAGGER_DETAIL_CONCURRENCY", 8usize).max(1),
            load_more_delay: Duration::from_millis(parse_or("TAGGER_LOAD_MORE_DELAY_MS", 200)),
            redirect_delay: Duration::from_millis(parse_or("TAGGER_REDIRECT_DELAY_MS", 1500)),
            page_ttl: Duration::from_secs(parse_or("TAGGER_PAGE_TTL_SECS", 1800)),
        })
    }

    /// Per-page tunables derived from this configuration.
    pub fn page_settings(&self) -> PageSettings {
        PageSettings {
            page_size: self.page_size,
            detail_concurrency: self.detail_concurrency,
            load_more_delay: self.load_more_delay,
            redirect_delay: self.redirect_delay,
        }
    }
}
