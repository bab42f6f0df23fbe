//! HTTP client builder
//!
//! Creates clients for public-web fetching. Redirects are followed so
//! apex/www aliases land on the canonical page.

use reqwest::{Client, Proxy};
use std::time::Duration;
use thiserror::Error;

/// Web client configuration
#[derive(Debug, Clone)]
pub struct WebConfig {
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Optional egress proxy (e.g. socks5h://127.0.0.1:1080)
    pub proxy_addr: Option<String>,
    /// Fixed user agent; a random browser agent is used when unset
    pub user_agent: Option<String>,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            proxy_addr: None,
            user_agent: None,
        }
    }
}

/// Errors from web networking
#[derive(Debug, Error)]
pub enum WebError {
    #[error("Failed to build web client: {0}")]
    ClientBuild(String),

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// User agents for rotation
const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/135.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/135.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/135.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:137.0) Gecko/20100101 Firefox/137.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 14.7; rv:137.0) Gecko/20100101 Firefox/137.0",
];

/// Get a random user agent
pub fn random_user_agent() -> &'static str {
    use rand::Rng;
    let idx = rand::thread_rng().gen_range(0..USER_AGENTS.len());
    USER_AGENTS[idx]
}

/// Create an HTTP client for footprint fetching
pub fn create_web_client(config: &WebConfig) -> Result<Client, WebError> {
    let mut builder = Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .user_agent(
            config
                .user_agent
                .as_deref()
                .unwrap_or_else(|| random_user_agent()),
        );

    if let Some(addr) = &config.proxy_addr {
        let proxy = Proxy::all(addr).map_err(|e| WebError::ClientBuild(e.to_string()))?;
        builder = builder.proxy(proxy);
    }

    builder
        .build()
        .map_err(|e| WebError::ClientBuild(e.to_string()))
}
