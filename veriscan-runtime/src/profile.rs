//! Scan profiles
//!
//! A profile is a TOML file tuning one engagement: timeouts, collector
//! toggles, API keys, interpretation. Every field has a default so an
//! absent file means a stock scan. Keys left out of the file fall back
//! to environment variables so profiles can be committed without
//! secrets.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Profile loading errors
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("Failed to read profile: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse profile: {0}")]
    Parse(#[from] toml::de::Error),
}

/// One engagement's scan configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub scan: ScanSettings,
    #[serde(default)]
    pub collectors: CollectorToggles,
    #[serde(default)]
    pub keys: ApiKeys,
    #[serde(default)]
    pub interpretation: InterpretationSettings,
}

impl Profile {
    /// Parse a TOML profile string
    pub fn from_toml(content: &str) -> Result<Self, ProfileError> {
        Ok(toml::from_str(content)?)
    }

    /// Load a profile file. A missing file means defaults; a file that
    /// exists but does not parse is an error.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ProfileError> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("No profile at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }
}

/// Timing and transport settings
#[derive(Debug, Clone, Deserialize)]
pub struct ScanSettings {
    /// Per-request HTTP timeout
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    /// Budget for a single collector
    #[serde(default = "default_collector_timeout")]
    pub collector_timeout_secs: u64,
    /// Hard ceiling over the whole fan-out
    #[serde(default = "default_scan_timeout")]
    pub scan_timeout_secs: u64,
    /// Concurrent collectors during fan-out
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,
    /// Fixed user agent; a random browser agent is used when unset
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Egress proxy, e.g. socks5h://127.0.0.1:1080
    #[serde(default)]
    pub proxy: Option<String>,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout(),
            collector_timeout_secs: default_collector_timeout(),
            scan_timeout_secs: default_scan_timeout(),
            max_concurrent: default_max_concurrent(),
            user_agent: None,
            proxy: None,
        }
    }
}

/// Fan-out collector toggles. The website collector is the bootstrap
/// step and cannot be disabled.
#[derive(Debug, Clone, Deserialize)]
pub struct CollectorToggles {
    #[serde(default = "default_enabled")]
    pub domain: bool,
    #[serde(default = "default_enabled")]
    pub search: bool,
    #[serde(default = "default_enabled")]
    pub professional: bool,
    #[serde(default = "default_enabled")]
    pub jobs: bool,
    #[serde(default = "default_enabled")]
    pub tech: bool,
    #[serde(default = "default_enabled")]
    pub filings: bool,
}

impl Default for CollectorToggles {
    fn default() -> Self {
        Self {
            domain: true,
            search: true,
            professional: true,
            jobs: true,
            tech: true,
            filings: true,
        }
    }
}

/// API keys, each with an environment-variable fallback
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiKeys {
    #[serde(default)]
    pub brave_api_key: Option<String>,
    #[serde(default)]
    pub openai_api_key: Option<String>,
    #[serde(default)]
    pub anthropic_api_key: Option<String>,
}

impl ApiKeys {
    pub fn brave(&self) -> Option<String> {
        self.brave_api_key
            .clone()
            .or_else(|| std::env::var("BRAVE_API_KEY").ok())
    }

    pub fn openai(&self) -> Option<String> {
        self.openai_api_key
            .clone()
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
    }

    pub fn anthropic(&self) -> Option<String> {
        self.anthropic_api_key
            .clone()
            .or_else(|| std::env::var("ANTHROPIC_API_KEY").ok())
    }
}

/// Narrative interpretation settings
#[derive(Debug, Clone, Deserialize)]
pub struct InterpretationSettings {
    /// Opt-in; needs an API key to do anything
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_interpret_timeout")]
    pub timeout_secs: u64,
}

impl Default for InterpretationSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            model: default_model(),
            timeout_secs: default_interpret_timeout(),
        }
    }
}

fn default_request_timeout() -> u64 {
    10
}

fn default_collector_timeout() -> u64 {
    20
}

fn default_scan_timeout() -> u64 {
    75
}

fn default_max_concurrent() -> usize {
    4
}

fn default_enabled() -> bool {
    true
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_interpret_timeout() -> u64 {
    30
}
