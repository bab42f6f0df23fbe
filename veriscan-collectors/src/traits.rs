//! Common types for footprint collectors

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use veriscan_core::{FinancialSnapshot, RawFinding};

/// A non-fatal problem hit while querying a data source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceError {
    /// Short machine-readable code (e.g. "http", "timeout", "parse")
    pub code: String,
    pub message: String,
    /// Collector errors never abort a scan
    pub recoverable: bool,
}

impl SourceError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            recoverable: true,
        }
    }
}

/// Scan target handed to every collector
#[derive(Debug, Clone)]
pub struct CollectorContext {
    /// Normalized target URL
    pub url: String,
    /// Bare registrable domain (no scheme, no www)
    pub domain: String,
    /// Company name, written once by the bootstrap step before fan-out
    pub company_name: Option<String>,
}

impl CollectorContext {
    pub fn new(url: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            domain: domain.into(),
            company_name: None,
        }
    }

    /// Name to seed search queries with, falling back to the domain
    pub fn query_name(&self) -> &str {
        self.company_name.as_deref().unwrap_or(&self.domain)
    }
}

/// Everything one collector produced for a scan
#[derive(Debug, Clone, Default)]
pub struct CollectorOutput {
    pub findings: Vec<RawFinding>,
    pub errors: Vec<SourceError>,
    /// Normalized company name (website collector only)
    pub company_name: Option<String>,
    /// Filing-registry facts (filings collector only)
    pub financial: Option<FinancialSnapshot>,
}

impl CollectorOutput {
    /// Output carrying a single error and no findings
    pub fn from_error(error: SourceError) -> Self {
        Self {
            errors: vec![error],
            ..Self::default()
        }
    }
}

/// Common interface for footprint collectors
///
/// A collector checks the signals it owns and omits the ids it could
/// not reach; omitted signals default to not-found in the merger. No
/// two collectors report the same signal id.
#[async_trait]
pub trait Collector: Send + Sync {
    /// Name used in logs and issue records
    fn name(&self) -> &'static str;

    /// Gather raw findings for the target
    async fn collect(&self, ctx: &CollectorContext) -> CollectorOutput;
}
