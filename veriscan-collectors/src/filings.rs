//! Financial filings collector
//!
//! Queries the SEC EDGAR full-text search API for filings naming the
//! company. Any filing hit counts as business_registration and also
//! yields a financial snapshot; zero hits is a normal answer for a
//! private company, not an error.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use veriscan_core::{ids, FinancialSnapshot, RawFinding};

use crate::{Collector, CollectorContext, CollectorOutput, SourceError};

static CIK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"CIK (\d{4,10})").unwrap());

/// SEC EDGAR registration lookup
pub struct FilingsCollector {
    client: Client,
}

impl FilingsCollector {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Collector for FilingsCollector {
    fn name(&self) -> &'static str {
        "filings"
    }

    async fn collect(&self, ctx: &CollectorContext) -> CollectorOutput {
        let name = ctx.query_name();
        let url = format!(
            "https://efts.sec.gov/LATEST/search-index?q=%22{}%22",
            urlencoding::encode(name)
        );

        let response = match self.client.get(&url).send().await {
            Ok(r) => r,
            Err(e) => {
                warn!("EDGAR request failed for {}: {}", name, e);
                return CollectorOutput::from_error(SourceError::new("edgar", e.to_string()));
            }
        };

        if !response.status().is_success() {
            warn!("EDGAR returned status {} for {}", response.status(), name);
            return CollectorOutput::from_error(SourceError::new(
                "edgar",
                format!("status {}", response.status()),
            ));
        }

        match response.json::<EdgarSearchResponse>().await {
            Ok(parsed) => {
                debug!("EDGAR reported {} filings for {}", parsed.hits.total.value, name);
                let mut output = CollectorOutput::default();
                let (finding, snapshot) = filings_finding(&parsed);
                output.findings.push(finding);
                output.financial = snapshot;
                output
            }
            Err(e) => {
                warn!("Failed to parse EDGAR response for {}: {}", name, e);
                CollectorOutput::from_error(SourceError::new("parse", e.to_string()))
            }
        }
    }
}

/// Registration finding plus snapshot when filings exist
fn filings_finding(response: &EdgarSearchResponse) -> (RawFinding, Option<FinancialSnapshot>) {
    let total = response.hits.total.value;
    if total == 0 {
        return (RawFinding::missing(ids::BUSINESS_REGISTRATION), None);
    }

    let latest = response.hits.hits.first().map(|h| &h.source);
    let snapshot = FinancialSnapshot {
        registry: "SEC EDGAR".to_string(),
        total_filings: total,
        latest_filing_type: latest.and_then(|f| f.file_type.clone()),
        latest_filing_date: latest.and_then(|f| f.file_date.clone()),
        entity_id: latest.and_then(|f| extract_cik(&f.display_names)),
    };

    (
        RawFinding::found(ids::BUSINESS_REGISTRATION, filings_label(total)),
        Some(snapshot),
    )
}

fn filings_label(total: u32) -> String {
    if total == 1 {
        "1 SEC filing".to_string()
    } else {
        format!("{} SEC filings", total)
    }
}

/// EDGAR embeds the CIK in display names like "Acme Corp (CIK 0001234567)"
fn extract_cik(display_names: &[String]) -> Option<String> {
    let first = display_names.first()?;
    CIK_REGEX
        .captures(first)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

#[derive(Debug, Deserialize)]
struct EdgarSearchResponse {
    hits: EdgarHits,
}

#[derive(Debug, Deserialize)]
struct EdgarHits {
    total: EdgarTotal,
    #[serde(default)]
    hits: Vec<EdgarHit>,
}

#[derive(Debug, Deserialize)]
struct EdgarTotal {
    value: u32,
}

#[derive(Debug, Deserialize)]
struct EdgarHit {
    #[serde(rename = "_source")]
    source: EdgarFiling,
}

#[derive(Debug, Deserialize)]
struct EdgarFiling {
    #[serde(default)]
    file_type: Option<String>,
    #[serde(default)]
    file_date: Option<String>,
    #[serde(default)]
    display_names: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"{
        "hits": {
            "total": {"value": 3, "relation": "eq"},
            "hits": [
                {
                    "_id": "0000320193-23-000106",
                    "_source": {
                        "file_type": "10-K",
                        "file_date": "2023-11-03",
                        "display_names": ["Acme Corp  (ACME)  (CIK 0000320193)"]
                    }
                }
            ]
        }
    }"#;

    #[test]
    fn test_parse_edgar_response() {
        let parsed: EdgarSearchResponse = serde_json::from_str(FIXTURE).unwrap();
        assert_eq!(parsed.hits.total.value, 3);
        assert_eq!(parsed.hits.hits[0].source.file_type.as_deref(), Some("10-K"));
    }

    #[test]
    fn test_filings_found_with_snapshot() {
        let parsed: EdgarSearchResponse = serde_json::from_str(FIXTURE).unwrap();
        let (finding, snapshot) = filings_finding(&parsed);

        assert_eq!(finding.id, ids::BUSINESS_REGISTRATION);
        assert!(finding.found);
        assert_eq!(finding.value.as_deref(), Some("3 SEC filings"));

        let snapshot = snapshot.unwrap();
        assert_eq!(snapshot.registry, "SEC EDGAR");
        assert_eq!(snapshot.total_filings, 3);
        assert_eq!(snapshot.latest_filing_type.as_deref(), Some("10-K"));
        assert_eq!(snapshot.entity_id.as_deref(), Some("0000320193"));
    }

    #[test]
    fn test_no_filings_is_missing_not_error() {
        let parsed: EdgarSearchResponse =
            serde_json::from_str(r#"{"hits": {"total": {"value": 0}, "hits": []}}"#).unwrap();
        let (finding, snapshot) = filings_finding(&parsed);

        assert_eq!(finding.id, ids::BUSINESS_REGISTRATION);
        assert!(!finding.found);
        assert!(snapshot.is_none());
    }

    #[test]
    fn test_filings_label_singular() {
        assert_eq!(filings_label(1), "1 SEC filing");
        assert_eq!(filings_label(12), "12 SEC filings");
    }

    #[test]
    fn test_extract_cik_absent() {
        assert!(extract_cik(&["Acme Corp".to_string()]).is_none());
        assert!(extract_cik(&[]).is_none());
    }
}
