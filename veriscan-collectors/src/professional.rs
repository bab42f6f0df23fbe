//! Professional network collector
//!
//! Site-scoped LinkedIn searches through the shared searcher:
//! - company page presence (and employee range from its snippet)
//! - executive profile presence
//! - founder background material anywhere on the web

use async_trait::async_trait;
use regex::Regex;
use reqwest::Url;
use std::sync::LazyLock;
use tracing::warn;

use veriscan_core::{ids, RawFinding};

use crate::search::{host_matches, host_of, SearchHit, WebSearcher};
use crate::{Collector, CollectorContext, CollectorOutput, SourceError};

static EMPLOYEE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b\d[\d,]*(?:\s*[-–]\s*\d[\d,]*)?\+?\s+employees\b").unwrap()
});

/// LinkedIn company/executive presence
pub struct ProfessionalCollector {
    searcher: WebSearcher,
}

impl ProfessionalCollector {
    pub fn new(searcher: WebSearcher) -> Self {
        Self { searcher }
    }
}

#[async_trait]
impl Collector for ProfessionalCollector {
    fn name(&self) -> &'static str {
        "professional"
    }

    async fn collect(&self, ctx: &CollectorContext) -> CollectorOutput {
        let mut output = CollectorOutput::default();
        let name = ctx.query_name();

        match self
            .searcher
            .search(&format!("site:linkedin.com/company \"{}\"", name))
            .await
        {
            Ok(hits) => {
                match find_company_page(&hits) {
                    Some(hit) => {
                        output
                            .findings
                            .push(RawFinding::found(ids::LINKEDIN_COMPANY, hit.url.clone()));
                    }
                    None => output.findings.push(RawFinding::missing(ids::LINKEDIN_COMPANY)),
                }

                output.findings.push(match employee_evidence(&hits) {
                    Some(evidence) => RawFinding::found(ids::EMPLOYEE_COUNT_PUBLIC, evidence),
                    None => RawFinding::missing(ids::EMPLOYEE_COUNT_PUBLIC),
                });
            }
            Err(e) => {
                warn!("LinkedIn company search failed for {}: {}", name, e);
                output.errors.push(SourceError::new("search", e.to_string()));
            }
        }

        match self
            .searcher
            .search(&format!(
                "site:linkedin.com/in \"{}\" (CEO OR founder OR CTO)",
                name
            ))
            .await
        {
            Ok(hits) => {
                let count = count_executive_profiles(&hits);
                output.findings.push(if count > 0 {
                    RawFinding::found(
                        ids::EXECUTIVES_FOUND,
                        format!("{} executive profile(s)", count),
                    )
                } else {
                    RawFinding::missing(ids::EXECUTIVES_FOUND)
                });
            }
            Err(e) => {
                warn!("Executive search failed for {}: {}", name, e);
                output.errors.push(SourceError::new("search", e.to_string()));
            }
        }

        match self
            .searcher
            .search(&format!(
                "\"{}\" founder (interview OR biography OR profile)",
                name
            ))
            .await
        {
            Ok(hits) => output.findings.push(match find_founder_evidence(&hits) {
                Some(hit) => RawFinding::found(ids::FOUNDER_BACKGROUND, hit.url.clone()),
                None => RawFinding::missing(ids::FOUNDER_BACKGROUND),
            }),
            Err(e) => {
                warn!("Founder search failed for {}: {}", name, e);
                output.errors.push(SourceError::new("search", e.to_string()));
            }
        }

        output
    }
}

fn is_linkedin_path(url: &str, segment: &str) -> bool {
    let on_linkedin = host_of(url)
        .map(|h| host_matches(&h, "linkedin.com"))
        .unwrap_or(false);

    on_linkedin
        && Url::parse(url)
            .map(|u| u.path().to_lowercase().contains(segment))
            .unwrap_or(false)
}

fn find_company_page(hits: &[SearchHit]) -> Option<&SearchHit> {
    hits.iter().find(|h| is_linkedin_path(&h.url, "/company/"))
}

fn count_executive_profiles(hits: &[SearchHit]) -> usize {
    hits.iter()
        .filter(|h| is_linkedin_path(&h.url, "/in/"))
        .count()
}

/// Employee range published on the company page, e.g. "51-200 employees"
fn employee_evidence(hits: &[SearchHit]) -> Option<String> {
    hits.iter().find_map(|h| {
        EMPLOYEE_REGEX
            .find(&h.snippet)
            .map(|m| m.as_str().to_string())
    })
}

fn find_founder_evidence(hits: &[SearchHit]) -> Option<&SearchHit> {
    hits.iter().find(|h| {
        h.title.to_lowercase().contains("founder") || h.snippet.to_lowercase().contains("founder")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(url: &str, title: &str, snippet: &str) -> SearchHit {
        SearchHit {
            title: title.to_string(),
            url: url.to_string(),
            snippet: snippet.to_string(),
        }
    }

    #[test]
    fn test_find_company_page() {
        let hits = vec![
            hit("https://www.linkedin.com/in/jane-smith", "Jane Smith", ""),
            hit(
                "https://www.linkedin.com/company/acme-corp",
                "Acme Corp | LinkedIn",
                "",
            ),
        ];

        let page = find_company_page(&hits).unwrap();
        assert!(page.url.contains("/company/"));
    }

    #[test]
    fn test_company_page_requires_linkedin_host() {
        let hits = vec![hit(
            "https://fake.example.com/company/acme",
            "Acme",
            "",
        )];
        assert!(find_company_page(&hits).is_none());
    }

    #[test]
    fn test_count_executive_profiles() {
        let hits = vec![
            hit("https://www.linkedin.com/in/jane-ceo", "Jane - CEO", ""),
            hit("https://www.linkedin.com/in/bob-cto", "Bob - CTO", ""),
            hit("https://www.linkedin.com/company/acme", "Acme", ""),
        ];

        assert_eq!(count_executive_profiles(&hits), 2);
    }

    #[test]
    fn test_employee_evidence() {
        let hits = vec![hit(
            "https://www.linkedin.com/company/acme",
            "Acme Corp | LinkedIn",
            "Acme Corp | 1,024 followers on LinkedIn. Widgets. | 51-200 employees",
        )];

        assert_eq!(employee_evidence(&hits), Some("51-200 employees".to_string()));
        assert!(employee_evidence(&[hit("https://x.example", "t", "no sizes")]).is_none());
    }

    #[test]
    fn test_find_founder_evidence() {
        let hits = vec![hit(
            "https://podcast.example.com/ep42",
            "Interview with Acme's founder",
            "",
        )];
        assert!(find_founder_evidence(&hits).is_some());
        assert!(find_founder_evidence(&[hit("https://x.example", "Acme widgets", "catalog")])
            .is_none());
    }
}
