//! Search engine collector
//!
//! Queries the open web for the company's off-site footprint: news
//! coverage, third-party mentions, review-site presence. Uses the
//! Brave Search API when a key is configured, falling back to the
//! DuckDuckGo HTML endpoint otherwise. The professional and jobs
//! collectors run their site-scoped queries through the same searcher.

use async_trait::async_trait;
use reqwest::{Client, Url};
use scraper::{Html, Selector};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use veriscan_core::{ids, RawFinding};

use crate::{Collector, CollectorContext, CollectorOutput, SourceError};

/// Errors from search backends
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Search request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Search returned status {0}")]
    Status(u16),

    #[error("Failed to parse results: {0}")]
    Parse(String),
}

/// One web search result
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

/// Web search client with keyed and keyless backends
#[derive(Clone)]
pub struct WebSearcher {
    client: Client,
    brave_api_key: Option<String>,
    max_results: usize,
}

impl WebSearcher {
    pub fn new(client: Client, brave_api_key: Option<String>) -> Self {
        Self {
            client,
            brave_api_key,
            max_results: 10,
        }
    }

    /// Run one query against whichever backend is available
    pub async fn search(&self, query: &str) -> Result<Vec<SearchHit>, SearchError> {
        debug!("Searching: {}", query);
        match &self.brave_api_key {
            Some(key) => self.search_brave(query, key).await,
            None => self.search_duckduckgo(query).await,
        }
    }

    async fn search_brave(
        &self,
        query: &str,
        api_key: &str,
    ) -> Result<Vec<SearchHit>, SearchError> {
        let url = format!(
            "https://api.search.brave.com/res/v1/web/search?q={}&count={}",
            urlencoding::encode(query),
            self.max_results
        );

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .header("X-Subscription-Token", api_key)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SearchError::Status(response.status().as_u16()));
        }

        let data = response
            .json::<BraveSearchResponse>()
            .await
            .map_err(|e| SearchError::Parse(e.to_string()))?;

        Ok(data
            .web
            .results
            .into_iter()
            .take(self.max_results)
            .map(|r| SearchHit {
                title: r.title,
                url: r.url,
                snippet: r.description,
            })
            .collect())
    }

    async fn search_duckduckgo(&self, query: &str) -> Result<Vec<SearchHit>, SearchError> {
        let url = format!(
            "https://html.duckduckgo.com/html/?q={}",
            urlencoding::encode(query)
        );

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(SearchError::Status(response.status().as_u16()));
        }

        let html = response.text().await?;
        Ok(parse_duckduckgo_results(&html, self.max_results))
    }
}

/// Parse the DuckDuckGo HTML results page
fn parse_duckduckgo_results(html: &str, max_results: usize) -> Vec<SearchHit> {
    let document = Html::parse_document(html);
    let result_selector = Selector::parse("div.result").unwrap();
    let title_selector = Selector::parse("a.result__a").unwrap();
    let snippet_selector = Selector::parse(".result__snippet").unwrap();

    let mut hits = Vec::new();

    for result in document.select(&result_selector) {
        if hits.len() >= max_results {
            break;
        }

        let link = match result.select(&title_selector).next() {
            Some(a) => a,
            None => continue,
        };
        let href = match link.value().attr("href") {
            Some(h) => h,
            None => continue,
        };
        let url = match resolve_redirect(href) {
            Some(u) => u,
            None => continue,
        };

        let title = link.text().collect::<String>().trim().to_string();
        if title.is_empty() {
            continue;
        }

        let snippet = result
            .select(&snippet_selector)
            .next()
            .map(|s| s.text().collect::<String>().trim().to_string())
            .unwrap_or_default();

        hits.push(SearchHit {
            title,
            url,
            snippet,
        });
    }

    hits
}

/// DuckDuckGo wraps result URLs in a redirect carrying the target in `uddg`
fn resolve_redirect(href: &str) -> Option<String> {
    if let Some(start) = href.find("uddg=") {
        let tail = &href[start + 5..];
        let encoded = tail.split('&').next().unwrap_or(tail);
        return urlencoding::decode(encoded).ok().map(|s| s.into_owned());
    }
    if href.starts_with("http") {
        return Some(href.to_string());
    }
    None
}

/// Normalized host of a result URL (lowercase, no www)
pub(crate) fn host_of(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?.to_lowercase();
    Some(host.strip_prefix("www.").unwrap_or(&host).to_string())
}

/// Whether `host` is `site` or one of its subdomains
pub(crate) fn host_matches(host: &str, site: &str) -> bool {
    host == site || host.ends_with(&format!(".{}", site))
}

/// Outlets counted as news coverage
const NEWS_HOSTS: &[&str] = &[
    "techcrunch.com",
    "reuters.com",
    "bloomberg.com",
    "forbes.com",
    "wsj.com",
    "cnbc.com",
    "businessinsider.com",
    "theverge.com",
    "wired.com",
    "finance.yahoo.com",
    "businesswire.com",
    "prnewswire.com",
    "globenewswire.com",
];

/// Review platforms counted for review_presence
const REVIEW_HOSTS: &[&str] = &[
    "g2.com",
    "capterra.com",
    "trustpilot.com",
    "glassdoor.com",
    "yelp.com",
    "clutch.co",
    "softwareadvice.com",
    "gartner.com",
];

/// Third-party results needed before mentions count
const MIN_MENTIONS: usize = 2;

/// Off-site validation signals from web search
pub struct SearchCollector {
    searcher: WebSearcher,
}

impl SearchCollector {
    pub fn new(searcher: WebSearcher) -> Self {
        Self { searcher }
    }
}

#[async_trait]
impl Collector for SearchCollector {
    fn name(&self) -> &'static str {
        "search"
    }

    async fn collect(&self, ctx: &CollectorContext) -> CollectorOutput {
        let mut output = CollectorOutput::default();
        let name = ctx.query_name();

        match self.searcher.search(&format!("\"{}\" news", name)).await {
            Ok(hits) => output.findings.push(match classify_news(&hits) {
                Some(hit) => RawFinding::found(ids::NEWS_COVERAGE, hit.url.clone()),
                None => RawFinding::missing(ids::NEWS_COVERAGE),
            }),
            Err(e) => {
                warn!("News search failed for {}: {}", name, e);
                output.errors.push(SourceError::new("search", e.to_string()));
            }
        }

        match self
            .searcher
            .search(&format!("\"{}\" -site:{}", name, ctx.domain))
            .await
        {
            Ok(hits) => {
                let count = count_mentions(&hits, &ctx.domain);
                output.findings.push(if count >= MIN_MENTIONS {
                    RawFinding::found(
                        ids::THIRD_PARTY_MENTIONS,
                        format!("{} third-party results", count),
                    )
                } else {
                    RawFinding::missing(ids::THIRD_PARTY_MENTIONS)
                });
            }
            Err(e) => {
                warn!("Mentions search failed for {}: {}", name, e);
                output.errors.push(SourceError::new("search", e.to_string()));
            }
        }

        match self.searcher.search(&format!("\"{}\" reviews", name)).await {
            Ok(hits) => output.findings.push(match classify_reviews(&hits) {
                Some(hit) => RawFinding::found(ids::REVIEW_PRESENCE, hit.url.clone()),
                None => RawFinding::missing(ids::REVIEW_PRESENCE),
            }),
            Err(e) => {
                warn!("Review search failed for {}: {}", name, e);
                output.errors.push(SourceError::new("search", e.to_string()));
            }
        }

        output
    }
}

fn classify_news(hits: &[SearchHit]) -> Option<&SearchHit> {
    hits.iter().find(|h| {
        host_of(&h.url)
            .map(|host| NEWS_HOSTS.iter().any(|n| host_matches(&host, n)))
            .unwrap_or(false)
    })
}

fn classify_reviews(hits: &[SearchHit]) -> Option<&SearchHit> {
    hits.iter().find(|h| {
        host_of(&h.url)
            .map(|host| REVIEW_HOSTS.iter().any(|r| host_matches(&host, r)))
            .unwrap_or(false)
    })
}

/// Count results hosted anywhere other than the company's own domain
fn count_mentions(hits: &[SearchHit], own_domain: &str) -> usize {
    hits.iter()
        .filter(|h| {
            host_of(&h.url)
                .map(|host| !host_matches(&host, own_domain))
                .unwrap_or(false)
        })
        .count()
}

// Brave Search API response types
#[derive(Debug, Deserialize)]
struct BraveSearchResponse {
    web: BraveWebResults,
}

#[derive(Debug, Deserialize)]
struct BraveWebResults {
    results: Vec<BraveWebResult>,
}

#[derive(Debug, Deserialize)]
struct BraveWebResult {
    title: String,
    url: String,
    description: String,
}
