//! Page fetching
//!
//! Fetches and extracts pages from the public web, with concurrent
//! fan-out over URL lists and content-hash dedup of aliased pages.

use futures::stream::{self, StreamExt};
use reqwest::{Client, Url};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use tracing::{debug, warn};

use crate::client::WebError;
use crate::html::extract_content;

/// A fetched and extracted page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// URL as requested
    pub url: String,
    /// URL after redirects
    pub final_url: String,
    /// HTTP status code
    pub status: u16,
    /// Page title (if found)
    pub title: Option<String>,
    /// og:site_name (if found)
    pub site_name: Option<String>,
    /// Meta description (if found)
    pub description: Option<String>,
    /// Visible text content
    pub text: String,
    /// Absolute links found on the page
    pub links: Vec<String>,
    /// SHA-256 of the extracted text, used to spot aliased pages
    pub content_hash: String,
    /// Character count of retained text
    pub char_count: usize,
    /// Whether content was truncated
    pub truncated: bool,
}

impl FetchedPage {
    /// Whether the fetch returned a 2xx response
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    fn empty(url: &str, final_url: String, status: u16) -> Self {
        Self {
            url: url.to_string(),
            final_url,
            status,
            title: None,
            site_name: None,
            description: None,
            text: String::new(),
            links: Vec::new(),
            content_hash: page_hash(""),
            char_count: 0,
            truncated: false,
        }
    }
}

/// Maximum characters of visible text to retain per page
const MAX_CONTENT_LENGTH: usize = 8000;

/// Fetch one URL and extract its content
pub async fn fetch_page(client: &Client, url: &str) -> Result<FetchedPage, WebError> {
    let parsed = Url::parse(url).map_err(|_| WebError::InvalidUrl(url.to_string()))?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(WebError::InvalidUrl(url.to_string()));
    }

    debug!("Fetching: {}", url);

    let response = client.get(parsed).send().await?;
    let status = response.status().as_u16();
    let final_url = response.url().to_string();

    if !(200..300).contains(&status) {
        warn!("Fetch of {} returned status: {}", url, status);
        return Ok(FetchedPage::empty(url, final_url, status));
    }

    let html = response.text().await?;
    let content = extract_content(&html, &final_url);
    let (text, truncated) = truncate_text(content.text, MAX_CONTENT_LENGTH);

    Ok(FetchedPage {
        url: url.to_string(),
        final_url,
        status,
        title: content.title,
        site_name: content.site_name,
        description: content.description,
        content_hash: page_hash(&text),
        char_count: text.chars().count(),
        text,
        links: content.links,
        truncated,
    })
}

/// Fetch multiple URLs concurrently
///
/// Failures are logged and skipped; pages serving identical text are
/// collapsed to the first one fetched.
pub async fn fetch_pages(
    client: &Client,
    urls: &[String],
    max_concurrent: usize,
) -> Vec<FetchedPage> {
    let pages: Vec<FetchedPage> = stream::iter(urls.to_vec())
        .map(|url| {
            let client = client.clone();
            async move {
                match fetch_page(&client, &url).await {
                    Ok(page) => Some(page),
                    Err(e) => {
                        warn!("Failed to fetch {}: {}", url, e);
                        None
                    }
                }
            }
        })
        .buffer_unordered(max_concurrent)
        .filter_map(|x| async { x })
        .collect()
        .await;

    dedup_pages(pages)
}

/// Drop pages whose extracted text duplicates an earlier page.
/// Empty pages (error statuses) are kept so callers can still see
/// which URLs answered.
fn dedup_pages(pages: Vec<FetchedPage>) -> Vec<FetchedPage> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut deduped = Vec::new();

    for page in pages {
        if !page.text.is_empty() && !seen.insert(page.content_hash.clone()) {
            debug!("Skipping duplicate content at {}", page.url);
            continue;
        }
        deduped.push(page);
    }

    deduped
}

fn truncate_text(text: String, max_chars: usize) -> (String, bool) {
    if text.chars().count() <= max_chars {
        return (text, false);
    }
    let kept: String = text.chars().take(max_chars).collect();
    (format!("{}...(truncated)", kept), true)
}

fn page_hash(text: &str) -> String {
    format!("{:x}", Sha256::digest(text.as_bytes()))
}
