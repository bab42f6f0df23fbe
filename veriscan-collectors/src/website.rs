//! Website collector
//!
//! Bootstrap source. Crawls the homepage plus likely subpages and mines
//! them for on-site signals: liveness, description, contact details,
//! street address, about page, leadership mentions, social links.
//!
//! Also discovers the normalized company name that seeds every other
//! collector's queries, which is why it runs before the fan-out.

use async_trait::async_trait;
use regex::Regex;
use reqwest::{Client, Url};
use std::sync::LazyLock;
use tracing::{debug, info, warn};

use veriscan_core::{ids, RawFinding};
use veriscan_net::{fetch_page, fetch_pages, FetchedPage};

use crate::{Collector, CollectorContext, CollectorOutput, SourceError};

/// Subpages probed in addition to the homepage
const PROBE_PATHS: &[&str] = &[
    "/about",
    "/about-us",
    "/company",
    "/team",
    "/contact",
    "/careers",
];

/// Social profile hosts counted for social_media_active.
/// LinkedIn is deliberately absent, the professional collector owns it.
const SOCIAL_HOSTS: &[&str] = &[
    "twitter.com",
    "x.com",
    "facebook.com",
    "instagram.com",
    "youtube.com",
    "tiktok.com",
];

/// Title segments too generic to be a company name
const GENERIC_TITLE_WORDS: &[&str] = &["home", "homepage", "welcome", "index", "official site"];

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").unwrap()
});

static PHONE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\+?\(?\d{3}\)?[-.\s]\d{3}[-.\s]\d{4}\b").unwrap()
});

static ADDRESS_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b\d{1,5}\s+[A-Za-z][A-Za-z ]{2,40}\s+(Street|St|Avenue|Ave|Road|Rd|Boulevard|Blvd|Drive|Dr|Lane|Ln|Way|Court|Ct|Plaza|Square)\b").unwrap()
});

static LEADERSHIP_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(CEO|CTO|CFO|COO|Chief Executive|Chief Technology|Co-?Founder|Founder|President|Managing Director)\b").unwrap()
});

/// Minimum characters of about-page text before it counts
const MIN_ABOUT_TEXT: usize = 100;

/// Maximum characters of evidence kept per finding
const MAX_EVIDENCE_LENGTH: usize = 160;

/// Crawls the target's own site
pub struct WebsiteCollector {
    client: Client,
    max_concurrent: usize,
}

impl WebsiteCollector {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            max_concurrent: 4,
        }
    }
}

#[async_trait]
impl Collector for WebsiteCollector {
    fn name(&self) -> &'static str {
        "website"
    }

    async fn collect(&self, ctx: &CollectorContext) -> CollectorOutput {
        let mut output = CollectorOutput::default();

        let homepage = match fetch_page(&self.client, &ctx.url).await {
            Ok(page) => page,
            Err(e) => {
                warn!("Website fetch failed for {}: {}", ctx.url, e);
                output.errors.push(SourceError::new("fetch", e.to_string()));
                output
                    .findings
                    .push(RawFinding::missing_with_value(ids::WEBSITE_LIVE, "unreachable"));
                return output;
            }
        };

        let base = homepage.final_url.trim_end_matches('/').to_string();
        let probe_urls: Vec<String> = PROBE_PATHS
            .iter()
            .map(|path| format!("{}{}", base, path))
            .collect();
        let subpages = fetch_pages(&self.client, &probe_urls, self.max_concurrent).await;

        let (findings, company_name) = analyze(&homepage, &subpages);

        if let Some(name) = &company_name {
            info!("Website collector resolved company name: {}", name);
        }
        debug!(
            "Website collector reported {} findings from {} pages",
            findings.len(),
            1 + subpages.len()
        );

        output.findings = findings;
        output.company_name = company_name;
        output
    }
}

/// Derive all on-site findings from fetched pages. Pure, so the
/// classification rules are testable without a network.
fn analyze(homepage: &FetchedPage, subpages: &[FetchedPage]) -> (Vec<RawFinding>, Option<String>) {
    let mut findings = Vec::new();

    if homepage.ok() {
        findings.push(RawFinding::found(
            ids::WEBSITE_LIVE,
            format!("HTTP {}", homepage.status),
        ));
    } else {
        findings.push(RawFinding::missing_with_value(
            ids::WEBSITE_LIVE,
            format!("HTTP {}", homepage.status),
        ));
    }

    let company_name = homepage
        .site_name
        .clone()
        .or_else(|| homepage.title.as_deref().and_then(company_name_from_title));

    // Pages with usable text, homepage first
    let pages: Vec<&FetchedPage> = std::iter::once(homepage)
        .chain(subpages.iter())
        .filter(|p| p.ok() && !p.text.is_empty())
        .collect();

    let about = pages
        .iter()
        .find(|p| path_matches(&p.url, &["about", "company"]) && p.text.len() >= MIN_ABOUT_TEXT);

    findings.push(match about {
        Some(page) => RawFinding::found(ids::ABOUT_PAGE, page.url.clone()),
        None => RawFinding::missing(ids::ABOUT_PAGE),
    });

    let description = homepage
        .description
        .clone()
        .filter(|d| d.len() >= 40)
        .or_else(|| about.map(|p| p.text.clone()));

    findings.push(match description {
        Some(text) => RawFinding::found(ids::COMPANY_DESCRIPTION, clip_evidence(&text)),
        None => RawFinding::missing(ids::COMPANY_DESCRIPTION),
    });

    let contact = first_match(&EMAIL_REGEX, &pages).or_else(|| first_match(&PHONE_REGEX, &pages));
    findings.push(match contact {
        Some(evidence) => RawFinding::found(ids::CONTACT_INFO, evidence),
        None => RawFinding::missing(ids::CONTACT_INFO),
    });

    findings.push(match first_match(&ADDRESS_REGEX, &pages) {
        Some(evidence) => RawFinding::found(ids::PHYSICAL_ADDRESS, evidence),
        None => RawFinding::missing(ids::PHYSICAL_ADDRESS),
    });

    findings.push(match first_match(&LEADERSHIP_REGEX, &pages) {
        Some(evidence) => RawFinding::found(ids::LEADERSHIP_ON_SITE, evidence),
        None => RawFinding::missing(ids::LEADERSHIP_ON_SITE),
    });

    findings.push(match social_link(&pages) {
        Some(link) => RawFinding::found(ids::SOCIAL_MEDIA_ACTIVE, link),
        None => RawFinding::missing(ids::SOCIAL_MEDIA_ACTIVE),
    });

    (findings, company_name)
}

/// Take the first title segment that looks like a name rather than
/// boilerplate ("Acme Corp | Industrial Widgets" -> "Acme Corp")
fn company_name_from_title(title: &str) -> Option<String> {
    let mut segments: Vec<&str> = vec![title];
    for sep in [" | ", " – ", " — ", " - ", ": "] {
        let split: Vec<&str> = segments.iter().flat_map(|s| s.split(sep)).collect();
        segments = split;
    }

    segments
        .into_iter()
        .map(str::trim)
        .filter(|s| s.len() >= 2)
        .find(|s| !GENERIC_TITLE_WORDS.contains(&s.to_lowercase().as_str()))
        .map(str::to_string)
}

fn path_matches(url: &str, keywords: &[&str]) -> bool {
    match Url::parse(url) {
        Ok(parsed) => {
            let path = parsed.path().to_lowercase();
            keywords.iter().any(|k| path.contains(k))
        }
        Err(_) => false,
    }
}

fn first_match(regex: &Regex, pages: &[&FetchedPage]) -> Option<String> {
    pages
        .iter()
        .find_map(|p| regex.find(&p.text).map(|m| m.as_str().to_string()))
}

fn social_link(pages: &[&FetchedPage]) -> Option<String> {
    pages
        .iter()
        .flat_map(|p| p.links.iter())
        .find(|link| {
            Url::parse(link)
                .ok()
                .and_then(|u| u.host_str().map(|h| h.to_lowercase()))
                .map(|host| {
                    SOCIAL_HOSTS
                        .iter()
                        .any(|s| host == *s || host.ends_with(&format!(".{}", s)))
                })
                .unwrap_or(false)
        })
        .cloned()
}

fn clip_evidence(text: &str) -> String {
    text.chars().take(MAX_EVIDENCE_LENGTH).collect()
}
