//! Job boards collector
//!
//! Checks hiring activity with one combined site-scoped query across
//! the major boards. Any board hit counts as active job postings.

use async_trait::async_trait;
use reqwest::Url;
use tracing::warn;

use veriscan_core::{ids, RawFinding};

use crate::search::{host_matches, host_of, SearchHit, WebSearcher};
use crate::{Collector, CollectorContext, CollectorOutput, SourceError};

/// Hosts treated as job boards
const JOB_BOARD_HOSTS: &[&str] = &[
    "greenhouse.io",
    "lever.co",
    "indeed.com",
    "wellfound.com",
    "ziprecruiter.com",
];

/// Job-board presence
pub struct JobsCollector {
    searcher: WebSearcher,
}

impl JobsCollector {
    pub fn new(searcher: WebSearcher) -> Self {
        Self { searcher }
    }
}

#[async_trait]
impl Collector for JobsCollector {
    fn name(&self) -> &'static str {
        "jobs"
    }

    async fn collect(&self, ctx: &CollectorContext) -> CollectorOutput {
        let name = ctx.query_name();
        let query = format!(
            "\"{}\" jobs (site:greenhouse.io OR site:lever.co OR site:indeed.com OR site:linkedin.com/jobs)",
            name
        );

        match self.searcher.search(&query).await {
            Ok(hits) => {
                let mut output = CollectorOutput::default();
                output.findings.push(match first_board_hit(&hits) {
                    Some(hit) => RawFinding::found(ids::JOB_POSTINGS, hit.url.clone()),
                    None => RawFinding::missing(ids::JOB_POSTINGS),
                });
                output
            }
            Err(e) => {
                warn!("Job board search failed for {}: {}", name, e);
                CollectorOutput::from_error(SourceError::new("search", e.to_string()))
            }
        }
    }
}

fn is_job_board(url: &str) -> bool {
    let host = match host_of(url) {
        Some(h) => h,
        None => return false,
    };

    if JOB_BOARD_HOSTS.iter().any(|b| host_matches(&host, b)) {
        return true;
    }

    // LinkedIn only counts under its jobs section
    host_matches(&host, "linkedin.com")
        && Url::parse(url)
            .map(|u| u.path().to_lowercase().starts_with("/jobs"))
            .unwrap_or(false)
}

fn first_board_hit(hits: &[SearchHit]) -> Option<&SearchHit> {
    hits.iter().find(|h| is_job_board(&h.url))
}
