//! Domain registry collector
//!
//! Looks the target domain up over RDAP (rdap.org bootstrap service)
//! and derives domain age from the registration event. Age only counts
//! toward the score at two years or more; younger domains still report
//! their age as evidence so the new-domain penalty can see it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use veriscan_core::{ids, RawFinding};

use crate::{Collector, CollectorContext, CollectorOutput, SourceError};

/// Years of registration history before domain_age counts
const MIN_AGE_YEARS: i64 = 2;

/// Queries RDAP for registration facts
pub struct DomainCollector {
    client: Client,
}

impl DomainCollector {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Collector for DomainCollector {
    fn name(&self) -> &'static str {
        "domain"
    }

    async fn collect(&self, ctx: &CollectorContext) -> CollectorOutput {
        let url = format!("https://rdap.org/domain/{}", ctx.domain);
        debug!("RDAP lookup: {}", url);

        let response = match self.client.get(&url).send().await {
            Ok(r) => r,
            Err(e) => {
                warn!("RDAP request failed for {}: {}", ctx.domain, e);
                return CollectorOutput::from_error(SourceError::new("rdap", e.to_string()));
            }
        };

        if !response.status().is_success() {
            warn!("RDAP returned status {} for {}", response.status(), ctx.domain);
            return CollectorOutput::from_error(SourceError::new(
                "rdap",
                format!("status {}", response.status()),
            ));
        }

        let body = match response.json::<RdapResponse>().await {
            Ok(b) => b,
            Err(e) => {
                warn!("Failed to parse RDAP response for {}: {}", ctx.domain, e);
                return CollectorOutput::from_error(SourceError::new("parse", e.to_string()));
            }
        };

        let mut output = CollectorOutput::default();
        match registration_date(&body) {
            Some(registered) => {
                let finding = age_finding(registered, Utc::now());
                debug!(
                    "Domain {} registered {}, reported {:?}",
                    ctx.domain, registered, finding.value
                );
                output.findings.push(finding);
            }
            None => {
                debug!("RDAP response for {} has no registration event", ctx.domain);
                output
                    .errors
                    .push(SourceError::new("rdap", "no registration event"));
            }
        }
        output
    }
}

fn registration_date(body: &RdapResponse) -> Option<DateTime<Utc>> {
    body.events
        .iter()
        .find(|e| e.event_action == "registration")
        .and_then(|e| DateTime::parse_from_rfc3339(&e.event_date).ok())
        .map(|d| d.with_timezone(&Utc))
}

fn age_finding(registered: DateTime<Utc>, now: DateTime<Utc>) -> RawFinding {
    let age_years = now.signed_duration_since(registered).num_days() / 365;

    if age_years >= MIN_AGE_YEARS {
        RawFinding::found(ids::DOMAIN_AGE, format_age(age_years))
    } else {
        RawFinding::missing_with_value(ids::DOMAIN_AGE, format_age(age_years))
    }
}

fn format_age(years: i64) -> String {
    match years {
        n if n < 1 => "< 1 year".to_string(),
        1 => "1 year".to_string(),
        n => format!("{} years", n),
    }
}

// RDAP response types
#[derive(Debug, Deserialize)]
struct RdapResponse {
    #[serde(default)]
    events: Vec<RdapEvent>,
}

#[derive(Debug, Deserialize)]
struct RdapEvent {
    #[serde(rename = "eventAction")]
    event_action: String,
    #[serde(rename = "eventDate")]
    event_date: String,
}
