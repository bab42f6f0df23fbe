//! Technology fingerprint collector
//!
//! Fetches the homepage over https. A completed TLS handshake counts
//! as ssl_certificate whatever the status code; the served HTML is
//! then matched against a marker table for tech_stack_detected.

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use veriscan_core::{ids, RawFinding};

use crate::{Collector, CollectorContext, CollectorOutput, SourceError};

/// Marker substring (lowercase) to product name
const FINGERPRINTS: &[(&str, &str)] = &[
    ("googletagmanager.com", "Google Tag Manager"),
    ("google-analytics.com", "Google Analytics"),
    ("gtag(", "Google Analytics"),
    ("wp-content", "WordPress"),
    ("wp-includes", "WordPress"),
    ("cdn.shopify.com", "Shopify"),
    ("squarespace", "Squarespace"),
    ("wixstatic", "Wix"),
    ("webflow", "Webflow"),
    ("hubspot", "HubSpot"),
    ("cdn.segment.com", "Segment"),
    ("intercom", "Intercom"),
    ("js.stripe.com", "Stripe"),
    ("cloudflareinsights", "Cloudflare Analytics"),
    ("marketo", "Marketo"),
];

/// Most stack names kept as evidence
const MAX_STACK_NAMES: usize = 5;

/// TLS and stack fingerprinting
pub struct TechCollector {
    client: Client,
}

impl TechCollector {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Collector for TechCollector {
    fn name(&self) -> &'static str {
        "tech"
    }

    async fn collect(&self, ctx: &CollectorContext) -> CollectorOutput {
        let mut output = CollectorOutput::default();
        let url = format!("https://{}/", ctx.domain);

        let response = match self.client.get(&url).send().await {
            Ok(r) => r,
            Err(e) => {
                // The failed handshake is itself the observation
                warn!("https fetch failed for {}: {}", ctx.domain, e);
                output.findings.push(RawFinding::missing_with_value(
                    ids::SSL_CERTIFICATE,
                    "https unreachable",
                ));
                output.errors.push(SourceError::new("https", e.to_string()));
                return output;
            }
        };

        output
            .findings
            .push(RawFinding::found(ids::SSL_CERTIFICATE, "valid https"));

        if !response.status().is_success() {
            debug!("{} answered https with status {}", ctx.domain, response.status());
            output.findings.push(RawFinding::missing(ids::TECH_STACK_DETECTED));
            return output;
        }

        match response.text().await {
            Ok(html) => {
                let stack = detect_stack(&html);
                debug!("Detected {} stack markers for {}", stack.len(), ctx.domain);
                output.findings.push(if stack.is_empty() {
                    RawFinding::missing(ids::TECH_STACK_DETECTED)
                } else {
                    RawFinding::found(ids::TECH_STACK_DETECTED, stack.join(", "))
                });
            }
            Err(e) => {
                warn!("Failed to read homepage body for {}: {}", ctx.domain, e);
                output.errors.push(SourceError::new("http", e.to_string()));
            }
        }

        output
    }
}

/// Product names whose markers appear in the HTML, first-seen order
fn detect_stack(html: &str) -> Vec<&'static str> {
    let haystack = html.to_lowercase();
    let mut names: Vec<&'static str> = Vec::new();

    for (marker, name) in FINGERPRINTS {
        if names.len() >= MAX_STACK_NAMES {
            break;
        }
        if haystack.contains(marker) && !names.contains(name) {
            names.push(name);
        }
    }

    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_stack() {
        let html = r#"
            <html><head>
            <script src="https://www.googletagmanager.com/gtm.js"></script>
            <script>gtag('config', 'G-XYZ');</script>
            <link rel="stylesheet" href="/wp-content/themes/acme/style.css">
            <script src="/wp-includes/js/jquery.js"></script>
            </head><body></body></html>
        "#;

        let stack = detect_stack(html);
        assert_eq!(
            stack,
            vec!["Google Tag Manager", "Google Analytics", "WordPress"]
        );
    }

    #[test]
    fn test_detect_stack_empty() {
        assert!(detect_stack("<html><body>plain</body></html>").is_empty());
    }

    #[test]
    fn test_detect_stack_caps_names() {
        let html = "googletagmanager.com google-analytics.com wp-content cdn.shopify.com \
                    squarespace wixstatic webflow hubspot";
        assert_eq!(detect_stack(html).len(), MAX_STACK_NAMES);
    }
}
