//! Scan orchestration
//!
//! One scan is a sequential bootstrap crawl followed by a concurrent
//! fan-out. The website collector runs first so the company name it
//! extracts can seed every downstream query; the remaining collectors
//! run concurrently, each under its own budget, with a hard deadline
//! over the whole fan-out. Collector failures cost coverage, never the
//! scan; the only fatal error is a target that cannot be parsed.

use std::collections::HashSet;
use std::time::Duration;

use chrono::Utc;
use futures::{stream, StreamExt};
use reqwest::{Client, Url};
use thiserror::Error;
use tracing::{debug, info, warn};

use veriscan_collectors::{
    interpret_result, Collector, CollectorContext, CollectorOutput, DomainCollector,
    FilingsCollector, JobsCollector, ProfessionalCollector, SearchCollector, SharedInterpreter,
    SourceError, TechCollector, WebSearcher, WebsiteCollector,
};
use veriscan_core::{merge_findings, FinancialSnapshot, RawFinding, ScanIssue, ScanResult};
use veriscan_net::{create_web_client, WebConfig};

use crate::Profile;

/// Scan-fatal errors. Everything else degrades into ScanIssues on the
/// result.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    #[error("Engine setup failed: {0}")]
    Setup(String),
}

/// Normalized scan target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanTarget {
    pub url: String,
    pub domain: String,
}

/// Accept a full URL or a bare domain. The scheme defaults to https;
/// the domain drops any www. prefix.
pub fn normalize_target(input: &str) -> Result<ScanTarget, ScanError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ScanError::InvalidTarget("empty target".to_string()));
    }

    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    let parsed = Url::parse(&candidate)
        .map_err(|e| ScanError::InvalidTarget(format!("{}: {}", trimmed, e)))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ScanError::InvalidTarget(format!(
            "unsupported scheme '{}'",
            parsed.scheme()
        )));
    }

    let host = parsed
        .host_str()
        .ok_or_else(|| ScanError::InvalidTarget(format!("{}: no host", trimmed)))?;
    if !host.contains('.') {
        return Err(ScanError::InvalidTarget(format!(
            "'{}' is not a public domain",
            host
        )));
    }

    let domain = host.trim_start_matches("www.").to_lowercase();

    Ok(ScanTarget {
        url: parsed.to_string(),
        domain,
    })
}

/// Display name from the domain's first label
/// ("acme-robotics.com" -> "Acme Robotics").
fn company_name_from_domain(domain: &str) -> String {
    let label = domain.split('.').next().unwrap_or(domain);
    let name = label
        .split('-')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ");

    if name.is_empty() {
        domain.to_string()
    } else {
        name
    }
}

/// Drives one scan end to end
pub struct ScanEngine {
    profile: Profile,
    client: Client,
    searcher: WebSearcher,
    interpreter: Option<SharedInterpreter>,
}

impl ScanEngine {
    /// Build the shared HTTP plumbing from a profile. The interpreter
    /// is injected by the caller since provider selection is a front
    /// end concern.
    pub fn new(
        profile: Profile,
        interpreter: Option<SharedInterpreter>,
    ) -> Result<Self, ScanError> {
        let web_config = WebConfig {
            timeout_secs: profile.scan.request_timeout_secs,
            proxy_addr: profile.scan.proxy.clone(),
            user_agent: profile.scan.user_agent.clone(),
        };
        let client =
            create_web_client(&web_config).map_err(|e| ScanError::Setup(e.to_string()))?;
        let searcher = WebSearcher::new(client.clone(), profile.keys.brave());

        Ok(Self {
            profile,
            client,
            searcher,
            interpreter,
        })
    }

    /// The fan-out set after the bootstrap step, per profile toggles
    fn fanout_collectors(&self) -> Vec<Box<dyn Collector>> {
        let toggles = &self.profile.collectors;
        let mut collectors: Vec<Box<dyn Collector>> = Vec::new();

        if toggles.domain {
            collectors.push(Box::new(DomainCollector::new(self.client.clone())));
        }
        if toggles.search {
            collectors.push(Box::new(SearchCollector::new(self.searcher.clone())));
        }
        if toggles.professional {
            collectors.push(Box::new(ProfessionalCollector::new(self.searcher.clone())));
        }
        if toggles.jobs {
            collectors.push(Box::new(JobsCollector::new(self.searcher.clone())));
        }
        if toggles.tech {
            collectors.push(Box::new(TechCollector::new(self.client.clone())));
        }
        if toggles.filings {
            collectors.push(Box::new(FilingsCollector::new(self.client.clone())));
        }

        collectors
    }

    /// Run one scan. Returns a result whenever the target parses;
    /// unreachable sources cost coverage instead of failing the scan.
    pub async fn scan(&self, target: &str) -> Result<ScanResult, ScanError> {
        let target = normalize_target(target)?;
        let started_at = Utc::now();
        info!("Scanning {} ({})", target.domain, target.url);

        let mut findings: Vec<RawFinding> = Vec::new();
        let mut issues: Vec<ScanIssue> = Vec::new();
        let mut financial: Option<FinancialSnapshot> = None;

        let collector_budget = Duration::from_secs(self.profile.scan.collector_timeout_secs);
        let mut ctx = CollectorContext::new(&target.url, &target.domain);

        // Bootstrap: the website crawl supplies the company name every
        // other collector queries with.
        let website = WebsiteCollector::new(self.client.clone());
        let (name, mut bootstrap) = run_collector(&website, &ctx, collector_budget).await;
        let extracted_name = bootstrap.company_name.take();
        absorb(name, bootstrap, &mut findings, &mut issues, &mut financial);

        ctx.company_name =
            Some(extracted_name.unwrap_or_else(|| company_name_from_domain(&target.domain)));
        debug!("Querying as '{}'", ctx.query_name());

        let collectors = self.fanout_collectors();
        let ceiling = Duration::from_secs(self.profile.scan.scan_timeout_secs);
        let (outputs, cut_off) = drain_fanout(
            &collectors,
            &ctx,
            collector_budget,
            ceiling,
            self.profile.scan.max_concurrent,
        )
        .await;

        for (name, output) in outputs {
            absorb(name, output, &mut findings, &mut issues, &mut financial);
        }
        for name in cut_off {
            issues.push(ScanIssue::new(
                name,
                "deadline",
                "scan deadline reached before collector settled",
                true,
            ));
        }

        let signals = merge_findings(&findings);
        let mut result = ScanResult::new(
            target.url.clone(),
            target.domain.clone(),
            ctx.query_name().to_string(),
            signals,
            started_at,
        )
        .with_financial(financial)
        .with_issues(issues);

        info!(
            "Scan of {} scored {}/100 ({}) with {}/{} signals found",
            result.domain,
            result.score,
            result.coverage_level.label(),
            result.found_count(),
            result.signals.len()
        );

        if self.profile.interpretation.enabled {
            if let Some(backend) = &self.interpreter {
                let budget = Duration::from_secs(self.profile.interpretation.timeout_secs);
                match tokio::time::timeout(budget, interpret_result(backend.as_ref(), &result))
                    .await
                {
                    Ok(Ok(text)) => {
                        debug!("Interpretation attached ({} chars)", text.len());
                        result = result.with_interpretation(text);
                    }
                    Ok(Err(e)) => {
                        warn!("Interpretation failed: {}", e);
                        result = result
                            .with_issue(ScanIssue::new("interpret", "llm", e.to_string(), true));
                    }
                    Err(_) => {
                        warn!("Interpretation timed out after {}s", budget.as_secs());
                        result = result.with_issue(ScanIssue::new(
                            "interpret",
                            "timeout",
                            format!("no narrative within {}s", budget.as_secs()),
                            true,
                        ));
                    }
                }
            } else {
                debug!("Interpretation enabled but no backend configured");
            }
        }

        Ok(result)
    }
}

/// Run one collector under its budget. A timeout degrades into a
/// recoverable error row, same as a source-side failure.
async fn run_collector(
    collector: &dyn Collector,
    ctx: &CollectorContext,
    budget: Duration,
) -> (&'static str, CollectorOutput) {
    let name = collector.name();
    match tokio::time::timeout(budget, collector.collect(ctx)).await {
        Ok(output) => (name, output),
        Err(_) => {
            warn!("Collector {} timed out after {}s", name, budget.as_secs());
            (
                name,
                CollectorOutput::from_error(SourceError::new(
                    "timeout",
                    format!("no answer within {}s", budget.as_secs()),
                )),
            )
        }
    }
}

/// Drain the fan-out stream until every collector settles or the scan
/// deadline passes. Returns settled outputs plus the names of any
/// collectors cut off by the deadline.
async fn drain_fanout(
    collectors: &[Box<dyn Collector>],
    ctx: &CollectorContext,
    budget: Duration,
    ceiling: Duration,
    max_concurrent: usize,
) -> (Vec<(&'static str, CollectorOutput)>, Vec<&'static str>) {
    let deadline = tokio::time::sleep(ceiling);
    tokio::pin!(deadline);

    let mut pending = stream::iter(
        collectors
            .iter()
            .map(|collector| run_collector(collector.as_ref(), ctx, budget)),
    )
    .buffer_unordered(max_concurrent);

    let mut outputs: Vec<(&'static str, CollectorOutput)> = Vec::with_capacity(collectors.len());

    loop {
        tokio::select! {
            next = pending.next() => {
                match next {
                    Some(entry) => outputs.push(entry),
                    None => break,
                }
            }
            _ = &mut deadline => {
                warn!(
                    "Scan deadline reached with {} collector(s) pending",
                    collectors.len() - outputs.len()
                );
                break;
            }
        }
    }
    drop(pending);

    let settled: HashSet<&'static str> = outputs.iter().map(|(name, _)| *name).collect();
    let cut_off = collectors
        .iter()
        .map(|c| c.name())
        .filter(|name| !settled.contains(name))
        .collect();

    (outputs, cut_off)
}

/// Fold one collector's output into the scan accumulators.
fn absorb(
    name: &'static str,
    output: CollectorOutput,
    findings: &mut Vec<RawFinding>,
    issues: &mut Vec<ScanIssue>,
    financial: &mut Option<FinancialSnapshot>,
) {
    let found = output.findings.iter().filter(|f| f.found).count();
    info!(
        "{}: {}/{} signals found, {} issue(s)",
        name,
        found,
        output.findings.len(),
        output.errors.len()
    );

    findings.extend(output.findings);
    for error in output.errors {
        issues.push(ScanIssue::new(
            name,
            error.code,
            error.message,
            error.recoverable,
        ));
    }
    if financial.is_none() {
        *financial = output.financial;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Arc;
    use veriscan_collectors::{InterpretError, InterpreterBackend};
    use veriscan_core::ids;

    use crate::profile::CollectorToggles;

    struct StubCollector {
        name: &'static str,
        findings: Vec<RawFinding>,
        delay_ms: u64,
    }

    impl StubCollector {
        fn new(name: &'static str, findings: Vec<RawFinding>) -> Self {
            Self {
                name,
                findings,
                delay_ms: 0,
            }
        }

        fn delayed(name: &'static str, delay_ms: u64) -> Self {
            Self {
                name,
                findings: Vec::new(),
                delay_ms,
            }
        }
    }

    #[async_trait]
    impl Collector for StubCollector {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn collect(&self, _ctx: &CollectorContext) -> CollectorOutput {
            if self.delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
            }
            CollectorOutput {
                findings: self.findings.clone(),
                ..Default::default()
            }
        }
    }

    struct FailingBackend;

    #[async_trait]
    impl InterpreterBackend for FailingBackend {
        async fn generate(&self, _system: &str, _user: &str) -> Result<String, InterpretError> {
            Err(InterpretError::Api("backend offline".to_string()))
        }

        fn model_name(&self) -> &str {
            "stub"
        }
    }

    struct CannedBackend;

    #[async_trait]
    impl InterpreterBackend for CannedBackend {
        async fn generate(&self, _system: &str, _user: &str) -> Result<String, InterpretError> {
            Ok("Thin footprint, verify registration first.".to_string())
        }

        fn model_name(&self) -> &str {
            "stub"
        }
    }

    // Interpretation on, every fan-out collector off. The bootstrap
    // crawl still runs, against a reserved TLD that never resolves.
    fn interpretation_only_profile() -> Profile {
        let mut profile = Profile::default();
        profile.scan.request_timeout_secs = 2;
        profile.collectors = CollectorToggles {
            domain: false,
            search: false,
            professional: false,
            jobs: false,
            tech: false,
            filings: false,
        };
        profile.interpretation.enabled = true;
        profile
    }

    fn ctx() -> CollectorContext {
        CollectorContext::new("https://acme.example/", "acme.example")
    }

    #[test]
    fn test_normalize_bare_domain() {
        let target = normalize_target("acme.com").unwrap();
        assert_eq!(target.url, "https://acme.com/");
        assert_eq!(target.domain, "acme.com");
    }

    #[test]
    fn test_normalize_full_url_strips_www() {
        let target = normalize_target("https://www.Acme.com/about").unwrap();
        assert_eq!(target.domain, "acme.com");
        assert_eq!(target.url, "https://www.acme.com/about");
    }

    #[test]
    fn test_normalize_rejects_garbage() {
        assert!(matches!(
            normalize_target(""),
            Err(ScanError::InvalidTarget(_))
        ));
        assert!(matches!(
            normalize_target("not a url"),
            Err(ScanError::InvalidTarget(_))
        ));
        assert!(matches!(
            normalize_target("ftp://acme.com"),
            Err(ScanError::InvalidTarget(_))
        ));
        assert!(matches!(
            normalize_target("localhost"),
            Err(ScanError::InvalidTarget(_))
        ));
    }

    #[test]
    fn test_company_name_from_domain() {
        assert_eq!(company_name_from_domain("acme.com"), "Acme");
        assert_eq!(
            company_name_from_domain("acme-robotics.io"),
            "Acme Robotics"
        );
        assert_eq!(company_name_from_domain("x.com"), "X");
    }

    #[tokio::test]
    async fn test_fanout_settles_all_then_merges() {
        let collectors: Vec<Box<dyn Collector>> = vec![
            Box::new(StubCollector::new(
                "website",
                vec![RawFinding::found(ids::WEBSITE_LIVE, "HTTP 200")],
            )),
            Box::new(StubCollector::new(
                "domain",
                vec![RawFinding::found(ids::DOMAIN_AGE, "8 years")],
            )),
            Box::new(StubCollector::new(
                "filings",
                vec![RawFinding::missing(ids::BUSINESS_REGISTRATION)],
            )),
        ];

        let (outputs, cut_off) = drain_fanout(
            &collectors,
            &ctx(),
            Duration::from_secs(5),
            Duration::from_secs(5),
            4,
        )
        .await;

        assert_eq!(outputs.len(), 3);
        assert!(cut_off.is_empty());

        let mut findings = Vec::new();
        let mut issues = Vec::new();
        let mut financial = None;
        for (name, output) in outputs {
            absorb(name, output, &mut findings, &mut issues, &mut financial);
        }

        let signals = merge_findings(&findings);
        assert_eq!(signals.len(), 19);
        let live = signals.iter().find(|s| s.id == ids::WEBSITE_LIVE).unwrap();
        assert!(live.found);
        let executives = signals.iter().find(|s| s.id == ids::EXECUTIVES_FOUND).unwrap();
        assert!(!executives.found);
        assert!(issues.is_empty());
    }

    #[tokio::test]
    async fn test_deadline_cuts_off_slow_collector() {
        let collectors: Vec<Box<dyn Collector>> = vec![
            Box::new(StubCollector::new(
                "fast",
                vec![RawFinding::found(ids::WEBSITE_LIVE, "HTTP 200")],
            )),
            Box::new(StubCollector::delayed("slow", 2_000)),
        ];

        let (outputs, cut_off) = drain_fanout(
            &collectors,
            &ctx(),
            Duration::from_secs(10),
            Duration::from_millis(250),
            4,
        )
        .await;

        assert_eq!(outputs.len(), 1);
        assert_eq!(outputs[0].0, "fast");
        assert_eq!(cut_off, vec!["slow"]);
    }

    #[tokio::test]
    async fn test_collector_timeout_becomes_recoverable_error() {
        let slow = StubCollector::delayed("slow", 2_000);

        let (name, output) = run_collector(&slow, &ctx(), Duration::from_millis(100)).await;

        assert_eq!(name, "slow");
        assert!(output.findings.is_empty());
        assert_eq!(output.errors.len(), 1);
        assert_eq!(output.errors[0].code, "timeout");
        assert!(output.errors[0].recoverable);
    }

    #[tokio::test]
    async fn test_interpretation_failure_never_fails_scan() {
        let engine =
            ScanEngine::new(interpretation_only_profile(), Some(Arc::new(FailingBackend)))
                .unwrap();

        let result = engine.scan("acme-offline.invalid").await.unwrap();

        assert!(result.interpretation.is_none());
        assert!(result
            .issues
            .iter()
            .any(|i| i.collector == "interpret" && i.code == "llm" && i.recoverable));
        assert_eq!(result.signals.len(), 19);
    }

    #[tokio::test]
    async fn test_interpretation_attaches_when_backend_answers() {
        let engine =
            ScanEngine::new(interpretation_only_profile(), Some(Arc::new(CannedBackend)))
                .unwrap();

        let result = engine.scan("acme-offline.invalid").await.unwrap();

        assert_eq!(
            result.interpretation.as_deref(),
            Some("Thin footprint, verify registration first.")
        );
        assert!(!result.issues.iter().any(|i| i.collector == "interpret"));
    }

    #[tokio::test]
    async fn test_timed_out_collector_costs_coverage_not_scan() {
        let collectors: Vec<Box<dyn Collector>> =
            vec![Box::new(StubCollector::delayed("search", 2_000))];

        let (outputs, cut_off) = drain_fanout(
            &collectors,
            &ctx(),
            Duration::from_millis(100),
            Duration::from_secs(5),
            4,
        )
        .await;

        // The per-collector budget fires first, so the collector still
        // settles, just with an error row instead of findings.
        assert!(cut_off.is_empty());
        assert_eq!(outputs.len(), 1);

        let mut findings = Vec::new();
        let mut issues = Vec::new();
        let mut financial = None;
        let (name, output) = outputs.into_iter().next().unwrap();
        absorb(name, output, &mut findings, &mut issues, &mut financial);

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].collector, "search");
        assert!(issues[0].recoverable);

        let signals = merge_findings(&findings);
        assert!(signals.iter().all(|s| !s.found));
    }
}
