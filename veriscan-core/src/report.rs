//! Scored scan results.
//!
//! Ties the scoring stages together:
//! - `score_signals` runs scorer, penalties, composer, and effort
//!   estimator in their fixed dependency order, purely and synchronously
//! - `ScanResult` is the immutable top-level aggregate a scan produces,
//!   serializable to JSON for reports and downstream consumers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::effort::{estimate_effort, EffortEstimate};
use crate::penalty::{evaluate_penalties, Penalty};
use crate::score::{compose_score, headline_coverage_level, score_categories, CategoryScore, CoverageLevel};
use crate::signal::Signal;

/// Output of the pure scoring pipeline, before any scan metadata is
/// attached.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreBreakdown {
    pub categories: Vec<CategoryScore>,
    pub penalties: Vec<Penalty>,
    pub total_penalty: i32,
    pub score: i32,
    pub coverage_level: CoverageLevel,
    pub effort: EffortEstimate,
}

/// Score a merged signal board.
///
/// Stages run in fixed order because each consumes the previous one's
/// output: category rollup, penalty evaluation, score composition,
/// effort estimation. Deterministic for a given input and performs no
/// I/O.
pub fn score_signals(signals: &[Signal]) -> ScoreBreakdown {
    let categories = score_categories(signals);
    let (penalties, total_penalty) = evaluate_penalties(&categories, signals);
    let score = compose_score(&categories, total_penalty);
    let coverage_level = headline_coverage_level(score);
    let effort = estimate_effort(score, signals);

    ScoreBreakdown {
        categories,
        penalties,
        total_penalty,
        score,
        coverage_level,
        effort,
    }
}

/// Filing-registry facts surfaced by the filings collector. Raw
/// registry output only, no derived financials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialSnapshot {
    pub registry: String,
    pub total_filings: u32,
    pub latest_filing_type: Option<String>,
    pub latest_filing_date: Option<String>,
    pub entity_id: Option<String>,
}

/// A non-fatal problem recorded while a collector ran. Issues are
/// diagnostics: they never change the score, which already reflects
/// the missing signals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanIssue {
    pub collector: String,
    pub code: String,
    pub message: String,
    pub recoverable: bool,
}

impl ScanIssue {
    pub fn new(
        collector: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
        recoverable: bool,
    ) -> Self {
        Self {
            collector: collector.into(),
            code: code.into(),
            message: message.into(),
            recoverable,
        }
    }
}

/// Complete result of one scan. Built once after every collector has
/// settled; later steps extend it without mutating scored fields.
#[derive(Debug, Clone, Serialize)]
pub struct ScanResult {
    pub id: Uuid,
    pub url: String,
    pub domain: String,
    pub company_name: String,
    pub score: i32,
    pub coverage_level: CoverageLevel,
    pub categories: Vec<CategoryScore>,
    pub penalties: Vec<Penalty>,
    pub total_penalty: i32,
    pub effort: EffortEstimate,
    pub signals: Vec<Signal>,
    pub financial: Option<FinancialSnapshot>,
    pub interpretation: Option<String>,
    pub issues: Vec<ScanIssue>,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub duration_ms: u64,
}

impl ScanResult {
    /// Score the merged board and stamp scan metadata. `completed_at`
    /// is taken as now, so call this once aggregation is finished.
    pub fn new(
        url: impl Into<String>,
        domain: impl Into<String>,
        company_name: impl Into<String>,
        signals: Vec<Signal>,
        started_at: DateTime<Utc>,
    ) -> Self {
        let breakdown = score_signals(&signals);
        let completed_at = Utc::now();
        let duration_ms = completed_at
            .signed_duration_since(started_at)
            .num_milliseconds()
            .max(0) as u64;

        Self {
            id: Uuid::new_v4(),
            url: url.into(),
            domain: domain.into(),
            company_name: company_name.into(),
            score: breakdown.score,
            coverage_level: breakdown.coverage_level,
            categories: breakdown.categories,
            penalties: breakdown.penalties,
            total_penalty: breakdown.total_penalty,
            effort: breakdown.effort,
            signals,
            financial: None,
            interpretation: None,
            issues: Vec::new(),
            started_at,
            completed_at,
            duration_ms,
        }
    }

    pub fn with_financial(mut self, financial: Option<FinancialSnapshot>) -> Self {
        self.financial = financial;
        self
    }

    pub fn with_issues(mut self, issues: Vec<ScanIssue>) -> Self {
        self.issues = issues;
        self
    }

    /// Append one issue recorded after aggregation, keeping the rest.
    pub fn with_issue(mut self, issue: ScanIssue) -> Self {
        self.issues.push(issue);
        self
    }

    /// Attach narrative text produced after scoring. Additive only;
    /// scored fields are left untouched.
    pub fn with_interpretation(mut self, interpretation: impl Into<String>) -> Self {
        self.interpretation = Some(interpretation.into());
        self
    }

    /// Count of signals that were actually found.
    pub fn found_count(&self) -> usize {
        self.signals.iter().filter(|s| s.found).count()
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{ids, Category, SIGNAL_DEFINITIONS};
    use crate::signal::{merge_findings, RawFinding};

    fn board_with_all_found() -> Vec<Signal> {
        let raw: Vec<RawFinding> = SIGNAL_DEFINITIONS
            .iter()
            .map(|def| RawFinding::found(def.id, "present"))
            .collect();
        merge_findings(&raw)
    }

    #[test]
    fn test_all_signals_found_scores_eighty_five() {
        let breakdown = score_signals(&board_with_all_found());

        let by_category: Vec<(Category, u32)> = breakdown
            .categories
            .iter()
            .map(|c| (c.category, c.score))
            .collect();
        assert_eq!(
            by_category,
            vec![
                (Category::Identity, 25),
                (Category::Leadership, 20),
                (Category::Validation, 25),
                (Category::Operational, 15),
            ]
        );
        assert_eq!(breakdown.total_penalty, 0);
        assert!(breakdown.penalties.iter().all(|p| !p.applied));
        assert_eq!(breakdown.score, 85);
        assert_eq!(breakdown.coverage_level, CoverageLevel::Excellent);
    }

    #[test]
    fn test_no_signals_found_scores_zero() {
        let breakdown = score_signals(&merge_findings(&[]));

        assert!(breakdown.categories.iter().all(|c| c.score == 0));
        // new_domain needs the sub-year value text, so only three of
        // the four rules can fire on a bare empty board.
        assert_eq!(breakdown.total_penalty, -13);
        assert_eq!(breakdown.score, 0);
        assert_eq!(breakdown.coverage_level, CoverageLevel::Minimal);
        assert_eq!(breakdown.effort.level, crate::effort::EffortLevel::High);
    }

    #[test]
    fn test_domain_age_found_without_value() {
        let raw = vec![RawFinding {
            id: ids::DOMAIN_AGE.to_string(),
            found: true,
            value: None,
        }];
        let breakdown = score_signals(&merge_findings(&raw));

        let identity = &breakdown.categories[0];
        assert_eq!(identity.category, Category::Identity);
        assert_eq!(identity.score, 4);
        assert!(breakdown.categories[1..].iter().all(|c| c.score == 0));

        let new_domain = breakdown
            .penalties
            .iter()
            .find(|p| p.id == "new_domain")
            .unwrap();
        assert!(!new_domain.applied);
        assert_eq!(breakdown.total_penalty, -13);
        assert_eq!(breakdown.score, 0);
    }

    #[test]
    fn test_scoring_is_deterministic() {
        let board = board_with_all_found();
        let first = score_signals(&board);
        let second = score_signals(&board);

        assert_eq!(first.score, second.score);
        assert_eq!(first.total_penalty, second.total_penalty);
        assert_eq!(first.coverage_level, second.coverage_level);
        assert_eq!(first.effort.level, second.effort.level);
        assert_eq!(first.effort.reasons, second.effort.reasons);
    }

    #[test]
    fn test_score_stays_in_bounds() {
        // Every prefix of the catalog as the found set.
        for cutoff in 0..=SIGNAL_DEFINITIONS.len() {
            let raw: Vec<RawFinding> = SIGNAL_DEFINITIONS[..cutoff]
                .iter()
                .map(|def| RawFinding::found(def.id, "present"))
                .collect();
            let breakdown = score_signals(&merge_findings(&raw));
            assert!(
                (0..=100).contains(&breakdown.score),
                "score {} out of bounds at cutoff {}",
                breakdown.score,
                cutoff
            );
            assert!((-15..=0).contains(&breakdown.total_penalty));
        }
    }

    #[test]
    fn test_found_signal_never_lowers_score() {
        // Ten-signal baseline, then flip each missing signal on.
        // Finding more evidence can add points or clear a penalty,
        // never the reverse.
        let base_raw: Vec<RawFinding> = SIGNAL_DEFINITIONS[..10]
            .iter()
            .map(|def| RawFinding::found(def.id, "present"))
            .collect();
        let base = score_signals(&merge_findings(&base_raw));

        for def in &SIGNAL_DEFINITIONS[10..] {
            let mut raw = base_raw.clone();
            raw.push(RawFinding::found(def.id, "present"));
            let flipped = score_signals(&merge_findings(&raw));

            assert!(
                flipped.score >= base.score,
                "finding {} dropped the score {} -> {}",
                def.id,
                base.score,
                flipped.score
            );
            assert!(flipped.total_penalty >= base.total_penalty);
            for (after, before) in flipped.categories.iter().zip(base.categories.iter()) {
                assert!(after.score >= before.score);
            }
        }
    }

    #[test]
    fn test_result_reflects_breakdown() {
        let signals = board_with_all_found();
        let started_at = Utc::now();
        let result = ScanResult::new(
            "https://example.com",
            "example.com",
            "Example Corp",
            signals,
            started_at,
        );

        assert_eq!(result.score, 85);
        assert_eq!(result.found_count(), SIGNAL_DEFINITIONS.len());
        let category_sum: i32 = result.categories.iter().map(|c| c.score as i32).sum();
        assert_eq!(
            result.score,
            (category_sum + result.total_penalty).clamp(0, 100)
        );
        assert!(result.completed_at >= result.started_at);
    }

    #[test]
    fn test_interpretation_attaches_without_rescoring() {
        let result = ScanResult::new(
            "https://example.com",
            "example.com",
            "Example Corp",
            merge_findings(&[]),
            Utc::now(),
        );
        let score = result.score;
        let id = result.id;

        let enriched = result.with_interpretation("Weak public footprint.");
        assert_eq!(enriched.interpretation.as_deref(), Some("Weak public footprint."));
        assert_eq!(enriched.score, score);
        assert_eq!(enriched.id, id);
    }

    #[test]
    fn test_late_issue_appends() {
        let result = ScanResult::new(
            "https://example.com",
            "example.com",
            "Example Corp",
            merge_findings(&[]),
            Utc::now(),
        )
        .with_issues(vec![ScanIssue::new("search", "http", "status 500", true)])
        .with_issue(ScanIssue::new("interpret", "llm", "backend offline", true));

        assert_eq!(result.issues.len(), 2);
        assert_eq!(result.issues[0].collector, "search");
        assert_eq!(result.issues[1].collector, "interpret");
    }

    #[test]
    fn test_result_serializes_to_json() {
        let result = ScanResult::new(
            "https://example.com",
            "example.com",
            "Example Corp",
            board_with_all_found(),
            Utc::now(),
        )
        .with_issues(vec![ScanIssue::new(
            "search",
            "timeout",
            "request timed out",
            true,
        )]);

        let json = result.to_json_pretty().unwrap();
        assert!(json.contains("\"score\": 85"));
        assert!(json.contains("\"coverage_level\": \"excellent\""));
        assert!(json.contains("\"collector\": \"search\""));
    }
}
