//! Due-diligence effort estimation.
//!
//! Translates a scored signal board into a coarse effort tier:
//! - Counts missing signals, weighted by how much they were worth
//! - Flags categories with enough gaps to need dedicated research
//! - Maps the overall score onto Low / Medium / High effort

use serde::{Deserialize, Serialize};

use crate::registry::Category;
use crate::signal::Signal;

/// A missing signal worth at least this many points is treated as
/// critical: it cannot be skipped during manual verification.
pub const CRITICAL_POINTS: u32 = 5;

/// How much manual work a reviewer should budget for this company.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffortLevel {
    Low,
    Medium,
    High,
}

impl EffortLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            EffortLevel::Low => "low",
            EffortLevel::Medium => "medium",
            EffortLevel::High => "high",
        }
    }

    /// Human-readable label for report output.
    pub fn label(&self) -> &'static str {
        match self {
            EffortLevel::Low => "Low",
            EffortLevel::Medium => "Medium",
            EffortLevel::High => "High",
        }
    }
}

/// Effort tier plus the concrete gaps that drove it.
#[derive(Debug, Clone, Serialize)]
pub struct EffortEstimate {
    pub level: EffortLevel,
    pub reasons: Vec<String>,
}

fn missing_in_category(signals: &[Signal], category: Category) -> usize {
    signals
        .iter()
        .filter(|s| s.category == category && !s.found)
        .count()
}

/// Estimate the manual-verification effort for a scored board.
///
/// The tier follows the overall score (>= 70 low, >= 50 medium,
/// otherwise high). The reasons enumerate the gaps in a fixed order so
/// reports stay stable across runs; when nothing specific stands out a
/// per-tier default reason is used instead.
pub fn estimate_effort(score: i32, signals: &[Signal]) -> EffortEstimate {
    let critical_missing = signals
        .iter()
        .filter(|s| !s.found && s.max_points >= CRITICAL_POINTS)
        .count();

    let mut reasons = Vec::new();

    if critical_missing > 0 {
        reasons.push(format!(
            "{} critical signal(s) require manual verification",
            critical_missing
        ));
    }
    if missing_in_category(signals, Category::Leadership) > 2 {
        reasons.push("Leadership information requires extensive research".to_string());
    }
    if missing_in_category(signals, Category::Validation) > 3 {
        reasons.push("Limited external validation will require primary research".to_string());
    }
    if missing_in_category(signals, Category::Identity) > 2 {
        reasons.push("Basic company identity needs verification".to_string());
    }

    let level = if score >= 70 {
        EffortLevel::Low
    } else if score >= 50 {
        EffortLevel::Medium
    } else {
        EffortLevel::High
    };

    if reasons.is_empty() {
        let fallback = match level {
            EffortLevel::Low => "Standard validation of existing signals",
            EffortLevel::Medium => "Moderate research needed for gaps",
            EffortLevel::High => "Extensive primary research required",
        };
        reasons.push(fallback.to_string());
    }

    EffortEstimate { level, reasons }
}
