//! Category scoring, coverage levels, and total score composition

use serde::{Deserialize, Serialize};

use crate::{Category, Signal, SCORE_CEILING};

/// Qualitative coverage label derived from fixed score thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoverageLevel {
    Excellent,
    Good,
    Moderate,
    Limited,
    Minimal,
    None,
}

impl CoverageLevel {
    /// Stable key for storage/display
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Moderate => "moderate",
            Self::Limited => "limited",
            Self::Minimal => "minimal",
            Self::None => "none",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Moderate => "Moderate",
            Self::Limited => "Limited",
            Self::Minimal => "Minimal",
            Self::None => "None",
        }
    }
}

/// Strict six-level mapping used for per-category display.
pub fn coverage_level(percentage: f64) -> CoverageLevel {
    if percentage >= 85.0 {
        CoverageLevel::Excellent
    } else if percentage >= 70.0 {
        CoverageLevel::Good
    } else if percentage >= 50.0 {
        CoverageLevel::Moderate
    } else if percentage >= 30.0 {
        CoverageLevel::Limited
    } else if percentage > 0.0 {
        CoverageLevel::Minimal
    } else {
        CoverageLevel::None
    }
}

/// Collapsed five-level mapping used for the headline score: anything below
/// the Limited threshold reports Minimal, never None.
///
/// Deliberately kept separate from [`coverage_level`]; headline consumers
/// depend on the collapsed bottom bucket while category breakdowns show the
/// strict one.
pub fn headline_coverage_level(score: i32) -> CoverageLevel {
    if score >= 85 {
        CoverageLevel::Excellent
    } else if score >= 70 {
        CoverageLevel::Good
    } else if score >= 50 {
        CoverageLevel::Moderate
    } else if score >= 30 {
        CoverageLevel::Limited
    } else {
        CoverageLevel::Minimal
    }
}

/// Rollup of one category's signals for one scan
#[derive(Debug, Clone, Serialize)]
pub struct CategoryScore {
    pub category: Category,
    pub name: &'static str,
    /// Sum of achieved points across the category's signals
    pub score: u32,
    pub max_score: u32,
    pub coverage_level: CoverageLevel,
    pub signals: Vec<Signal>,
}

impl CategoryScore {
    /// Achieved share of the category budget, 0-100
    pub fn percentage(&self) -> f64 {
        if self.max_score == 0 {
            0.0
        } else {
            self.score as f64 / self.max_score as f64 * 100.0
        }
    }
}

/// Group merged signals into the four fixed category rollups, in
/// [`Category::ALL`] order.
pub fn score_categories(signals: &[Signal]) -> Vec<CategoryScore> {
    Category::ALL
        .iter()
        .map(|&category| {
            let members: Vec<Signal> = signals
                .iter()
                .filter(|s| s.category == category)
                .cloned()
                .collect();
            let score: u32 = members.iter().map(|s| s.points).sum();
            let max_score = category.max_score();
            let percentage = if max_score == 0 {
                0.0
            } else {
                score as f64 / max_score as f64 * 100.0
            };
            CategoryScore {
                category,
                name: category.name(),
                score,
                max_score,
                coverage_level: coverage_level(percentage),
                signals: members,
            }
        })
        .collect()
}

/// Compose the headline score: category sum plus penalties, clamped into
/// `[0, SCORE_CEILING]`.
pub fn compose_score(categories: &[CategoryScore], total_penalty: i32) -> i32 {
    let raw: i32 = categories.iter().map(|c| c.score as i32).sum::<i32>() + total_penalty;
    raw.clamp(0, SCORE_CEILING)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{merge_findings, registry::ids, RawFinding};

    #[test]
    fn test_strict_mapping_boundaries() {
        assert_eq!(coverage_level(100.0), CoverageLevel::Excellent);
        assert_eq!(coverage_level(85.0), CoverageLevel::Excellent);
        assert_eq!(coverage_level(84.9), CoverageLevel::Good);
        assert_eq!(coverage_level(70.0), CoverageLevel::Good);
        assert_eq!(coverage_level(50.0), CoverageLevel::Moderate);
        assert_eq!(coverage_level(30.0), CoverageLevel::Limited);
        assert_eq!(coverage_level(0.1), CoverageLevel::Minimal);
        assert_eq!(coverage_level(0.0), CoverageLevel::None);
    }

    #[test]
    fn test_headline_mapping_boundaries() {
        assert_eq!(headline_coverage_level(100), CoverageLevel::Excellent);
        assert_eq!(headline_coverage_level(85), CoverageLevel::Excellent);
        assert_eq!(headline_coverage_level(84), CoverageLevel::Good);
        assert_eq!(headline_coverage_level(70), CoverageLevel::Good);
        assert_eq!(headline_coverage_level(69), CoverageLevel::Moderate);
        assert_eq!(headline_coverage_level(50), CoverageLevel::Moderate);
        assert_eq!(headline_coverage_level(49), CoverageLevel::Limited);
        assert_eq!(headline_coverage_level(30), CoverageLevel::Limited);
        assert_eq!(headline_coverage_level(29), CoverageLevel::Minimal);
    }

    #[test]
    fn test_headline_mapping_never_reports_none() {
        for score in 0..=100 {
            assert_ne!(headline_coverage_level(score), CoverageLevel::None);
        }
        assert_eq!(headline_coverage_level(0), CoverageLevel::Minimal);
    }

    #[test]
    fn test_category_rollup() {
        let signals = merge_findings(&[
            RawFinding::found(ids::WEBSITE_LIVE, "200 OK"),
            RawFinding::found(ids::DOMAIN_AGE, "6 years"),
        ]);
        let categories = score_categories(&signals);
        assert_eq!(categories.len(), 4);

        let identity = &categories[0];
        assert_eq!(identity.category, Category::Identity);
        assert_eq!(identity.score, 9); // website_live 5 + domain_age 4
        assert_eq!(identity.max_score, 25);
        assert_eq!(identity.signals.len(), 7);
        assert_eq!(identity.coverage_level, CoverageLevel::Limited); // 36%

        let leadership = &categories[1];
        assert_eq!(leadership.score, 0);
        assert_eq!(leadership.coverage_level, CoverageLevel::None);
    }

    #[test]
    fn test_compose_clamps_at_zero() {
        let signals = merge_findings(&[]);
        let categories = score_categories(&signals);
        assert_eq!(compose_score(&categories, -13), 0);
    }

    #[test]
    fn test_compose_full_board() {
        let all_found: Vec<RawFinding> = crate::SIGNAL_DEFINITIONS
            .iter()
            .map(|d| RawFinding::found(d.id, "evidence"))
            .collect();
        let signals = merge_findings(&all_found);
        let categories = score_categories(&signals);
        assert_eq!(compose_score(&categories, 0), 85);
    }
}
