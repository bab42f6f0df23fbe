//! Cross-cutting risk penalties
//!
//! Four fixed absence-of-evidence rules evaluated against the merged
//! signals and category rollups. Each rule is independent and
//! order-insensitive, carries a fixed negative point value, and produces
//! a reason only when applied.

use serde::Serialize;

use crate::{registry::ids, Category, CategoryScore, Signal};

/// Constant metadata for one penalty rule
#[derive(Debug, Clone, Copy)]
pub struct PenaltyRule {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// Fixed deduction, always negative
    pub points: i32,
}

const NO_LEADERSHIP: PenaltyRule = PenaltyRule {
    id: "no_leadership",
    name: "No Leadership Identifiable",
    description: "Almost nothing leadership-related was found",
    points: -5,
};

const WEBSITE_ONLY: PenaltyRule = PenaltyRule {
    id: "website_only",
    name: "Website-Only Footprint",
    description: "No mentions or news coverage beyond the company's own site",
    points: -5,
};

const NO_SOCIAL: PenaltyRule = PenaltyRule {
    id: "no_social",
    name: "No Social Presence",
    description: "No LinkedIn company page",
    points: -3,
};

const NEW_DOMAIN: PenaltyRule = PenaltyRule {
    id: "new_domain",
    name: "Very New Domain",
    description: "Domain registered less than a year ago",
    points: -2,
};

/// The fixed rule set, in display order
pub static PENALTY_RULES: &[PenaltyRule] = &[NO_LEADERSHIP, WEBSITE_ONLY, NO_SOCIAL, NEW_DOMAIN];

/// Leadership scores below this bar count as "no leadership identifiable".
/// Intentionally far below the category max; only near-total absence triggers.
const LEADERSHIP_FLOOR: u32 = 6;

/// A penalty rule evaluated for one scan
#[derive(Debug, Clone, Serialize)]
pub struct Penalty {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub points: i32,
    pub applied: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Penalty {
    fn evaluate(rule: &PenaltyRule, reason: Option<String>) -> Self {
        Self {
            id: rule.id,
            name: rule.name,
            description: rule.description,
            points: rule.points,
            applied: reason.is_some(),
            reason,
        }
    }
}

fn signal<'a>(signals: &'a [Signal], id: &str) -> Option<&'a Signal> {
    signals.iter().find(|s| s.id == id)
}

fn not_found(signals: &[Signal], id: &str) -> bool {
    !signal(signals, id).is_some_and(|s| s.found)
}

fn no_leadership_reason(categories: &[CategoryScore]) -> Option<String> {
    let leadership = categories
        .iter()
        .find(|c| c.category == Category::Leadership)?;
    (leadership.score < LEADERSHIP_FLOOR).then(|| {
        format!(
            "Leadership signals scored {} of {}",
            leadership.score, leadership.max_score
        )
    })
}

fn website_only_reason(signals: &[Signal]) -> Option<String> {
    (not_found(signals, ids::THIRD_PARTY_MENTIONS) && not_found(signals, ids::NEWS_COVERAGE))
        .then(|| "Neither third-party mentions nor news coverage were found".to_string())
}

fn no_social_reason(signals: &[Signal]) -> Option<String> {
    not_found(signals, ids::LINKEDIN_COMPANY)
        .then(|| "No LinkedIn company page was found".to_string())
}

/// Fires only on a not-found domain_age whose evidence explicitly reports a
/// sub-1-year age. A bare not-found (no value, or a value without "< 1")
/// stays unpenalized, and a found signal never triggers.
fn new_domain_reason(signals: &[Signal]) -> Option<String> {
    let age = signal(signals, ids::DOMAIN_AGE)?;
    if age.found {
        return None;
    }
    let value = age.value.as_deref()?;
    value
        .contains("< 1")
        .then(|| format!("Registry reports domain age {}", value))
}

/// Evaluate all penalty rules. Returns the penalties in rule order and the
/// applied total (always <= 0, never below -15).
pub fn evaluate_penalties(
    categories: &[CategoryScore],
    signals: &[Signal],
) -> (Vec<Penalty>, i32) {
    let penalties = vec![
        Penalty::evaluate(&NO_LEADERSHIP, no_leadership_reason(categories)),
        Penalty::evaluate(&WEBSITE_ONLY, website_only_reason(signals)),
        Penalty::evaluate(&NO_SOCIAL, no_social_reason(signals)),
        Penalty::evaluate(&NEW_DOMAIN, new_domain_reason(signals)),
    ];
    let total = penalties
        .iter()
        .filter(|p| p.applied)
        .map(|p| p.points)
        .sum();
    (penalties, total)
}
