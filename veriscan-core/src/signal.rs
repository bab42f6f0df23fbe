//! Merged scan signals
//!
//! Collectors report partial [`RawFinding`] lists; [`merge_findings`]
//! reconciles them against the registry so every defined signal appears
//! exactly once per scan, defaulting to not-found when no collector
//! reported it.

use serde::{Deserialize, Serialize};

use crate::{Category, SIGNAL_DEFINITIONS};

/// A raw finding reported by one collector
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawFinding {
    /// Signal id from the registry
    pub id: String,
    /// Whether the collector observed the signal
    pub found: bool,
    /// Evidence snippet, when one exists
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl RawFinding {
    /// A positive finding with evidence
    pub fn found(id: &str, value: impl Into<String>) -> Self {
        Self {
            id: id.to_string(),
            found: true,
            value: Some(value.into()),
        }
    }

    /// An explicit negative finding
    pub fn missing(id: &str) -> Self {
        Self {
            id: id.to_string(),
            found: false,
            value: None,
        }
    }

    /// A negative finding that still carries evidence (e.g. a domain age
    /// below the scoring threshold)
    pub fn missing_with_value(id: &str, value: impl Into<String>) -> Self {
        Self {
            id: id.to_string(),
            found: false,
            value: Some(value.into()),
        }
    }
}

/// One scored signal, one per registry definition per scan.
/// Immutable after creation.
#[derive(Debug, Clone, Serialize)]
pub struct Signal {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub category: Category,
    pub found: bool,
    /// Evidence snippet, kept even for not-found signals
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Points achieved (definition points if found, else 0)
    pub points: u32,
    /// Points this signal is worth when found
    pub max_points: u32,
    pub source: &'static str,
}

/// Reconcile raw collector findings against the registry.
///
/// Every definition yields exactly one [`Signal`], in registry order.
/// Duplicate ids resolve last-write-wins; ids absent from the registry are
/// dropped. This is a total function: missing input is data ("not found"),
/// not an error.
pub fn merge_findings(raw: &[RawFinding]) -> Vec<Signal> {
    SIGNAL_DEFINITIONS
        .iter()
        .map(|def| {
            let finding = raw.iter().rev().find(|f| f.id == def.id);
            let found = finding.is_some_and(|f| f.found);
            Signal {
                id: def.id,
                name: def.name,
                description: def.description,
                category: def.category,
                found,
                value: finding.and_then(|f| f.value.clone()),
                points: if found { def.points } else { 0 },
                max_points: def.points,
                source: def.source,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ids;

    #[test]
    fn test_merge_empty_input_is_total() {
        let signals = merge_findings(&[]);
        assert_eq!(signals.len(), SIGNAL_DEFINITIONS.len());
        assert!(signals.iter().all(|s| !s.found && s.points == 0));
    }

    #[test]
    fn test_merge_preserves_registry_order() {
        let signals = merge_findings(&[RawFinding::found(ids::JOB_POSTINGS, "3 postings")]);
        let expected: Vec<_> = SIGNAL_DEFINITIONS.iter().map(|d| d.id).collect();
        let actual: Vec<_> = signals.iter().map(|s| s.id).collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_merge_awards_definition_points() {
        let signals = merge_findings(&[RawFinding::found(ids::NEWS_COVERAGE, "4 articles")]);
        let news = signals.iter().find(|s| s.id == ids::NEWS_COVERAGE).unwrap();
        assert!(news.found);
        assert_eq!(news.points, 7);
        assert_eq!(news.max_points, 7);
        assert_eq!(news.value.as_deref(), Some("4 articles"));
    }

    #[test]
    fn test_merge_drops_unknown_ids() {
        let signals = merge_findings(&[RawFinding::found("mystery_signal", "x")]);
        assert_eq!(signals.len(), SIGNAL_DEFINITIONS.len());
        assert!(signals.iter().all(|s| s.id != "mystery_signal"));
    }

    #[test]
    fn test_merge_last_write_wins() {
        let raw = vec![
            RawFinding::missing(ids::LINKEDIN_COMPANY),
            RawFinding::found(ids::LINKEDIN_COMPANY, "linkedin.com/company/acme"),
        ];
        let signals = merge_findings(&raw);
        let li = signals.iter().find(|s| s.id == ids::LINKEDIN_COMPANY).unwrap();
        assert!(li.found);

        let reversed: Vec<_> = raw.into_iter().rev().collect();
        let signals = merge_findings(&reversed);
        let li = signals.iter().find(|s| s.id == ids::LINKEDIN_COMPANY).unwrap();
        assert!(!li.found);
    }

    #[test]
    fn test_merge_keeps_value_for_not_found() {
        let raw = vec![RawFinding::missing_with_value(ids::DOMAIN_AGE, "< 1 year")];
        let signals = merge_findings(&raw);
        let age = signals.iter().find(|s| s.id == ids::DOMAIN_AGE).unwrap();
        assert!(!age.found);
        assert_eq!(age.points, 0);
        assert_eq!(age.value.as_deref(), Some("< 1 year"));
    }
}
