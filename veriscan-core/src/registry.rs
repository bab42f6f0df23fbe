//! Signal definition registry
//!
//! The static catalog of every checkable footprint signal: id, category,
//! point value, and provenance label. Loaded once, never mutated; this is
//! the source of truth for scoring weights.

use serde::{Deserialize, Serialize};

/// Signal ids, as emitted by collectors and matched by the merger.
pub mod ids {
    pub const WEBSITE_LIVE: &str = "website_live";
    pub const COMPANY_DESCRIPTION: &str = "company_description";
    pub const DOMAIN_AGE: &str = "domain_age";
    pub const CONTACT_INFO: &str = "contact_info";
    pub const SSL_CERTIFICATE: &str = "ssl_certificate";
    pub const PHYSICAL_ADDRESS: &str = "physical_address";
    pub const ABOUT_PAGE: &str = "about_page";
    pub const EXECUTIVES_FOUND: &str = "executives_found";
    pub const LINKEDIN_COMPANY: &str = "linkedin_company";
    pub const LEADERSHIP_ON_SITE: &str = "leadership_on_site";
    pub const FOUNDER_BACKGROUND: &str = "founder_background";
    pub const NEWS_COVERAGE: &str = "news_coverage";
    pub const BUSINESS_REGISTRATION: &str = "business_registration";
    pub const THIRD_PARTY_MENTIONS: &str = "third_party_mentions";
    pub const REVIEW_PRESENCE: &str = "review_presence";
    pub const JOB_POSTINGS: &str = "job_postings";
    pub const TECH_STACK_DETECTED: &str = "tech_stack_detected";
    pub const SOCIAL_MEDIA_ACTIVE: &str = "social_media_active";
    pub const EMPLOYEE_COUNT_PUBLIC: &str = "employee_count_public";
}

/// The four fixed signal categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Identity,
    Leadership,
    Validation,
    Operational,
}

impl Category {
    /// All categories in display order
    pub const ALL: [Category; 4] = [
        Self::Identity,
        Self::Leadership,
        Self::Validation,
        Self::Operational,
    ];

    /// Stable key for storage/display
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Identity => "identity",
            Self::Leadership => "leadership",
            Self::Validation => "validation",
            Self::Operational => "operational",
        }
    }

    /// Human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Identity => "Company Identity",
            Self::Leadership => "Leadership & People",
            Self::Validation => "External Validation",
            Self::Operational => "Operational Signals",
        }
    }

    /// Maximum achievable points in this category
    pub fn max_score(&self) -> u32 {
        match self {
            Self::Identity => 25,
            Self::Leadership => 20,
            Self::Validation => 25,
            Self::Operational => 15,
        }
    }

    /// What the category measures
    pub fn description(&self) -> &'static str {
        match self {
            Self::Identity => "Who the company says it is, and whether that holds up",
            Self::Leadership => "Whether real, named people stand behind the company",
            Self::Validation => "Evidence from sources the company does not control",
            Self::Operational => "Signs of day-to-day business activity",
        }
    }
}

/// A single checkable footprint signal
#[derive(Debug, Clone, Serialize)]
pub struct SignalDefinition {
    /// Unique key, matched against collector findings
    pub id: &'static str,
    /// Human-readable name
    pub name: &'static str,
    /// What finding this signal means
    pub description: &'static str,
    /// Scoring category
    pub category: Category,
    /// Points awarded when found
    pub points: u32,
    /// Provenance label (which data source checks this)
    pub source: &'static str,
}

/// All signal definitions, in scoring order. Per-category point sums equal
/// the category max scores (25/20/25/15).
pub static SIGNAL_DEFINITIONS: &[SignalDefinition] = &[
    // Identity (25)
    SignalDefinition {
        id: ids::WEBSITE_LIVE,
        name: "Website Live",
        description: "Company website is reachable and serves real content",
        category: Category::Identity,
        points: 5,
        source: "Website Crawl",
    },
    SignalDefinition {
        id: ids::COMPANY_DESCRIPTION,
        name: "Company Description",
        description: "Site clearly describes what the company does",
        category: Category::Identity,
        points: 4,
        source: "Website Crawl",
    },
    SignalDefinition {
        id: ids::DOMAIN_AGE,
        name: "Domain Age",
        description: "Domain registered at least two years ago",
        category: Category::Identity,
        points: 4,
        source: "Domain Registry",
    },
    SignalDefinition {
        id: ids::CONTACT_INFO,
        name: "Contact Information",
        description: "Contact email or phone number published on the site",
        category: Category::Identity,
        points: 3,
        source: "Website Crawl",
    },
    SignalDefinition {
        id: ids::SSL_CERTIFICATE,
        name: "SSL Certificate",
        description: "Site serves over HTTPS with a valid certificate",
        category: Category::Identity,
        points: 3,
        source: "Tech Fingerprint",
    },
    SignalDefinition {
        id: ids::PHYSICAL_ADDRESS,
        name: "Physical Address",
        description: "Street address published on the site",
        category: Category::Identity,
        points: 3,
        source: "Website Crawl",
    },
    SignalDefinition {
        id: ids::ABOUT_PAGE,
        name: "About Page",
        description: "Dedicated about or company page exists",
        category: Category::Identity,
        points: 3,
        source: "Website Crawl",
    },
    // Leadership (20)
    SignalDefinition {
        id: ids::EXECUTIVES_FOUND,
        name: "Executives Identified",
        description: "Named executives found on professional networks",
        category: Category::Leadership,
        points: 7,
        source: "Professional Network",
    },
    SignalDefinition {
        id: ids::LINKEDIN_COMPANY,
        name: "LinkedIn Company Page",
        description: "Company page exists on LinkedIn",
        category: Category::Leadership,
        points: 6,
        source: "Professional Network",
    },
    SignalDefinition {
        id: ids::LEADERSHIP_ON_SITE,
        name: "Leadership On Site",
        description: "Team or leadership page on the company site",
        category: Category::Leadership,
        points: 4,
        source: "Website Crawl",
    },
    SignalDefinition {
        id: ids::FOUNDER_BACKGROUND,
        name: "Founder Background",
        description: "Founder profile with verifiable history",
        category: Category::Leadership,
        points: 3,
        source: "Professional Network",
    },
    // Validation (25)
    SignalDefinition {
        id: ids::NEWS_COVERAGE,
        name: "News Coverage",
        description: "Company covered by news or press outlets",
        category: Category::Validation,
        points: 7,
        source: "Search Engine",
    },
    SignalDefinition {
        id: ids::BUSINESS_REGISTRATION,
        name: "Business Registration",
        description: "Company appears in an official filing registry",
        category: Category::Validation,
        points: 7,
        source: "Financial Filings",
    },
    SignalDefinition {
        id: ids::THIRD_PARTY_MENTIONS,
        name: "Third-Party Mentions",
        description: "Mentioned on sites the company does not control",
        category: Category::Validation,
        points: 6,
        source: "Search Engine",
    },
    SignalDefinition {
        id: ids::REVIEW_PRESENCE,
        name: "Review Presence",
        description: "Profile on a customer or employee review platform",
        category: Category::Validation,
        points: 5,
        source: "Search Engine",
    },
    // Operational (15)
    SignalDefinition {
        id: ids::JOB_POSTINGS,
        name: "Job Postings",
        description: "Active job postings on hiring platforms",
        category: Category::Operational,
        points: 5,
        source: "Job Boards",
    },
    SignalDefinition {
        id: ids::TECH_STACK_DETECTED,
        name: "Tech Stack Detected",
        description: "Identifiable technology platform or analytics stack",
        category: Category::Operational,
        points: 4,
        source: "Tech Fingerprint",
    },
    SignalDefinition {
        id: ids::SOCIAL_MEDIA_ACTIVE,
        name: "Social Media Presence",
        description: "Social profiles linked from the company site",
        category: Category::Operational,
        points: 3,
        source: "Website Crawl",
    },
    SignalDefinition {
        id: ids::EMPLOYEE_COUNT_PUBLIC,
        name: "Employee Count Public",
        description: "Public employee count or range",
        category: Category::Operational,
        points: 3,
        source: "Professional Network",
    },
];

/// Look up a definition by id
pub fn definition(id: &str) -> Option<&'static SignalDefinition> {
    SIGNAL_DEFINITIONS.iter().find(|d| d.id == id)
}

/// Definitions belonging to one category, in registry order
pub fn category_definitions(
    category: Category,
) -> impl Iterator<Item = &'static SignalDefinition> {
    SIGNAL_DEFINITIONS.iter().filter(move |d| d.category == category)
}
