//! Veriscan Collectors
//!
//! Best-effort adapters for each footprint data source:
//! - website: homepage/subpage crawl, discovers the company name (bootstrap)
//! - domain: RDAP registration lookup, derives domain age
//! - search: news coverage, third-party mentions, review presence
//! - professional: LinkedIn company and executive presence
//! - jobs: job-board presence
//! - tech: https check and stack fingerprinting
//! - filings: SEC EDGAR registration and filing facts
//!
//! Every collector isolates its own failures: `collect` never fails,
//! problems land in the output's error list and the affected signals
//! stay unreported. The LLM interpretation backend lives here too.

pub mod traits;
pub mod website;
pub mod domain;
pub mod search;
pub mod professional;
pub mod jobs;
pub mod tech;
pub mod filings;
pub mod interpret;

pub use traits::*;
pub use website::*;
pub use domain::*;
pub use search::*;
pub use professional::*;
pub use jobs::*;
pub use tech::*;
pub use filings::*;
pub use interpret::*;
