//! Scan orchestration runtime
//!
//! Ties the collector fan-out to the pure scoring core:
//! - Profiles configure a scan (timeouts, toggles, keys)
//! - The engine drives bootstrap, fan-out, merge, score, interpretation
//! - The store tracks scan lifecycle for embedding front ends

pub mod profile;
pub mod scan;
pub mod store;

pub use profile::*;
pub use scan::*;
pub use store::*;
