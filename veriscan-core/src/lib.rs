//! Veriscan Core - signal registry and deterministic scoring engine
//!
//! This crate provides the foundational primitives:
//! - Static signal definition registry with fixed category point budgets
//! - Merger reconciling raw collector findings against the registry
//! - Category scoring, penalty rules, and clamped total composition
//! - Diligence effort estimation
//!
//! Everything in this crate is pure and synchronous. Collectors and scan
//! orchestration live in their own crates and feed their output through
//! [`merge_findings`] and [`score_signals`].

pub mod registry;
pub mod signal;
pub mod score;
pub mod penalty;
pub mod effort;
pub mod report;

pub use registry::*;
pub use signal::*;
pub use score::*;
pub use penalty::*;
pub use effort::*;
pub use report::*;

/// Ceiling the composed coverage score is clamped to
pub const SCORE_CEILING: i32 = 100;

/// Total points across all signal definitions
pub const TOTAL_SIGNAL_POINTS: u32 = 85;
