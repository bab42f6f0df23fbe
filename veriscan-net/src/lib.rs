//! Veriscan Web Layer
//!
//! Plain-web networking for footprint collectors:
//! - HTTP client builder with rotating user agents and optional egress proxy
//! - Bounded-timeout page fetching with concurrent fan-out
//! - HTML title/meta/text/link extraction and content-hash dedup

pub mod client;
pub mod fetch;
pub mod html;

pub use client::*;
pub use fetch::*;
pub use html::*;
