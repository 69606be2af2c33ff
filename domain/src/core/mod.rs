//! Core domain concepts shared across all subdomains.
//!
//! - [`error::DomainError`]: domain-level errors
//! - [`text`]: word-set and truncation helpers used by scoring and refinement
//! - [`duration_ms`]: serde adapter that writes durations as milliseconds

pub mod duration_ms;
pub mod error;
pub mod text;
