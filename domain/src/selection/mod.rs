//! Tool selection domain
//!
//! Four named strategies rank registered tools for a query:
//!
//! | Strategy | Ranking |
//! |----------|---------|
//! | `performance` | Success rate, latency and usage from the ledger |
//! | `category` | Fixed query-type → category table, walked in order |
//! | `relevance` | Word overlap between query and tool description |
//! | `hybrid` | Position-weighted blend of the three above (default) |
//!
//! The scoring functions in [`scoring`] are pure; the registry in the
//! application layer feeds them its tool map and performance ledger.

pub mod scoring;
pub mod strategy;

pub use strategy::SelectionStrategy;
