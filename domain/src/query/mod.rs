//! Query domain module
//!
//! A [`QueryContext`] is the read-only snapshot every tool in a batch sees.
//! It is never mutated in place: refinement produces a new context via
//! [`QueryContext::with_refined_query`], so concurrent tool calls reading
//! the same `Arc<QueryContext>` can never observe a half-updated query.

pub mod context;
pub mod query_type;

pub use context::{Preferences, QueryContext, Turn};
pub use query_type::QueryType;
