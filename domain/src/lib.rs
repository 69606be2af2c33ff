//! Domain layer for agentic-rag
//!
//! This crate contains the core types, value objects, and pure scoring logic
//! of the iterative retrieval orchestrator. It has no dependencies on
//! infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Tools and Outcomes
//!
//! A **tool** is a pluggable retrieval capability (knowledge base lookup,
//! web search, ...) exposing `validate` and `execute`. Every invocation
//! produces exactly one immutable [`ToolOutcome`].
//!
//! ## Selection
//!
//! A [`SelectionStrategy`] ranks registered tools for a query. The scoring
//! functions live in [`selection::scoring`] and are deterministic.
//!
//! ## Orchestration
//!
//! The bounded self-correction loop moves through the [`LoopPhase`] states
//! `Select → Execute → Assess → {Accept | Refine} → Terminate`, producing a
//! new [`QueryContext`] for every refined pass.

pub mod config;
pub mod core;
pub mod feedback;
pub mod orchestration;
pub mod query;
pub mod selection;
pub mod tool;

// Re-export commonly used types
pub use config::OutputFormat;
pub use core::error::DomainError;
pub use feedback::{Feedback, FeedbackType};
pub use orchestration::{
    refinement::{RefinementLimits, refine_query},
    response::AgentResponse,
    state::{LoopPhase, OrchestrationState},
    synthesis::{Synthesis, synthesize},
};
pub use query::{
    context::{Preferences, QueryContext, Turn},
    query_type::QueryType,
};
pub use selection::strategy::SelectionStrategy;
pub use tool::{
    performance::{ERROR_HISTORY_LIMIT, ErrorSample, PerformanceRecord},
    traits::Tool,
    value_objects::{ResultRecord, ToolError, ToolOutcome},
};
