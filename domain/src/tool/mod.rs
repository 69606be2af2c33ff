//! Tool domain module
//!
//! This module defines the capability contract every retrieval tool exposes
//! and the immutable values a tool invocation produces.
//!
//! # Overview
//!
//! ```text
//! ┌──────────────┐  validate/execute  ┌──────────────┐    ┌───────────────────┐
//! │ Tool         │───────────────────▶│ ToolOutcome  │───▶│ PerformanceRecord │
//! │ (capability) │                    │ (immutable)  │    │ (rolling stats)   │
//! └──────────────┘                    └──────────────┘    └───────────────────┘
//! ```
//!
//! # Failure Taxonomy
//!
//! Every failure is resolved into a failed [`ToolOutcome`] carrying a
//! [`ToolError`] code; nothing crosses the concurrency boundary as a panic
//! or an `Err`:
//!
//! | Code | Cause |
//! |------|-------|
//! | `VALIDATION_FAILED` | The tool rejected the query in `validate` |
//! | `EXECUTION_FAILED` | `execute` returned `Err` or panicked |
//! | `MALFORMED_OUTPUT` | `execute` returned an outcome with out-of-range values |
//! | `TIMEOUT` | The batch deadline elapsed before the tool finished |
//! | `NOT_FOUND` | The name is not registered |
//!
//! # Architecture
//!
//! - **Domain** (this module): the [`Tool`] trait and value objects, no I/O
//! - **Application** (`ToolRegistry`, `ParallelExecutor`): selection,
//!   bookkeeping and concurrent fan-out
//! - **Infrastructure**: concrete tools (knowledge base, web search)

pub mod performance;
pub mod traits;
pub mod value_objects;

pub use performance::{ERROR_HISTORY_LIMIT, ErrorSample, PerformanceRecord};
pub use traits::Tool;
pub use value_objects::{ResultRecord, ToolError, ToolOutcome};
