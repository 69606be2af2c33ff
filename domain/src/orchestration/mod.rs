//! Orchestration domain
//!
//! Pure pieces of the bounded self-correction loop:
//!
//! - [`state`]: loop phases and the per-request [`OrchestrationState`]
//! - [`response`]: the [`AgentResponse`] returned to callers, with fixed
//!   fallback texts
//! - [`synthesis`]: turns a batch of outcomes into candidate content
//! - [`refinement`]: bounded growth of the query between passes
//!
//! The application layer drives the loop; nothing here performs I/O.

pub mod refinement;
pub mod response;
pub mod state;
pub mod synthesis;

pub use refinement::{RefinementLimits, refine_query};
pub use response::AgentResponse;
pub use state::{LoopPhase, OrchestrationState};
pub use synthesis::{Synthesis, synthesize};
