//! Tool management
//!
//! - [`registry::ToolRegistry`]: owns tool instances, the category index and
//!   the [`ledger::PerformanceLedger`]; implements the selection strategies
//! - [`parallel::ParallelExecutor`]: bounded concurrent fan-out with one
//!   shared deadline per batch

pub mod ledger;
pub mod parallel;
pub mod registry;

pub use ledger::PerformanceLedger;
pub use parallel::ParallelExecutor;
pub use registry::{RegistryError, ToolRegistry};

#[cfg(test)]
pub(crate) mod stub;
