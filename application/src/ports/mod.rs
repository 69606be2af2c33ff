//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.
//! Collaborators that may fail report a [`CollaboratorError`](error::CollaboratorError);
//! the use cases turn those into uniform responses.

pub mod classifier;
pub mod conversation_logger;
pub mod error;
pub mod feedback_analyzer;
pub mod memory_store;
pub mod progress;
pub mod quality_assessor;
pub mod translator;
