//! Application-level configuration.
//!
//! - [`OrchestrationParams`]: iteration budget, thresholds, selection and
//!   batch limits for [`ProcessQueryUseCase`](crate::use_cases::process_query::ProcessQueryUseCase)

pub mod orchestration_params;

pub use orchestration_params::OrchestrationParams;
