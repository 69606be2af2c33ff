//! Application layer for agentic-rag
//!
//! This crate contains the tool registry, the parallel executor, the
//! orchestration use cases, and the ports (collaborator contracts) that
//! infrastructure adapters implement. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod tools;
pub mod use_cases;

// Re-export commonly used types
pub use config::OrchestrationParams;
pub use ports::{
    classifier::{Classification, Classifier},
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    error::CollaboratorError,
    feedback_analyzer::FeedbackAnalyzer,
    memory_store::{Interaction, MemoryStore},
    progress::{NoProgress, OrchestrationProgress},
    quality_assessor::QualityAssessor,
    translator::Translator,
};
pub use tools::{
    ledger::PerformanceLedger,
    parallel::ParallelExecutor,
    registry::{
        HealthReport, HealthStatus, RegistryError, RegistryStats, ToolHealth, ToolInfo,
        ToolRegistry, ToolSummary,
    },
};
pub use use_cases::{
    process_feedback::{ProcessFeedbackError, ProcessFeedbackInput, ProcessFeedbackUseCase},
    process_query::{ProcessQueryError, ProcessQueryInput, ProcessQueryUseCase},
};
