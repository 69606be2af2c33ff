//! Infrastructure layer for agentic-rag
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: the retrieval tools, the keyword classifier,
//! the glossary translator, the in-memory store, the heuristic quality
//! assessor, the feedback analyzer, JSONL event logging and configuration
//! file loading.

pub mod assessor;
pub mod classifier;
pub mod config;
pub mod feedback;
pub mod logging;
pub mod memory;
pub mod tools;
pub mod translator;

// Re-export commonly used types
pub use assessor::HeuristicAssessor;
pub use classifier::KeywordClassifier;
pub use config::{
    ConfigLoader, ConfigValidationError, FileConfig, FileLoggingConfig, FileOrchestrationConfig,
    FileOutputConfig, FileOutputFormat, FileToolsConfig,
};
pub use feedback::{FeedbackCounts, TallyFeedbackAnalyzer};
pub use logging::JsonlConversationLogger;
pub use memory::{InMemoryStore, MAX_SESSION_HISTORY, default_preferences};
pub use tools::{KNOWLEDGE_BASE, KnowledgeBaseError, KnowledgeBaseTool, KnowledgeEntry};
pub use translator::GlossaryTranslator;

#[cfg(feature = "web-tools")]
pub use tools::{WEB_SEARCH, WebSearchTool};
