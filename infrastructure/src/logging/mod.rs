//! Structured conversation logging to JSONL files.

mod jsonl_logger;

pub use jsonl_logger::JsonlConversationLogger;
