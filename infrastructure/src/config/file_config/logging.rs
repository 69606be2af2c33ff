//! Logging configuration from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw logging configuration from TOML
///
/// ```toml
/// [logging]
/// conversation_log = "~/.local/share/agentic-rag/conversation.jsonl"
/// file = "~/.local/share/agentic-rag/agentic-rag.log"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// JSONL transcript of orchestration events
    pub conversation_log: Option<PathBuf>,
    /// Diagnostic log file (in addition to stderr)
    pub file: Option<PathBuf>,
}
