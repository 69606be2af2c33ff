//! Concrete retrieval tools
//!
//! | Tool | Category | Backend | Feature |
//! |------|----------|---------|---------|
//! | `knowledge_base` | search | curated entries, optionally loaded from JSON | always |
//! | `web_search` | search | DuckDuckGo Instant Answer API | `web-tools` |

pub mod knowledge_base;
#[cfg(feature = "web-tools")]
pub mod web;

pub use knowledge_base::{KNOWLEDGE_BASE, KnowledgeBaseError, KnowledgeBaseTool, KnowledgeEntry};
#[cfg(feature = "web-tools")]
pub use web::{WEB_SEARCH, WebSearchTool};
