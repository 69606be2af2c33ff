//! Configuration file loading for agentic-rag
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `AGENTIC_RAG_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./agentic-rag.toml` or `./.agentic-rag.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/agentic-rag/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileConfig, FileLoggingConfig, FileOrchestrationConfig,
    FileOutputConfig, FileOutputFormat, FileToolsConfig,
};
pub use loader::ConfigLoader;
