//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod logging;
mod orchestration;
mod output;
mod tools;

pub use logging::FileLoggingConfig;
pub use orchestration::FileOrchestrationConfig;
pub use output::{FileOutputConfig, FileOutputFormat};
pub use tools::FileToolsConfig;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A configuration value the application cannot run with
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigValidationError {
    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("{field} must be between 0.0 and 1.0 (got {value})")]
    ThresholdOutOfRange { field: &'static str, value: f64 },

    #[error("unknown selection strategy '{value}' (valid: {valid})")]
    UnknownStrategy { value: String, valid: String },
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Loop, selection and batch settings
    pub orchestration: FileOrchestrationConfig,
    /// Retrieval tool settings
    pub tools: FileToolsConfig,
    /// Output settings
    pub output: FileOutputConfig,
    /// Log sinks
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected problems.
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = self.orchestration.validate();
        if self.tools.web_timeout_seconds == 0 {
            errors.push(ConfigValidationError::Zero {
                field: "tools.web_timeout_seconds",
            });
        }
        errors
    }
}
