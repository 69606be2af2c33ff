//! Output formatter trait

use rag_domain::{AgentResponse, OutputFormat, Preferences};

/// Trait for formatting agent responses
pub trait OutputFormatter {
    /// Answer text with confidence and sources
    fn format_text(&self, response: &AgentResponse) -> String;

    /// Answer plus per-tool outcomes and timing
    fn format_full(&self, response: &AgentResponse) -> String;

    /// Format as JSON
    fn format_json(&self, response: &AgentResponse) -> String;

    /// Preferences after a feedback update
    fn format_preferences(&self, preferences: &Preferences) -> String;

    /// Dispatch on the configured format
    fn render(&self, response: &AgentResponse, format: OutputFormat) -> String {
        match format {
            OutputFormat::Text => self.format_text(response),
            OutputFormat::Full => self.format_full(response),
            OutputFormat::Json => self.format_json(response),
        }
    }
}
