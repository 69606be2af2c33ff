//! Console output formatter for agent responses

use crate::output::formatter::OutputFormatter;
use colored::Colorize;
use rag_domain::{AgentResponse, Preferences};

/// Formats agent responses for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Answer, clarification questions, confidence and sources
    pub fn format_text(response: &AgentResponse) -> String {
        let mut output = String::new();

        output.push_str(&response.content);
        output.push('\n');

        if response.needs_clarification && !response.clarification_questions.is_empty() {
            output.push_str(&format!("\n{}\n", "To help me answer:".yellow().bold()));
            for question in &response.clarification_questions {
                output.push_str(&format!("  ? {}\n", question));
            }
        }

        output.push_str(&format!(
            "\n{} {}\n",
            "Confidence:".cyan().bold(),
            Self::confidence_label(response.confidence)
        ));

        if !response.sources.is_empty() {
            output.push_str(&format!("{}\n", "Sources:".cyan().bold()));
            for source in &response.sources {
                output.push_str(&format!("  * {}\n", source));
            }
        }

        output
    }

    /// Text output framed with per-tool outcomes and timing
    pub fn format_full(response: &AgentResponse) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Agentic RAG Response"));
        output.push('\n');
        output.push_str(&format!(
            "{} {}   {} {} ms\n",
            "Language:".cyan().bold(),
            response.language,
            "Latency:".cyan().bold(),
            response.latency.as_millis()
        ));

        output.push_str(&Self::section_header("Answer"));
        output.push('\n');
        output.push_str(&Self::format_text(response));

        if !response.tool_outcomes.is_empty() {
            output.push_str(&Self::section_header("Tool Outcomes"));
            for outcome in response.tool_outcomes.values() {
                if outcome.is_success() {
                    output.push_str(&format!(
                        "  {} {} ({} records, confidence {:.2}, {} ms)\n",
                        "v".green(),
                        outcome.tool_name.bold(),
                        outcome.records.len(),
                        outcome.confidence,
                        outcome.latency.as_millis()
                    ));
                } else {
                    output.push_str(&format!(
                        "  {} {} Error: {}\n",
                        "x".red(),
                        outcome.tool_name.bold(),
                        outcome
                            .error()
                            .map(|e| e.to_string())
                            .unwrap_or_else(|| "Unknown".to_string())
                    ));
                }
            }
        }

        output.push_str(&Self::footer());
        output
    }

    /// Format as JSON
    pub fn format_json(response: &AgentResponse) -> String {
        serde_json::to_string_pretty(response).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn format_preferences(preferences: &Preferences) -> String {
        let mut output = format!("{}\n", "Preferences updated:".green().bold());
        if preferences.is_empty() {
            output.push_str("  (no changes)\n");
        }
        for (key, value) in preferences {
            output.push_str(&format!("  {} = {}\n", key, value));
        }
        output
    }

    fn confidence_label(confidence: f64) -> String {
        let percent = format!("{:.0}%", confidence * 100.0);
        if confidence >= 0.8 {
            percent.green().to_string()
        } else if confidence >= 0.5 {
            percent.yellow().to_string()
        } else {
            percent.red().to_string()
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_text(&self, response: &AgentResponse) -> String {
        Self::format_text(response)
    }

    fn format_full(&self, response: &AgentResponse) -> String {
        Self::format_full(response)
    }

    fn format_json(&self, response: &AgentResponse) -> String {
        Self::format_json(response)
    }

    fn format_preferences(&self, preferences: &Preferences) -> String {
        Self::format_preferences(preferences)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rag_domain::{OutputFormat, ResultRecord, ToolError, ToolOutcome};
    use std::collections::BTreeMap;
    use std::time::Duration;

    fn plain() {
        colored::control::set_override(false);
    }

    fn sample() -> AgentResponse {
        let outcomes: BTreeMap<String, ToolOutcome> = [
            ToolOutcome::success("knowledge_base", vec![ResultRecord::new("Resize the instance")])
                .with_confidence(0.7),
            ToolOutcome::failure("web_search", ToolError::execution_failed("offline")),
        ]
        .into_iter()
        .map(|o| (o.tool_name.clone(), o))
        .collect();

        AgentResponse::new("Check CPU credits.", 0.85)
            .with_sources(vec!["https://docs.aws.amazon.com/ec2/".to_string()])
            .with_tool_outcomes(outcomes)
            .with_latency(Duration::from_millis(120))
    }

    #[test]
    fn test_text_output() {
        plain();
        let text = ConsoleFormatter::format_text(&sample());
        assert!(text.starts_with("Check CPU credits."));
        assert!(text.contains("Confidence: 85%"));
        assert!(text.contains("  * https://docs.aws.amazon.com/ec2/"));
        assert!(!text.contains("knowledge_base"));
    }

    #[test]
    fn test_clarification_questions_listed() {
        plain();
        let text = ConsoleFormatter::format_text(&AgentResponse::irrelevant());
        assert_eq!(text.matches("  ? ").count(), 3);
    }

    #[test]
    fn test_full_output_lists_outcomes() {
        plain();
        let full = ConsoleFormatter.render(&sample(), OutputFormat::Full);
        assert!(full.contains("Latency: 120 ms"));
        assert!(full.contains("knowledge_base (1 records"));
        assert!(full.contains("web_search Error:"));
    }

    #[test]
    fn test_json_output() {
        let json = ConsoleFormatter.render(&sample(), OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["confidence"], 0.85);
        assert_eq!(value["latency_ms"], 120.0);
    }

    #[test]
    fn test_preferences_output() {
        plain();
        let mut preferences = Preferences::new();
        preferences.insert("detailed_responses".into(), true.into());
        let text = ConsoleFormatter::format_preferences(&preferences);
        assert!(text.contains("detailed_responses = true"));
        assert!(ConsoleFormatter::format_preferences(&Preferences::new()).contains("no changes"));
    }
}
