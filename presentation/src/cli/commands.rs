//! CLI command definitions

use clap::Parser;
use rag_domain::{FeedbackType, OutputFormat, SelectionStrategy};
use std::path::PathBuf;

/// `MESSAGE_ID=TYPE` argument of `--feedback`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackArg {
    pub message_id: String,
    pub feedback_type: FeedbackType,
}

fn parse_feedback(value: &str) -> Result<FeedbackArg, String> {
    let (message_id, kind) = value
        .split_once('=')
        .ok_or_else(|| format!("expected MESSAGE_ID=TYPE, got '{}'", value))?;
    let message_id = message_id.trim();
    if message_id.is_empty() {
        return Err("message id must not be empty".to_string());
    }
    let feedback_type = kind.parse::<FeedbackType>().map_err(|e| e.to_string())?;
    Ok(FeedbackArg {
        message_id: message_id.to_string(),
        feedback_type,
    })
}

/// CLI arguments for agentic-rag
#[derive(Parser, Debug)]
#[command(name = "agentic-rag")]
#[command(author, version, about = "Self-correcting retrieval assistant for AWS and Azure questions")]
#[command(long_about = r#"
agentic-rag answers cloud troubleshooting and advisory questions by running
retrieval tools in parallel, scoring what comes back and refining the query
until the answer is good enough or the iteration budget runs out.

Each pass:
1. Select: rank registered tools for the query
2. Execute: run the selected tools concurrently under one deadline
3. Assess: score the batch and keep the best candidate
4. Refine: append missing terms to the query and try again

Configuration files are loaded from (in priority order):
1. AGENTIC_RAG_* environment variables
2. --config <path>          Explicit config file
3. ./agentic-rag.toml       Project-level config
4. ~/.config/agentic-rag/config.toml   Global config

Example:
  agentic-rag "My EC2 instance is slow after resizing"
  agentic-rag --strategy relevance --output full "compare s3 and blob storage"
  agentic-rag --feedback msg-42=too_detailed
"#)]
pub struct Cli {
    /// The question to answer (not required with --feedback or --show-config)
    pub question: Option<String>,

    /// User identifier for memory and preferences
    #[arg(long, value_name = "ID", default_value = "cli-user")]
    pub user: String,

    /// Conversation thread identifier
    #[arg(long, value_name = "ID", default_value = "default")]
    pub thread: String,

    /// Language of the question, or "auto" to detect it
    #[arg(short, long, value_name = "CODE")]
    pub language: Option<String>,

    /// Tool selection strategy (performance, category, relevance, hybrid)
    #[arg(short, long, value_name = "NAME")]
    pub strategy: Option<SelectionStrategy>,

    /// Maximum select/execute/assess passes
    #[arg(long, value_name = "N")]
    pub max_iterations: Option<usize>,

    /// Output format (text, full, json)
    #[arg(short, long, value_name = "FORMAT")]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// JSON file of knowledge-base entries (replaces the built-in seed)
    #[arg(long, value_name = "PATH")]
    pub knowledge_base: Option<PathBuf>,

    /// Append orchestration events to this JSONL file
    #[arg(long, value_name = "PATH")]
    pub conversation_log: Option<PathBuf>,

    /// Record feedback on a previous response and exit
    #[arg(long, value_name = "MESSAGE_ID=TYPE", value_parser = parse_feedback)]
    pub feedback: Option<FeedbackArg>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_question_and_overrides() {
        let cli = Cli::try_parse_from([
            "agentic-rag",
            "--strategy",
            "relevance",
            "--output",
            "json",
            "-vv",
            "ec2 is slow",
        ])
        .unwrap();

        assert_eq!(cli.question.as_deref(), Some("ec2 is slow"));
        assert_eq!(cli.strategy, Some(SelectionStrategy::Relevance));
        assert_eq!(cli.output, Some(OutputFormat::Json));
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.user, "cli-user");
    }

    #[test]
    fn test_invalid_strategy_rejected() {
        assert!(Cli::try_parse_from(["agentic-rag", "--strategy", "fastest", "q"]).is_err());
    }

    #[test]
    fn test_feedback_argument() {
        let cli = Cli::try_parse_from(["agentic-rag", "--feedback", "msg-1=too-detailed"]).unwrap();
        assert_eq!(
            cli.feedback,
            Some(FeedbackArg {
                message_id: "msg-1".to_string(),
                feedback_type: FeedbackType::TooDetailed,
            })
        );

        assert!(parse_feedback("msg-1").is_err());
        assert!(parse_feedback("=positive").is_err());
        assert!(parse_feedback("msg-1=meh").is_err());
    }
}
