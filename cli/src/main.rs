//! CLI entrypoint for agentic-rag
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use rag_application::{
    ConversationLogger, NoConversationLogger, OrchestrationParams, ProcessFeedbackInput,
    ProcessFeedbackUseCase, ProcessQueryInput, ProcessQueryUseCase, ToolRegistry,
};
use rag_domain::OutputFormat;
use rag_infrastructure::{
    ConfigLoader, FileConfig, GlossaryTranslator, HeuristicAssessor, InMemoryStore,
    JsonlConversationLogger, KeywordClassifier, KnowledgeBaseTool, TallyFeedbackAnalyzer,
};
use rag_presentation::{
    Cli, ConsoleFormatter, FeedbackArg, OutputFormatter, ProgressReporter, SimpleProgress,
};
use std::io::IsTerminal;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        return Ok(());
    }

    let config = load_config(&cli)?;
    let _log_guard = init_tracing(cli.verbose, config.logging.file.as_deref());

    info!("Starting agentic-rag");

    let problems = config.validate();
    if !problems.is_empty() {
        let list = problems
            .iter()
            .map(|p| format!("  - {}", p))
            .collect::<Vec<_>>()
            .join("\n");
        bail!("Invalid configuration:\n{}", list);
    }

    if !config.output.color {
        colored::control::set_override(false);
    }

    let conversation_logger = conversation_logger(&cli, &config);
    let memory = Arc::new(InMemoryStore::new());

    if let Some(feedback) = &cli.feedback {
        return run_feedback(&cli, feedback, memory, conversation_logger).await;
    }

    let question = match cli.question.as_deref().map(str::trim) {
        Some(q) if !q.is_empty() => q.to_string(),
        _ => bail!("Question is required. Use --feedback to rate an earlier answer."),
    };

    let params = orchestration_params(&cli, &config)?;
    let registry = Arc::new(build_registry(&cli, &config)?);
    info!("Registered tools: {:?}", registry.tool_names());

    let use_case = ProcessQueryUseCase::new(
        registry,
        Arc::new(KeywordClassifier::new()),
        Arc::new(GlossaryTranslator::new()),
        memory,
        Arc::new(HeuristicAssessor::new()),
    )
    .with_params(params)
    .with_conversation_logger(conversation_logger);

    let mut input = ProcessQueryInput::new(&cli.user, &cli.thread, question);
    if let Some(language) = &cli.language {
        input = input.with_language(language);
    }

    let format = cli.output.or(config.output.format).unwrap_or_default();
    let show_progress = !cli.quiet && format != OutputFormat::Json;

    let response = if show_progress && std::io::stderr().is_terminal() {
        let progress = ProgressReporter::new();
        use_case.execute_with_progress(input, &progress).await
    } else if show_progress {
        use_case.execute_with_progress(input, &SimpleProgress).await
    } else {
        use_case.execute(input).await
    };

    println!("{}", ConsoleFormatter.render(&response, format));

    Ok(())
}

fn load_config(cli: &Cli) -> Result<FileConfig> {
    if cli.no_config {
        return Ok(ConfigLoader::load_defaults());
    }
    ConfigLoader::load(cli.config.as_deref()).context("Failed to load configuration")
}

/// stderr logging by verbosity, plus an optional plain-text file sink
fn init_tracing(verbose: u8, log_file: Option<&Path>) -> Option<WorkerGuard> {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let (file_layer, guard) = match log_file.and_then(file_appender) {
        Some(appender) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .ok();

    guard
}

fn file_appender(path: &Path) -> Option<RollingFileAppender> {
    let name = path.file_name()?.to_string_lossy().into_owned();
    let dir = path
        .parent()
        .filter(|d| !d.as_os_str().is_empty())
        .unwrap_or(Path::new("."));

    match RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(name)
        .build(dir)
    {
        Ok(appender) => Some(appender),
        Err(e) => {
            eprintln!("Could not open log file {}: {}", path.display(), e);
            None
        }
    }
}

fn conversation_logger(cli: &Cli, config: &FileConfig) -> Arc<dyn ConversationLogger> {
    let path = cli
        .conversation_log
        .as_ref()
        .or(config.logging.conversation_log.as_ref());

    match path.and_then(JsonlConversationLogger::new) {
        Some(logger) => {
            info!("Conversation log: {}", logger.path().display());
            Arc::new(logger)
        }
        None => Arc::new(NoConversationLogger),
    }
}

fn orchestration_params(cli: &Cli, config: &FileConfig) -> Result<OrchestrationParams> {
    let mut orchestration = config.orchestration.clone();
    if let Some(strategy) = cli.strategy {
        orchestration.strategy = strategy.as_str().to_string();
    }
    if let Some(max_iterations) = cli.max_iterations {
        orchestration.max_iterations = max_iterations;
    }
    Ok(orchestration.to_params()?)
}

fn build_registry(cli: &Cli, config: &FileConfig) -> Result<ToolRegistry> {
    let registry = ToolRegistry::new();

    let knowledge_base = match cli.knowledge_base.as_ref().or(config.tools.knowledge_base.as_ref()) {
        Some(path) => KnowledgeBaseTool::from_json_file(path)
            .with_context(|| format!("Failed to load knowledge base {}", path.display()))?,
        None => KnowledgeBaseTool::seeded(),
    };
    info!("Knowledge base entries: {}", knowledge_base.len());
    registry.register(Arc::new(knowledge_base));

    if config.tools.web_search {
        register_web_search(&registry, config);
    }

    Ok(registry)
}

#[cfg(feature = "web-tools")]
fn register_web_search(registry: &ToolRegistry, config: &FileConfig) {
    match rag_infrastructure::WebSearchTool::new(config.tools.web_timeout()) {
        Ok(tool) => {
            registry.register(Arc::new(tool));
        }
        Err(e) => warn!("Web search disabled: {}", e),
    }
}

#[cfg(not(feature = "web-tools"))]
fn register_web_search(_registry: &ToolRegistry, _config: &FileConfig) {
    warn!("Web search is enabled in config but this build lacks the web-tools feature");
}

async fn run_feedback(
    cli: &Cli,
    feedback: &FeedbackArg,
    memory: Arc<InMemoryStore>,
    conversation_logger: Arc<dyn ConversationLogger>,
) -> Result<()> {
    let use_case = ProcessFeedbackUseCase::new(Arc::new(TallyFeedbackAnalyzer::new()), memory)
        .with_conversation_logger(conversation_logger);

    let preferences = use_case
        .execute(ProcessFeedbackInput::new(
            &cli.user,
            &cli.thread,
            &feedback.message_id,
            feedback.feedback_type,
        ))
        .await?;

    println!("{}", ConsoleFormatter.format_preferences(&preferences));
    Ok(())
}
