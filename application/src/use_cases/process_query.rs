//! Process Query use case.
//!
//! Turns a user question into an [`AgentResponse`]:
//!
//! 1. Resolve the language (`"auto"` asks the translator) and translate the
//!    query to English
//! 2. Build the [`QueryContext`] from the classifier and the memory store
//! 3. Skip the loop with a clarification when the query is out of domain
//! 4. Run the self-correction loop (Select → Execute → Assess → Accept | Refine)
//! 5. Translate back, append preference/confidence notes, store the interaction
//!
//! Collaborator failures anywhere in steps 1 and 2 become a uniform error
//! response; the caller always receives content.

use crate::config::OrchestrationParams;
use crate::ports::classifier::Classifier;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::error::CollaboratorError;
use crate::ports::memory_store::{Interaction, MemoryStore};
use crate::ports::progress::{NoProgress, OrchestrationProgress};
use crate::ports::quality_assessor::QualityAssessor;
use crate::ports::translator::Translator;
use crate::tools::parallel::ParallelExecutor;
use crate::tools::registry::ToolRegistry;
use rag_domain::core::text::truncate_str;
use rag_domain::{
    AgentResponse, LoopPhase, OrchestrationState, QueryContext, ToolOutcome, refine_query,
    synthesize,
};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Failures while building the query context.
///
/// Never returned to callers: [`ProcessQueryUseCase::execute`] converts
/// them into an error response.
#[derive(Error, Debug)]
pub enum ProcessQueryError {
    #[error(transparent)]
    Collaborator(#[from] CollaboratorError),
}

/// Input for the [`ProcessQueryUseCase`].
#[derive(Debug, Clone)]
pub struct ProcessQueryInput {
    pub user_id: String,
    pub thread_id: String,
    /// The user's question, in the user's language
    pub query: String,
    /// ISO 639-1 code, or `"auto"` to detect it
    pub language: String,
}

impl ProcessQueryInput {
    pub fn new(
        user_id: impl Into<String>,
        thread_id: impl Into<String>,
        query: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            thread_id: thread_id.into(),
            query: query.into(),
            language: "en".to_string(),
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Language used when a response must be produced before detection
    fn fallback_language(&self) -> &str {
        if self.language == "auto" {
            "en"
        } else {
            &self.language
        }
    }
}

/// Use case driving the bounded iterate-assess-refine loop.
pub struct ProcessQueryUseCase {
    registry: Arc<ToolRegistry>,
    executor: ParallelExecutor,
    classifier: Arc<dyn Classifier>,
    translator: Arc<dyn Translator>,
    memory: Arc<dyn MemoryStore>,
    assessor: Arc<dyn QualityAssessor>,
    params: OrchestrationParams,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl ProcessQueryUseCase {
    pub fn new(
        registry: Arc<ToolRegistry>,
        classifier: Arc<dyn Classifier>,
        translator: Arc<dyn Translator>,
        memory: Arc<dyn MemoryStore>,
        assessor: Arc<dyn QualityAssessor>,
    ) -> Self {
        Self {
            executor: ParallelExecutor::new(Arc::clone(&registry)),
            registry,
            classifier,
            translator,
            memory,
            assessor,
            params: OrchestrationParams::default(),
            conversation_logger: Arc::new(NoConversationLogger),
        }
    }

    pub fn with_params(mut self, params: OrchestrationParams) -> Self {
        self.params = params;
        self
    }

    /// Create with a conversation logger.
    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    pub fn params(&self) -> &OrchestrationParams {
        &self.params
    }

    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    /// Execute with default (no-op) progress
    pub async fn execute(&self, input: ProcessQueryInput) -> AgentResponse {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: ProcessQueryInput,
        progress: &dyn OrchestrationProgress,
    ) -> AgentResponse {
        let started = Instant::now();
        info!(
            user = %input.user_id,
            thread = %input.thread_id,
            "Processing query: {}",
            truncate_str(&input.query, 100)
        );
        self.conversation_logger.log(ConversationEvent::new(
            "query_received",
            json!({
                "user_id": input.user_id,
                "thread_id": input.thread_id,
                "query": input.query,
                "language": input.language,
            }),
        ));

        let mut response = match self.process(&input, started, progress).await {
            Ok(response) => response,
            Err(e) => {
                error!("Error processing query: {}", e);
                let language = input.fallback_language().to_string();
                let response = AgentResponse::error(&e.to_string()).with_language(&language);
                self.localize(response, &language).await
            }
        };
        response.latency = started.elapsed();

        info!(
            confidence = response.confidence,
            "Query processed in {:.2}s",
            response.latency.as_secs_f64()
        );
        self.conversation_logger.log(ConversationEvent::new(
            "response_ready",
            json!({
                "confidence": response.confidence,
                "sources": response.sources,
                "needs_clarification": response.needs_clarification,
                "latency_ms": response.latency.as_secs_f64() * 1000.0,
            }),
        ));
        progress.on_complete(&response);
        response
    }

    async fn process(
        &self,
        input: &ProcessQueryInput,
        started: Instant,
        progress: &dyn OrchestrationProgress,
    ) -> Result<AgentResponse, ProcessQueryError> {
        let language = if input.language == "auto" {
            let detected = self.translator.detect_language(&input.query).await?;
            debug!("Detected language: {}", detected);
            detected
        } else {
            input.language.clone()
        };

        let context = self.build_context(input, &language).await?;

        if context.domain_relevance < self.params.domain_relevance_threshold {
            info!(
                relevance = context.domain_relevance,
                "Query outside supported domain, asking for clarification"
            );
            let response = AgentResponse::irrelevant().with_language(&language);
            return Ok(self.localize(response, &language).await);
        }

        let response = self.run_loop(&context, progress).await;
        let mut response = self.localize(response, &language).await;
        response.finalize(context.preference_flag("detailed_responses", false));
        response.latency = started.elapsed();

        let interaction = Interaction::from_response(&context, &response);
        if let Err(e) = self
            .memory
            .store_interaction(&context.user_id, &context.thread_id, interaction)
            .await
        {
            warn!("Failed to store interaction: {}", e);
        }

        Ok(response)
    }

    async fn build_context(
        &self,
        input: &ProcessQueryInput,
        language: &str,
    ) -> Result<QueryContext, CollaboratorError> {
        let english = if language == "en" {
            input.query.clone()
        } else {
            self.translator.to_english(&input.query, language).await?
        };

        let classification = self.classifier.classify(&english).await?;
        let history = self
            .memory
            .get_session_history(&input.user_id, &input.thread_id)
            .await?;
        let preferences = self.memory.get_user_preferences(&input.user_id).await?;

        debug!(
            query_type = %classification.query_type,
            relevance = classification.domain_relevance,
            "Classified query"
        );

        Ok(QueryContext::new(&input.user_id, &input.thread_id, english)
            .with_language(language)
            .with_query_type(classification.query_type)
            .with_scores(classification.domain_relevance, classification.confidence)
            .with_history(history)
            .with_preferences(preferences))
    }

    /// The bounded self-correction loop.
    ///
    /// Assessment always scores against the first-pass query; selection and
    /// execution use the current (possibly refined) one.
    async fn run_loop(
        &self,
        context: &QueryContext,
        progress: &dyn OrchestrationProgress,
    ) -> AgentResponse {
        let params = &self.params;
        let original_query = context.query.clone();
        let mut state = OrchestrationState::new(context.clone(), params.max_iterations);
        let mut selected: Vec<String> = Vec::new();
        let mut outcomes: BTreeMap<String, ToolOutcome> = BTreeMap::new();

        state.begin_iteration();

        loop {
            match state.phase {
                LoopPhase::Select => {
                    info!("Processing iteration {}", state.iteration);
                    progress.on_iteration_start(state.iteration, state.max_iterations);
                    self.conversation_logger.log(ConversationEvent::new(
                        "iteration_started",
                        json!({
                            "iteration": state.iteration,
                            "query": state.context().query,
                        }),
                    ));

                    let ctx = state.context();
                    selected = self
                        .registry
                        .select(&ctx.query, ctx, params.strategy, params.max_tools);

                    info!("Selected tools: {:?}", selected);
                    progress.on_tools_selected(&selected);
                    self.conversation_logger.log(ConversationEvent::new(
                        "tools_selected",
                        json!({
                            "iteration": state.iteration,
                            "strategy": params.strategy.as_str(),
                            "tools": selected,
                        }),
                    ));
                    state.phase = LoopPhase::Execute;
                }

                LoopPhase::Execute => {
                    let ctx = Arc::new(state.context().clone());
                    outcomes = self
                        .executor
                        .run_with_progress(
                            &selected,
                            &ctx.query,
                            Arc::clone(&ctx),
                            params.max_workers,
                            params.task_timeout,
                            progress,
                        )
                        .await;

                    for outcome in outcomes.values() {
                        self.conversation_logger.log(ConversationEvent::new(
                            "tool_outcome",
                            json!({
                                "iteration": state.iteration,
                                "tool": outcome.tool_name,
                                "success": outcome.success,
                                "records": outcome.records.len(),
                                "confidence": outcome.confidence,
                                "latency_ms": outcome.latency.as_secs_f64() * 1000.0,
                                "error": outcome.error().map(|e| e.to_string()),
                            }),
                        ));
                    }
                    state.phase = LoopPhase::Assess;
                }

                LoopPhase::Assess => {
                    let score = self.assessor.score(&original_query, &outcomes);
                    let confidence = self
                        .assessor
                        .estimate_confidence(&original_query, &outcomes)
                        .clamp(0.0, 1.0);

                    let ctx = state.context();
                    let synthesis = synthesize(&ctx.query, ctx.query_type, &outcomes);
                    let no_records = synthesis.is_empty();
                    let mut candidate = AgentResponse::new(synthesis.content, confidence)
                        .with_sources(synthesis.sources)
                        .with_tool_outcomes(outcomes.clone())
                        .with_language(&ctx.language);
                    if no_records {
                        candidate = candidate.needing_clarification();
                    }

                    info!(
                        iteration = state.iteration,
                        score, confidence, "Assessed batch quality"
                    );
                    progress.on_assessed(state.iteration, score);
                    self.conversation_logger.log(ConversationEvent::new(
                        "quality_assessed",
                        json!({
                            "iteration": state.iteration,
                            "score": score,
                            "confidence": confidence,
                            "records": synthesis.record_count,
                        }),
                    ));

                    if score >= params.confidence_threshold {
                        info!("Quality threshold met in iteration {}", state.iteration);
                        state.accept(candidate);
                    } else {
                        if state.offer_candidate(candidate) {
                            debug!("Iteration {} holds the best response", state.iteration);
                        }
                        state.phase = LoopPhase::Refine;
                    }
                }

                LoopPhase::Accept => {
                    state.phase = LoopPhase::Terminate;
                }

                LoopPhase::Refine => {
                    if !state.has_budget() {
                        warn!("Max iterations reached, returning best response");
                        state.phase = LoopPhase::Terminate;
                        continue;
                    }

                    let current = state.context().query.clone();
                    let missing = self.assessor.identify_missing(&current, &outcomes);
                    let refined = refine_query(&current, &missing, params.refinement);

                    info!("Refined query: {}", refined);
                    self.conversation_logger.log(ConversationEvent::new(
                        "query_refined",
                        json!({
                            "iteration": state.iteration,
                            "missing": missing,
                            "query": refined,
                        }),
                    ));

                    let next = state.context().with_refined_query(refined);
                    state.advance(next);
                    state.begin_iteration();
                }

                LoopPhase::Terminate => break,
            }
        }

        state.into_result().unwrap_or_else(|| {
            warn!("No candidate response, using fallback");
            AgentResponse::fallback().with_language(&context.language)
        })
    }

    /// Translate user-visible text back to `language`.
    ///
    /// Translation failures keep the English text.
    async fn localize(&self, mut response: AgentResponse, language: &str) -> AgentResponse {
        if language == "en" {
            return response;
        }

        match self.translator.from_english(&response.content, language).await {
            Ok(content) => response.content = content,
            Err(e) => warn!("Failed to translate response: {}", e),
        }

        let mut questions = Vec::with_capacity(response.clarification_questions.len());
        for question in response.clarification_questions.drain(..) {
            match self.translator.from_english(&question, language).await {
                Ok(translated) => questions.push(translated),
                Err(e) => {
                    warn!("Failed to translate clarification question: {}", e);
                    questions.push(question);
                }
            }
        }
        response.clarification_questions = questions;
        response
    }
}
