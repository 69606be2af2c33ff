//! Orchestration loop state machine

use super::response::AgentResponse;
use crate::query::context::QueryContext;
use serde::{Deserialize, Serialize};

/// Phase of one orchestration pass.
///
/// ```text
/// Select → Execute → Assess ─┬─▶ Accept ──────────────▶ Terminate
///    ▲                       └─▶ Refine ─┬─▶ (Select)
///    └───────────────────────────────────┘   └─▶ Terminate (budget spent)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoopPhase {
    /// Rank tools for the current query
    Select,
    /// Run the selected tools as one batch
    Execute,
    /// Score the batch and synthesize a candidate
    Assess,
    /// Candidate met the threshold
    Accept,
    /// Keep the best candidate and rewrite the query
    Refine,
    /// Budget exhausted or candidate accepted
    Terminate,
}

impl LoopPhase {
    pub fn as_str(&self) -> &str {
        match self {
            LoopPhase::Select => "select",
            LoopPhase::Execute => "execute",
            LoopPhase::Assess => "assess",
            LoopPhase::Accept => "accept",
            LoopPhase::Refine => "refine",
            LoopPhase::Terminate => "terminate",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, LoopPhase::Terminate)
    }
}

impl std::fmt::Display for LoopPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Transient state of one `process_query` call.
///
/// The current context is replaced, never edited, when the query is refined.
#[derive(Debug, Clone)]
pub struct OrchestrationState {
    pub phase: LoopPhase,
    pub iteration: usize,
    pub max_iterations: usize,
    context: QueryContext,
    best_response: Option<AgentResponse>,
    accepted: Option<AgentResponse>,
}

impl OrchestrationState {
    pub fn new(context: QueryContext, max_iterations: usize) -> Self {
        Self {
            phase: LoopPhase::Select,
            iteration: 0,
            max_iterations,
            context,
            best_response: None,
            accepted: None,
        }
    }

    pub fn context(&self) -> &QueryContext {
        &self.context
    }

    pub fn best_response(&self) -> Option<&AgentResponse> {
        self.best_response.as_ref()
    }

    /// Start a new pass. Returns `false` (and moves to `Terminate`) once the
    /// iteration budget is spent.
    pub fn begin_iteration(&mut self) -> bool {
        if self.iteration >= self.max_iterations {
            self.phase = LoopPhase::Terminate;
            return false;
        }
        self.iteration += 1;
        self.phase = LoopPhase::Select;
        true
    }

    /// Whether another pass is allowed after the current one
    pub fn has_budget(&self) -> bool {
        self.iteration < self.max_iterations
    }

    /// Keep `candidate` if it beats the best response so far.
    ///
    /// Only a strictly higher confidence replaces an existing best response;
    /// equal confidence keeps the earlier candidate.
    pub fn offer_candidate(&mut self, candidate: AgentResponse) -> bool {
        let replace = match &self.best_response {
            None => true,
            Some(best) => candidate.confidence > best.confidence,
        };
        if replace {
            self.best_response = Some(candidate);
        }
        replace
    }

    /// Record the accepted candidate and finish the loop
    pub fn accept(&mut self, candidate: AgentResponse) {
        self.accepted = Some(candidate);
        self.phase = LoopPhase::Accept;
    }

    /// Swap in the context for the next pass
    pub fn advance(&mut self, next: QueryContext) {
        self.context = next;
        self.phase = LoopPhase::Select;
    }

    /// Consume the state, yielding the accepted response, else the best one.
    pub fn into_result(self) -> Option<AgentResponse> {
        self.accepted.or(self.best_response)
    }
}
