//! Scripted tool double shared by the registry, executor and use-case tests.

use async_trait::async_trait;
use rag_domain::{QueryContext, ResultRecord, Tool, ToolError, ToolOutcome};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

#[derive(Clone)]
pub enum Behavior {
    /// Return one record with the given confidence
    Succeed(f64),
    /// Return `Err`
    Fail,
    Panic,
    /// Sleep, then succeed with confidence 0.5
    Sleep(Duration),
    /// Return an out-of-range confidence
    Malformed,
    /// Return a failed outcome with no error attached
    SilentFailure,
}

pub struct StubTool {
    pub name: String,
    pub description: String,
    pub category: String,
    pub valid: bool,
    pub behavior: Behavior,
    pub calls: Arc<AtomicUsize>,
}

impl StubTool {
    pub fn new(name: &str, category: &str) -> Self {
        Self {
            name: name.to_string(),
            description: format!("{} tool", name),
            category: category.to_string(),
            valid: true,
            behavior: Behavior::Succeed(0.5),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn described(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn invalid(mut self) -> Self {
        self.valid = false;
        self
    }

    pub fn behaving(mut self, behavior: Behavior) -> Self {
        self.behavior = behavior;
        self
    }

    pub fn arc(self) -> Arc<dyn Tool> {
        Arc::new(self)
    }
}

#[async_trait]
impl Tool for StubTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn category(&self) -> &str {
        &self.category
    }

    fn validate(&self, query: &str, _context: &QueryContext) -> bool {
        self.valid && !query.trim().is_empty()
    }

    async fn execute(&self, query: &str, _context: &QueryContext) -> Result<ToolOutcome, ToolError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            Behavior::Succeed(confidence) => Ok(ToolOutcome::success(
                &self.name,
                vec![ResultRecord::new(format!("{} answer for {}", self.name, query))],
            )
            .with_sources(vec![format!("https://example.com/{}", self.name)])
            .with_confidence(*confidence)),
            Behavior::Fail => Err(ToolError::execution_failed("backend unavailable")),
            Behavior::Panic => panic!("tool exploded"),
            Behavior::Sleep(duration) => {
                tokio::time::sleep(*duration).await;
                Ok(ToolOutcome::success(&self.name, vec![ResultRecord::new("late")])
                    .with_confidence(0.5))
            }
            Behavior::Malformed => {
                Ok(ToolOutcome::success(&self.name, vec![]).with_confidence(7.0))
            }
            Behavior::SilentFailure => {
                let mut outcome = ToolOutcome::success(&self.name, vec![]);
                outcome.success = false;
                Ok(outcome)
            }
        }
    }
}
