//! Progress reporting for query orchestration

use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use rag_application::ports::progress::OrchestrationProgress;
use rag_domain::AgentResponse;
use std::sync::Mutex;

/// Reports progress with one indicatif bar per pass
pub struct ProgressReporter {
    multi: MultiProgress,
    pass_bar: Mutex<Option<ProgressBar>>,
    pass_label: Mutex<String>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            pass_bar: Mutex::new(None),
            pass_label: Mutex::new(String::new()),
        }
    }

    fn pass_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn pass_name(iteration: usize, max_iterations: usize) -> String {
        format!("Pass {}/{}", iteration, max_iterations)
    }

    fn finish_pass(&self, message: String) {
        if let Ok(mut bar) = self.pass_bar.lock()
            && let Some(pb) = bar.take()
        {
            pb.finish_with_message(message);
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl OrchestrationProgress for ProgressReporter {
    fn on_iteration_start(&self, iteration: usize, max_iterations: usize) {
        if let Ok(mut label) = self.pass_label.lock() {
            *label = Self::pass_name(iteration, max_iterations);
        }
    }

    fn on_tools_selected(&self, tools: &[String]) {
        let prefix = self
            .pass_label
            .lock()
            .map(|label| label.clone())
            .unwrap_or_default();

        let pb = self.multi.add(ProgressBar::new(tools.len() as u64));
        pb.set_style(Self::pass_style());
        pb.set_prefix(prefix);
        pb.set_message(format!("running {}", tools.join(", ")));

        if let Ok(mut bar) = self.pass_bar.lock() {
            *bar = Some(pb);
        }
    }

    fn on_tool_complete(&self, tool: &str, success: bool) {
        if let Ok(bar) = self.pass_bar.lock()
            && let Some(pb) = bar.as_ref()
        {
            let status = if success {
                format!("{} {}", "v".green(), tool)
            } else {
                format!("{} {}", "x".red(), tool)
            };
            pb.set_message(status);
            pb.inc(1);
        }
    }

    fn on_assessed(&self, _iteration: usize, score: f64) {
        self.finish_pass(format!("quality {}", format!("{:.2}", score).green()));
    }

    fn on_complete(&self, _response: &AgentResponse) {
        self.finish_pass("done".to_string());
    }
}

/// Simple text-based progress (no fancy UI), written to stderr
pub struct SimpleProgress;

impl OrchestrationProgress for SimpleProgress {
    fn on_iteration_start(&self, iteration: usize, max_iterations: usize) {
        eprintln!(
            "{} {}",
            "->".cyan(),
            ProgressReporter::pass_name(iteration, max_iterations).bold()
        );
    }

    fn on_tools_selected(&self, tools: &[String]) {
        eprintln!("  tools: {}", tools.join(", "));
    }

    fn on_tool_complete(&self, tool: &str, success: bool) {
        if success {
            eprintln!("  {} {}", "v".green(), tool);
        } else {
            eprintln!("  {} {} (failed)", "x".red(), tool);
        }
    }

    fn on_assessed(&self, _iteration: usize, score: f64) {
        eprintln!("  quality: {:.2}", score);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pass_name() {
        assert_eq!(ProgressReporter::pass_name(2, 3), "Pass 2/3");
    }

    #[test]
    fn test_reporter_lifecycle() {
        let reporter = ProgressReporter::new();
        reporter.on_iteration_start(1, 3);
        reporter.on_tools_selected(&["knowledge_base".to_string(), "web_search".to_string()]);

        {
            let bar = reporter.pass_bar.lock().unwrap();
            let pb = bar.as_ref().unwrap();
            assert_eq!(pb.length(), Some(2));
            assert_eq!(pb.prefix(), "Pass 1/3");
        }

        reporter.on_tool_complete("knowledge_base", true);
        reporter.on_tool_complete("web_search", false);
        assert_eq!(
            reporter.pass_bar.lock().unwrap().as_ref().unwrap().position(),
            2
        );

        reporter.on_assessed(1, 0.9);
        assert!(reporter.pass_bar.lock().unwrap().is_none());

        // Completion after the bar is gone is a no-op
        reporter.on_complete(&AgentResponse::fallback());
    }
}
