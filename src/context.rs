//! Execution context for workflow runs.
//!
//! The [`ExecutionContext`] is the logging sink of a run: every step receives
//! it, and it collects structured events and metrics without affecting
//! control flow.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};

use crate::events::{EventRecord, WorkflowEvent};
use crate::metrics::WorkflowMetrics;

/// Context passed to every step in the workflow.
///
/// Cloning is cheap and clones share the same event log and metrics, so a
/// caller can keep a handle while a workflow records into it. The `verbose`
/// flag is per handle: a verbose clone logs step detail at `info` while
/// recording into the same sink.
///
/// # Example
///
/// ```rust
/// use agent_workflow::{ExecutionContext, StepKind, WorkflowEvent};
///
/// let ctx = ExecutionContext::new();
/// ctx.emit(WorkflowEvent::StepStart {
///     step_name: "summarize".to_string(),
///     kind: StepKind::Llm,
/// });
///
/// assert_eq!(ctx.events_snapshot().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    /// Shared metrics accumulator.
    pub metrics: Arc<Mutex<WorkflowMetrics>>,
    /// Shared log of structured workflow events.
    pub events: Arc<Mutex<Vec<EventRecord>>>,
    verbose: bool,
}

impl Default for ExecutionContext {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl ExecutionContext {
    /// Create a new execution context with empty metrics and events.
    #[must_use]
    pub fn new() -> Self {
        Self {
            metrics: Arc::new(Mutex::new(WorkflowMetrics::default())),
            events: Arc::new(Mutex::new(Vec::new())),
            verbose: false,
        }
    }

    /// Log step detail (inputs, rendered prompts) at `info` instead of `debug`.
    #[must_use]
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Whether step detail is logged at `info`.
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Log a labelled value produced while running `step_name`.
    pub fn report(&self, step_name: &str, label: &str, value: &dyn fmt::Display) {
        if self.verbose {
            info!(step = %step_name, "{label}: {value}");
        } else {
            debug!(step = %step_name, "{label}: {value}");
        }
    }

    /// Increment the steps completed counter.
    pub fn record_step(&self) {
        lock(&self.metrics).record_step();
    }

    /// Record a failure message.
    pub fn record_failure(&self, error: impl Into<String>) {
        lock(&self.metrics).record_failure(error.into());
    }

    /// Get a snapshot of the current metrics.
    #[must_use]
    pub fn snapshot(&self) -> WorkflowMetrics {
        lock(&self.metrics).clone()
    }

    /// Append a timestamped event to the log.
    pub fn emit(&self, event: WorkflowEvent) {
        lock(&self.events).push(EventRecord::new(event));
    }

    /// Emit an artifact event with automatic JSON serialization.
    pub fn emit_artifact<T: serde::Serialize>(&self, step_name: &str, key: &str, data: &T) {
        let data = serde_json::to_value(data)
            .unwrap_or_else(|_| serde_json::json!("<serialization_error>"));
        self.emit(WorkflowEvent::Artifact {
            step_name: step_name.to_string(),
            key: key.to_string(),
            data,
        });
    }

    /// Get a snapshot of the events recorded so far.
    #[must_use]
    pub fn events_snapshot(&self) -> Vec<EventRecord> {
        lock(&self.events).clone()
    }

    /// Clear all recorded events.
    pub fn clear_events(&self) {
        lock(&self.events).clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_state() {
        let ctx = ExecutionContext::new();
        let handle = ctx.clone();

        ctx.record_step();
        ctx.record_failure("boom");
        ctx.emit_artifact("step", "output", &42);

        let metrics = handle.snapshot();
        assert_eq!(metrics.steps_completed, 1);
        assert!(metrics.has_failures());
        assert_eq!(handle.events_snapshot().len(), 1);

        handle.clear_events();
        assert!(ctx.events_snapshot().is_empty());
    }

    #[test]
    fn test_verbose_clone_shares_sink() {
        let ctx = ExecutionContext::new();
        let verbose = ctx.clone().with_verbose(true);

        verbose.record_step();
        verbose.emit_artifact("step", "prompt", &"hello");

        assert!(verbose.is_verbose());
        assert!(!ctx.is_verbose());
        assert_eq!(ctx.snapshot().steps_completed, 1);
        assert_eq!(ctx.events_snapshot().len(), 1);
    }
}
