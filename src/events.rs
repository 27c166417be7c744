//! Structured workflow execution events for observability.
//!
//! Events are purely observational: they describe progress through a run
//! (step starts and ends, rendered prompts, failures) and never influence it.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::StepKind;

/// Events that can be emitted during workflow execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum WorkflowEvent {
    /// A step has started execution.
    StepStart {
        /// Name of the step being executed.
        step_name: String,
        /// The kind of step.
        kind: StepKind,
    },
    /// A step has finished successfully.
    StepEnd {
        /// Name of the step that completed.
        step_name: String,
        /// Duration of execution in milliseconds.
        duration_ms: u128,
    },
    /// An intermediate value worth recording, such as a rendered prompt or
    /// the final workflow output.
    Artifact {
        /// Name of the step (or workflow) that produced the artifact.
        step_name: String,
        /// Key identifying the artifact (e.g., "prompt", "output").
        key: String,
        /// The artifact data as a JSON value.
        data: serde_json::Value,
    },
    /// An error occurred during step execution or input validation.
    Error {
        /// Name of the step where the error occurred. Input validation runs
        /// before any step, so its errors carry the workflow's name instead.
        step_name: String,
        /// Error message describing what went wrong.
        message: String,
    },
}

/// A timestamped record of a workflow event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord {
    /// Unix epoch timestamp in milliseconds when this event occurred.
    pub timestamp: u128,
    /// The workflow event that was recorded.
    #[serde(flatten)]
    pub event: WorkflowEvent,
}

impl EventRecord {
    /// Create a new record with the current timestamp.
    #[must_use]
    pub fn new(event: WorkflowEvent) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis())
            .unwrap_or_default();
        Self { timestamp, event }
    }
}
