//! Run-scoped state threaded through a workflow.
//!
//! A [`WorkflowState`] is created from the run inputs, read by every step and
//! written only by the orchestration loop: after each step returns, its output
//! is stored under the step's name, replacing any earlier value.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::output::StepOutput;
use crate::trace::WorkflowStep;

/// Named values visible to the steps of one workflow run.
///
/// # Example
///
/// ```rust
/// use agent_workflow::WorkflowState;
/// use serde_json::json;
///
/// let inputs = json!({"topic": "rust"}).as_object().cloned().unwrap();
/// let state = WorkflowState::new(inputs);
/// assert_eq!(state.get("topic"), Some(&json!("rust")));
/// assert_eq!(state.get("summary"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct WorkflowState {
    values: Map<String, Value>,
}

impl WorkflowState {
    /// Seed the state with the run inputs.
    pub fn new(inputs: Map<String, Value>) -> Self {
        Self { values: inputs }
    }

    /// Look up a named value.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Look up a named value, resolving a miss to null.
    pub fn get_or_null(&self, name: &str) -> Value {
        self.values.get(name).cloned().unwrap_or(Value::Null)
    }

    /// Whether a value is stored under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// All stored values.
    pub fn values(&self) -> &Map<String, Value> {
        &self.values
    }

    /// Store a step's output under `name`, overwriting any previous value.
    ///
    /// Returns the step's trace record so the caller can append it to the run trace.
    pub fn update(&mut self, name: impl Into<String>, output: StepOutput) -> WorkflowStep {
        self.values.insert(name.into(), output.output);
        output.step
    }
}
