//! Results of a single step and of a whole run.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::trace::WorkflowStep;

/// The result of invoking one step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepOutput {
    /// The inputs the step actually consumed.
    pub inputs: Map<String, Value>,
    /// The value the step produced.
    pub output: Value,
    /// The step's trace record.
    pub step: WorkflowStep,
}

/// The result of a complete workflow run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowOutput {
    /// The inputs the run was started with.
    pub inputs: Map<String, Value>,
    /// The state entry selected as the workflow's output, or null.
    pub output: Value,
    /// One trace record per executed step, in execution order.
    pub steps: Vec<WorkflowStep>,
}
