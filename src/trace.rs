//! Per-step trace records.
//!
//! Every executed step contributes one [`WorkflowStep`] to the run's trace.
//! Function and transformation steps record exactly two entries (`inputs`
//! then `output`); agent steps record the agent's own entries untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// The kind of step that produced a trace record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepKind {
    /// A map, filter or reduce over a state entry.
    Transformation,
    /// A plain function call.
    Function,
    /// An agent invocation.
    Llm,
}

impl StepKind {
    /// The lowercase name used in serialized traces.
    pub fn as_str(&self) -> &'static str {
        match self {
            StepKind::Transformation => "transformation",
            StepKind::Function => "function",
            StepKind::Llm => "llm",
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single named entry inside a step trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceEntry {
    /// What the entry records (`inputs`, `output`, or an agent-defined name).
    pub name: String,
    /// The recorded value.
    pub content: Value,
}

impl TraceEntry {
    /// Entry name for the inputs a step consumed.
    pub const INPUTS: &'static str = "inputs";
    /// Entry name for the value a step produced.
    pub const OUTPUT: &'static str = "output";

    /// Create an entry with an arbitrary name.
    pub fn new(name: impl Into<String>, content: Value) -> Self {
        Self {
            name: name.into(),
            content,
        }
    }

    /// Record the inputs a step consumed.
    pub fn inputs(inputs: Map<String, Value>) -> Self {
        Self::new(Self::INPUTS, Value::Object(inputs))
    }

    /// Record the value a step produced.
    pub fn output(output: Value) -> Self {
        Self::new(Self::OUTPUT, output)
    }
}

/// The trace record of one executed step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowStep {
    /// The kind of step.
    #[serde(rename = "name")]
    pub kind: StepKind,
    /// Ordered sub-entries.
    pub steps: Vec<TraceEntry>,
}

impl WorkflowStep {
    /// An `inputs`/`output` record, used by function and transformation steps.
    pub(crate) fn recorded(kind: StepKind, inputs: Map<String, Value>, output: Value) -> Self {
        Self {
            kind,
            steps: vec![TraceEntry::inputs(inputs), TraceEntry::output(output)],
        }
    }

    /// An agent record carrying the agent's own trace as-is.
    pub(crate) fn llm(steps: Vec<TraceEntry>) -> Self {
        Self {
            kind: StepKind::Llm,
            steps,
        }
    }

    /// The first entry with the given name, if any.
    pub fn entry(&self, name: &str) -> Option<&TraceEntry> {
        self.steps.iter().find(|entry| entry.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_recorded_trace_has_inputs_then_output() {
        let inputs = json!({"a": 1}).as_object().cloned().unwrap();
        let step = WorkflowStep::recorded(StepKind::Function, inputs, json!(2));

        assert_eq!(step.steps.len(), 2);
        assert_eq!(step.steps[0].name, "inputs");
        assert_eq!(step.steps[1].name, "output");
        assert_eq!(step.entry("output").unwrap().content, json!(2));
    }

    #[test]
    fn test_serialized_shape() {
        let step = WorkflowStep::llm(vec![TraceEntry::new("thought", json!("thinking"))]);
        let json = serde_json::to_value(&step).unwrap();

        assert_eq!(
            json,
            json!({"name": "llm", "steps": [{"name": "thought", "content": "thinking"}]})
        );
    }
}
