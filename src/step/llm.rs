//! Agent steps.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::debug;

use super::StepInvoke;
use crate::{
    Agent, ExecutionContext, Result, StepKind, StepOutput, WorkflowState, WorkflowStep,
};

/// A step that invokes an [`Agent`].
///
/// Each prompt variable the agent declares is read from the state; variables
/// with no state entry are passed as null. The rendered prompt is logged and
/// emitted as a `prompt` artifact but the agent receives the variables
/// themselves. The step's trace is the agent's own trace, unwrapped.
pub struct LlmStep {
    name: String,
    agent: Arc<dyn Agent>,
}

impl LlmStep {
    /// Create a step named `name` that calls `agent`.
    pub fn new(name: impl Into<String>, agent: Arc<dyn Agent>) -> Self {
        Self {
            name: name.into(),
            agent,
        }
    }

    /// The agent this step calls.
    pub fn agent(&self) -> &Arc<dyn Agent> {
        &self.agent
    }
}

#[async_trait]
impl StepInvoke for LlmStep {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> StepKind {
        StepKind::Llm
    }

    async fn invoke(&self, ctx: &ExecutionContext, state: &WorkflowState) -> Result<StepOutput> {
        let inputs: Map<String, Value> = self
            .agent
            .prompt_variables()
            .iter()
            .map(|variable| (variable.clone(), state.get_or_null(variable)))
            .collect();
        ctx.report(&self.name, "inputs", &Value::Object(inputs.clone()));

        let prompt = self.agent.prompt().format(&inputs)?;
        ctx.report(&self.name, "prompt", &prompt);
        ctx.emit_artifact(&self.name, "prompt", &prompt);

        let response = self.agent.invoke(&inputs).await?;
        debug!(step = %self.name, output = %response.final_answer, "agent output");

        Ok(StepOutput {
            inputs,
            output: response.final_answer,
            step: WorkflowStep::llm(response.steps),
        })
    }
}
