//! The agent capability consumed by [`LlmStep`](crate::LlmStep).
//!
//! An agent owns a prompt template and its own reasoning loop. This crate only
//! supplies the prompt variables and records whatever the agent reports back.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{PromptTemplate, Result, TraceEntry};

/// What an agent returns from one invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentOutput {
    /// The agent's final answer.
    pub final_answer: Value,
    /// The agent's own execution trace, recorded verbatim.
    pub steps: Vec<TraceEntry>,
}

/// A language-model-backed agent.
#[async_trait]
pub trait Agent: Send + Sync {
    /// The agent's prompt template.
    fn prompt(&self) -> &PromptTemplate;

    /// The variables the agent reads. Defaults to the template's placeholders.
    fn prompt_variables(&self) -> &[String] {
        self.prompt().variables()
    }

    /// Run the agent with one value per prompt variable.
    async fn invoke(&self, variables: &Map<String, Value>) -> Result<AgentOutput>;
}
