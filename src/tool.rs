//! Exposing workflows as tools.
//!
//! [`WorkflowTool`] is the composition seam: it presents a whole workflow as a
//! single named capability that an agent's tool registry can call, or that
//! [`FunctionStep::from_tool`](crate::FunctionStep::from_tool) can nest inside
//! a larger workflow.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::{InputSchema, Result, Workflow};

/// A named capability with a typed input schema.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The tool name (unique within a tool set).
    fn name(&self) -> &str;

    /// What the tool does, for the model choosing between tools.
    fn description(&self) -> &str;

    /// The inputs the tool accepts.
    fn input_schema(&self) -> &InputSchema;

    /// The input schema as a JSON Schema object.
    fn parameters(&self) -> Value {
        self.input_schema().to_json_schema()
    }

    /// Run the tool.
    async fn invoke(&self, inputs: Map<String, Value>) -> Result<Value>;
}

/// A [`Workflow`] exposed as a [`Tool`].
///
/// Invoking the tool passes the schema's declared fields to the workflow and
/// returns only the workflow's output; the trace is discarded.
///
/// # Example
///
/// ```rust
/// use agent_workflow::{FieldType, FunctionStep, InputSchema, Tool, Workflow};
/// use serde_json::json;
///
/// # tokio_test::block_on(async {
/// let schema = InputSchema::new("Greeting").with_field("name", FieldType::String);
/// let tool = Workflow::new("greet", schema.clone(), "greeting")
///     .with_description("Greets someone by name")
///     .with_step(FunctionStep::from_fn("greeting", schema, |args| {
///         Ok(json!(format!("Hello, {}!", args["name"].as_str().unwrap_or("you"))))
///     }))
///     .into_tool();
///
/// let inputs = json!({"name": "Ada"}).as_object().cloned().unwrap();
/// assert_eq!(tool.invoke(inputs).await.unwrap(), json!("Hello, Ada!"));
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct WorkflowTool {
    workflow: Arc<Workflow>,
}

impl WorkflowTool {
    /// Wrap a shared workflow.
    pub fn new(workflow: Arc<Workflow>) -> Self {
        Self { workflow }
    }

    /// The wrapped workflow.
    pub fn workflow(&self) -> &Arc<Workflow> {
        &self.workflow
    }
}

#[async_trait]
impl Tool for WorkflowTool {
    fn name(&self) -> &str {
        self.workflow.name()
    }

    fn description(&self) -> &str {
        self.workflow.description()
    }

    fn input_schema(&self) -> &InputSchema {
        self.workflow.inputs()
    }

    async fn invoke(&self, inputs: Map<String, Value>) -> Result<Value> {
        let inputs = self.workflow.inputs().select(&inputs);
        let output = self.workflow.invoke(inputs).await?;
        Ok(output.output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, FieldType, FunctionStep, StepKind, TraceEntry};
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    fn word_count() -> Workflow {
        let schema = InputSchema::new("Text").with_field("text", FieldType::String);
        Workflow::new("word_count", schema.clone(), "count")
            .with_description("Counts the words in a text")
            .with_step(FunctionStep::from_fn("count", schema, |args| {
                Ok(json!(args["text"].as_str().unwrap_or("").split_whitespace().count()))
            }))
    }

    #[tokio::test]
    async fn test_tool_returns_workflow_output_only() {
        let workflow = Arc::new(word_count());
        let tool = WorkflowTool::new(Arc::clone(&workflow));
        let inputs = map(json!({"text": "one two three"}));

        let direct = workflow.invoke(inputs.clone()).await.unwrap();
        let via_tool = tool.invoke(inputs).await.unwrap();

        assert_eq!(via_tool, direct.output);
        assert_eq!(via_tool, json!(3));
    }

    #[tokio::test]
    async fn test_tool_metadata() {
        let tool = word_count().into_tool();

        assert_eq!(tool.name(), "word_count");
        assert_eq!(tool.description(), "Counts the words in a text");
        assert_eq!(tool.parameters()["required"], json!(["text"]));
    }

    #[tokio::test]
    async fn test_tool_drops_undeclared_fields() {
        let schema = InputSchema::new("Text").with_field("text", FieldType::String);
        let step_schema = schema
            .clone()
            .with_optional_field("extra", FieldType::Boolean);
        let tool = Workflow::new("keys", schema, "keys")
            .with_step(FunctionStep::from_fn("keys", step_schema, |args| {
                Ok(json!(args.keys().collect::<Vec<_>>()))
            }))
            .into_tool();

        let output = tool
            .invoke(map(json!({"text": "hi", "extra": true})))
            .await
            .unwrap();
        assert_eq!(output, json!(["text"]));
    }

    #[tokio::test]
    async fn test_tool_validation_error_propagates() {
        let tool = word_count().into_tool();
        let err = tool.invoke(map(json!({"text": 7}))).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn test_workflow_nested_as_step() {
        let inner: Arc<dyn Tool> = Arc::new(word_count().into_tool());
        let schema = InputSchema::new("Text").with_field("text", FieldType::String);
        let outer = Workflow::new("outer", schema, "words")
            .with_step(FunctionStep::from_tool("words", inner));

        let result = outer.invoke(map(json!({"text": "a b"}))).await.unwrap();
        assert_eq!(result.output, json!(2));
        assert_eq!(result.steps.len(), 1);
        assert_eq!(result.steps[0].kind, StepKind::Function);
        assert_eq!(
            result.steps[0].entry(TraceEntry::INPUTS).unwrap().content,
            json!({"text": "a b"})
        );
    }
}
