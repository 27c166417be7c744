//! Function steps.

use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::future::Future;
use std::sync::Arc;
use tracing::debug;

use super::StepInvoke;
use crate::tool::Tool;
use crate::{
    ExecutionContext, InputSchema, Result, StepKind, StepOutput, WorkflowState, WorkflowStep,
};

type StepFn = Arc<dyn Fn(Map<String, Value>) -> BoxFuture<'static, Result<Value>> + Send + Sync>;

/// A step that calls a function with the state entries its schema declares.
///
/// Entries not declared by the schema are dropped before the call; declared
/// fields missing from the state are simply absent from the arguments.
///
/// # Example
///
/// ```rust
/// use agent_workflow::{FieldType, FunctionStep, InputSchema};
/// use serde_json::{json, Value};
///
/// let add = FunctionStep::from_fn(
///     "sum",
///     InputSchema::new("Operands")
///         .with_field("a", FieldType::Integer)
///         .with_field("b", FieldType::Integer),
///     |args| {
///         let a = args.get("a").and_then(Value::as_i64).unwrap_or(0);
///         let b = args.get("b").and_then(Value::as_i64).unwrap_or(0);
///         Ok(json!(a + b))
///     },
/// );
/// ```
pub struct FunctionStep {
    name: String,
    inputs: InputSchema,
    function: StepFn,
}

impl FunctionStep {
    /// Create a step from an async function over the selected arguments.
    pub fn new<F, Fut>(name: impl Into<String>, inputs: InputSchema, function: F) -> Self
    where
        F: Fn(Map<String, Value>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value>> + Send + 'static,
    {
        Self {
            name: name.into(),
            inputs,
            function: Arc::new(move |args| function(args).boxed()),
        }
    }

    /// Create a step from a synchronous function over the selected arguments.
    pub fn from_fn<F>(name: impl Into<String>, inputs: InputSchema, function: F) -> Self
    where
        F: Fn(Map<String, Value>) -> Result<Value> + Send + Sync + 'static,
    {
        Self::new(name, inputs, move |args| std::future::ready(function(args)))
    }

    /// Create a step from an async function taking a typed argument struct.
    ///
    /// The selected arguments are deserialized into `T` and the function's
    /// result is serialized back into a JSON value.
    pub fn typed<T, O, F, Fut>(name: impl Into<String>, inputs: InputSchema, function: F) -> Self
    where
        T: DeserializeOwned + Send + 'static,
        O: Serialize + Send + 'static,
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<O>> + Send + 'static,
    {
        Self::new(name, inputs, move |args| {
            let call = serde_json::from_value::<T>(Value::Object(args)).map(&function);
            async move {
                let output = call?.await?;
                Ok(serde_json::to_value(output)?)
            }
        })
    }

    /// Wrap a tool as a step; the step accepts the tool's input schema.
    ///
    /// Combined with [`Workflow::into_tool`](crate::Workflow::into_tool) this
    /// nests a whole workflow as a single step of another.
    pub fn from_tool(name: impl Into<String>, tool: Arc<dyn Tool>) -> Self {
        let inputs = tool.input_schema().clone();
        Self::new(name, inputs, move |args| {
            let tool = Arc::clone(&tool);
            async move { tool.invoke(args).await }
        })
    }

    /// The schema selecting this step's arguments.
    pub fn inputs(&self) -> &InputSchema {
        &self.inputs
    }
}

#[async_trait]
impl StepInvoke for FunctionStep {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> StepKind {
        StepKind::Function
    }

    async fn invoke(&self, ctx: &ExecutionContext, state: &WorkflowState) -> Result<StepOutput> {
        let inputs = self.inputs.select(state.values());
        ctx.report(&self.name, "inputs", &Value::Object(inputs.clone()));

        let output = (self.function)(inputs.clone()).await?;
        debug!(step = %self.name, output = %output, "function output");

        Ok(StepOutput {
            step: WorkflowStep::recorded(StepKind::Function, inputs.clone(), output.clone()),
            inputs,
            output,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, FieldType, TraceEntry};
    use serde::Deserialize;
    use serde_json::json;

    fn state(value: Value) -> WorkflowState {
        WorkflowState::new(value.as_object().cloned().unwrap())
    }

    fn ab_schema() -> InputSchema {
        InputSchema::new("AB")
            .with_field("a", FieldType::Integer)
            .with_field("b", FieldType::Integer)
    }

    #[tokio::test]
    async fn test_inputs_filtered_by_schema() {
        let step = FunctionStep::from_fn("echo", ab_schema(), |args| Ok(Value::Object(args)));
        let ctx = ExecutionContext::new();

        let out = step
            .invoke(&ctx, &state(json!({"a": 1, "b": 2, "c": 3})))
            .await
            .unwrap();

        assert_eq!(Value::Object(out.inputs.clone()), json!({"a": 1, "b": 2}));
        assert_eq!(out.output, json!({"a": 1, "b": 2}));
        assert_eq!(out.step.kind, StepKind::Function);
        assert_eq!(
            out.step.steps,
            vec![
                TraceEntry::inputs(out.inputs.clone()),
                TraceEntry::output(json!({"a": 1, "b": 2})),
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_declared_field_is_absent() {
        let step = FunctionStep::from_fn("count", ab_schema(), |args| Ok(json!(args.len())));
        let ctx = ExecutionContext::new();

        let out = step.invoke(&ctx, &state(json!({"a": 1}))).await.unwrap();
        assert_eq!(out.output, json!(1));
        assert!(!out.inputs.contains_key("b"));
    }

    #[tokio::test]
    async fn test_error_propagates() {
        let step = FunctionStep::from_fn("fail", ab_schema(), |_| {
            Err(Error::Execution("boom".to_string()))
        });
        let ctx = ExecutionContext::new();

        let err = step.invoke(&ctx, &state(json!({}))).await.unwrap_err();
        assert!(matches!(err, Error::Execution(msg) if msg == "boom"));
    }

    #[tokio::test]
    async fn test_typed_function() {
        #[derive(Deserialize)]
        struct Operands {
            a: i64,
            b: i64,
        }

        let step = FunctionStep::typed("sum", ab_schema(), |ops: Operands| async move {
            Ok::<i64, Error>(ops.a + ops.b)
        });
        let ctx = ExecutionContext::new();

        let out = step
            .invoke(&ctx, &state(json!({"a": 2, "b": 3, "c": 100})))
            .await
            .unwrap();
        assert_eq!(out.output, json!(5));

        let err = step.invoke(&ctx, &state(json!({"a": 2}))).await.unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }
}
