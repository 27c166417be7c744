//! The workflow orchestrator.

use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::step::{Step, StepInvoke};
use crate::{
    ExecutionContext, InputSchema, InstrumentedStep, Result, WorkflowEvent, WorkflowMetrics,
    WorkflowOutput, WorkflowState, WorkflowTool,
};

/// A named, linear pipeline of steps over shared state.
///
/// A run validates its inputs against the workflow's [`InputSchema`], seeds a
/// fresh [`WorkflowState`] with them, then invokes each step in order and
/// stores its output under the step's name. The state entry named by the
/// output selector becomes the run's output (null if no such entry exists).
/// The first error aborts the run.
///
/// # Example
///
/// ```rust
/// use agent_workflow::{FieldType, FunctionStep, InputSchema, TransformationStep, Workflow};
/// use serde_json::{json, Value};
///
/// # tokio_test::block_on(async {
/// let workflow = Workflow::new(
///     "sum_of_doubles",
///     InputSchema::new("Numbers").with_field("numbers", FieldType::Array),
///     "total",
/// )
/// .with_step(TransformationStep::map("doubled", "numbers", |x| {
///     Ok(json!(x.as_i64().unwrap_or(0) * 2))
/// }))
/// .with_step(TransformationStep::reduce("total", "doubled", |acc, x| {
///     Ok(json!(acc.as_i64().unwrap_or(0) + x.as_i64().unwrap_or(0)))
/// }));
///
/// let inputs = json!({"numbers": [1, 2, 3]}).as_object().cloned().unwrap();
/// let result = workflow.invoke(inputs).await.unwrap();
///
/// assert_eq!(result.output, json!(12));
/// assert_eq!(result.steps.len(), 2);
/// # });
/// ```
pub struct Workflow {
    name: String,
    description: String,
    steps: Vec<InstrumentedStep<Step>>,
    inputs: InputSchema,
    output: String,
    verbose: bool,
}

impl Workflow {
    /// Create an empty workflow.
    ///
    /// `output` names the state entry returned as the run's output.
    pub fn new(name: impl Into<String>, inputs: InputSchema, output: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            steps: Vec::new(),
            inputs,
            output: output.into(),
            verbose: true,
        }
    }

    /// Describe what the workflow does (surfaced when used as a tool).
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Append a step.
    pub fn with_step(mut self, step: impl Into<Step>) -> Self {
        let step = InstrumentedStep::new(step.into()).with_verbose(self.verbose);
        self.steps.push(step);
        self
    }

    /// Append several steps, in order.
    pub fn with_steps<I>(self, steps: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Step>,
    {
        steps.into_iter().fold(self, Self::with_step)
    }

    /// Log progress, step inputs and rendered prompts at `info` level (on by
    /// default). When off, step detail is logged at `debug`.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self.steps = self
            .steps
            .into_iter()
            .map(|step| step.with_verbose(verbose))
            .collect();
        self
    }

    /// The workflow name (also its name as a tool).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// What the workflow does; empty unless set.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The schema run inputs are validated against.
    pub fn inputs(&self) -> &InputSchema {
        &self.inputs
    }

    /// The state entry returned as the run's output.
    pub fn output(&self) -> &str {
        &self.output
    }

    /// The steps, in execution order.
    pub fn steps(&self) -> impl Iterator<Item = &Step> {
        self.steps.iter().map(InstrumentedStep::inner)
    }

    /// Run the workflow.
    pub async fn invoke(&self, inputs: Map<String, Value>) -> Result<WorkflowOutput> {
        let ctx = ExecutionContext::new();
        self.invoke_with_ctx(&ctx, inputs).await
    }

    /// Run the workflow, returning the output along with the collected metrics.
    pub async fn run(
        &self,
        inputs: Map<String, Value>,
    ) -> Result<(WorkflowOutput, WorkflowMetrics)> {
        let ctx = ExecutionContext::new();
        let output = self.invoke_with_ctx(&ctx, inputs).await?;
        Ok((output, ctx.snapshot()))
    }

    /// Run the workflow with a caller-provided execution context.
    ///
    /// Events and metrics are recorded into `ctx`, including those of a
    /// failed run. A validation failure is recorded as a
    /// [`WorkflowEvent::Error`] under the workflow's name.
    pub async fn invoke_with_ctx(
        &self,
        ctx: &ExecutionContext,
        inputs: Map<String, Value>,
    ) -> Result<WorkflowOutput> {
        if let Err(e) = self.inputs.validate(&inputs) {
            ctx.record_failure(e.to_string());
            ctx.emit(WorkflowEvent::Error {
                step_name: self.name.clone(),
                message: e.to_string(),
            });
            return Err(e);
        }

        debug!(workflow = %self.name, steps = self.steps.len(), "starting workflow");
        let mut state = WorkflowState::new(inputs.clone());
        let mut steps = Vec::with_capacity(self.steps.len());
        for step in &self.steps {
            let output = step.invoke(ctx, &state).await?;
            steps.push(state.update(step.name(), output));
        }

        let output = state.get_or_null(&self.output);
        if self.verbose {
            info!(workflow = %self.name, output = %output, "workflow output");
        }
        ctx.emit_artifact(&self.name, "output", &output);

        Ok(WorkflowOutput {
            inputs,
            output,
            steps,
        })
    }

    /// Expose this workflow as a single tool.
    pub fn into_tool(self) -> WorkflowTool {
        WorkflowTool::new(self.into())
    }
}

impl std::fmt::Debug for Workflow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workflow")
            .field("name", &self.name)
            .field("steps", &self.steps().collect::<Vec<_>>())
            .field("inputs", &self.inputs)
            .field("output", &self.output)
            .finish()
    }
}
