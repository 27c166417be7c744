//! Workflow steps.
//!
//! A workflow is an ordered list of [`Step`]s. Each variant reads what it
//! needs from the [`WorkflowState`], does its work, and returns a
//! [`StepOutput`]; it never writes to the state itself.
//!
//! - [`FunctionStep`]: calls a function with the state entries its schema declares
//! - [`TransformationStep`]: maps, filters or reduces one state entry
//! - [`LlmStep`]: invokes an [`Agent`](crate::Agent) with its prompt variables

use async_trait::async_trait;

use crate::{ExecutionContext, Result, StepKind, StepOutput, WorkflowState};

pub mod function;
pub mod llm;
pub mod transformation;

pub use function::FunctionStep;
pub use llm::LlmStep;
pub use transformation::{Collection, Transformation, TransformationKind, TransformationStep};

/// The invocation contract shared by every step variant.
#[async_trait]
pub trait StepInvoke: Send + Sync {
    /// The name under which the step's output is stored in the state.
    fn name(&self) -> &str;

    /// The kind of trace record this step produces.
    fn kind(&self) -> StepKind;

    /// Execute the step against the current state.
    async fn invoke(&self, ctx: &ExecutionContext, state: &WorkflowState) -> Result<StepOutput>;
}

/// One step of a workflow.
pub enum Step {
    Function(FunctionStep),
    Transformation(TransformationStep),
    Llm(LlmStep),
}

#[async_trait]
impl StepInvoke for Step {
    fn name(&self) -> &str {
        match self {
            Step::Function(step) => step.name(),
            Step::Transformation(step) => step.name(),
            Step::Llm(step) => step.name(),
        }
    }

    fn kind(&self) -> StepKind {
        match self {
            Step::Function(_) => StepKind::Function,
            Step::Transformation(_) => StepKind::Transformation,
            Step::Llm(_) => StepKind::Llm,
        }
    }

    async fn invoke(&self, ctx: &ExecutionContext, state: &WorkflowState) -> Result<StepOutput> {
        match self {
            Step::Function(step) => step.invoke(ctx, state).await,
            Step::Transformation(step) => step.invoke(ctx, state).await,
            Step::Llm(step) => step.invoke(ctx, state).await,
        }
    }
}

impl From<FunctionStep> for Step {
    fn from(step: FunctionStep) -> Self {
        Step::Function(step)
    }
}

impl From<TransformationStep> for Step {
    fn from(step: TransformationStep) -> Self {
        Step::Transformation(step)
    }
}

impl From<LlmStep> for Step {
    fn from(step: LlmStep) -> Self {
        Step::Llm(step)
    }
}

impl std::fmt::Debug for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Step")
            .field("name", &self.name())
            .field("kind", &self.kind())
            .finish()
    }
}
