//! # agent-workflow
//!
//! Linear, traced pipelines of agent, function and transformation steps.
//!
//! A [`Workflow`] runs its steps strictly in order over a shared
//! [`WorkflowState`]. Each step reads what it needs from the state, and the
//! workflow stores the step's output back under the step's name before the
//! next step runs. Every run returns a [`WorkflowOutput`] holding the selected
//! output value and one [`WorkflowStep`] trace record per executed step.
//!
//! ## Core Concepts
//!
//! - **FunctionStep**: calls a function with the state entries its schema declares
//! - **TransformationStep**: maps, filters or reduces one state entry
//! - **LlmStep**: invokes an [`Agent`] with its prompt variables
//! - **InputSchema**: validates run inputs and selects function arguments
//! - **WorkflowTool**: exposes a workflow as a single [`Tool`]
//! - **ExecutionContext**: collects structured events and metrics for a run
//!
//! ## Example
//!
//! ```rust
//! use agent_workflow::{FieldType, FunctionStep, InputSchema, TransformationStep, Workflow};
//! use serde_json::{json, Value};
//!
//! # tokio_test::block_on(async {
//! let schema = InputSchema::new("Scores").with_field("scores", FieldType::Array);
//!
//! let workflow = Workflow::new("passing_average", schema, "average")
//!     .with_step(TransformationStep::filter("passing", "scores", |score| {
//!         Ok(score.as_f64().is_some_and(|s| s >= 50.0))
//!     }))
//!     .with_step(FunctionStep::from_fn(
//!         "average",
//!         InputSchema::new("Passing").with_field("passing", FieldType::Array),
//!         |args| {
//!             let scores: Vec<f64> = args["passing"]
//!                 .as_array()
//!                 .map(|items| items.iter().filter_map(Value::as_f64).collect())
//!                 .unwrap_or_default();
//!             Ok(json!(scores.iter().sum::<f64>() / scores.len() as f64))
//!         },
//!     ));
//!
//! let inputs = json!({"scores": [40, 60, 80]}).as_object().cloned().unwrap();
//! let result = workflow.invoke(inputs).await.unwrap();
//!
//! assert_eq!(result.output, json!(70.0));
//! assert_eq!(result.steps.len(), 2);
//! # });
//! ```

pub mod agent;
pub mod context;
pub mod error;
pub mod events;
pub mod instrumented;
pub mod metrics;
pub mod output;
pub mod prompt;
pub mod schema;
pub mod state;
pub mod step;
pub mod tool;
pub mod trace;
pub mod workflow;

pub use agent::{Agent, AgentOutput};
pub use context::ExecutionContext;
pub use error::{Error, Result};
pub use events::{EventRecord, WorkflowEvent};
pub use instrumented::InstrumentedStep;
pub use metrics::WorkflowMetrics;
pub use output::{StepOutput, WorkflowOutput};
pub use prompt::PromptTemplate;
pub use schema::{FieldDef, FieldType, InputSchema};
pub use state::WorkflowState;
pub use tool::{Tool, WorkflowTool};
pub use trace::{StepKind, TraceEntry, WorkflowStep};
pub use workflow::Workflow;

// Re-export step types
pub use step::{
    Collection, FunctionStep, LlmStep, Step, StepInvoke, Transformation, TransformationKind,
    TransformationStep,
};
