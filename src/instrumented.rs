//! Instrumented step wrapper for automatic event emission and metrics.

use async_trait::async_trait;
use std::time::Instant;
use tracing::info;

use crate::step::StepInvoke;
use crate::{ExecutionContext, Result, StepKind, StepOutput, WorkflowEvent, WorkflowState};

/// Wraps a step with event emission and metric recording.
///
/// For each invocation, `InstrumentedStep` emits:
/// - A [`WorkflowEvent::StepStart`] before the inner step runs
/// - A [`WorkflowEvent::StepEnd`] with elapsed milliseconds on success
/// - A [`WorkflowEvent::Error`] and failure metric on error
///
/// With `verbose` set, step starts and outputs are also logged at `info`, and
/// the inner step runs with a verbose [`ExecutionContext`] so its own detail
/// (inputs, rendered prompts) is logged at `info` too.
pub struct InstrumentedStep<S> {
    inner: S,
    verbose: bool,
}

impl<S: StepInvoke> InstrumentedStep<S> {
    /// Wrap `inner` with instrumentation.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            verbose: false,
        }
    }

    /// Log progress at `info` level.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Access the inner step.
    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S: StepInvoke> StepInvoke for InstrumentedStep<S> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn kind(&self) -> StepKind {
        self.inner.kind()
    }

    async fn invoke(&self, ctx: &ExecutionContext, state: &WorkflowState) -> Result<StepOutput> {
        let name = self.inner.name();
        let kind = self.inner.kind();
        let verbose = self.verbose || ctx.is_verbose();
        let scoped;
        let ctx = if verbose && !ctx.is_verbose() {
            scoped = ctx.clone().with_verbose(true);
            &scoped
        } else {
            ctx
        };

        if verbose {
            info!(step = %name, %kind, "running step");
        }
        ctx.emit(WorkflowEvent::StepStart {
            step_name: name.to_string(),
            kind,
        });

        let start = Instant::now();
        let result = self.inner.invoke(ctx, state).await;
        let duration_ms = start.elapsed().as_millis();

        match &result {
            Ok(output) => {
                if verbose {
                    info!(
                        step = %name,
                        output = %output.output,
                        duration_ms = duration_ms as u64,
                        "step finished"
                    );
                }
                ctx.record_step();
                ctx.emit(WorkflowEvent::StepEnd {
                    step_name: name.to_string(),
                    duration_ms,
                });
            }
            Err(e) => {
                tracing::warn!(step = %name, error = %e, "step failed");
                ctx.record_failure(e.to_string());
                ctx.emit(WorkflowEvent::Error {
                    step_name: name.to_string(),
                    message: e.to_string(),
                });
            }
        }

        result
    }
}
