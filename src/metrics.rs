//! Run statistics.

use serde::{Deserialize, Serialize};

/// Aggregated metrics for a workflow execution.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct WorkflowMetrics {
    /// Number of steps completed successfully.
    pub steps_completed: usize,
    /// Collected failure messages.
    pub failures: Vec<String>,
}

impl WorkflowMetrics {
    /// Record a failure message.
    pub fn record_failure(&mut self, error: String) {
        self.failures.push(error);
    }

    /// Increment the steps completed counter.
    pub fn record_step(&mut self) {
        self.steps_completed += 1;
    }

    /// Check if there were any failures.
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}
