use super::context::WorkflowContext;
use super::{WorkflowError, WorkflowStatus};
use async_trait::async_trait;

/// Whether the run proceeds after a phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseOutcome {
    Continue,
    /// End the run early with the given status.
    Stop(WorkflowStatus),
}

#[async_trait]
pub trait WorkflowPhase: Send + Sync {
    fn name(&self) -> &'static str;

    async fn execute(&self, context: &mut WorkflowContext) -> Result<PhaseOutcome, WorkflowError>;
}
