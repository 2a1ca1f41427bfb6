//! Progress hooks for a running deployment

use crate::action::{ProvisionStep, StepOutcome, SyncStage};
use bunnyflow_core::{ResourceIdentity, SyncSummary};

/// Receives progress events from [`crate::Deployer`].
///
/// All methods default to doing nothing. File events may arrive from several
/// tasks at once.
pub trait DeployReporter: Send + Sync {
    fn identity_resolved(&self, _identity: &ResourceIdentity) {}

    fn step_started(&self, _step: ProvisionStep) {}

    fn step_finished(&self, _outcome: &StepOutcome) {}

    fn sync_planned(&self, _summary: &SyncSummary) {}

    fn stage_started(&self, _stage: SyncStage, _files: usize) {}

    fn file_done(&self, _stage: SyncStage, _relative_path: &str) {}

    fn stage_finished(&self, _stage: SyncStage) {}
}

/// Reporter that only emits tracing events
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl DeployReporter for TracingReporter {
    fn identity_resolved(&self, identity: &ResourceIdentity) {
        tracing::info!(
            "Deploying {} (zone '{}')",
            identity.deployment_name,
            identity.resource_name
        );
    }

    fn step_started(&self, step: ProvisionStep) {
        tracing::info!("[{}/{}] {}", step.number(), ProvisionStep::ALL.len(), step);
    }

    fn step_finished(&self, outcome: &StepOutcome) {
        tracing::info!("{}: {} ({})", outcome.step, outcome.message, outcome.action);
    }

    fn sync_planned(&self, summary: &SyncSummary) {
        tracing::info!("Sync plan: {}", summary);
    }

    fn file_done(&self, stage: SyncStage, relative_path: &str) {
        tracing::debug!("{} {}", stage, relative_path);
    }
}
