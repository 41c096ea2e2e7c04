mod compute_instance;
mod security_group;
mod storage_bucket;

#[cfg(test)]
mod tests;

use async_trait::async_trait;
use remedian_core::ResourceId;
use remedian_domain::{RemediationOutcome, ResourceKind};

pub use compute_instance::ComputeInstanceStrategy;
pub use security_group::SecurityGroupStrategy;
pub use storage_bucket::StorageBucketStrategy;

/// One resource kind's set of corrective actions.
///
/// A strategy is idempotent: applying it to an already-compliant resource
/// performs no destructive side effect and still reports success. Action
/// failures are collected into the outcome, never raised past `apply`.
#[async_trait]
pub trait RemediationStrategy: Send + Sync {
    /// Returns the resource kind this strategy remediates.
    fn kind(&self) -> ResourceKind;

    /// Applies the corrective actions to one resource.
    async fn apply(&self, resource_id: &ResourceId) -> RemediationOutcome;
}

/// Per-invocation collector of applied actions and action failures.
#[derive(Debug, Default)]
struct ActionLog {
    applied: Vec<String>,
    errors: Vec<String>,
}

impl ActionLog {
    fn applied(&mut self, action: impl Into<String>) {
        self.applied.push(action.into());
    }

    fn failed(&mut self, error: impl Into<String>) {
        self.errors.push(error.into());
    }

    fn into_outcome(self, resource_id: &ResourceId, kind: ResourceKind) -> RemediationOutcome {
        RemediationOutcome::from_actions(resource_id.as_str(), kind, self.applied, self.errors)
    }
}
