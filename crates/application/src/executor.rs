
use serde_json::Value;

use remedian_domain::{
    ComplianceEvent, ComplianceState, RemediationOutcome, ResourceKind, UNKNOWN_RESOURCE,
};

use crate::registry::RemediationRegistry;

/// Orchestrates one remediation pass per inbound event.
///
/// Stateless aside from the read-only registry, so distinct events can be
/// processed concurrently without locking.
#[derive(Clone)]
pub struct RemediationExecutor {
    registry: RemediationRegistry,
}

impl RemediationExecutor {
    /// Creates an executor over a strategy registry.
    #[must_use]
    pub fn new(registry: RemediationRegistry) -> Self {
        Self { registry }
    }

    /// Processes one raw inbound event end to end.
    ///
    /// A normalization failure yields a `Failure` outcome carrying the
    /// error under the `UNKNOWN_RESOURCE` sentinel; classification and
    /// strategies are never reached in that case.
    pub async fn execute(&self, raw_event: &Value) -> RemediationOutcome {
        self.execute_with_event(raw_event).await.0
    }

    /// Like [`RemediationExecutor::execute`], but also returns the
    /// normalized event for reporting when normalization succeeded.
    pub async fn execute_with_event(
        &self,
        raw_event: &Value,
    ) -> (RemediationOutcome, Option<ComplianceEvent>) {
        match ComplianceEvent::normalize(raw_event) {
            Ok(event) => {
                let outcome = self.execute_event(&event).await;
                (outcome, Some(event))
            }
            Err(error) => (
                RemediationOutcome::failed(UNKNOWN_RESOURCE, ResourceKind::Other, error.to_string()),
                None,
            ),
        }
    }

    /// Processes an already-normalized event.
    ///
    /// Only `NON_COMPLIANT` events are dispatched to a strategy; compliant
    /// or unknown states and unregistered kinds skip with a reason and
    /// zero control-plane calls.
    pub async fn execute_event(&self, event: &ComplianceEvent) -> RemediationOutcome {
        let kind = ResourceKind::classify(event.resource_type());
        let resource_id = event.resource_id();

        match event.compliance_state() {
            ComplianceState::NonCompliant => {}
            state => {
                return RemediationOutcome::skipped(
                    resource_id.as_str(),
                    kind,
                    format!(
                        "compliance state {} requires no remediation",
                        state.as_str()
                    ),
                );
            }
        }

        let Some(strategy) = self.registry.lookup(kind) else {
            return RemediationOutcome::skipped(
                resource_id.as_str(),
                kind,
                format!(
                    "no remediation strategy registered for resource type '{}'",
                    event.resource_type()
                ),
            );
        };

        strategy.apply(resource_id).await
    }
}
