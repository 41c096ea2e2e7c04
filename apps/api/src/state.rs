use std::sync::Arc;

use remedian_application::{AlertingChannel, OutcomeReporter, RemediationExecutor};

/// Shared services injected into every request handler.
#[derive(Clone)]
pub struct AppState {
    /// Remediation executor over the configured strategy registry.
    pub executor: RemediationExecutor,
    /// Pure outcome-to-payload formatter.
    pub reporter: OutcomeReporter,
    /// Alerting collaborator for remediation notifications.
    pub alerting: Arc<dyn AlertingChannel>,
}
