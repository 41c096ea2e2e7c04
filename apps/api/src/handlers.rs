use axum::Json;
use axum::extract::State;
use remedian_domain::RemediationOutcome;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use crate::state::AppState;

/// Handler response for one processed compliance event.
#[derive(Debug, Serialize)]
pub struct RemediationResponse {
    /// Lowercase status code: `success`, `skipped`, `partial`, `failure`.
    pub status: String,
    /// Remediated resource identifier (or its sentinel).
    pub resource_id: String,
    /// Ordered corrective actions that were applied.
    pub actions_applied: Vec<String>,
    /// Collected error descriptions.
    pub errors: Vec<String>,
}

impl RemediationResponse {
    fn from_outcome(outcome: &RemediationOutcome) -> Self {
        Self {
            status: outcome.status().short_code().to_owned(),
            resource_id: outcome.resource_id().to_owned(),
            actions_applied: outcome.actions_applied().to_vec(),
            errors: outcome.errors().to_vec(),
        }
    }
}

/// Ingests one raw compliance event, remediates, and reports.
///
/// The response always carries the remediation outcome; a failed
/// notification publish is logged and never overrides it.
pub async fn ingest_event(
    State(state): State<AppState>,
    Json(raw_event): Json<Value>,
) -> Json<RemediationResponse> {
    let invocation_id = Uuid::new_v4();
    let (outcome, event) = state.executor.execute_with_event(&raw_event).await;
    let payload = state.reporter.report(&outcome, event.as_ref());

    match payload.body() {
        Ok(body) => {
            if let Err(error) = state
                .alerting
                .publish(payload.subject().as_str(), body.as_str())
                .await
            {
                warn!(
                    invocation_id = %invocation_id,
                    resource_id = outcome.resource_id(),
                    error = %error,
                    "failed to publish remediation alert"
                );
            }
        }
        Err(error) => warn!(
            invocation_id = %invocation_id,
            resource_id = outcome.resource_id(),
            error = %error,
            "failed to render remediation alert"
        ),
    }

    info!(
        invocation_id = %invocation_id,
        resource_id = outcome.resource_id(),
        resource_kind = outcome.resource_kind().as_str(),
        status = outcome.status().as_str(),
        actions = outcome.actions_applied().len(),
        "processed compliance event"
    );

    Json(RemediationResponse::from_outcome(&outcome))
}

/// Liveness probe.
pub async fn healthz() -> &'static str {
    "ok"
}
