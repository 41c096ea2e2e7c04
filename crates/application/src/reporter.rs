use chrono::Utc;
use remedian_core::{AppError, AppResult};
use remedian_domain::{
    ComplianceEvent, RemediationOutcome, UNKNOWN_ACCOUNT, UNKNOWN_REGION, UNKNOWN_RESOURCE_TYPE,
    UNKNOWN_RULE,
};
use serde::Serialize;

const EVENT_TYPE: &str = "Security Remediation";

/// Structured notification describing one remediation pass.
///
/// Human- and machine-readable; handed to the alerting collaborator.
#[derive(Debug, Clone, Serialize)]
pub struct NotificationPayload {
    /// Report creation time, RFC 3339.
    pub timestamp: String,
    /// Fixed event type marker.
    pub event_type: String,
    /// Remediated resource identifier (or its sentinel).
    pub resource_id: String,
    /// Classified resource kind.
    pub resource_kind: String,
    /// Source resource type string (or its sentinel).
    pub resource_type: String,
    /// Compliance verdict of the source event.
    pub compliance_status: String,
    /// Evaluated rule name (or its sentinel).
    pub rule_name: String,
    /// Originating account (or its sentinel).
    pub account: String,
    /// Originating region (or its sentinel).
    pub region: String,
    /// Overall remediation status.
    pub status: String,
    /// Ordered corrective actions that were applied.
    pub actions_applied: Vec<String>,
    /// Collected action error descriptions.
    pub errors: Vec<String>,
    /// Reason a remediation was skipped, when it was.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_reason: Option<String>,
}

impl NotificationPayload {
    /// Returns the alert subject line.
    #[must_use]
    pub fn subject(&self) -> String {
        format!("Security Alert: {} Remediation", self.resource_type)
    }

    /// Renders the payload as a pretty-printed JSON body.
    pub fn body(&self) -> AppResult<String> {
        serde_json::to_string_pretty(self).map_err(|error| {
            AppError::Internal(format!("failed to render notification payload: {error}"))
        })
    }
}

/// Pure formatter turning an execution result into a notification payload.
///
/// Performs no I/O, so it is independently testable; transport belongs to
/// the alerting collaborator.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutcomeReporter;

impl OutcomeReporter {
    /// Creates a reporter.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Builds the notification payload for one outcome.
    ///
    /// The source event is absent when normalization failed; its fields
    /// then fall back to the documented sentinels.
    #[must_use]
    pub fn report(
        &self,
        outcome: &RemediationOutcome,
        event: Option<&ComplianceEvent>,
    ) -> NotificationPayload {
        NotificationPayload {
            timestamp: Utc::now().to_rfc3339(),
            event_type: EVENT_TYPE.to_owned(),
            resource_id: outcome.resource_id().to_owned(),
            resource_kind: outcome.resource_kind().as_str().to_owned(),
            resource_type: event
                .map(ComplianceEvent::resource_type)
                .unwrap_or(UNKNOWN_RESOURCE_TYPE)
                .to_owned(),
            compliance_status: event
                .map(|event| event.compliance_state().as_str())
                .unwrap_or("UNKNOWN")
                .to_owned(),
            rule_name: event
                .map(ComplianceEvent::rule_name)
                .unwrap_or(UNKNOWN_RULE)
                .to_owned(),
            account: event
                .map(ComplianceEvent::account)
                .unwrap_or(UNKNOWN_ACCOUNT)
                .to_owned(),
            region: event
                .map(ComplianceEvent::region)
                .unwrap_or(UNKNOWN_REGION)
                .to_owned(),
            status: outcome.status().as_str().to_owned(),
            actions_applied: outcome.actions_applied().to_vec(),
            errors: outcome.errors().to_vec(),
            skip_reason: outcome.skip_reason().map(ToOwned::to_owned),
        }
    }
}

#[cfg(test)]
mod tests {
    use remedian_domain::{ComplianceEvent, RemediationOutcome, ResourceKind};
    use serde_json::json;

    use super::OutcomeReporter;

    #[test]
    fn success_payload_carries_actions_and_status() {
        let raw = json!({
            "account": "123456789012",
            "region": "eu-west-1",
            "detail": {
                "configurationItem": {
                    "resourceId": "open-bucket",
                    "resourceType": "AWS::S3::Bucket"
                },
                "newEvaluationResult": { "complianceType": "NON_COMPLIANT" }
            }
        });
        let event = ComplianceEvent::normalize(&raw);
        assert!(event.is_ok());
        let event = event.unwrap_or_else(|_| unreachable!());

        let outcome = RemediationOutcome::from_actions(
            "open-bucket",
            ResourceKind::StorageBucket,
            vec![
                "enabled_encryption".to_owned(),
                "enabled_public_access_block".to_owned(),
            ],
            Vec::new(),
        );

        let payload = OutcomeReporter::new().report(&outcome, Some(&event));

        assert_eq!(payload.status, "Success");
        assert_eq!(payload.actions_applied.len(), 2);
        assert_eq!(payload.resource_id, "open-bucket");
        assert_eq!(payload.compliance_status, "NON_COMPLIANT");
        assert_eq!(payload.account, "123456789012");
        assert_eq!(
            payload.subject(),
            "Security Alert: AWS::S3::Bucket Remediation"
        );
    }

    #[test]
    fn missing_event_falls_back_to_sentinels() {
        let outcome = RemediationOutcome::failed(
            "UNKNOWN_RESOURCE",
            ResourceKind::Other,
            "missing resource id: no recognized shape",
        );

        let payload = OutcomeReporter::new().report(&outcome, None);

        assert_eq!(payload.status, "Failure");
        assert_eq!(payload.resource_type, "UNKNOWN_RESOURCE_TYPE");
        assert_eq!(payload.account, "UNKNOWN_ACCOUNT");
        assert_eq!(payload.errors.len(), 1);
    }

    #[test]
    fn body_is_valid_json() {
        let outcome = RemediationOutcome::skipped(
            "vol-1",
            ResourceKind::Other,
            "no remediation strategy registered for resource type 'AWS::EC2::Volume'",
        );
        let payload = OutcomeReporter::new().report(&outcome, None);

        let body = payload.body();
        assert!(body.is_ok());
        let parsed: Result<serde_json::Value, _> =
            serde_json::from_str(body.unwrap_or_default().as_str());
        assert!(parsed.is_ok());
        assert_eq!(
            parsed.unwrap_or_default()["event_type"],
            "Security Remediation"
        );
    }
}
