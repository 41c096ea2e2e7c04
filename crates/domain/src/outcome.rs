use serde::{Deserialize, Serialize};

use crate::resource::ResourceKind;

/// Overall result category of one remediation pass.
///
/// The derived ordering is the severity order: `Failure` is the most
/// severe, `Success` the least, so `max` picks the status that must win
/// when results are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RemediationStatus {
    /// Every attempted corrective action succeeded (including zero actions).
    Success,
    /// No remediation was attempted; see the outcome's skip reason.
    Skipped,
    /// Some corrective actions succeeded and some failed.
    PartialFailure,
    /// No corrective action succeeded.
    Failure,
}

impl RemediationStatus {
    /// Returns the stable status name used in notification payloads.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Skipped => "Skipped",
            Self::PartialFailure => "PartialFailure",
            Self::Failure => "Failure",
        }
    }

    /// Returns the lowercase code used in the handler response.
    #[must_use]
    pub fn short_code(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Skipped => "skipped",
            Self::PartialFailure => "partial",
            Self::Failure => "failure",
        }
    }
}

/// Result record of one remediation pass over one resource.
///
/// Created exactly once by the executing strategy (or the executor for
/// skip/failure short-circuits) and consumed read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemediationOutcome {
    resource_id: String,
    resource_kind: ResourceKind,
    actions_applied: Vec<String>,
    status: RemediationStatus,
    errors: Vec<String>,
    skip_reason: Option<String>,
}

impl RemediationOutcome {
    /// Builds an outcome from collected action results, deriving the
    /// status: all succeeded is `Success`, a mix is `PartialFailure`,
    /// only errors is `Failure`.
    #[must_use]
    pub fn from_actions(
        resource_id: impl Into<String>,
        resource_kind: ResourceKind,
        actions_applied: Vec<String>,
        errors: Vec<String>,
    ) -> Self {
        let status = if errors.is_empty() {
            RemediationStatus::Success
        } else if actions_applied.is_empty() {
            RemediationStatus::Failure
        } else {
            RemediationStatus::PartialFailure
        };

        Self {
            resource_id: resource_id.into(),
            resource_kind,
            actions_applied,
            status,
            errors,
            skip_reason: None,
        }
    }

    /// Builds a skipped outcome with a descriptive reason and no side
    /// effects.
    #[must_use]
    pub fn skipped(
        resource_id: impl Into<String>,
        resource_kind: ResourceKind,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            resource_id: resource_id.into(),
            resource_kind,
            actions_applied: Vec::new(),
            status: RemediationStatus::Skipped,
            errors: Vec::new(),
            skip_reason: Some(reason.into()),
        }
    }

    /// Builds a failed outcome carrying a single fatal error, used when
    /// processing never reached a strategy.
    #[must_use]
    pub fn failed(
        resource_id: impl Into<String>,
        resource_kind: ResourceKind,
        error: impl Into<String>,
    ) -> Self {
        Self {
            resource_id: resource_id.into(),
            resource_kind,
            actions_applied: Vec::new(),
            status: RemediationStatus::Failure,
            errors: vec![error.into()],
            skip_reason: None,
        }
    }

    /// Returns the remediated resource identifier (or its sentinel).
    #[must_use]
    pub fn resource_id(&self) -> &str {
        self.resource_id.as_str()
    }

    /// Returns the classified resource kind.
    #[must_use]
    pub fn resource_kind(&self) -> ResourceKind {
        self.resource_kind
    }

    /// Returns the ordered list of applied corrective actions.
    #[must_use]
    pub fn actions_applied(&self) -> &[String] {
        &self.actions_applied
    }

    /// Returns the overall status.
    #[must_use]
    pub fn status(&self) -> RemediationStatus {
        self.status
    }

    /// Returns the collected action error descriptions.
    #[must_use]
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Returns the skip reason when the outcome is `Skipped`.
    #[must_use]
    pub fn skip_reason(&self) -> Option<&str> {
        self.skip_reason.as_deref()
    }
}
