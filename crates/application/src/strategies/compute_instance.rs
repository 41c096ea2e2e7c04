use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use remedian_core::ResourceId;
use remedian_domain::{RemediationOutcome, ResourceKind};

use super::{ActionLog, RemediationStrategy};
use crate::ports::{ResourceControlPlane, ResourceTag};

const QUARANTINE_STATUS_KEY: &str = "SecurityStatus";
const QUARANTINE_STATUS_VALUE: &str = "Quarantined";
const QUARANTINE_DATE_KEY: &str = "QuarantineDate";

/// Quarantines a compute instance behind an isolation boundary.
pub struct ComputeInstanceStrategy {
    control_plane: Arc<dyn ResourceControlPlane>,
}

impl ComputeInstanceStrategy {
    /// Creates the strategy with its control-plane collaborator.
    #[must_use]
    pub fn new(control_plane: Arc<dyn ResourceControlPlane>) -> Self {
        Self { control_plane }
    }

    /// Deterministic boundary name derived from the instance identifier,
    /// so a re-invocation finds the boundary created by the first pass.
    #[must_use]
    pub fn boundary_name(instance_id: &str) -> String {
        format!("quarantine-{instance_id}")
    }
}

#[async_trait]
impl RemediationStrategy for ComputeInstanceStrategy {
    fn kind(&self) -> ResourceKind {
        ResourceKind::ComputeInstance
    }

    async fn apply(&self, resource_id: &ResourceId) -> RemediationOutcome {
        let instance_id = resource_id.as_str();
        let boundary_name = Self::boundary_name(instance_id);
        let mut log = ActionLog::default();

        let boundary_id = match self
            .control_plane
            .create_isolation_boundary(boundary_name.as_str())
            .await
        {
            Ok(boundary_id) => {
                log.applied(format!("ensured_isolation_boundary({boundary_name})"));
                Some(boundary_id)
            }
            Err(error) => {
                log.failed(format!("create_isolation_boundary: {error}"));
                None
            }
        };

        // Attachment needs the boundary id, so it is only attemptable when
        // creation yielded one.
        if let Some(boundary_id) = boundary_id {
            match self
                .control_plane
                .attach_isolation_boundary(instance_id, boundary_id.as_str())
                .await
            {
                Ok(()) => log.applied("attached_isolation_boundary"),
                Err(error) => log.failed(format!("attach_isolation_boundary: {error}")),
            }
        }

        let tags = [
            ResourceTag::new(QUARANTINE_STATUS_KEY, QUARANTINE_STATUS_VALUE),
            ResourceTag::new(QUARANTINE_DATE_KEY, Utc::now().to_rfc3339()),
        ];
        match self.control_plane.tag_resource(instance_id, &tags).await {
            Ok(()) => log.applied("tagged_quarantined"),
            Err(error) => log.failed(format!("tag_resource: {error}")),
        }

        log.into_outcome(resource_id, ResourceKind::ComputeInstance)
    }
}
