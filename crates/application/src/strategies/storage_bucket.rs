use std::sync::Arc;

use async_trait::async_trait;
use remedian_core::ResourceId;
use remedian_domain::{RemediationOutcome, ResourceKind};

use super::{ActionLog, RemediationStrategy};
use crate::ports::{EncryptionAlgorithm, PublicAccessFlags, ResourceControlPlane};

/// Enforces default encryption and a full public access block on a bucket.
pub struct StorageBucketStrategy {
    control_plane: Arc<dyn ResourceControlPlane>,
}

impl StorageBucketStrategy {
    /// Creates the strategy with its control-plane collaborator.
    #[must_use]
    pub fn new(control_plane: Arc<dyn ResourceControlPlane>) -> Self {
        Self { control_plane }
    }
}

#[async_trait]
impl RemediationStrategy for StorageBucketStrategy {
    fn kind(&self) -> ResourceKind {
        ResourceKind::StorageBucket
    }

    async fn apply(&self, resource_id: &ResourceId) -> RemediationOutcome {
        let bucket = resource_id.as_str();
        let mut log = ActionLog::default();

        // Both actions are independent; each is attempted regardless of
        // the other's result.
        match self
            .control_plane
            .put_bucket_encryption(bucket, EncryptionAlgorithm::Aes256)
            .await
        {
            Ok(()) => log.applied("enabled_encryption"),
            Err(error) => log.failed(format!("put_bucket_encryption: {error}")),
        }

        match self
            .control_plane
            .put_public_access_block(bucket, PublicAccessFlags::all())
            .await
        {
            Ok(()) => log.applied("enabled_public_access_block"),
            Err(error) => log.failed(format!("put_public_access_block: {error}")),
        }

        log.into_outcome(resource_id, ResourceKind::StorageBucket)
    }
}
