use std::collections::HashMap;

use async_trait::async_trait;
use remedian_application::{
    EncryptionAlgorithm, IngressRule, PublicAccessFlags, ResourceControlPlane, ResourceTag,
};
use remedian_core::AppResult;
use tokio::sync::RwLock;

#[cfg(test)]
mod tests;

/// In-memory control plane implementation.
///
/// Backs the api's dev mode and adapter-level tests. Unknown security
/// groups list as empty, and boundary creation honors the create-or-reuse
/// contract of the port.
#[derive(Debug, Default)]
pub struct InMemoryControlPlane {
    groups: RwLock<HashMap<String, Vec<IngressRule>>>,
    revocations: RwLock<Vec<(String, IngressRule)>>,
    bucket_encryption: RwLock<HashMap<String, EncryptionAlgorithm>>,
    access_blocks: RwLock<HashMap<String, PublicAccessFlags>>,
    boundaries: RwLock<HashMap<String, String>>,
    attachments: RwLock<HashMap<String, String>>,
    tags: RwLock<HashMap<String, Vec<ResourceTag>>>,
}

impl InMemoryControlPlane {
    /// Creates an empty in-memory control plane.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds one security group with ingress rules.
    pub async fn seed_security_group(&self, group_id: &str, rules: Vec<IngressRule>) {
        self.groups.write().await.insert(group_id.to_owned(), rules);
    }

    /// Returns the revocations issued so far, in order.
    pub async fn revocations(&self) -> Vec<(String, IngressRule)> {
        self.revocations.read().await.clone()
    }

    /// Returns the encryption algorithm recorded for a bucket.
    pub async fn encryption_for(&self, bucket: &str) -> Option<EncryptionAlgorithm> {
        self.bucket_encryption.read().await.get(bucket).copied()
    }

    /// Returns the public access block recorded for a bucket.
    pub async fn access_block_for(&self, bucket: &str) -> Option<PublicAccessFlags> {
        self.access_blocks.read().await.get(bucket).copied()
    }

    /// Returns the number of isolation boundaries created.
    pub async fn boundary_count(&self) -> usize {
        self.boundaries.read().await.len()
    }

    /// Returns the boundary attached to an instance.
    pub async fn attachment_for(&self, instance_id: &str) -> Option<String> {
        self.attachments.read().await.get(instance_id).cloned()
    }

    /// Returns the tags recorded for a resource.
    pub async fn tags_for(&self, resource_id: &str) -> Vec<ResourceTag> {
        self.tags
            .read()
            .await
            .get(resource_id)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl ResourceControlPlane for InMemoryControlPlane {
    async fn describe_security_group_rules(&self, group_id: &str) -> AppResult<Vec<IngressRule>> {
        let groups = self.groups.read().await;
        Ok(groups.get(group_id).cloned().unwrap_or_default())
    }

    async fn revoke_ingress_rule(&self, group_id: &str, rule: &IngressRule) -> AppResult<()> {
        let mut groups = self.groups.write().await;
        if let Some(rules) = groups.get_mut(group_id) {
            rules.retain(|candidate| candidate != rule);
        }

        self.revocations
            .write()
            .await
            .push((group_id.to_owned(), rule.clone()));
        Ok(())
    }

    async fn put_bucket_encryption(
        &self,
        bucket: &str,
        algorithm: EncryptionAlgorithm,
    ) -> AppResult<()> {
        self.bucket_encryption
            .write()
            .await
            .insert(bucket.to_owned(), algorithm);
        Ok(())
    }

    async fn put_public_access_block(
        &self,
        bucket: &str,
        flags: PublicAccessFlags,
    ) -> AppResult<()> {
        self.access_blocks
            .write()
            .await
            .insert(bucket.to_owned(), flags);
        Ok(())
    }

    async fn create_isolation_boundary(&self, name_hint: &str) -> AppResult<String> {
        let mut boundaries = self.boundaries.write().await;
        if let Some(existing) = boundaries.get(name_hint) {
            return Ok(existing.clone());
        }

        let boundary_id = format!("isolation-{}", boundaries.len() + 1);
        boundaries.insert(name_hint.to_owned(), boundary_id.clone());
        Ok(boundary_id)
    }

    async fn attach_isolation_boundary(
        &self,
        instance_id: &str,
        boundary_id: &str,
    ) -> AppResult<()> {
        self.attachments
            .write()
            .await
            .insert(instance_id.to_owned(), boundary_id.to_owned());
        Ok(())
    }

    async fn tag_resource(&self, resource_id: &str, tags: &[ResourceTag]) -> AppResult<()> {
        let mut stored = self.tags.write().await;
        let entry = stored.entry(resource_id.to_owned()).or_default();
        for tag in tags {
            entry.retain(|existing| existing.key != tag.key);
            entry.push(tag.clone());
        }

        Ok(())
    }
}
