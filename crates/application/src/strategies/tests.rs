use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use remedian_core::{AppError, AppResult, ResourceId};
use remedian_domain::{RemediationStatus, ResourceKind};
use tokio::sync::Mutex;

use super::{
    ComputeInstanceStrategy, RemediationStrategy, SecurityGroupStrategy, StorageBucketStrategy,
};
use crate::ports::{
    EncryptionAlgorithm, IngressRule, PublicAccessFlags, ResourceControlPlane, ResourceTag,
};

#[derive(Default)]
struct FakeControlPlane {
    rules: Vec<IngressRule>,
    failing: HashSet<&'static str>,
    revoked: Mutex<Vec<IngressRule>>,
    encrypted: Mutex<Vec<(String, EncryptionAlgorithm)>>,
    access_blocks: Mutex<Vec<(String, PublicAccessFlags)>>,
    boundaries: Mutex<HashMap<String, String>>,
    attachments: Mutex<Vec<(String, String)>>,
    tags: Mutex<Vec<(String, Vec<ResourceTag>)>>,
}

impl FakeControlPlane {
    fn with_rules(rules: Vec<IngressRule>) -> Self {
        Self {
            rules,
            ..Self::default()
        }
    }

    fn failing(operations: &[&'static str]) -> Self {
        Self {
            failing: operations.iter().copied().collect(),
            ..Self::default()
        }
    }

    fn check(&self, operation: &'static str) -> AppResult<()> {
        if self.failing.contains(operation) {
            return Err(AppError::ControlPlane(format!("{operation} unavailable")));
        }

        Ok(())
    }
}

#[async_trait]
impl ResourceControlPlane for FakeControlPlane {
    async fn describe_security_group_rules(
        &self,
        _group_id: &str,
    ) -> AppResult<Vec<IngressRule>> {
        self.check("describe_security_group_rules")?;
        Ok(self.rules.clone())
    }

    async fn revoke_ingress_rule(&self, _group_id: &str, rule: &IngressRule) -> AppResult<()> {
        self.check("revoke_ingress_rule")?;
        self.revoked.lock().await.push(rule.clone());
        Ok(())
    }

    async fn put_bucket_encryption(
        &self,
        bucket: &str,
        algorithm: EncryptionAlgorithm,
    ) -> AppResult<()> {
        self.check("put_bucket_encryption")?;
        self.encrypted.lock().await.push((bucket.to_owned(), algorithm));
        Ok(())
    }

    async fn put_public_access_block(
        &self,
        bucket: &str,
        flags: PublicAccessFlags,
    ) -> AppResult<()> {
        self.check("put_public_access_block")?;
        self.access_blocks.lock().await.push((bucket.to_owned(), flags));
        Ok(())
    }

    async fn create_isolation_boundary(&self, name_hint: &str) -> AppResult<String> {
        self.check("create_isolation_boundary")?;
        let mut boundaries = self.boundaries.lock().await;
        if let Some(existing) = boundaries.get(name_hint) {
            return Ok(existing.clone());
        }

        let boundary_id = format!("boundary-{}", boundaries.len() + 1);
        boundaries.insert(name_hint.to_owned(), boundary_id.clone());
        Ok(boundary_id)
    }

    async fn attach_isolation_boundary(
        &self,
        instance_id: &str,
        boundary_id: &str,
    ) -> AppResult<()> {
        self.check("attach_isolation_boundary")?;
        self.attachments
            .lock()
            .await
            .push((instance_id.to_owned(), boundary_id.to_owned()));
        Ok(())
    }

    async fn tag_resource(&self, resource_id: &str, tags: &[ResourceTag]) -> AppResult<()> {
        self.check("tag_resource")?;
        self.tags
            .lock()
            .await
            .push((resource_id.to_owned(), tags.to_vec()));
        Ok(())
    }
}

fn ingress_rule(cidrs: &[&str]) -> IngressRule {
    IngressRule {
        ip_protocol: Some("tcp".to_owned()),
        from_port: Some(22),
        to_port: Some(22),
        ip_ranges: cidrs.iter().map(|cidr| (*cidr).to_owned()).collect(),
    }
}

fn target(resource_id: &str) -> ResourceId {
    ResourceId::new(resource_id).unwrap_or_else(|_| unreachable!())
}

#[tokio::test]
async fn security_group_revokes_every_unrestricted_rule() {
    let control_plane = Arc::new(FakeControlPlane::with_rules(vec![
        ingress_rule(&["0.0.0.0/0"]),
        ingress_rule(&["10.0.0.0/8"]),
        ingress_rule(&["0.0.0.0/0"]),
    ]));
    let strategy = SecurityGroupStrategy::new(control_plane.clone());

    let outcome = strategy.apply(&target("sg-1")).await;

    assert_eq!(outcome.status(), RemediationStatus::Success);
    assert_eq!(outcome.actions_applied().len(), 2);
    let revoked = control_plane.revoked.lock().await;
    assert_eq!(revoked.len(), 2);
    assert!(
        revoked
            .iter()
            .all(|rule| rule.ip_ranges.contains(&"0.0.0.0/0".to_owned()))
    );
}

#[tokio::test]
async fn security_group_rule_with_mixed_ranges_is_revoked_whole() {
    let control_plane = Arc::new(FakeControlPlane::with_rules(vec![ingress_rule(&[
        "192.168.0.0/16",
        "0.0.0.0/0",
    ])]));
    let strategy = SecurityGroupStrategy::new(control_plane.clone());

    let outcome = strategy.apply(&target("sg-1")).await;

    assert_eq!(outcome.status(), RemediationStatus::Success);
    assert_eq!(control_plane.revoked.lock().await.len(), 1);
}

#[tokio::test]
async fn security_group_without_unrestricted_rules_is_a_noop_success() {
    let control_plane = Arc::new(FakeControlPlane::with_rules(vec![ingress_rule(&[
        "10.0.0.0/8",
    ])]));
    let strategy = SecurityGroupStrategy::new(control_plane.clone());

    let outcome = strategy.apply(&target("sg-1")).await;

    assert_eq!(outcome.status(), RemediationStatus::Success);
    assert!(outcome.actions_applied().is_empty());
    assert!(control_plane.revoked.lock().await.is_empty());
}

#[tokio::test]
async fn security_group_listing_failure_is_a_failure_outcome() {
    let control_plane = Arc::new(FakeControlPlane::failing(&[
        "describe_security_group_rules",
    ]));
    let strategy = SecurityGroupStrategy::new(control_plane);

    let outcome = strategy.apply(&target("sg-1")).await;

    assert_eq!(outcome.status(), RemediationStatus::Failure);
    assert_eq!(outcome.errors().len(), 1);
}

#[tokio::test]
async fn security_group_revocation_failures_do_not_stop_siblings() {
    let control_plane = Arc::new(FakeControlPlane {
        rules: vec![ingress_rule(&["0.0.0.0/0"]), ingress_rule(&["0.0.0.0/0"])],
        failing: ["revoke_ingress_rule"].into_iter().collect(),
        ..FakeControlPlane::default()
    });
    let strategy = SecurityGroupStrategy::new(control_plane);

    let outcome = strategy.apply(&target("sg-1")).await;

    assert_eq!(outcome.status(), RemediationStatus::Failure);
    assert_eq!(outcome.errors().len(), 2);
}

#[tokio::test]
async fn storage_bucket_applies_both_actions() {
    let control_plane = Arc::new(FakeControlPlane::default());
    let strategy = StorageBucketStrategy::new(control_plane.clone());

    let outcome = strategy.apply(&target("open-bucket")).await;

    assert_eq!(outcome.status(), RemediationStatus::Success);
    assert_eq!(
        outcome.actions_applied(),
        ["enabled_encryption", "enabled_public_access_block"]
    );

    let encrypted = control_plane.encrypted.lock().await;
    assert_eq!(
        encrypted.as_slice(),
        [("open-bucket".to_owned(), EncryptionAlgorithm::Aes256)]
    );

    let access_blocks = control_plane.access_blocks.lock().await;
    assert_eq!(access_blocks.len(), 1);
    assert_eq!(access_blocks[0].1, PublicAccessFlags::all());
}

#[tokio::test]
async fn storage_bucket_encryption_failure_is_partial() {
    let control_plane = Arc::new(FakeControlPlane::failing(&["put_bucket_encryption"]));
    let strategy = StorageBucketStrategy::new(control_plane.clone());

    let outcome = strategy.apply(&target("open-bucket")).await;

    assert_eq!(outcome.status(), RemediationStatus::PartialFailure);
    assert_eq!(outcome.errors().len(), 1);
    assert_eq!(outcome.actions_applied(), ["enabled_public_access_block"]);
    assert_eq!(control_plane.access_blocks.lock().await.len(), 1);
}

#[tokio::test]
async fn storage_bucket_with_both_actions_failing_is_a_failure() {
    let control_plane = Arc::new(FakeControlPlane::failing(&[
        "put_bucket_encryption",
        "put_public_access_block",
    ]));
    let strategy = StorageBucketStrategy::new(control_plane);

    let outcome = strategy.apply(&target("open-bucket")).await;

    assert_eq!(outcome.status(), RemediationStatus::Failure);
    assert_eq!(outcome.errors().len(), 2);
    assert!(outcome.actions_applied().is_empty());
}

#[tokio::test]
async fn quarantine_applies_boundary_attachment_and_tags() {
    let control_plane = Arc::new(FakeControlPlane::default());
    let strategy = ComputeInstanceStrategy::new(control_plane.clone());

    let outcome = strategy.apply(&target("i-0abc")).await;

    assert_eq!(outcome.status(), RemediationStatus::Success);
    assert_eq!(outcome.actions_applied().len(), 3);
    assert_eq!(outcome.resource_kind(), ResourceKind::ComputeInstance);

    let attachments = control_plane.attachments.lock().await;
    assert_eq!(
        attachments.as_slice(),
        [("i-0abc".to_owned(), "boundary-1".to_owned())]
    );

    let tags = control_plane.tags.lock().await;
    assert_eq!(tags.len(), 1);
    assert!(
        tags[0]
            .1
            .iter()
            .any(|tag| tag.key == "SecurityStatus" && tag.value == "Quarantined")
    );
    assert!(tags[0].1.iter().any(|tag| tag.key == "QuarantineDate"));
}

#[tokio::test]
async fn quarantine_is_idempotent_across_invocations() {
    let control_plane = Arc::new(FakeControlPlane::default());
    let strategy = ComputeInstanceStrategy::new(control_plane.clone());

    let first = strategy.apply(&target("i-0abc")).await;
    let second = strategy.apply(&target("i-0abc")).await;

    assert_eq!(first.status(), RemediationStatus::Success);
    assert_eq!(second.status(), RemediationStatus::Success);

    let boundaries = control_plane.boundaries.lock().await;
    assert_eq!(boundaries.len(), 1);
    assert!(boundaries.contains_key("quarantine-i-0abc"));
}

#[tokio::test]
async fn quarantine_tags_even_when_boundary_creation_fails() {
    let control_plane = Arc::new(FakeControlPlane::failing(&["create_isolation_boundary"]));
    let strategy = ComputeInstanceStrategy::new(control_plane.clone());

    let outcome = strategy.apply(&target("i-0abc")).await;

    assert_eq!(outcome.status(), RemediationStatus::PartialFailure);
    assert_eq!(outcome.actions_applied(), ["tagged_quarantined"]);
    assert_eq!(outcome.errors().len(), 1);
    assert!(control_plane.attachments.lock().await.is_empty());
    assert_eq!(control_plane.tags.lock().await.len(), 1);
}
