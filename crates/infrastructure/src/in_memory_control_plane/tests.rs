use remedian_application::{
    EncryptionAlgorithm, IngressRule, PublicAccessFlags, ResourceControlPlane, ResourceTag,
};

use super::InMemoryControlPlane;

fn ssh_rule(cidr: &str) -> IngressRule {
    IngressRule {
        ip_protocol: Some("tcp".to_owned()),
        from_port: Some(22),
        to_port: Some(22),
        ip_ranges: vec![cidr.to_owned()],
    }
}

#[tokio::test]
async fn revoking_a_rule_removes_it_from_the_group() {
    let control_plane = InMemoryControlPlane::new();
    control_plane
        .seed_security_group("sg-1", vec![ssh_rule("0.0.0.0/0"), ssh_rule("10.0.0.0/8")])
        .await;

    let revoke_result = control_plane
        .revoke_ingress_rule("sg-1", &ssh_rule("0.0.0.0/0"))
        .await;
    assert!(revoke_result.is_ok());

    let remaining = control_plane.describe_security_group_rules("sg-1").await;
    assert!(remaining.is_ok());
    assert_eq!(remaining.unwrap_or_default(), [ssh_rule("10.0.0.0/8")]);
    assert_eq!(control_plane.revocations().await.len(), 1);
}

#[tokio::test]
async fn unknown_security_groups_list_as_empty() {
    let control_plane = InMemoryControlPlane::new();

    let rules = control_plane.describe_security_group_rules("sg-404").await;
    assert!(rules.is_ok());
    assert!(rules.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn bucket_settings_are_recorded() {
    let control_plane = InMemoryControlPlane::new();

    let encryption_result = control_plane
        .put_bucket_encryption("open-bucket", EncryptionAlgorithm::Aes256)
        .await;
    assert!(encryption_result.is_ok());
    let block_result = control_plane
        .put_public_access_block("open-bucket", PublicAccessFlags::all())
        .await;
    assert!(block_result.is_ok());

    assert_eq!(
        control_plane.encryption_for("open-bucket").await,
        Some(EncryptionAlgorithm::Aes256)
    );
    assert_eq!(
        control_plane.access_block_for("open-bucket").await,
        Some(PublicAccessFlags::all())
    );
}

#[tokio::test]
async fn boundary_creation_reuses_an_existing_name() {
    let control_plane = InMemoryControlPlane::new();

    let first = control_plane
        .create_isolation_boundary("quarantine-i-0abc")
        .await;
    assert!(first.is_ok());
    let second = control_plane
        .create_isolation_boundary("quarantine-i-0abc")
        .await;
    assert!(second.is_ok());

    assert_eq!(first.unwrap_or_default(), second.unwrap_or_default());
    assert_eq!(control_plane.boundary_count().await, 1);
}

#[tokio::test]
async fn re_tagging_overwrites_by_key() {
    let control_plane = InMemoryControlPlane::new();
    let first_tags = [
        ResourceTag::new("SecurityStatus", "Quarantined"),
        ResourceTag::new("QuarantineDate", "2024-03-01T12:00:00Z"),
    ];
    let second_tags = [ResourceTag::new("QuarantineDate", "2024-03-02T12:00:00Z")];

    let first_result = control_plane.tag_resource("i-0abc", &first_tags).await;
    assert!(first_result.is_ok());
    let second_result = control_plane.tag_resource("i-0abc", &second_tags).await;
    assert!(second_result.is_ok());

    let tags = control_plane.tags_for("i-0abc").await;
    assert_eq!(tags.len(), 2);
    assert!(
        tags.iter()
            .any(|tag| tag.key == "QuarantineDate" && tag.value == "2024-03-02T12:00:00Z")
    );
}
