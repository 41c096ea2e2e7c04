use async_trait::async_trait;
use remedian_core::AppResult;
use serde::{Deserialize, Serialize};

/// One ingress rule of a security group as listed by the control plane.
///
/// A rule groups every source range sharing the same protocol and port
/// span, mirroring how the provider reports and revokes rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngressRule {
    /// Wire protocol (`tcp`, `udp`, `icmp`, or `-1` for all).
    pub ip_protocol: Option<String>,
    /// Inclusive start of the port span.
    pub from_port: Option<i32>,
    /// Inclusive end of the port span.
    pub to_port: Option<i32>,
    /// Source IPv4 CIDR ranges attached to this rule.
    pub ip_ranges: Vec<String>,
}

/// Server-side encryption algorithm applied to a storage bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EncryptionAlgorithm {
    /// AES-256 managed encryption.
    Aes256,
}

impl EncryptionAlgorithm {
    /// Returns the provider algorithm name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Aes256 => "AES256",
        }
    }
}

/// Public access block configuration for a storage bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicAccessFlags {
    /// Reject new public ACLs.
    pub block_public_acls: bool,
    /// Ignore existing public ACLs.
    pub ignore_public_acls: bool,
    /// Reject new public bucket policies.
    pub block_public_policy: bool,
    /// Restrict access for buckets with public policies.
    pub restrict_public_buckets: bool,
}

impl PublicAccessFlags {
    /// Returns the configuration with all four flags set.
    #[must_use]
    pub fn all() -> Self {
        Self {
            block_public_acls: true,
            ignore_public_acls: true,
            block_public_policy: true,
            restrict_public_buckets: true,
        }
    }
}

/// One key/value tag applied to a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceTag {
    /// Tag key.
    pub key: String,
    /// Tag value.
    pub value: String,
}

impl ResourceTag {
    /// Creates a tag.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Port over the provider control plane consumed by remediation strategies.
///
/// The core depends only on these semantic operations; adapters translate
/// them to a concrete provider API. Every operation is expected to be
/// idempotent from the caller's point of view and to carry its own
/// timeout, surfacing timeouts as ordinary errors.
#[async_trait]
pub trait ResourceControlPlane: Send + Sync {
    /// Lists the ingress rules of a security group, in provider order.
    async fn describe_security_group_rules(&self, group_id: &str) -> AppResult<Vec<IngressRule>>;

    /// Revokes one specific ingress rule from a security group.
    async fn revoke_ingress_rule(&self, group_id: &str, rule: &IngressRule) -> AppResult<()>;

    /// Enables default server-side encryption on a bucket.
    async fn put_bucket_encryption(
        &self,
        bucket: &str,
        algorithm: EncryptionAlgorithm,
    ) -> AppResult<()>;

    /// Applies a public access block configuration to a bucket.
    async fn put_public_access_block(
        &self,
        bucket: &str,
        flags: PublicAccessFlags,
    ) -> AppResult<()>;

    /// Creates an isolating network boundary with no permitted traffic,
    /// returning its identifier.
    ///
    /// When a boundary with the hinted name already exists its identifier
    /// is returned instead of creating a duplicate.
    async fn create_isolation_boundary(&self, name_hint: &str) -> AppResult<String>;

    /// Attaches an isolation boundary to an instance, replacing its
    /// current network attachments.
    async fn attach_isolation_boundary(
        &self,
        instance_id: &str,
        boundary_id: &str,
    ) -> AppResult<()>;

    /// Applies tags to a resource.
    async fn tag_resource(&self, resource_id: &str, tags: &[ResourceTag]) -> AppResult<()>;
}
