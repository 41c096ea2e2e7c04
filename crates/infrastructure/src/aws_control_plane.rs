use async_trait::async_trait;
use aws_sdk_ec2::error::DisplayErrorContext;
use aws_sdk_ec2::types::{Filter, IpPermission, IpRange, Tag};
use aws_sdk_s3::types::{
    PublicAccessBlockConfiguration, ServerSideEncryption, ServerSideEncryptionByDefault,
    ServerSideEncryptionConfiguration, ServerSideEncryptionRule,
};
use remedian_application::{
    EncryptionAlgorithm, IngressRule, PublicAccessFlags, ResourceControlPlane, ResourceTag,
};
use remedian_core::{AppError, AppResult};
use tracing::info;

const UNRESTRICTED_IPV4: &str = "0.0.0.0/0";
const ALL_PROTOCOLS: &str = "-1";

/// Resource control plane backed by the AWS EC2 and S3 APIs.
///
/// The SDK clients carry the operation timeouts configured by the
/// composition root, so a timed-out call surfaces as an ordinary error.
#[derive(Clone)]
pub struct AwsControlPlane {
    ec2: aws_sdk_ec2::Client,
    s3: aws_sdk_s3::Client,
}

impl AwsControlPlane {
    /// Creates the adapter from preconfigured service clients.
    #[must_use]
    pub fn new(ec2: aws_sdk_ec2::Client, s3: aws_sdk_s3::Client) -> Self {
        Self { ec2, s3 }
    }

    async fn find_security_group_by_name(&self, group_name: &str) -> AppResult<Option<String>> {
        let output = self
            .ec2
            .describe_security_groups()
            .filters(
                Filter::builder()
                    .name("group-name")
                    .values(group_name)
                    .build(),
            )
            .send()
            .await
            .map_err(|error| {
                AppError::ControlPlane(format!(
                    "describe_security_groups by name '{group_name}' failed: {}",
                    DisplayErrorContext(&error)
                ))
            })?;

        Ok(output
            .security_groups()
            .iter()
            .find_map(|group| group.group_id().map(ToOwned::to_owned)))
    }

    /// Strips the provider's default allow-all egress rule so the boundary
    /// permits no traffic in either direction.
    async fn strip_default_egress(&self, group_id: &str) -> AppResult<()> {
        let default_egress = IpPermission::builder()
            .ip_protocol(ALL_PROTOCOLS)
            .ip_ranges(IpRange::builder().cidr_ip(UNRESTRICTED_IPV4).build())
            .build();

        self.ec2
            .revoke_security_group_egress()
            .group_id(group_id)
            .ip_permissions(default_egress)
            .send()
            .await
            .map_err(|error| {
                AppError::ControlPlane(format!(
                    "revoke_security_group_egress for '{group_id}' failed: {}",
                    DisplayErrorContext(&error)
                ))
            })?;

        Ok(())
    }
}

#[async_trait]
impl ResourceControlPlane for AwsControlPlane {
    async fn describe_security_group_rules(&self, group_id: &str) -> AppResult<Vec<IngressRule>> {
        let output = self
            .ec2
            .describe_security_groups()
            .group_ids(group_id)
            .send()
            .await
            .map_err(|error| {
                AppError::ControlPlane(format!(
                    "describe_security_groups for '{group_id}' failed: {}",
                    DisplayErrorContext(&error)
                ))
            })?;

        let rules = output
            .security_groups()
            .iter()
            .flat_map(|group| group.ip_permissions())
            .map(|permission| IngressRule {
                ip_protocol: permission.ip_protocol().map(ToOwned::to_owned),
                from_port: permission.from_port(),
                to_port: permission.to_port(),
                ip_ranges: permission
                    .ip_ranges()
                    .iter()
                    .filter_map(|range| range.cidr_ip().map(ToOwned::to_owned))
                    .collect(),
            })
            .collect();

        Ok(rules)
    }

    async fn revoke_ingress_rule(&self, group_id: &str, rule: &IngressRule) -> AppResult<()> {
        let mut permission = IpPermission::builder();
        if let Some(protocol) = rule.ip_protocol.as_deref() {
            permission = permission.ip_protocol(protocol);
        }
        if let Some(from_port) = rule.from_port {
            permission = permission.from_port(from_port);
        }
        if let Some(to_port) = rule.to_port {
            permission = permission.to_port(to_port);
        }
        for cidr in &rule.ip_ranges {
            permission = permission.ip_ranges(IpRange::builder().cidr_ip(cidr).build());
        }

        self.ec2
            .revoke_security_group_ingress()
            .group_id(group_id)
            .ip_permissions(permission.build())
            .send()
            .await
            .map_err(|error| {
                AppError::ControlPlane(format!(
                    "revoke_security_group_ingress for '{group_id}' failed: {}",
                    DisplayErrorContext(&error)
                ))
            })?;

        info!(group_id = group_id, "revoked permissive ingress rule");
        Ok(())
    }

    async fn put_bucket_encryption(
        &self,
        bucket: &str,
        algorithm: EncryptionAlgorithm,
    ) -> AppResult<()> {
        let sse_algorithm = match algorithm {
            EncryptionAlgorithm::Aes256 => ServerSideEncryption::Aes256,
        };

        let by_default = ServerSideEncryptionByDefault::builder()
            .sse_algorithm(sse_algorithm)
            .build()
            .map_err(|error| {
                AppError::Internal(format!("invalid encryption configuration: {error}"))
            })?;
        let configuration = ServerSideEncryptionConfiguration::builder()
            .rules(
                ServerSideEncryptionRule::builder()
                    .apply_server_side_encryption_by_default(by_default)
                    .build(),
            )
            .build()
            .map_err(|error| {
                AppError::Internal(format!("invalid encryption configuration: {error}"))
            })?;

        self.s3
            .put_bucket_encryption()
            .bucket(bucket)
            .server_side_encryption_configuration(configuration)
            .send()
            .await
            .map_err(|error| {
                AppError::ControlPlane(format!(
                    "put_bucket_encryption for '{bucket}' failed: {}",
                    DisplayErrorContext(&error)
                ))
            })?;

        info!(bucket = bucket, "enabled default bucket encryption");
        Ok(())
    }

    async fn put_public_access_block(
        &self,
        bucket: &str,
        flags: PublicAccessFlags,
    ) -> AppResult<()> {
        let configuration = PublicAccessBlockConfiguration::builder()
            .block_public_acls(flags.block_public_acls)
            .ignore_public_acls(flags.ignore_public_acls)
            .block_public_policy(flags.block_public_policy)
            .restrict_public_buckets(flags.restrict_public_buckets)
            .build();

        self.s3
            .put_public_access_block()
            .bucket(bucket)
            .public_access_block_configuration(configuration)
            .send()
            .await
            .map_err(|error| {
                AppError::ControlPlane(format!(
                    "put_public_access_block for '{bucket}' failed: {}",
                    DisplayErrorContext(&error)
                ))
            })?;

        info!(bucket = bucket, "enabled public access block");
        Ok(())
    }

    async fn create_isolation_boundary(&self, name_hint: &str) -> AppResult<String> {
        if let Some(existing) = self.find_security_group_by_name(name_hint).await? {
            info!(
                boundary = name_hint,
                group_id = %existing,
                "reusing existing quarantine security group"
            );
            return Ok(existing);
        }

        let output = self
            .ec2
            .create_security_group()
            .group_name(name_hint)
            .description("Quarantine security group for suspicious instance")
            .send()
            .await
            .map_err(|error| {
                AppError::ControlPlane(format!(
                    "create_security_group '{name_hint}' failed: {}",
                    DisplayErrorContext(&error)
                ))
            })?;

        let group_id = output.group_id().map(ToOwned::to_owned).ok_or_else(|| {
            AppError::ControlPlane(format!(
                "create_security_group '{name_hint}' returned no group id"
            ))
        })?;

        self.strip_default_egress(group_id.as_str()).await?;

        info!(
            boundary = name_hint,
            group_id = %group_id,
            "created quarantine security group"
        );
        Ok(group_id)
    }

    async fn attach_isolation_boundary(
        &self,
        instance_id: &str,
        boundary_id: &str,
    ) -> AppResult<()> {
        self.ec2
            .modify_instance_attribute()
            .instance_id(instance_id)
            .groups(boundary_id)
            .send()
            .await
            .map_err(|error| {
                AppError::ControlPlane(format!(
                    "modify_instance_attribute for '{instance_id}' failed: {}",
                    DisplayErrorContext(&error)
                ))
            })?;

        info!(
            instance_id = instance_id,
            boundary_id = boundary_id,
            "attached quarantine security group"
        );
        Ok(())
    }

    async fn tag_resource(&self, resource_id: &str, tags: &[ResourceTag]) -> AppResult<()> {
        let mut request = self.ec2.create_tags().resources(resource_id);
        for tag in tags {
            request = request.tags(
                Tag::builder()
                    .key(tag.key.as_str())
                    .value(tag.value.as_str())
                    .build(),
            );
        }

        request.send().await.map_err(|error| {
            AppError::ControlPlane(format!(
                "create_tags for '{resource_id}' failed: {}",
                DisplayErrorContext(&error)
            ))
        })?;

        Ok(())
    }
}
