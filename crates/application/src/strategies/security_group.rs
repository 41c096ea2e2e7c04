use std::sync::Arc;

use async_trait::async_trait;
use ipnet::Ipv4Net;
use remedian_core::ResourceId;
use remedian_domain::{RemediationOutcome, ResourceKind};

use super::{ActionLog, RemediationStrategy};
use crate::ports::{IngressRule, ResourceControlPlane};

/// Revokes unrestricted ingress rules from a security group.
pub struct SecurityGroupStrategy {
    control_plane: Arc<dyn ResourceControlPlane>,
}

impl SecurityGroupStrategy {
    /// Creates the strategy with its control-plane collaborator.
    #[must_use]
    pub fn new(control_plane: Arc<dyn ResourceControlPlane>) -> Self {
        Self { control_plane }
    }
}

#[async_trait]
impl RemediationStrategy for SecurityGroupStrategy {
    fn kind(&self) -> ResourceKind {
        ResourceKind::SecurityGroup
    }

    async fn apply(&self, resource_id: &ResourceId) -> RemediationOutcome {
        let group_id = resource_id.as_str();

        let rules = match self
            .control_plane
            .describe_security_group_rules(group_id)
            .await
        {
            Ok(rules) => rules,
            Err(error) => {
                return RemediationOutcome::failed(
                    group_id,
                    ResourceKind::SecurityGroup,
                    format!("describe_security_group_rules: {error}"),
                );
            }
        };

        let mut log = ActionLog::default();

        // A rule object is revoked whole when any of its ranges is
        // unrestricted; sibling scoped ranges in the same rule go with it.
        // TODO: revoke only the offending range once the control plane
        // port exposes per-range revocation.
        for rule in rules.iter().filter(|rule| has_unrestricted_range(rule)) {
            match self.control_plane.revoke_ingress_rule(group_id, rule).await {
                Ok(()) => log.applied(format!(
                    "revoked_unrestricted_ingress({})",
                    describe_rule(rule)
                )),
                Err(error) => log.failed(format!(
                    "revoke_ingress_rule({}): {error}",
                    describe_rule(rule)
                )),
            }
        }

        log.into_outcome(resource_id, ResourceKind::SecurityGroup)
    }
}

fn has_unrestricted_range(rule: &IngressRule) -> bool {
    rule.ip_ranges
        .iter()
        .any(|cidr| is_unrestricted(cidr.as_str()))
}

/// An IPv4 network with prefix length zero matches every address.
fn is_unrestricted(cidr: &str) -> bool {
    cidr.parse::<Ipv4Net>()
        .is_ok_and(|network| network.prefix_len() == 0)
}

fn describe_rule(rule: &IngressRule) -> String {
    let protocol = rule.ip_protocol.as_deref().unwrap_or("all");
    match (rule.from_port, rule.to_port) {
        (Some(from), Some(to)) => format!("{protocol} {from}-{to}"),
        _ => protocol.to_owned(),
    }
}
