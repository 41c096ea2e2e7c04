use serde::{Deserialize, Serialize};

/// Closed classification of remediable resource kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    /// A network security group.
    SecurityGroup,
    /// An object storage bucket.
    StorageBucket,
    /// A compute instance.
    ComputeInstance,
    /// Any resource type without a remediation strategy.
    Other,
}

impl ResourceKind {
    /// Classifies a source resource type string.
    ///
    /// Total: unknown strings are data, not an error, and map to
    /// [`ResourceKind::Other`].
    #[must_use]
    pub fn classify(resource_type: &str) -> Self {
        match resource_type {
            "AWS::EC2::SecurityGroup" => Self::SecurityGroup,
            "AWS::S3::Bucket" => Self::StorageBucket,
            "AWS::EC2::Instance" => Self::ComputeInstance,
            _ => Self::Other,
        }
    }

    /// Returns the stable kind name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SecurityGroup => "SecurityGroup",
            Self::StorageBucket => "StorageBucket",
            Self::ComputeInstance => "ComputeInstance",
            Self::Other => "Other",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ResourceKind;

    #[test]
    fn known_resource_types_classify_to_their_kind() {
        assert_eq!(
            ResourceKind::classify("AWS::EC2::SecurityGroup"),
            ResourceKind::SecurityGroup
        );
        assert_eq!(
            ResourceKind::classify("AWS::S3::Bucket"),
            ResourceKind::StorageBucket
        );
        assert_eq!(
            ResourceKind::classify("AWS::EC2::Instance"),
            ResourceKind::ComputeInstance
        );
    }

    #[test]
    fn unknown_resource_types_classify_to_other() {
        assert_eq!(
            ResourceKind::classify("AWS::RDS::DBInstance"),
            ResourceKind::Other
        );
        assert_eq!(ResourceKind::classify(""), ResourceKind::Other);
    }
}
