mod alerting;
mod control_plane;

pub use alerting::AlertingChannel;
pub use control_plane::{
    EncryptionAlgorithm, IngressRule, PublicAccessFlags, ResourceControlPlane, ResourceTag,
};
