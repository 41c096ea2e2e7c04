//! Remediation dispatcher: ports, strategies, registry, executor, reporter.

#![forbid(unsafe_code)]

mod executor;
mod ports;
mod registry;
mod reporter;
mod strategies;

pub use executor::RemediationExecutor;
pub use ports::{
    AlertingChannel, EncryptionAlgorithm, IngressRule, PublicAccessFlags, ResourceControlPlane,
    ResourceTag,
};
pub use registry::RemediationRegistry;
pub use reporter::{NotificationPayload, OutcomeReporter};
pub use strategies::{
    ComputeInstanceStrategy, RemediationStrategy, SecurityGroupStrategy, StorageBucketStrategy,
};
