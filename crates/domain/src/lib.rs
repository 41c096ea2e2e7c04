//! Domain model for the Remedian remediation dispatcher.

#![forbid(unsafe_code)]

/// Canonical compliance event and inbound event normalization.
pub mod event;
/// Remediation outcome record and status taxonomy.
pub mod outcome;
/// Resource kind classification.
pub mod resource;

pub use event::{
    ComplianceEvent, ComplianceState, UNKNOWN_ACCOUNT, UNKNOWN_REGION, UNKNOWN_RESOURCE,
    UNKNOWN_RESOURCE_TYPE, UNKNOWN_RULE, UNKNOWN_TIME,
};
pub use outcome::{RemediationOutcome, RemediationStatus};
pub use resource::ResourceKind;
