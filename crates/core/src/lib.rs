//! Shared primitives for all Rust crates in Remedian.

#![forbid(unsafe_code)]

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type used across Remedian crates.
pub type AppResult<T> = Result<T, AppError>;

/// A validated, non-empty cloud resource identifier.
///
/// Remediation always needs a concrete target, so an identifier is never
/// allowed to be empty or whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceId(String);

impl ResourceId {
    /// Creates a validated resource identifier.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(AppError::MissingResourceId(
                "resource identifier must not be empty or whitespace".to_owned(),
            ));
        }

        Ok(Self(value))
    }

    /// Returns the underlying identifier string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<ResourceId> for String {
    fn from(value: ResourceId) -> Self {
        value.0
    }
}

impl Display for ResourceId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Common application error categories.
#[derive(Debug, Error)]
pub enum AppError {
    /// No recognized event shape supplied a resource identifier.
    #[error("missing resource id: {0}")]
    MissingResourceId(String),

    /// Invalid input or violated invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// A resource control-plane operation failed.
    #[error("control plane error: {0}")]
    ControlPlane(String),

    /// The alerting collaborator rejected or failed a publish.
    #[error("notification error: {0}")]
    Notification(String),

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}
