use async_trait::async_trait;
use remedian_core::AppResult;

/// Port over the external alerting collaborator.
///
/// A failed publish is an [`remedian_core::AppError::Notification`]; the
/// caller logs it and never lets it mask the remediation outcome.
#[async_trait]
pub trait AlertingChannel: Send + Sync {
    /// Publishes one notification with a subject line and a body.
    async fn publish(&self, subject: &str, body: &str) -> AppResult<()>;
}
