use async_trait::async_trait;
use aws_sdk_sns::error::DisplayErrorContext;
use remedian_application::AlertingChannel;
use remedian_core::{AppError, AppResult};
use tracing::info;

/// Alerting channel publishing to an SNS topic.
#[derive(Clone)]
pub struct SnsAlertingChannel {
    client: aws_sdk_sns::Client,
    topic_arn: String,
}

impl SnsAlertingChannel {
    /// Creates the channel for one topic.
    #[must_use]
    pub fn new(client: aws_sdk_sns::Client, topic_arn: impl Into<String>) -> Self {
        Self {
            client,
            topic_arn: topic_arn.into(),
        }
    }
}

#[async_trait]
impl AlertingChannel for SnsAlertingChannel {
    async fn publish(&self, subject: &str, body: &str) -> AppResult<()> {
        let output = self
            .client
            .publish()
            .topic_arn(self.topic_arn.as_str())
            .subject(subject)
            .message(body)
            .send()
            .await
            .map_err(|error| {
                AppError::Notification(format!(
                    "sns publish to '{}' failed: {}",
                    self.topic_arn,
                    DisplayErrorContext(&error)
                ))
            })?;

        info!(
            topic_arn = %self.topic_arn,
            message_id = output.message_id().unwrap_or("<none>"),
            "published remediation alert"
        );
        Ok(())
    }
}
