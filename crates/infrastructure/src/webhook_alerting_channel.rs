use async_trait::async_trait;
use remedian_application::AlertingChannel;
use remedian_core::{AppError, AppResult};
use serde::Serialize;
use url::Url;

#[derive(Debug, Serialize)]
struct WebhookAlert<'a> {
    subject: &'a str,
    body: &'a str,
}

/// Alerting channel posting JSON alerts to an HTTP endpoint.
#[derive(Clone)]
pub struct WebhookAlertingChannel {
    http_client: reqwest::Client,
    endpoint: Url,
}

impl WebhookAlertingChannel {
    /// Creates the channel for one webhook endpoint.
    #[must_use]
    pub fn new(http_client: reqwest::Client, endpoint: Url) -> Self {
        Self {
            http_client,
            endpoint,
        }
    }
}

#[async_trait]
impl AlertingChannel for WebhookAlertingChannel {
    async fn publish(&self, subject: &str, body: &str) -> AppResult<()> {
        let response = self
            .http_client
            .post(self.endpoint.clone())
            .json(&WebhookAlert { subject, body })
            .send()
            .await
            .map_err(|error| {
                AppError::Notification(format!(
                    "webhook publish to '{}' failed: {error}",
                    self.endpoint
                ))
            })?;

        let status = response.status();
        if !status.is_success() {
            let response_body = response
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_owned());
            return Err(AppError::Notification(format!(
                "webhook endpoint '{}' returned status {}: {response_body}",
                self.endpoint,
                status.as_u16()
            )));
        }

        Ok(())
    }
}
