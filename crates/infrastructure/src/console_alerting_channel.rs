//! Console alerting channel for development. Logs alerts to tracing output.

use async_trait::async_trait;
use remedian_application::AlertingChannel;
use remedian_core::AppResult;
use tracing::info;

/// Development alerting channel that logs alerts to the console.
#[derive(Clone)]
pub struct ConsoleAlertingChannel;

impl ConsoleAlertingChannel {
    /// Creates a new console alerting channel.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for ConsoleAlertingChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AlertingChannel for ConsoleAlertingChannel {
    async fn publish(&self, subject: &str, body: &str) -> AppResult<()> {
        info!(
            subject = subject,
            "--- ALERT (console) ---\nSubject: {}\n\n{}\n--- END ALERT ---",
            subject,
            body
        );

        Ok(())
    }
}
