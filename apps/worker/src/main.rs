//! Remedian queue worker runtime.

#![forbid(unsafe_code)]

use std::env;
use std::sync::Arc;
use std::time::Duration;

use aws_config::BehaviorVersion;
use aws_config::SdkConfig;
use aws_config::timeout::TimeoutConfig;
use aws_sdk_sqs::error::DisplayErrorContext;
use aws_sdk_sqs::types::Message;
use remedian_application::{
    AlertingChannel, OutcomeReporter, RemediationExecutor, RemediationRegistry,
};
use remedian_core::{AppError, AppResult};
use remedian_infrastructure::{AwsControlPlane, ConsoleAlertingChannel, SnsAlertingChannel};
use serde_json::Value;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[derive(Debug, Clone)]
struct WorkerConfig {
    queue_url: String,
    worker_id: String,
    max_messages: i32,
    poll_wait_seconds: i32,
    operation_timeout_seconds: u64,
    sns_topic_arn: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = WorkerConfig::load()?;
    let aws_config = load_aws_config(config.operation_timeout_seconds).await;

    let sqs_client = aws_sdk_sqs::Client::new(&aws_config);
    let control_plane = Arc::new(AwsControlPlane::new(
        aws_sdk_ec2::Client::new(&aws_config),
        aws_sdk_s3::Client::new(&aws_config),
    ));
    let alerting: Arc<dyn AlertingChannel> = match config.sns_topic_arn.as_deref() {
        Some(topic_arn) => Arc::new(SnsAlertingChannel::new(
            aws_sdk_sns::Client::new(&aws_config),
            topic_arn,
        )),
        None => Arc::new(ConsoleAlertingChannel::new()),
    };

    let executor = RemediationExecutor::new(RemediationRegistry::with_default_strategies(
        control_plane,
    ));
    let reporter = OutcomeReporter::new();

    info!(
        worker_id = %config.worker_id,
        queue_url = %config.queue_url,
        max_messages = config.max_messages,
        poll_wait_seconds = config.poll_wait_seconds,
        "remedian-worker started"
    );

    loop {
        let messages = match receive_messages(&sqs_client, &config).await {
            Ok(messages) => messages,
            Err(error) => {
                warn!(
                    worker_id = %config.worker_id,
                    error = %error,
                    "failed to receive queue messages"
                );
                tokio::time::sleep(Duration::from_secs(5)).await;
                continue;
            }
        };

        if messages.is_empty() {
            continue;
        }

        info!(
            worker_id = %config.worker_id,
            received = messages.len(),
            "claimed compliance events"
        );

        let mut processed = 0_u32;
        let mut failed = 0_u32;

        for message in messages {
            match process_message(&executor, &reporter, alerting.as_ref(), &config, &message)
                .await
            {
                Ok(()) => processed = processed.saturating_add(1),
                Err(error) => {
                    failed = failed.saturating_add(1);
                    warn!(
                        worker_id = %config.worker_id,
                        error = %error,
                        "failed to process queue message"
                    );
                }
            }

            if let Some(receipt_handle) = message.receipt_handle() {
                if let Err(error) = delete_message(&sqs_client, &config, receipt_handle).await {
                    warn!(
                        worker_id = %config.worker_id,
                        error = %error,
                        "failed to delete processed queue message"
                    );
                }
            }
        }

        info!(
            worker_id = %config.worker_id,
            processed = processed,
            failed = failed,
            "completed event batch"
        );
    }
}

async fn receive_messages(
    sqs_client: &aws_sdk_sqs::Client,
    config: &WorkerConfig,
) -> AppResult<Vec<Message>> {
    let output = sqs_client
        .receive_message()
        .queue_url(config.queue_url.as_str())
        .max_number_of_messages(config.max_messages)
        .wait_time_seconds(config.poll_wait_seconds)
        .send()
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "sqs receive_message failed: {}",
                DisplayErrorContext(&error)
            ))
        })?;

    Ok(output.messages.unwrap_or_default())
}

async fn delete_message(
    sqs_client: &aws_sdk_sqs::Client,
    config: &WorkerConfig,
    receipt_handle: &str,
) -> AppResult<()> {
    sqs_client
        .delete_message()
        .queue_url(config.queue_url.as_str())
        .receipt_handle(receipt_handle)
        .send()
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "sqs delete_message failed: {}",
                DisplayErrorContext(&error)
            ))
        })?;

    Ok(())
}

async fn process_message(
    executor: &RemediationExecutor,
    reporter: &OutcomeReporter,
    alerting: &dyn AlertingChannel,
    config: &WorkerConfig,
    message: &Message,
) -> AppResult<()> {
    let invocation_id = Uuid::new_v4();
    let body = message.body().unwrap_or_default();

    // Malformed bodies parse the same way on redelivery, so they are
    // reported and the message is still deleted by the caller.
    let raw_event = serde_json::from_str::<Value>(body).map_err(|error| {
        AppError::Validation(format!("queue message body is not valid JSON: {error}"))
    })?;

    let (outcome, event) = executor.execute_with_event(&raw_event).await;
    let payload = reporter.report(&outcome, event.as_ref());

    match payload.body() {
        Ok(alert_body) => {
            if let Err(error) = alerting
                .publish(payload.subject().as_str(), alert_body.as_str())
                .await
            {
                warn!(
                    worker_id = %config.worker_id,
                    invocation_id = %invocation_id,
                    resource_id = outcome.resource_id(),
                    error = %error,
                    "failed to publish remediation alert"
                );
            }
        }
        Err(error) => warn!(
            worker_id = %config.worker_id,
            invocation_id = %invocation_id,
            resource_id = outcome.resource_id(),
            error = %error,
            "failed to render remediation alert"
        ),
    }

    info!(
        worker_id = %config.worker_id,
        invocation_id = %invocation_id,
        resource_id = outcome.resource_id(),
        resource_kind = outcome.resource_kind().as_str(),
        status = outcome.status().as_str(),
        actions = outcome.actions_applied().len(),
        errors = outcome.errors().len(),
        "processed compliance event"
    );

    Ok(())
}

async fn load_aws_config(operation_timeout_seconds: u64) -> SdkConfig {
    let timeout_config = TimeoutConfig::builder()
        .operation_timeout(Duration::from_secs(operation_timeout_seconds))
        .build();

    aws_config::defaults(BehaviorVersion::latest())
        .timeout_config(timeout_config)
        .load()
        .await
}

impl WorkerConfig {
    fn load() -> AppResult<Self> {
        let queue_url = required_env("QUEUE_URL")?;
        let worker_id = env::var("WORKER_ID")
            .ok()
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| format!("remediator-{}", std::process::id()));
        let max_messages = parse_env_i32("WORKER_MAX_MESSAGES", 10)?;
        let poll_wait_seconds = parse_env_i32("WORKER_POLL_WAIT_SECONDS", 20)?;
        let operation_timeout_seconds = parse_env_u64("CONTROL_PLANE_TIMEOUT_SECONDS", 15)?;
        let sns_topic_arn = env::var("SNS_TOPIC_ARN")
            .ok()
            .filter(|value| !value.trim().is_empty());

        if !(1..=10).contains(&max_messages) {
            return Err(AppError::Validation(
                "WORKER_MAX_MESSAGES must be between 1 and 10".to_owned(),
            ));
        }

        if !(0..=20).contains(&poll_wait_seconds) {
            return Err(AppError::Validation(
                "WORKER_POLL_WAIT_SECONDS must be between 0 and 20".to_owned(),
            ));
        }

        if operation_timeout_seconds == 0 {
            return Err(AppError::Validation(
                "CONTROL_PLANE_TIMEOUT_SECONDS must be greater than zero".to_owned(),
            ));
        }

        Ok(Self {
            queue_url,
            worker_id,
            max_messages,
            poll_wait_seconds,
            operation_timeout_seconds,
            sns_topic_arn,
        })
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required_env(name: &str) -> AppResult<String> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}

fn parse_env_i32(name: &str, default: i32) -> AppResult<i32> {
    match env::var(name) {
        Ok(value) => value.parse::<i32>().map_err(|error| {
            AppError::Validation(format!("invalid {name} value '{value}': {error}"))
        }),
        Err(_) => Ok(default),
    }
}

fn parse_env_u64(name: &str, default: u64) -> AppResult<u64> {
    match env::var(name) {
        Ok(value) => value.parse::<u64>().map_err(|error| {
            AppError::Validation(format!("invalid {name} value '{value}': {error}"))
        }),
        Err(_) => Ok(default),
    }
}
