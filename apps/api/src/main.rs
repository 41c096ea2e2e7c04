//! Remedian API composition root.

#![forbid(unsafe_code)]

mod handlers;
mod state;

use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use aws_config::BehaviorVersion;
use aws_config::SdkConfig;
use aws_config::timeout::TimeoutConfig;
use axum::Router;
use axum::routing::{get, post};
use remedian_application::{
    AlertingChannel, OutcomeReporter, RemediationExecutor, RemediationRegistry,
    ResourceControlPlane,
};
use remedian_core::AppError;
use remedian_infrastructure::{
    AwsControlPlane, ConsoleAlertingChannel, InMemoryControlPlane, SnsAlertingChannel,
    WebhookAlertingChannel,
};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;
use url::Url;

use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
    let api_port = env::var("API_PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(3001);
    let control_plane_mode =
        env::var("CONTROL_PLANE").unwrap_or_else(|_| "in-memory".to_owned());
    let alert_mode = env::var("ALERT_CHANNEL").unwrap_or_else(|_| "console".to_owned());
    let operation_timeout_seconds = env::var("CONTROL_PLANE_TIMEOUT_SECONDS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .unwrap_or(15);

    let needs_aws = control_plane_mode == "aws" || alert_mode == "sns";
    let aws_config = if needs_aws {
        Some(load_aws_config(operation_timeout_seconds).await)
    } else {
        None
    };

    let control_plane: Arc<dyn ResourceControlPlane> = match control_plane_mode.as_str() {
        "aws" => {
            let config = aws_config
                .as_ref()
                .ok_or_else(|| AppError::Internal("AWS configuration not loaded".to_owned()))?;
            Arc::new(AwsControlPlane::new(
                aws_sdk_ec2::Client::new(config),
                aws_sdk_s3::Client::new(config),
            ))
        }
        "in-memory" => Arc::new(InMemoryControlPlane::new()),
        other => {
            return Err(AppError::Validation(format!(
                "unsupported CONTROL_PLANE value '{other}', expected 'aws' or 'in-memory'"
            )));
        }
    };

    let alerting: Arc<dyn AlertingChannel> = match alert_mode.as_str() {
        "sns" => {
            let config = aws_config
                .as_ref()
                .ok_or_else(|| AppError::Internal("AWS configuration not loaded".to_owned()))?;
            let topic_arn = required_env("SNS_TOPIC_ARN")?;
            Arc::new(SnsAlertingChannel::new(
                aws_sdk_sns::Client::new(config),
                topic_arn,
            ))
        }
        "webhook" => {
            let endpoint = required_env("ALERT_WEBHOOK_URL")?;
            let endpoint = Url::parse(endpoint.as_str()).map_err(|error| {
                AppError::Validation(format!("invalid ALERT_WEBHOOK_URL: {error}"))
            })?;
            let http_client = reqwest::Client::builder()
                .timeout(Duration::from_secs(operation_timeout_seconds))
                .build()
                .map_err(|error| {
                    AppError::Internal(format!("failed to build HTTP client: {error}"))
                })?;
            Arc::new(WebhookAlertingChannel::new(http_client, endpoint))
        }
        "console" => Arc::new(ConsoleAlertingChannel::new()),
        other => {
            return Err(AppError::Validation(format!(
                "unsupported ALERT_CHANNEL value '{other}', expected 'sns', 'webhook', or 'console'"
            )));
        }
    };

    let registry = RemediationRegistry::with_default_strategies(control_plane);
    let app_state = AppState {
        executor: RemediationExecutor::new(registry),
        reporter: OutcomeReporter::new(),
        alerting,
    };

    let router = Router::new()
        .route("/api/events", post(handlers::ingest_event))
        .route("/healthz", get(handlers::healthz))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    let host = IpAddr::from_str(api_host.as_str())
        .map_err(|error| AppError::Validation(format!("invalid API_HOST '{api_host}': {error}")))?;
    let address = SocketAddr::new(host, api_port);

    info!(
        address = %address,
        control_plane = control_plane_mode.as_str(),
        alert_channel = alert_mode.as_str(),
        "remedian-api started"
    );

    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind {address}: {error}")))?;
    axum::serve(listener, router)
        .await
        .map_err(|error| AppError::Internal(format!("server error: {error}")))
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

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required_env(name: &str) -> Result<String, AppError> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}
